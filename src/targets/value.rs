//! Target candidates as a tagged union.
//!
//! Operations take heterogeneously-typed targets (a unit here, a board
//! cell there). Rather than runtime type registries, candidates are a
//! sum type with an explicit kind discriminant; a slot declares which
//! kind it accepts.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, CellId, PlayerId, UnitId, ZoneId};

/// The kind of entity a slot accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// A unit on the board.
    Unit,
    /// A card instance.
    Card,
    /// A zone (hand, deck, battlefield, ...).
    Zone,
    /// A board cell.
    Cell,
    /// A player.
    Player,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unit => "unit",
            Self::Card => "card",
            Self::Zone => "zone",
            Self::Cell => "cell",
            Self::Player => "player",
        };
        write!(f, "{name}")
    }
}

/// A concrete target candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetValue {
    /// A unit on the board.
    Unit(UnitId),
    /// A card instance.
    Card(CardId),
    /// A zone.
    Zone(ZoneId),
    /// A board cell.
    Cell(CellId),
    /// A player.
    Player(PlayerId),
}

impl TargetValue {
    /// The kind discriminant of this value.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Unit(_) => TargetKind::Unit,
            Self::Card(_) => TargetKind::Card,
            Self::Zone(_) => TargetKind::Zone,
            Self::Cell(_) => TargetKind::Cell,
            Self::Player(_) => TargetKind::Player,
        }
    }

    /// The unit ID, if this is a unit target.
    #[must_use]
    pub const fn as_unit(&self) -> Option<UnitId> {
        match self {
            Self::Unit(id) => Some(*id),
            _ => None,
        }
    }

    /// The card ID, if this is a card target.
    #[must_use]
    pub const fn as_card(&self) -> Option<CardId> {
        match self {
            Self::Card(id) => Some(*id),
            _ => None,
        }
    }

    /// The zone ID, if this is a zone target.
    #[must_use]
    pub const fn as_zone(&self) -> Option<ZoneId> {
        match self {
            Self::Zone(id) => Some(*id),
            _ => None,
        }
    }

    /// The cell coordinate, if this is a cell target.
    #[must_use]
    pub const fn as_cell(&self) -> Option<CellId> {
        match self {
            Self::Cell(id) => Some(*id),
            _ => None,
        }
    }

    /// The player ID, if this is a player target.
    #[must_use]
    pub const fn as_player(&self) -> Option<PlayerId> {
        match self {
            Self::Player(id) => Some(*id),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit(id) => write!(f, "{id}"),
            Self::Card(id) => write!(f, "{id}"),
            Self::Zone(id) => write!(f, "{id}"),
            Self::Cell(id) => write!(f, "{id}"),
            Self::Player(id) => write!(f, "{id}"),
        }
    }
}

impl From<UnitId> for TargetValue {
    fn from(id: UnitId) -> Self {
        Self::Unit(id)
    }
}

impl From<CardId> for TargetValue {
    fn from(id: CardId) -> Self {
        Self::Card(id)
    }
}

impl From<ZoneId> for TargetValue {
    fn from(id: ZoneId) -> Self {
        Self::Zone(id)
    }
}

impl From<CellId> for TargetValue {
    fn from(id: CellId) -> Self {
        Self::Cell(id)
    }
}

impl From<PlayerId> for TargetValue {
    fn from(id: PlayerId) -> Self {
        Self::Player(id)
    }
}
