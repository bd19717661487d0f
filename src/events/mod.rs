//! Broadcast event bus for cross-component game events.
//!
//! Collaborators that should not call each other directly (turn logic,
//! battle setup, presenters) communicate through sum-typed messages on
//! an explicit bus. The bus is passed as a dependency to whoever needs
//! to publish or subscribe; there is no ambient singleton.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::core::{PlayerId, UnitId};

const DEFAULT_BUS_CAPACITY: usize = 64;

/// Broadcast game events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player's turn began.
    TurnStarted {
        /// Whose turn it is.
        player: PlayerId,
    },

    /// A battle began.
    BattleStarted,

    /// A unit left the board.
    UnitDied {
        /// The unit that died.
        unit: UnitId,
    },

    /// A player drew a card.
    CardDrawn {
        /// Who drew.
        player: PlayerId,
    },

    /// An operation finished, successfully or not.
    OperationCompleted {
        /// The operation's name.
        operation: String,
        /// Whether it succeeded.
        success: bool,
    },
}

/// Typed publish/subscribe bus over a broadcast channel.
///
/// Cloning shares the channel. Publishing never blocks; events sent
/// with no live subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GameEvent>,
}

impl EventBus {
    /// Create a bus with the default buffer capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    /// Create a bus buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: GameEvent) {
        debug!(?event, "event published");
        let _ = self.tx.send(event);
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
