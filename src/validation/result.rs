//! Validation outcomes and the context conditions evaluate against.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, UnitId};

/// Pass/fail outcome of a validation check.
///
/// Invariant: a valid result carries an empty message; an invalid one
/// carries a human-readable reason suitable for re-display to whoever
/// proposed the candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    valid: bool,
    message: String,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub fn ok() -> Self {
        Self { valid: true, message: String::new() }
    }

    /// A failing result with a reason.
    pub fn fail(message: impl Into<String>) -> Self {
        Self { valid: false, message: message.into() }
    }

    /// Whether the check passed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// The failure reason (empty when valid).
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Context handed to every condition check.
///
/// Carries the initiating player's identity (and optionally the source
/// unit) so ownership-style conditions can tell friend from foe without
/// seeing the whole game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationContext {
    /// The player whose action is being validated.
    pub initiator: PlayerId,
    /// The unit that initiated the operation, when there is one.
    pub source: Option<UnitId>,
}

impl ValidationContext {
    /// Create a context for the given initiating player.
    #[must_use]
    pub const fn new(initiator: PlayerId) -> Self {
        Self { initiator, source: None }
    }

    /// Attach the source unit (builder pattern).
    #[must_use]
    pub const fn with_source(mut self, source: UnitId) -> Self {
        self.source = Some(source);
        self
    }
}
