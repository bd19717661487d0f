//! A single named target slot.

use crate::validation::{Requirement, ValidationContext, ValidationResult};

use super::value::{TargetKind, TargetValue};
use super::TargetError;

/// One parameter of an operation: a named, typed slot bound to a
/// requirement, either empty or filled.
///
/// Candidates from a selector go through [`TargetSlot::validate`] (kind
/// check, then the requirement); a kind mismatch there is a rejection,
/// not a bug. Direct writes through [`TargetSlot::set`] are the
/// programmer path and report a kind mismatch as a [`TargetError`].
#[derive(Debug)]
pub struct TargetSlot {
    key: String,
    kind: TargetKind,
    requirement: Requirement<TargetValue>,
    value: Option<TargetValue>,
}

impl TargetSlot {
    /// Create an empty slot.
    pub fn new(
        key: impl Into<String>,
        kind: TargetKind,
        requirement: Requirement<TargetValue>,
    ) -> Self {
        Self { key: key.into(), kind, requirement, value: None }
    }

    /// The slot's key, unique within its operation.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The kind of candidate this slot accepts.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        self.kind
    }

    /// The requirement a candidate must satisfy.
    #[must_use]
    pub fn requirement(&self) -> &Requirement<TargetValue> {
        &self.requirement
    }

    /// The filled value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<TargetValue> {
        self.value
    }

    /// Whether the slot has been filled.
    #[must_use]
    pub const fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Check a proposed candidate: kind first, then the requirement.
    pub fn validate(&self, candidate: &TargetValue, ctx: &ValidationContext) -> ValidationResult {
        if candidate.kind() != self.kind {
            return ValidationResult::fail(format!(
                "target `{}` expects a {}, got a {}",
                self.key,
                self.kind,
                candidate.kind()
            ));
        }
        self.requirement.check(candidate, ctx)
    }

    /// Set the value directly, e.g. for targets filled automatically by
    /// the game layer. A kind mismatch is a wiring bug.
    pub fn set(&mut self, value: TargetValue) -> Result<(), TargetError> {
        if value.kind() != self.kind {
            return Err(TargetError::KindMismatch {
                key: self.key.clone(),
                expected: self.kind,
                actual: value.kind(),
            });
        }
        self.value = Some(value);
        Ok(())
    }

    /// Fill with an already-validated value.
    pub(crate) fn fill(&mut self, value: TargetValue) {
        debug_assert_eq!(value.kind(), self.kind);
        self.value = Some(value);
    }

    /// Empty the slot again.
    pub(crate) fn clear(&mut self) {
        self.value = None;
    }
}
