//! Requirements: what a candidate must satisfy to fill a slot.

use smallvec::SmallVec;
use tracing::warn;

use super::condition::BoxCondition;
use super::result::{ValidationContext, ValidationResult};

/// Composable validation rule for one target slot.
///
/// Bundles an instruction string for whoever picks the candidate
/// ("Choose an enemy creature") with the conditions a candidate must
/// pass. All conditions must hold; an empty condition list is vacuously
/// valid and logged as a warning, since it usually means a requirement
/// was never wired up.
pub struct Requirement<T> {
    instruction: String,
    conditions: SmallVec<[BoxCondition<T>; 2]>,
}

impl<T: 'static> Requirement<T> {
    /// Create a requirement with an instruction and no conditions yet.
    pub fn new(instruction: impl Into<String>) -> Self {
        Self { instruction: instruction.into(), conditions: SmallVec::new() }
    }

    /// Add a condition (builder pattern).
    #[must_use]
    pub fn with(mut self, condition: BoxCondition<T>) -> Self {
        self.conditions.push(condition);
        self
    }

    /// The instruction text shown to the resolver.
    #[must_use]
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Number of attached conditions.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    /// Check a candidate against every condition.
    pub fn check(&self, candidate: &T, ctx: &ValidationContext) -> ValidationResult {
        if self.conditions.is_empty() {
            warn!(
                instruction = %self.instruction,
                "requirement has no conditions; accepting candidate vacuously"
            );
            return ValidationResult::ok();
        }
        for condition in &self.conditions {
            let result = condition.validate(candidate, ctx);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::ok()
    }

    /// Check an optional candidate: a missing candidate always fails
    /// with a generic "no selection" error before any concrete check.
    pub fn check_opt(&self, candidate: Option<&T>, ctx: &ValidationContext) -> ValidationResult {
        match candidate {
            Some(candidate) => self.check(candidate, ctx),
            None => ValidationResult::fail("no selection was made"),
        }
    }
}

impl<T> std::fmt::Debug for Requirement<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Requirement")
            .field("instruction", &self.instruction)
            .field("conditions", &self.conditions.len())
            .finish()
    }
}
