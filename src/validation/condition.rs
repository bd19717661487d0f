//! Conditions: atomic predicates and their combinators.
//!
//! A [`Condition<T>`] decides whether a candidate of type `T` is
//! acceptable in a given [`ValidationContext`]. Conditions compose via
//! [`all`], [`any`], and [`not`]; the engine only cares about this
//! algebra and the leaf-check contract, concrete game families
//! (ally/enemy, minimum health, zone membership, ...) live with the
//! game layer.

use super::result::{ValidationContext, ValidationResult};

/// Boxed condition, the form requirements and combinators traffic in.
pub type BoxCondition<T> = Box<dyn Condition<T>>;

/// A single predicate over a candidate.
pub trait Condition<T>: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Check the candidate against this condition.
    fn validate(&self, candidate: &T, ctx: &ValidationContext) -> ValidationResult;
}

struct FnCondition<F> {
    name: String,
    check: F,
}

impl<T, F> Condition<T> for FnCondition<F>
where
    F: Fn(&T, &ValidationContext) -> ValidationResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, candidate: &T, ctx: &ValidationContext) -> ValidationResult {
        (self.check)(candidate, ctx)
    }
}

/// Build a leaf condition from a plain function.
pub fn condition_fn<T, F>(name: impl Into<String>, check: F) -> BoxCondition<T>
where
    T: 'static,
    F: Fn(&T, &ValidationContext) -> ValidationResult + Send + Sync + 'static,
{
    Box::new(FnCondition { name: name.into(), check })
}

struct AllCondition<T> {
    conditions: Vec<BoxCondition<T>>,
}

impl<T: 'static> Condition<T> for AllCondition<T> {
    fn name(&self) -> &str {
        "all"
    }

    fn validate(&self, candidate: &T, ctx: &ValidationContext) -> ValidationResult {
        // Short-circuits: the first failure's message wins.
        for condition in &self.conditions {
            let result = condition.validate(candidate, ctx);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::ok()
    }
}

struct AnyCondition<T> {
    conditions: Vec<BoxCondition<T>>,
}

impl<T: 'static> Condition<T> for AnyCondition<T> {
    fn name(&self) -> &str {
        "any"
    }

    fn validate(&self, candidate: &T, ctx: &ValidationContext) -> ValidationResult {
        // Collects every failure reason before reporting aggregate failure.
        let mut reasons = Vec::with_capacity(self.conditions.len());
        for condition in &self.conditions {
            let result = condition.validate(candidate, ctx);
            if result.is_valid() {
                return ValidationResult::ok();
            }
            reasons.push(result.message().to_string());
        }
        ValidationResult::fail(format!("no alternative matched: {}", reasons.join("; ")))
    }
}

struct NotCondition<T> {
    inner: BoxCondition<T>,
}

impl<T: 'static> Condition<T> for NotCondition<T> {
    fn name(&self) -> &str {
        "not"
    }

    fn validate(&self, candidate: &T, ctx: &ValidationContext) -> ValidationResult {
        if self.inner.validate(candidate, ctx).is_valid() {
            ValidationResult::fail("condition must not be met")
        } else {
            ValidationResult::ok()
        }
    }
}

/// Valid iff all sub-conditions are valid; fails with the first
/// failure's message.
pub fn all<T: 'static>(conditions: impl IntoIterator<Item = BoxCondition<T>>) -> BoxCondition<T> {
    Box::new(AllCondition { conditions: conditions.into_iter().collect() })
}

/// Valid iff any sub-condition is valid; on total failure aggregates
/// every sub-message into one combined error.
pub fn any<T: 'static>(conditions: impl IntoIterator<Item = BoxCondition<T>>) -> BoxCondition<T> {
    Box::new(AnyCondition { conditions: conditions.into_iter().collect() })
}

/// Valid iff the inner condition is invalid.
pub fn not<T: 'static>(condition: BoxCondition<T>) -> BoxCondition<T> {
    Box::new(NotCondition { inner: condition })
}
