//! Requirement engine.
//!
//! Typed predicates over domain objects, composable with AND/OR/NOT,
//! producing pass/fail plus a human-readable reason. Deciding whether a
//! candidate is legal is fully independent of *how* the candidate was
//! obtained.
//!
//! - [`Condition`]: one predicate, built from a plain function via
//!   [`condition_fn`] or composed with [`all`]/[`any`]/[`not`].
//! - [`Requirement`]: instruction text plus the conditions a candidate
//!   must pass to fill a slot.
//! - [`ValidationContext`]: the initiator identity conditions may use,
//!   without access to the whole game state.

mod condition;
mod requirement;
mod result;

pub use condition::{all, any, condition_fn, not, BoxCondition, Condition};
pub use requirement::Requirement;
pub use result::{ValidationContext, ValidationResult};
