//! Target model: an operation's parameterization.
//!
//! An operation declares named, typed slots at construction; each slot
//! is bound to a [`Requirement`](crate::validation::Requirement) and is
//! either empty or filled. The operation is ready to execute iff every
//! slot is filled.
//!
//! Heterogeneous target types are a tagged union ([`TargetValue`]) with
//! an explicit [`TargetKind`] discriminant rather than runtime type
//! registries.

mod set;
mod slot;
mod value;

pub use set::{TargetSet, TargetSetBuilder};
pub use slot::TargetSlot;
pub use value::{TargetKind, TargetValue};

use thiserror::Error;

/// Wiring bugs in target handling, surfaced at the call site rather
/// than swallowed: they indicate a programming error, not a runtime
/// game condition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TargetError {
    /// Two slots in one operation share a key.
    #[error("duplicate target key `{0}`")]
    DuplicateKey(String),

    /// A write addressed a key the operation never declared.
    #[error("unknown target key `{0}`")]
    UnknownKey(String),

    /// A write carried a value of the wrong kind.
    #[error("target `{key}` expects a {expected}, got a {actual}")]
    KindMismatch {
        /// The slot's key.
        key: String,
        /// The declared kind.
        expected: TargetKind,
        /// The kind that was written.
        actual: TargetKind,
    },
}
