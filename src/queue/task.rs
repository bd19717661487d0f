//! The executable task contract and its result type.
//!
//! Both pipeline operations and legacy commands are polymorphic over
//! [`QueueTask`]; the queue itself never learns what a task does.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Outcome of a single task run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskResult {
    /// The task ran to completion successfully.
    Success,

    /// The task ran but reported failure.
    Failure(String),

    /// The task was cancelled before or during execution.
    Cancelled,
}

impl TaskResult {
    /// Build a failure result from any message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Whether the task succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Failure(msg) => Some(msg),
            Self::Success | Self::Cancelled => None,
        }
    }
}

impl std::fmt::Display for TaskResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure(msg) => write!(f, "failure: {msg}"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A unit of work runnable on a [`PriorityTaskQueue`](super::PriorityTaskQueue).
///
/// The queue runs at most one task at a time and hands each run a
/// cancellation token scoped to that run. Tasks that suspend (awaiting
/// a selection, an animation) should observe the token at their own
/// suspension points; the queue additionally races the run against the
/// token so an inattentive task is still abandoned on cancellation.
#[async_trait]
pub trait QueueTask: Send + Sync + 'static {
    /// Identity for logs and removal predicates.
    fn name(&self) -> String;

    /// Run the task to completion or cancellation.
    async fn run(&mut self, cancel: CancellationToken) -> TaskResult;
}
