//! Task priority tiers and queue ordering.
//!
//! Higher priority dequeues first; within a tier, tasks keep their
//! push order (FIFO) via a monotonic sequence number.

use serde::{Deserialize, Serialize};

/// Priority tier governing dequeue order.
///
/// Derived `Ord` follows declaration order: `Low < Normal < High < Critical`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Background work, runs after everything else.
    Low,
    /// Default tier for ordinary game actions.
    Normal,
    /// Runs before normal actions.
    High,
    /// Runs before everything, e.g. forced interrupts.
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
            Self::Critical => "Critical",
        };
        write!(f, "{name}")
    }
}

/// A queued task together with its ordering keys.
///
/// Ordering: higher priority first, then lower sequence number
/// (older push) first. `seq` is unique per queue instance, which
/// makes the ordering total.
#[derive(Debug)]
pub(crate) struct QueueEntry<T> {
    pub priority: Priority,
    pub seq: u64,
    pub name: String,
    pub task: T,
}

impl<T> PartialEq for QueueEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<T> Eq for QueueEntry<T> {}

impl<T> PartialOrd for QueueEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for QueueEntry<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap: the greatest entry pops first.
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
