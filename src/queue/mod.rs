//! Priority task queue.
//!
//! A generic, priority-ordered, single-consumer async task runner:
//!
//! - Tasks of higher [`Priority`] dequeue before lower ones regardless
//!   of push order; equal priorities preserve push order (FIFO).
//! - At most one task runs at a time per queue instance; independent
//!   instances (say, operations and animations) share nothing.
//! - The in-flight task can be cancelled alone ([`PriorityTaskQueue::cancel_current`])
//!   or together with everything queued ([`PriorityTaskQueue::cancel_all`]).
//!
//! The queue knows nothing about operations or commands; anything
//! implementing [`QueueTask`] can ride it.

mod priority;
mod runner;
mod task;

pub use priority::Priority;
pub use runner::{PriorityTaskQueue, TaskInfo, CANCEL_ALL_TIMEOUT};
pub use task::{QueueTask, TaskResult};
