//! Legacy command path: reversible tasks with an undo history.
//!
//! Commands predate operations and survive as an alternate consumer of
//! the same priority queue: a command executes synchronously and can
//! undo its own effect. Executed commands are retained in a bounded
//! history (newest ten) so the last few can be reverted.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::queue::{QueueTask, TaskResult};

/// How many executed commands the history retains.
pub const HISTORY_CAPACITY: usize = 10;

/// A reversible unit of work.
pub trait Command: Send + Sync + 'static {
    /// Identity for logs.
    fn name(&self) -> String;

    /// Apply the command's effect. Returns `true` on success.
    fn execute(&mut self) -> bool;

    /// Revert the command's effect.
    fn undo(&mut self);
}

/// Bounded stack of executed commands with push-and-trim-oldest
/// semantics. Only successfully executed commands are pushed.
pub struct CommandHistory {
    entries: VecDeque<Box<dyn Command>>,
    capacity: usize,
}

impl CommandHistory {
    /// Create a history with the default capacity of ten.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create a history with a custom capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Number of retained commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing can be undone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retain an executed command, dropping the oldest when full.
    pub fn push(&mut self, command: Box<dyn Command>) {
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!(command = %evicted.name(), "undo history full; dropping oldest");
            }
        }
        self.entries.push_back(command);
    }

    /// Undo the most recently executed command. Returns `false` when
    /// the history is empty.
    pub fn undo_last(&mut self) -> bool {
        match self.entries.pop_back() {
            Some(mut command) => {
                info!(command = %command.name(), "undoing command");
                command.undo();
                true
            }
            None => false,
        }
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared, lock-protected history handle for command tasks.
pub type SharedHistory = Arc<Mutex<CommandHistory>>;

/// Adapter that makes a command runnable on the task queue, recording
/// it into the shared history on success.
pub struct CommandTask {
    command: Option<Box<dyn Command>>,
    history: SharedHistory,
}

impl CommandTask {
    /// Wrap a command for the queue.
    pub fn new(command: Box<dyn Command>, history: SharedHistory) -> Self {
        Self { command: Some(command), history }
    }
}

#[async_trait]
impl QueueTask for CommandTask {
    fn name(&self) -> String {
        self.command
            .as_ref()
            .map_or_else(|| "command".to_string(), |c| c.name())
    }

    async fn run(&mut self, cancel: CancellationToken) -> TaskResult {
        if cancel.is_cancelled() {
            return TaskResult::Cancelled;
        }
        let Some(mut command) = self.command.take() else {
            return TaskResult::failure("command already consumed");
        };
        if command.execute() {
            self.history.lock().push(command);
            TaskResult::Success
        } else {
            TaskResult::failure("execution failed")
        }
    }
}
