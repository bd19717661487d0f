//! Operation pipeline: the queue consumer specialized for operations.
//!
//! Wires the queue, the requirement engine, and the resolution
//! protocol together. For each dequeued operation: feasibility check →
//! target resolution (may suspend awaiting the selector) → execute →
//! completion event, exactly once per operation, success or not.
//!
//! Never runs two operations concurrently. An operation whose effect
//! spawns follow-up operations pushes them to this same pipeline; they
//! run only after the current one fully completes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::UnitId;
use crate::operations::Operation;
use crate::queue::{Priority, PriorityTaskQueue, QueueTask, TaskResult};
use crate::resolve::{CandidateProvider, ResolveError, Selector, TargetResolver};

const COMPLETED_CHANNEL_CAPACITY: usize = 64;

/// What happened to one dequeued operation. Broadcast to external
/// listeners (card-play UI, AI observers) exactly once per operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// The operation's name.
    pub operation: String,
    /// The unit that initiated it.
    pub source: UnitId,
    /// How it ended.
    pub result: TaskResult,
}

/// Adapter that makes an operation runnable on the task queue.
pub struct OperationTask {
    operation: Box<dyn Operation>,
    resolver: Arc<TargetResolver>,
    completed_tx: broadcast::Sender<OperationOutcome>,
}

impl OperationTask {
    async fn process(&mut self, cancel: CancellationToken) -> TaskResult {
        match self
            .resolver
            .resolve(self.operation.as_mut(), cancel)
            .await
        {
            Ok(()) => {}
            Err(ResolveError::Unsatisfiable) => {
                return TaskResult::failure("targets cannot be filled");
            }
            Err(err) => return TaskResult::failure(err.to_string()),
        }

        // Re-checked here even though resolve() only returns Ok once
        // every slot it saw was filled: execute() must never run on a
        // partially parameterized operation.
        if !self.operation.targets().is_ready() {
            return TaskResult::failure("cancelled during target filling");
        }

        if self.operation.execute().await {
            TaskResult::Success
        } else {
            TaskResult::failure("execution failed")
        }
    }
}

#[async_trait]
impl QueueTask for OperationTask {
    fn name(&self) -> String {
        self.operation.name()
    }

    async fn run(&mut self, cancel: CancellationToken) -> TaskResult {
        // Race the token here too, not only in the runner: the outcome
        // below must go out even when execute() is abandoned mid-await.
        // Biased so the resolver, which observes the token itself, gets
        // to report its own more specific result first.
        let result = tokio::select! {
            biased;
            result = self.process(cancel.clone()) => result,
            () = cancel.cancelled() => TaskResult::Cancelled,
        };
        let outcome = OperationOutcome {
            operation: self.operation.name(),
            source: self.operation.source(),
            result: result.clone(),
        };
        debug!(operation = %outcome.operation, result = %result, "operation completed");
        let _ = self.completed_tx.send(outcome);
        result
    }
}

/// The single-consumer operation pipeline.
///
/// Cloning shares the same queue and listeners.
pub struct OperationPipeline {
    queue: PriorityTaskQueue<OperationTask>,
    resolver: Arc<TargetResolver>,
    completed_tx: broadcast::Sender<OperationOutcome>,
}

impl Clone for OperationPipeline {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            resolver: Arc::clone(&self.resolver),
            completed_tx: self.completed_tx.clone(),
        }
    }
}

impl OperationPipeline {
    /// Create a pipeline over the given external collaborators, with
    /// the default resolution timeout and retry policy.
    pub fn new(selector: Arc<dyn Selector>, provider: Arc<dyn CandidateProvider>) -> Self {
        Self::with_resolver(TargetResolver::new(selector, provider))
    }

    /// Create a pipeline around a pre-configured resolver.
    pub fn with_resolver(resolver: TargetResolver) -> Self {
        let (completed_tx, _) = broadcast::channel(COMPLETED_CHANNEL_CAPACITY);
        Self {
            queue: PriorityTaskQueue::new("operations"),
            resolver: Arc::new(resolver),
            completed_tx,
        }
    }

    /// Enqueue an operation at the given priority.
    pub fn push(&self, operation: Box<dyn Operation>, priority: Priority) {
        self.queue.push(
            OperationTask {
                operation,
                resolver: Arc::clone(&self.resolver),
                completed_tx: self.completed_tx.clone(),
            },
            priority,
        );
    }

    /// Subscribe to completion events.
    pub fn completed(&self) -> broadcast::Receiver<OperationOutcome> {
        self.completed_tx.subscribe()
    }

    /// The underlying task queue, for cancellation, removal, and
    /// drain notification.
    #[must_use]
    pub fn queue(&self) -> &PriorityTaskQueue<OperationTask> {
        &self.queue
    }

    /// Number of operations waiting (excludes the one in flight).
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no operations are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether an operation is currently being processed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.queue.is_running()
    }

    /// Cancel only the operation currently resolving or executing.
    pub fn cancel_current(&self) {
        self.queue.cancel_current();
    }

    /// Cancel the in-flight operation and drop everything queued.
    pub async fn cancel_all(&self) {
        self.queue.cancel_all().await;
    }
}
