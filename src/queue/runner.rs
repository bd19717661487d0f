//! The priority task queue runner.
//!
//! A generic, priority-ordered, single-consumer task runner. Producers
//! may push from any thread; at most one task executes at a time per
//! queue instance. The queue owns no domain knowledge.
//!
//! ## Locking
//!
//! The queue structure is the only shared mutable state. It sits behind
//! a reader/writer lock: queries take the read side, enqueue/dequeue/
//! remove/clear take the write side. Guards are never held across an
//! await point.
//!
//! ## Cancellation
//!
//! Two sources compose. A global token (reset by [`cancel_all`]) covers
//! the whole queue; each run additionally gets a child scope so
//! [`cancel_current`] can abort just the in-flight task. Queued tasks
//! that have not started are discarded on cancellation, never "run and
//! cancelled".
//!
//! [`cancel_all`]: PriorityTaskQueue::cancel_all
//! [`cancel_current`]: PriorityTaskQueue::cancel_current

use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{broadcast, Notify};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::priority::{Priority, QueueEntry};
use super::task::{QueueTask, TaskResult};

/// How long [`PriorityTaskQueue::cancel_all`] waits for the in-flight
/// task to observe cancellation before force-resetting.
pub const CANCEL_ALL_TIMEOUT: Duration = Duration::from_secs(10);

const DRAINED_CHANNEL_CAPACITY: usize = 16;

/// View of a queued or running task, handed to removal predicates.
#[derive(Clone, Copy, Debug)]
pub struct TaskInfo<'a> {
    /// The task's name as reported by [`QueueTask::name`] at push time.
    pub name: &'a str,
    /// The priority the task was pushed with.
    pub priority: Priority,
}

struct CurrentTask {
    name: String,
    priority: Priority,
    scope: CancellationToken,
}

struct QueueState<T> {
    heap: BinaryHeap<QueueEntry<T>>,
    next_seq: u64,
    running: bool,
    current: Option<CurrentTask>,
    global: CancellationToken,
    /// Bumped on every forced reset; a run loop spawned under an older
    /// epoch is stale and must exit without touching the queue.
    epoch: u64,
}

struct Inner<T> {
    label: String,
    state: RwLock<QueueState<T>>,
    drained_tx: broadcast::Sender<()>,
    /// Notified whenever the run loop exits, for [`PriorityTaskQueue::cancel_all`].
    idle: Notify,
}

/// A generic, priority-ordered, single-consumer async task runner.
///
/// Cloning the handle is cheap and shares the same queue. Must be used
/// inside a Tokio runtime: pushing onto an idle queue spawns the run
/// loop.
pub struct PriorityTaskQueue<T: QueueTask> {
    inner: Arc<Inner<T>>,
}

impl<T: QueueTask> Clone for PriorityTaskQueue<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: QueueTask> PriorityTaskQueue<T> {
    /// Create a queue with a label used to tag its log output.
    pub fn new(label: impl Into<String>) -> Self {
        let (drained_tx, _) = broadcast::channel(DRAINED_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                label: label.into(),
                state: RwLock::new(QueueState {
                    heap: BinaryHeap::new(),
                    next_seq: 0,
                    running: false,
                    current: None,
                    global: CancellationToken::new(),
                    epoch: 0,
                }),
                drained_tx,
                idle: Notify::new(),
            }),
        }
    }

    /// Enqueue a task. Starts the run loop if the queue is idle;
    /// otherwise the task waits its turn.
    pub fn push(&self, task: T, priority: Priority) {
        let mut st = self.inner.state.write();
        let name = task.name();
        debug!(queue = %self.inner.label, task = %name, %priority, "task queued");
        let seq = st.next_seq;
        st.next_seq += 1;
        st.heap.push(QueueEntry { priority, seq, name, task });
        self.start_if_idle(&mut st);
    }

    /// Enqueue a batch under a single lock acquisition, so the whole
    /// batch is ordered before the queue is next drained.
    pub fn push_all(&self, tasks: impl IntoIterator<Item = T>, priority: Priority) {
        let mut st = self.inner.state.write();
        let mut count = 0usize;
        for task in tasks {
            let name = task.name();
            let seq = st.next_seq;
            st.next_seq += 1;
            st.heap.push(QueueEntry { priority, seq, name, task });
            count += 1;
        }
        if count > 0 {
            debug!(queue = %self.inner.label, count, %priority, "batch queued");
            self.start_if_idle(&mut st);
        }
    }

    /// Number of tasks waiting in the queue (excludes the in-flight task).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.read().heap.len()
    }

    /// Whether no tasks are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.state.read().heap.is_empty()
    }

    /// Whether the run loop is active (a task is in flight or about to be).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.state.read().running
    }

    /// Name of the in-flight task, if any.
    #[must_use]
    pub fn current_task(&self) -> Option<String> {
        self.inner.state.read().current.as_ref().map(|c| c.name.clone())
    }

    /// Subscribe to the drain event, fired once each time the run loop
    /// exhausts the queue. Clearing an idle queue does not fire it.
    pub fn on_drained(&self) -> broadcast::Receiver<()> {
        self.inner.drained_tx.subscribe()
    }

    /// Cancel only the in-flight task. Queued tasks are unaffected and
    /// the next one runs with a fresh cancellation scope.
    pub fn cancel_current(&self) {
        let st = self.inner.state.read();
        if let Some(current) = &st.current {
            info!(queue = %self.inner.label, task = %current.name, "cancelling current task");
            current.scope.cancel();
        }
    }

    /// Cancel everything: signal global cancellation, wait (bounded by
    /// [`CANCEL_ALL_TIMEOUT`]) for the in-flight task to exit, then
    /// clear the queue and reset internal state.
    pub async fn cancel_all(&self) {
        // Register for the exit notification before signalling, so the
        // run loop cannot exit in between and lose the wakeup.
        let exited = self.inner.idle.notified();
        tokio::pin!(exited);
        exited.as_mut().enable();
        let (global, was_running) = {
            let st = self.inner.state.read();
            (st.global.clone(), st.running)
        };
        global.cancel();
        if was_running && tokio::time::timeout(CANCEL_ALL_TIMEOUT, exited).await.is_err() {
            warn!(
                queue = %self.inner.label,
                "in-flight task did not observe cancellation in time; force-resetting"
            );
        }

        let mut st = self.inner.state.write();
        let dropped = st.heap.len();
        st.heap.clear();
        st.current = None;
        st.running = false;
        st.global = CancellationToken::new();
        // A loop that missed the deadline above is now stale; the epoch
        // bump makes it exit instead of racing a freshly spawned one.
        st.epoch = st.epoch.wrapping_add(1);
        info!(queue = %self.inner.label, dropped, "queue cancelled and reset");
    }

    /// Remove queued tasks matching the predicate without running them;
    /// the in-flight task is cancelled too if it matches. Returns the
    /// removed tasks.
    pub fn remove_tasks(&self, predicate: impl Fn(&TaskInfo<'_>) -> bool) -> Vec<T> {
        let mut st = self.inner.state.write();
        let entries = std::mem::take(&mut st.heap).into_vec();
        let mut removed = Vec::new();
        let mut kept = Vec::new();
        for entry in entries {
            let info = TaskInfo { name: &entry.name, priority: entry.priority };
            if predicate(&info) {
                removed.push(entry.task);
            } else {
                kept.push(entry);
            }
        }
        st.heap = kept.into();

        if let Some(current) = &st.current {
            let info = TaskInfo { name: &current.name, priority: current.priority };
            if predicate(&info) {
                info!(queue = %self.inner.label, task = %current.name, "cancelling matched current task");
                current.scope.cancel();
            }
        }

        if !removed.is_empty() {
            info!(queue = %self.inner.label, removed = removed.len(), "queued tasks removed");
        }
        removed
    }

    /// Drop all not-yet-started tasks. Any in-flight task keeps running.
    pub fn clear_queue(&self) {
        let mut st = self.inner.state.write();
        let dropped = st.heap.len();
        st.heap.clear();
        if dropped > 0 {
            info!(queue = %self.inner.label, dropped, "queue cleared");
        }
    }

    fn start_if_idle(&self, st: &mut QueueState<T>) {
        // The flag flips under the write lock, so a racing push either
        // sees the loop alive or starts the only new one.
        if !st.running {
            st.running = true;
            tokio::spawn(run_loop(Arc::clone(&self.inner), st.epoch));
        }
    }
}

enum Step<T> {
    Run(QueueEntry<T>, CancellationToken),
    Drained,
    Aborted,
    Stale,
}

async fn run_loop<T: QueueTask>(inner: Arc<Inner<T>>, epoch: u64) {
    loop {
        let step = {
            let mut st = inner.state.write();
            if st.epoch != epoch {
                Step::Stale
            } else if st.global.is_cancelled() {
                // cancel_all clears the heap itself; pending tasks are
                // discarded, not run-and-cancelled.
                st.running = false;
                st.current = None;
                Step::Aborted
            } else if let Some(entry) = st.heap.pop() {
                let scope = st.global.child_token();
                st.current = Some(CurrentTask {
                    name: entry.name.clone(),
                    priority: entry.priority,
                    scope: scope.clone(),
                });
                Step::Run(entry, scope)
            } else {
                st.running = false;
                st.current = None;
                Step::Drained
            }
        };

        match step {
            Step::Run(entry, scope) => {
                let QueueEntry { mut task, name, priority, .. } = entry;
                debug!(queue = %inner.label, task = %name, %priority, "task started");

                // Race the run against its scope. Biased so a task that
                // observes the token gets to report its own result; a
                // task that never polls the token is still abandoned.
                let result = tokio::select! {
                    biased;
                    result = task.run(scope.clone()) => result,
                    () = scope.cancelled() => TaskResult::Cancelled,
                };

                match &result {
                    TaskResult::Success => {
                        debug!(queue = %inner.label, task = %name, "task finished");
                    }
                    TaskResult::Failure(message) => {
                        warn!(queue = %inner.label, task = %name, %message, "task failed");
                    }
                    TaskResult::Cancelled => {
                        info!(queue = %inner.label, task = %name, "task cancelled");
                    }
                }

                let mut st = inner.state.write();
                if st.epoch == epoch {
                    st.current = None;
                }
            }
            Step::Drained => {
                debug!(queue = %inner.label, "queue drained");
                let _ = inner.drained_tx.send(());
                inner.idle.notify_waiters();
                return;
            }
            Step::Aborted => {
                inner.idle.notify_waiters();
                return;
            }
            Step::Stale => {
                debug!(queue = %inner.label, "run loop superseded by reset; exiting");
                return;
            }
        }
    }
}
