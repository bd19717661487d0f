//! Operation pipeline integration tests.
//!
//! End-to-end: operations pushed with priorities, targets negotiated
//! through a scripted selector, execution effects observed through
//! completion events.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use skirmish::{
    condition_fn, CandidateProvider, Operation, OperationOutcome, OperationPipeline, PlayerId,
    Priority, Requirement, Selection, SelectionRequest, Selector, TargetKind, TargetResolver,
    TargetSet, TargetValue, TaskResult, UnitId, ValidationResult,
};

#[derive(Default)]
struct ScriptedSelector {
    script: Mutex<VecDeque<Selection>>,
}

impl ScriptedSelector {
    fn with_script(script: impl IntoIterator<Item = Selection>) -> Arc<Self> {
        Arc::new(Self { script: Mutex::new(script.into_iter().collect()) })
    }
}

#[async_trait]
impl Selector for ScriptedSelector {
    async fn select(&self, _request: SelectionRequest<'_>, cancel: CancellationToken) -> Selection {
        let next = self.script.lock().pop_front();
        match next {
            Some(selection) => selection,
            None => {
                // Script exhausted: behave like a player who walked away.
                cancel.cancelled().await;
                Selection::Cancelled
            }
        }
    }
}

struct UnitPool {
    units: Vec<UnitId>,
}

impl CandidateProvider for UnitPool {
    fn candidates(&self, kind: TargetKind) -> Vec<TargetValue> {
        match kind {
            TargetKind::Unit => self.units.iter().copied().map(TargetValue::Unit).collect(),
            _ => Vec::new(),
        }
    }
}

fn pool(units: impl IntoIterator<Item = u32>) -> Arc<UnitPool> {
    Arc::new(UnitPool { units: units.into_iter().map(UnitId::new).collect() })
}

fn any_unit() -> Requirement<TargetValue> {
    Requirement::new("Choose a unit").with(condition_fn("is_unit", |value: &TargetValue, _| {
        if value.as_unit().is_some() {
            ValidationResult::ok()
        } else {
            ValidationResult::fail("must be a unit")
        }
    }))
}

type ExecutionLog = Arc<Mutex<Vec<String>>>;

/// Test operation: records its execution, optionally fails, optionally
/// pushes a follow-up operation into the same pipeline.
struct TestOperation {
    name: String,
    targets: TargetSet,
    succeed: bool,
    hang: bool,
    log: ExecutionLog,
    follow_up: Option<(Box<TestOperation>, OperationPipeline)>,
}

impl TestOperation {
    fn ready(name: &str, log: &ExecutionLog) -> Self {
        Self {
            name: name.to_string(),
            targets: TargetSet::empty(),
            succeed: true,
            hang: false,
            log: Arc::clone(log),
            follow_up: None,
        }
    }

    fn with_slots(name: &str, slots: usize, log: &ExecutionLog) -> Self {
        let mut builder = TargetSet::builder();
        for i in 0..slots {
            builder = builder.slot(format!("slot{i}"), TargetKind::Unit, any_unit());
        }
        Self {
            targets: builder.build().unwrap(),
            ..Self::ready(name, log)
        }
    }

    fn failing(name: &str, log: &ExecutionLog) -> Self {
        Self { succeed: false, ..Self::ready(name, log) }
    }

    /// Executes but never finishes; only cancellation can end it.
    fn hanging(name: &str, log: &ExecutionLog) -> Self {
        Self { hang: true, ..Self::ready(name, log) }
    }
}

#[async_trait]
impl Operation for TestOperation {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn source(&self) -> UnitId {
        UnitId::new(1)
    }

    fn initiator(&self) -> PlayerId {
        PlayerId::new(0)
    }

    fn targets(&self) -> &TargetSet {
        &self.targets
    }

    fn targets_mut(&mut self) -> &mut TargetSet {
        &mut self.targets
    }

    async fn execute(&mut self) -> bool {
        self.log.lock().push(self.name.clone());
        if self.hang {
            std::future::pending::<()>().await;
        }
        if let Some((follow_up, pipeline)) = self.follow_up.take() {
            pipeline.push(follow_up, Priority::Normal);
        }
        self.succeed
    }
}

async fn next_outcome(
    rx: &mut tokio::sync::broadcast::Receiver<OperationOutcome>,
) -> OperationOutcome {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("outcome should arrive in time")
        .expect("completion channel open")
}

// =============================================================================
// Priority scenario
// =============================================================================

#[tokio::test]
async fn test_critical_ready_operation_overtakes_earlier_normal() {
    let log: ExecutionLog = ExecutionLog::default();
    let selector = ScriptedSelector::with_script([
        Selection::Candidate(TargetValue::Unit(UnitId::new(2))),
        Selection::Candidate(TargetValue::Unit(UnitId::new(3))),
    ]);
    let pipeline = OperationPipeline::new(selector, pool([2, 3]));
    let mut outcomes = pipeline.completed();

    // Pushed back to back with no await in between: both are queued
    // before the runner starts, so priority decides.
    pipeline.push(
        Box::new(TestOperation::with_slots("summon", 2, &log)),
        Priority::Normal,
    );
    pipeline.push(Box::new(TestOperation::ready("interrupt", &log)), Priority::Critical);

    let first = next_outcome(&mut outcomes).await;
    let second = next_outcome(&mut outcomes).await;

    assert_eq!(first.operation, "interrupt");
    assert_eq!(first.result, TaskResult::Success);
    assert_eq!(second.operation, "summon");
    assert_eq!(second.result, TaskResult::Success);
    assert_eq!(log.lock().clone(), ["interrupt", "summon"]);
}

// =============================================================================
// Completion events
// =============================================================================

#[tokio::test]
async fn test_execution_failure_reported_once() {
    let log: ExecutionLog = ExecutionLog::default();
    let pipeline = OperationPipeline::new(ScriptedSelector::with_script([]), pool([1]));
    let mut outcomes = pipeline.completed();

    pipeline.push(Box::new(TestOperation::failing("fizzle", &log)), Priority::Normal);

    let outcome = next_outcome(&mut outcomes).await;
    assert_eq!(outcome.operation, "fizzle");
    assert_eq!(outcome.result, TaskResult::failure("execution failed"));
    assert_eq!(outcome.source, UnitId::new(1));

    // Exactly once: nothing else arrives.
    assert!(
        tokio::time::timeout(Duration::from_millis(50), outcomes.recv())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_unsatisfiable_operation_reports_failure() {
    let log: ExecutionLog = ExecutionLog::default();
    // No units exist, so the slot cannot possibly be filled.
    let pipeline = OperationPipeline::new(ScriptedSelector::with_script([]), pool([]));
    let mut outcomes = pipeline.completed();

    pipeline.push(
        Box::new(TestOperation::with_slots("doomed", 1, &log)),
        Priority::Normal,
    );

    let outcome = next_outcome(&mut outcomes).await;
    assert_eq!(outcome.result, TaskResult::failure("targets cannot be filled"));
    assert!(log.lock().is_empty());
}

#[tokio::test]
async fn test_declined_resolution_reports_cancellation_failure() {
    let log: ExecutionLog = ExecutionLog::default();
    let pipeline =
        OperationPipeline::new(ScriptedSelector::with_script([Selection::Declined]), pool([1]));
    let mut outcomes = pipeline.completed();

    pipeline.push(
        Box::new(TestOperation::with_slots("hesitant", 1, &log)),
        Priority::Normal,
    );

    let outcome = next_outcome(&mut outcomes).await;
    assert_eq!(
        outcome.result,
        TaskResult::failure("selection declined during target filling")
    );
    assert!(log.lock().is_empty());
}

#[tokio::test]
async fn test_cancel_current_during_target_wait() {
    let log: ExecutionLog = ExecutionLog::default();
    // Empty script: the selector parks on the cancellation token.
    let pipeline = OperationPipeline::new(ScriptedSelector::with_script([]), pool([1]));
    let mut outcomes = pipeline.completed();

    pipeline.push(
        Box::new(TestOperation::with_slots("stuck", 1, &log)),
        Priority::Normal,
    );

    loop {
        if pipeline.queue().current_task().is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    pipeline.cancel_current();

    let outcome = next_outcome(&mut outcomes).await;
    assert_eq!(outcome.operation, "stuck");
    assert_eq!(outcome.result, TaskResult::failure("cancelled during target filling"));
    assert!(log.lock().is_empty());
}

#[tokio::test]
async fn test_cancel_during_execute_still_reports_outcome() {
    let log: ExecutionLog = ExecutionLog::default();
    let pipeline = OperationPipeline::new(ScriptedSelector::with_script([]), pool([1]));
    let mut outcomes = pipeline.completed();

    pipeline.push(Box::new(TestOperation::hanging("eternal", &log)), Priority::Normal);

    // Wait until execute() has observably started.
    loop {
        if !log.lock().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    pipeline.cancel_current();

    // Cancellation abandons execute(), but the completion event still
    // goes out.
    let outcome = next_outcome(&mut outcomes).await;
    assert_eq!(outcome.operation, "eternal");
    assert_eq!(outcome.result, TaskResult::Cancelled);
}

// =============================================================================
// Sequencing
// =============================================================================

#[tokio::test]
async fn test_follow_up_operations_run_after_current_completes() {
    let log: ExecutionLog = ExecutionLog::default();
    let pipeline = OperationPipeline::new(ScriptedSelector::with_script([]), pool([1]));
    let mut outcomes = pipeline.completed();

    let follow_up = Box::new(TestOperation::ready("draw_card", &log));
    let mut trigger = TestOperation::ready("play_card", &log);
    trigger.follow_up = Some((follow_up, pipeline.clone()));

    pipeline.push(Box::new(trigger), Priority::Normal);

    let first = next_outcome(&mut outcomes).await;
    let second = next_outcome(&mut outcomes).await;
    assert_eq!(first.operation, "play_card");
    assert_eq!(second.operation, "draw_card");
    assert_eq!(log.lock().clone(), ["play_card", "draw_card"]);
}

#[tokio::test]
async fn test_operations_never_interleave() {
    let log: ExecutionLog = ExecutionLog::default();
    let selector = ScriptedSelector::with_script([
        Selection::Candidate(TargetValue::Unit(UnitId::new(1))),
        Selection::Candidate(TargetValue::Unit(UnitId::new(1))),
        Selection::Candidate(TargetValue::Unit(UnitId::new(1))),
    ]);
    let pipeline = OperationPipeline::new(selector, pool([1]));
    let mut outcomes = pipeline.completed();

    for i in 0..3 {
        pipeline.push(
            Box::new(TestOperation::with_slots(&format!("op{i}"), 1, &log)),
            Priority::Normal,
        );
    }

    for i in 0..3 {
        let outcome = next_outcome(&mut outcomes).await;
        assert_eq!(outcome.operation, format!("op{i}"));
        assert_eq!(outcome.result, TaskResult::Success);
    }
    assert_eq!(log.lock().clone(), ["op0", "op1", "op2"]);
}

#[tokio::test]
async fn test_cancel_all_discards_pending_operations() {
    let log: ExecutionLog = ExecutionLog::default();
    // Selector stalls, keeping the first operation in flight.
    let pipeline = OperationPipeline::new(ScriptedSelector::with_script([]), pool([1]));

    pipeline.push(
        Box::new(TestOperation::with_slots("stuck", 1, &log)),
        Priority::Normal,
    );
    pipeline.push(Box::new(TestOperation::ready("pending", &log)), Priority::Normal);

    loop {
        if pipeline.queue().current_task().as_deref() == Some("stuck") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    pipeline.cancel_all().await;

    assert_eq!(pipeline.len(), 0);
    assert!(!pipeline.is_running());
    assert!(log.lock().is_empty());
}

// =============================================================================
// Custom resolver configuration
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_pipeline_honors_resolution_timeout() {
    let log: ExecutionLog = ExecutionLog::default();
    let resolver = TargetResolver::new(ScriptedSelector::with_script([]), pool([1]))
        .with_timeout(Duration::from_secs(3));
    let pipeline = OperationPipeline::with_resolver(resolver);
    let mut outcomes = pipeline.completed();

    pipeline.push(
        Box::new(TestOperation::with_slots("slowpoke", 1, &log)),
        Priority::Normal,
    );

    let outcome = tokio::time::timeout(Duration::from_secs(60), outcomes.recv())
        .await
        .expect("timeout should fire under paused time")
        .expect("completion channel open");
    assert_eq!(outcome.result, TaskResult::failure("target selection timed out"));
}
