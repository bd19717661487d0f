//! # skirmish
//!
//! Turn-based operation pipeline for card/board games.
//!
//! Game actions ("operations") are pushed with a priority, have their
//! targets resolved (some filled automatically, some negotiated with an
//! external decision-maker such as a human or AI), and execute strictly
//! one at a time, in priority order, with cancellation and timeout
//! support.
//!
//! ## Design Principles
//!
//! 1. **Identity, not ownership**: the pipeline refers to units, cards,
//!    zones, and players by ID; the game models stay with the caller.
//!
//! 2. **Single-flight**: exactly one task is in progress per queue
//!    instance. Independent queues (operations, animations) share
//!    nothing.
//!
//! 3. **Explicit collaborators**: selectors, candidate providers, and
//!    the event bus are passed as dependencies, never ambient state.
//!
//! ## Modules
//!
//! - `core`: identity newtypes
//! - `queue`: generic priority task queue, single-consumer runner
//! - `validation`: composable requirement engine (AND/OR/NOT)
//! - `targets`: typed target slots and the tagged candidate union
//! - `operations`: the operation contract
//! - `resolve`: asynchronous target resolution protocol
//! - `pipeline`: the operation-specialized queue consumer
//! - `commands`: legacy reversible commands with a bounded undo history
//! - `events`: typed publish/subscribe game event bus

pub mod commands;
pub mod core;
pub mod events;
pub mod operations;
pub mod pipeline;
pub mod queue;
pub mod resolve;
pub mod targets;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{CardId, CellId, PlayerId, UnitId, ZoneId};

pub use crate::queue::{Priority, PriorityTaskQueue, QueueTask, TaskInfo, TaskResult};

pub use crate::validation::{
    all, any, condition_fn, not, BoxCondition, Condition, Requirement, ValidationContext,
    ValidationResult,
};

pub use crate::targets::{TargetError, TargetKind, TargetSet, TargetSetBuilder, TargetSlot, TargetValue};

pub use crate::operations::Operation;

pub use crate::resolve::{
    CandidateProvider, ResolveError, Selection, SelectionRequest, Selector, TargetResolver,
};

pub use crate::pipeline::{OperationOutcome, OperationPipeline, OperationTask};

pub use crate::commands::{Command, CommandHistory, CommandTask, SharedHistory};

pub use crate::events::{EventBus, GameEvent};
