//! External collaborator contracts for target resolution.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::targets::{TargetKind, TargetValue};

/// What the selector is being asked for.
///
/// Carries everything needed to prompt a human or drive an AI: the
/// slot identity, the requirement's instruction text, why the previous
/// candidate was refused (for re-prompting), and whether declining is
/// allowed at all.
#[derive(Clone, Copy, Debug)]
pub struct SelectionRequest<'a> {
    /// Key of the slot being filled.
    pub key: &'a str,
    /// Kind of candidate the slot accepts.
    pub kind: TargetKind,
    /// Instruction text from the slot's requirement.
    pub instruction: &'a str,
    /// Why the last candidate was rejected, if this is a retry.
    pub rejection: Option<&'a str>,
    /// Whether the selector may decline. False for mandatory
    /// operations: declining there cancels the whole operation.
    pub can_decline: bool,
}

/// The selector's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// A proposed candidate; the resolver validates it.
    Candidate(TargetValue),
    /// The selector declined to pick. Ends the operation.
    Declined,
    /// The selector observed cancellation.
    Cancelled,
}

/// External decision-maker (human input or AI) that proposes target
/// candidates. Must honor the cancellation token promptly; the
/// resolver additionally bounds each resolution with a timeout.
#[async_trait]
pub trait Selector: Send + Sync {
    /// Produce a candidate for the requested slot, or decline/cancel.
    async fn select(&self, request: SelectionRequest<'_>, cancel: CancellationToken) -> Selection;
}

/// Enumerates the candidates currently legal for a target kind, for
/// the cheap pre-resolution existence check. Backed by the game state
/// outside this crate.
pub trait CandidateProvider: Send + Sync {
    /// All current candidates of the given kind.
    fn candidates(&self, kind: TargetKind) -> Vec<TargetValue>;
}
