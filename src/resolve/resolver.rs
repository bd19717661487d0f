//! The target resolution protocol.
//!
//! Transforms an operation with empty slots into one with every slot
//! filled, or fails cleanly. Resolution is the single point where the
//! pipeline can suspend waiting on a human or AI decision.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::operations::Operation;
use crate::validation::ValidationContext;

use super::selector::{CandidateProvider, Selection, SelectionRequest, Selector};

/// Default bound on one whole resolution attempt.
pub const RESOLUTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound on rejected candidates per slot, so a buggy or
/// adversarial selector cannot loop below the timeout forever.
pub const MAX_REJECTIONS_PER_SLOT: u32 = 8;

/// Terminal resolution failures. Rejected candidates are not here:
/// they are recoverable and retried against the same slot.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Some empty slot has no legal candidate at all; failed fast
    /// before any suspension.
    #[error("targets cannot be filled")]
    Unsatisfiable,

    /// The caller's cancellation fired mid-resolution.
    #[error("cancelled during target filling")]
    Cancelled,

    /// The resolution window elapsed.
    #[error("target selection timed out")]
    TimedOut,

    /// The selector declined to pick a candidate.
    #[error("selection declined during target filling")]
    Declined,

    /// The per-slot rejection cap was hit.
    #[error("too many rejected candidates for target `{0}`")]
    RejectionLimit(String),
}

/// Drives target resolution for one operation at a time.
///
/// Holds the external collaborators (selector and candidate provider)
/// plus the timeout and retry policy; the pipeline owns one resolver
/// and reuses it across operations.
pub struct TargetResolver {
    selector: Arc<dyn Selector>,
    provider: Arc<dyn CandidateProvider>,
    timeout: Duration,
    max_rejections: u32,
}

impl TargetResolver {
    /// Create a resolver with the default timeout and rejection cap.
    pub fn new(selector: Arc<dyn Selector>, provider: Arc<dyn CandidateProvider>) -> Self {
        Self {
            selector,
            provider,
            timeout: RESOLUTION_TIMEOUT,
            max_rejections: MAX_REJECTIONS_PER_SLOT,
        }
    }

    /// Override the resolution window (builder pattern).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the per-slot rejection cap (builder pattern).
    #[must_use]
    pub fn with_rejection_limit(mut self, max_rejections: u32) -> Self {
        self.max_rejections = max_rejections;
        self
    }

    /// Cheap existence check: every empty slot must have at least one
    /// candidate that passes its requirement right now. Runs before
    /// any suspension so impossible operations fail fast.
    pub fn ensure_satisfiable(&self, operation: &dyn Operation) -> Result<(), ResolveError> {
        let ctx = validation_context(operation);
        for slot in operation.targets().iter().filter(|slot| !slot.has_value()) {
            let candidates = self.provider.candidates(slot.kind());
            let satisfiable = candidates
                .iter()
                .any(|candidate| slot.validate(candidate, &ctx).is_valid());
            if !satisfiable {
                warn!(
                    operation = %operation.name(),
                    slot = %slot.key(),
                    "no legal candidate exists; operation cannot be filled"
                );
                return Err(ResolveError::Unsatisfiable);
            }
        }
        Ok(())
    }

    /// Fill every empty slot, in declaration order, by negotiating
    /// with the selector. On any terminal failure the slots filled
    /// during this attempt are discarded again: no partial commit
    /// survives into a future attempt.
    pub async fn resolve(
        &self,
        operation: &mut dyn Operation,
        cancel: CancellationToken,
    ) -> Result<(), ResolveError> {
        self.ensure_satisfiable(operation)?;

        let scope = cancel.child_token();
        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut attempt: Vec<String> = Vec::new();

        let outcome = self
            .fill_empty_slots(operation, &scope, deadline, &mut attempt)
            .await;

        if let Err(err) = &outcome {
            info!(operation = %operation.name(), error = %err, "target resolution aborted");
            let targets = operation.targets_mut();
            for key in &attempt {
                targets.clear_value(key);
            }
        }
        outcome
    }

    async fn fill_empty_slots(
        &self,
        operation: &mut dyn Operation,
        scope: &CancellationToken,
        deadline: tokio::time::Instant,
        attempt: &mut Vec<String>,
    ) -> Result<(), ResolveError> {
        let ctx = validation_context(operation);
        let can_decline = !operation.is_mandatory();
        let empty_keys: Vec<String> = operation
            .targets()
            .iter()
            .filter(|slot| !slot.has_value())
            .map(|slot| slot.key().to_string())
            .collect();

        'slots: for key in empty_keys {
            let mut rejection: Option<String> = None;
            let mut rejections = 0u32;

            loop {
                let Some(slot) = operation.targets().get(&key) else {
                    continue 'slots;
                };
                let request = SelectionRequest {
                    key: slot.key(),
                    kind: slot.kind(),
                    instruction: slot.requirement().instruction(),
                    rejection: rejection.as_deref(),
                    can_decline,
                };

                // The one suspension point: wait for the selector,
                // racing the caller's cancellation and the window.
                let selection = tokio::select! {
                    () = scope.cancelled() => return Err(ResolveError::Cancelled),
                    () = tokio::time::sleep_until(deadline) => return Err(ResolveError::TimedOut),
                    selection = self.selector.select(request, scope.clone()) => selection,
                };

                match selection {
                    Selection::Cancelled => return Err(ResolveError::Cancelled),
                    Selection::Declined => {
                        if can_decline {
                            debug!(slot = %key, "selection declined");
                        } else {
                            warn!(slot = %key, "mandatory target declined; cancelling operation");
                        }
                        return Err(ResolveError::Declined);
                    }
                    Selection::Candidate(candidate) => {
                        let verdict = slot.validate(&candidate, &ctx);
                        if verdict.is_valid() {
                            debug!(slot = %key, target = %candidate, "slot filled");
                            if operation.targets_mut().fill(&key, candidate).is_ok() {
                                attempt.push(key.clone());
                            }
                            continue 'slots;
                        }

                        rejections += 1;
                        info!(
                            slot = %key,
                            target = %candidate,
                            reason = %verdict.message(),
                            "candidate rejected"
                        );
                        if rejections >= self.max_rejections {
                            return Err(ResolveError::RejectionLimit(key));
                        }
                        rejection = Some(verdict.message().to_string());
                    }
                }
            }
        }

        Ok(())
    }
}

fn validation_context(operation: &dyn Operation) -> ValidationContext {
    ValidationContext::new(operation.initiator()).with_source(operation.source())
}
