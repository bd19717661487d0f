//! Target resolution protocol.
//!
//! The asynchronous negotiation that fills an operation's empty slots
//! before it is allowed to run:
//!
//! 1. **Validating** — confirm every slot is satisfiable in principle
//!    (a cheap existence check); otherwise fail fast.
//! 2. **Awaiting target** — per empty slot, in declaration order, ask
//!    the external [`Selector`] for a candidate. This suspends.
//! 3. **Candidate validation** — check the slot's requirement; fill
//!    and advance, or surface the reason and retry the same slot.
//! 4. **Cancellation** — the caller's token and a resolution-wide
//!    timeout compose; either aborts the attempt and discards every
//!    slot it filled.

mod resolver;
mod selector;

pub use resolver::{ResolveError, TargetResolver, MAX_REJECTIONS_PER_SLOT, RESOLUTION_TIMEOUT};
pub use selector::{CandidateProvider, Selection, SelectionRequest, Selector};
