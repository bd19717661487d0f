//! The operation contract.
//!
//! An operation is a single game action: it names a source unit and an
//! initiating player, declares its target slots up front, and carries
//! its own side effects in [`Operation::execute`]. The pipeline only
//! fills the slots and runs it; what the operation does to the game is
//! opaque here.

use async_trait::async_trait;

use crate::core::{PlayerId, UnitId};
use crate::targets::TargetSet;

/// A single executable game action with named, typed target slots.
///
/// Lifecycle: constructed with its slots already declared (the
/// [`TargetSet`](crate::targets::TargetSet) builder is the only way to
/// declare them), mutated only by target resolution and by `execute`,
/// and dropped after the pipeline reports its result.
#[async_trait]
pub trait Operation: Send + Sync + 'static {
    /// Identity for logs and completion events.
    fn name(&self) -> String;

    /// The unit that initiated this operation. Identity only; the unit
    /// model stays with the game layer.
    fn source(&self) -> UnitId;

    /// The player on whose behalf the operation runs; feeds the
    /// validation context for ownership-style conditions.
    fn initiator(&self) -> PlayerId;

    /// Mandatory operations cannot have a target declined by the
    /// resolver without cancelling the whole operation.
    fn is_mandatory(&self) -> bool {
        false
    }

    /// The operation's target slots.
    fn targets(&self) -> &TargetSet;

    /// Mutable access for resolution and automatic fills.
    fn targets_mut(&mut self) -> &mut TargetSet;

    /// Run the operation's effect. Returns `true` on success. Runs to
    /// completion without re-entering resolution; it may await game
    /// effects (e.g. an animation), and the queue will not move on
    /// until it returns.
    async fn execute(&mut self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::{TargetKind, TargetSet, TargetValue};
    use crate::validation::Requirement;
    use crate::core::CellId;

    struct MoveOperation {
        targets: TargetSet,
    }

    #[async_trait]
    impl Operation for MoveOperation {
        fn name(&self) -> String {
            "move".into()
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
            self.targets.is_ready()
        }
    }

    #[tokio::test]
    async fn test_ready_iff_all_slots_filled() {
        let targets = TargetSet::builder()
            .slot("destination", TargetKind::Cell, Requirement::new("Choose a cell"))
            .build()
            .unwrap();
        let mut op = MoveOperation { targets };

        assert!(!op.targets().is_ready());
        assert!(!op.execute().await);

        op.targets_mut()
            .set("destination", TargetValue::Cell(CellId::new(1, 1)))
            .unwrap();
        assert!(op.targets().is_ready());
        assert!(op.execute().await);
    }
}
