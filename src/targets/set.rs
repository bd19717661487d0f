//! Ordered collection of an operation's target slots.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::validation::Requirement;

use super::slot::TargetSlot;
use super::value::{TargetKind, TargetValue};
use super::TargetError;

/// An operation's target slots, in declaration order.
///
/// Built once via [`TargetSet::builder`]; slots cannot be added after
/// construction. Declaration order drives resolution order. Keys are
/// unique per set.
#[derive(Debug, Default)]
pub struct TargetSet {
    slots: SmallVec<[TargetSlot; 2]>,
    index: FxHashMap<String, usize>,
}

impl TargetSet {
    /// Start declaring slots.
    #[must_use]
    pub fn builder() -> TargetSetBuilder {
        TargetSetBuilder::default()
    }

    /// A set with no slots; trivially ready.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of declared slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slots are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetSlot> {
        self.slots.iter()
    }

    /// Look up a slot by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TargetSlot> {
        self.index.get(key).map(|&i| &self.slots[i])
    }

    /// The filled value of a slot, if the slot exists and is filled.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<TargetValue> {
        self.get(key).and_then(TargetSlot::value)
    }

    /// Ready iff every declared slot has a value.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.slots.iter().all(TargetSlot::has_value)
    }

    /// Set a slot's value directly (the programmer path). An unknown
    /// key or a kind mismatch is a wiring bug, reported at the call
    /// site.
    pub fn set(&mut self, key: &str, value: TargetValue) -> Result<(), TargetError> {
        let &i = self
            .index
            .get(key)
            .ok_or_else(|| TargetError::UnknownKey(key.to_string()))?;
        self.slots[i].set(value)
    }

    /// Fill a slot with an already-validated value.
    pub(crate) fn fill(&mut self, key: &str, value: TargetValue) -> Result<(), TargetError> {
        let &i = self
            .index
            .get(key)
            .ok_or_else(|| TargetError::UnknownKey(key.to_string()))?;
        self.slots[i].fill(value);
        Ok(())
    }

    /// Empty one slot again. Unknown keys are ignored.
    pub(crate) fn clear_value(&mut self, key: &str) {
        if let Some(&i) = self.index.get(key) {
            self.slots[i].clear();
        }
    }
}

/// Builder for [`TargetSet`]; the only way to declare slots.
#[derive(Debug, Default)]
pub struct TargetSetBuilder {
    slots: Vec<TargetSlot>,
}

impl TargetSetBuilder {
    /// Declare a slot. Order of declaration is resolution order.
    #[must_use]
    pub fn slot(
        mut self,
        key: impl Into<String>,
        kind: TargetKind,
        requirement: Requirement<TargetValue>,
    ) -> Self {
        self.slots.push(TargetSlot::new(key, kind, requirement));
        self
    }

    /// Finish. Fails with [`TargetError::DuplicateKey`] if two slots
    /// share a key.
    pub fn build(self) -> Result<TargetSet, TargetError> {
        let mut index = FxHashMap::default();
        for (i, slot) in self.slots.iter().enumerate() {
            if index.insert(slot.key().to_string(), i).is_some() {
                return Err(TargetError::DuplicateKey(slot.key().to_string()));
            }
        }
        Ok(TargetSet { slots: self.slots.into(), index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CellId, UnitId};

    fn two_slot_set() -> TargetSet {
        TargetSet::builder()
            .slot("attacker", TargetKind::Unit, Requirement::new("Choose an attacker"))
            .slot("destination", TargetKind::Cell, Requirement::new("Choose a cell"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_declaration_order_preserved() {
        let set = two_slot_set();
        let keys: Vec<&str> = set.iter().map(|s| s.key()).collect();
        assert_eq!(keys, ["attacker", "destination"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = TargetSet::builder()
            .slot("target", TargetKind::Unit, Requirement::new("a"))
            .slot("target", TargetKind::Cell, Requirement::new("b"))
            .build()
            .unwrap_err();
        assert_eq!(err, TargetError::DuplicateKey("target".to_string()));
    }

    #[test]
    fn test_readiness_tracks_fills() {
        let mut set = two_slot_set();
        assert!(!set.is_ready());

        set.set("attacker", TargetValue::Unit(UnitId::new(1))).unwrap();
        assert!(!set.is_ready());

        set.set("destination", TargetValue::Cell(CellId::new(2, 2))).unwrap();
        assert!(set.is_ready());
        assert_eq!(set.value("attacker"), Some(TargetValue::Unit(UnitId::new(1))));
    }

    #[test]
    fn test_empty_set_is_ready() {
        assert!(TargetSet::empty().is_ready());
        assert!(TargetSet::empty().is_empty());
    }

    #[test]
    fn test_unknown_key_is_error() {
        let mut set = two_slot_set();
        let err = set.set("nonsense", TargetValue::Unit(UnitId::new(1))).unwrap_err();
        assert_eq!(err, TargetError::UnknownKey("nonsense".to_string()));
    }

    #[test]
    fn test_clear_value_empties_one_slot() {
        let mut set = two_slot_set();
        set.set("attacker", TargetValue::Unit(UnitId::new(1))).unwrap();
        set.clear_value("attacker");
        assert!(!set.is_ready());
        assert_eq!(set.value("attacker"), None);
    }
}
