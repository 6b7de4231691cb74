//! Testing utilities.
//!
//! `RecordingStore` stands in for the backend when testing the
//! last-write-wins save discipline: it records every completed save and
//! only treats the ones the sequencer still vouches for as authoritative.

use crate::allocator::AbilityId;
use crate::sync::SaveSequencer;
use std::collections::HashMap;

/// One completed save attempt, applied or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSave {
    pub ability: AbilityId,
    pub score: i64,
    pub seq: u64,
    pub applied: bool,
}

/// In-memory stand-in for the score persistence backend.
#[derive(Debug, Default)]
pub struct RecordingStore {
    history: Vec<RecordedSave>,
    authoritative: HashMap<AbilityId, i64>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a completed save. Returns whether it was applied, i.e.
    /// whether `seq` is still the newest edit for its ability.
    pub fn complete(
        &mut self,
        sequencer: &SaveSequencer,
        ability: AbilityId,
        seq: u64,
        score: i64,
    ) -> bool {
        let applied = sequencer.is_current(ability, seq);
        if applied {
            self.authoritative.insert(ability, score);
        }
        self.history.push(RecordedSave {
            ability,
            score,
            seq,
            applied,
        });
        applied
    }

    /// The value the store currently considers authoritative.
    pub fn value(&self, ability: AbilityId) -> Option<i64> {
        self.authoritative.get(&ability).copied()
    }

    /// Every completed save in completion order.
    pub fn history(&self) -> &[RecordedSave] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STR: AbilityId = AbilityId(1);

    #[test]
    fn test_out_of_order_completion_keeps_newest_value() {
        let mut sequencer = SaveSequencer::new();
        let mut store = RecordingStore::new();

        let first = sequencer.begin(STR);
        let second = sequencer.begin(STR);

        // The newer save completes first.
        assert!(store.complete(&sequencer, STR, second, 14));
        // The older one straggles in afterwards and must not win.
        assert!(!store.complete(&sequencer, STR, first, 15));

        assert_eq!(store.value(STR), Some(14));
        assert_eq!(store.history().len(), 2);
        assert!(!store.history()[1].applied);
    }

    #[test]
    fn test_in_order_completion_applies_both() {
        let mut sequencer = SaveSequencer::new();
        let mut store = RecordingStore::new();

        let first = sequencer.begin(STR);
        assert!(store.complete(&sequencer, STR, first, 10));
        let second = sequencer.begin(STR);
        assert!(store.complete(&sequencer, STR, second, 11));

        assert_eq!(store.value(STR), Some(11));
    }
}
