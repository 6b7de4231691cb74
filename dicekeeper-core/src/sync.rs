//! Per-ability write sequencing.
//!
//! Each score edit fires an independent save request, and the network is
//! free to complete them out of order. The sequencer hands every edit a
//! monotonically increasing number per ability id so that a save which
//! was issued earlier but completes later can be recognized as stale and
//! dropped instead of overwriting the newer value.

use crate::allocator::AbilityId;
use std::collections::HashMap;

/// Issues and tracks per-ability sequence numbers.
///
/// `begin` marks a new edit as the latest for its ability; `is_current`
/// answers whether a completed save still speaks for the latest edit.
/// Abilities are fully independent of each other.
#[derive(Debug, Clone, Default)]
pub struct SaveSequencer {
    latest: HashMap<AbilityId, u64>,
}

impl SaveSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new edit for `ability` and return its sequence number.
    pub fn begin(&mut self, ability: AbilityId) -> u64 {
        let entry = self.latest.entry(ability).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Whether `seq` is still the newest edit for `ability`.
    pub fn is_current(&self, ability: AbilityId, seq: u64) -> bool {
        self.latest.get(&ability).copied() == Some(seq)
    }

    /// The newest sequence number issued for `ability`, 0 if none yet.
    pub fn current(&self, ability: AbilityId) -> u64 {
        self.latest.get(&ability).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STR: AbilityId = AbilityId(1);
    const DEX: AbilityId = AbilityId(2);

    #[test]
    fn test_sequence_is_monotonic_per_ability() {
        let mut sequencer = SaveSequencer::new();
        assert_eq!(sequencer.begin(STR), 1);
        assert_eq!(sequencer.begin(STR), 2);
        assert_eq!(sequencer.begin(DEX), 1);
        assert_eq!(sequencer.current(STR), 2);
        assert_eq!(sequencer.current(DEX), 1);
    }

    #[test]
    fn test_older_edit_is_stale_once_newer_begins() {
        let mut sequencer = SaveSequencer::new();
        let first = sequencer.begin(STR);
        assert!(sequencer.is_current(STR, first));
        let second = sequencer.begin(STR);
        assert!(!sequencer.is_current(STR, first));
        assert!(sequencer.is_current(STR, second));
    }

    #[test]
    fn test_abilities_do_not_interfere() {
        let mut sequencer = SaveSequencer::new();
        let str_seq = sequencer.begin(STR);
        sequencer.begin(DEX);
        sequencer.begin(DEX);
        assert!(sequencer.is_current(STR, str_seq));
    }

    #[test]
    fn test_unknown_ability_has_no_current_save() {
        let sequencer = SaveSequencer::new();
        assert!(!sequencer.is_current(STR, 0));
        assert_eq!(sequencer.current(STR), 0);
    }
}
