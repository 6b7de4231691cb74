//! Point-buy budget allocation for ability scores.
//!
//! The allocator owns the one real invariant in the client: the sum of
//! allocated points never exceeds the budget once a mutation has settled.
//! Every user edit flows through here before anything is rendered or
//! persisted, and the settled value (not the raw input) is what gets saved.

use crate::character::AbilityDef;
use serde::{Deserialize, Serialize};

/// Starting point budget for a new character.
pub const DEFAULT_BUDGET: i64 = 27;

/// Identifier of an ability definition, as issued by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct AbilityId(pub i64);

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw user input for a score or budget field.
///
/// Form controls hand over whatever the user typed. Coercion is part of
/// the allocator's contract: non-numeric input settles to 0, fractions
/// are floored, negatives are clamped to 0.
#[derive(Debug, Clone, PartialEq)]
pub enum RawScore {
    Number(f64),
    Text(String),
}

impl RawScore {
    /// Coerce to a non-negative integer: `max(0, floor(number(raw) || 0))`.
    pub fn coerce(&self) -> i64 {
        let n = match self {
            RawScore::Number(n) => *n,
            RawScore::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(0.0)
                }
            }
        };
        if n.is_finite() {
            (n.floor() as i64).max(0)
        } else {
            0
        }
    }
}

impl From<i64> for RawScore {
    fn from(n: i64) -> Self {
        RawScore::Number(n as f64)
    }
}

impl From<i32> for RawScore {
    fn from(n: i32) -> Self {
        RawScore::Number(n as f64)
    }
}

impl From<f64> for RawScore {
    fn from(n: f64) -> Self {
        RawScore::Number(n)
    }
}

impl From<&str> for RawScore {
    fn from(s: &str) -> Self {
        RawScore::Text(s.to_string())
    }
}

impl From<String> for RawScore {
    fn from(s: String) -> Self {
        RawScore::Text(s)
    }
}

/// One named ability with its allocated points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    /// Stable key, unique within a character.
    pub id: AbilityId,

    /// Display label; not consulted by allocation logic.
    pub name: String,

    /// Allocated points, always >= 0 once settled.
    pub value: i64,
}

/// The wire shape a single score is persisted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedScore {
    pub ability_id: AbilityId,
    pub score: i64,
}

/// A character's ability scores plus the total point budget.
///
/// Owned as a plain value by whichever view currently presents it; there
/// is no shared or global instance. All mutations settle the invariant
/// `used_points() <= budget()` before returning, with one deliberate
/// exception: [`AllocationState::set_budget`] may leave the state
/// over-budget, surfaced to the caller as a negative [`remaining`].
///
/// [`remaining`]: AllocationState::remaining
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationState {
    scores: Vec<AbilityScore>,
    budget: i64,
}

impl AllocationState {
    /// Create a state from already-settled scores.
    pub fn new(scores: Vec<AbilityScore>, budget: impl Into<RawScore>) -> Self {
        let mut scores = scores;
        for score in &mut scores {
            score.value = score.value.max(0);
        }
        Self {
            scores,
            budget: budget.into().coerce(),
        }
    }

    /// Build a state by joining ability definitions with persisted scores.
    ///
    /// Definition order becomes display order. Abilities with no persisted
    /// entry start at 0.
    pub fn from_definitions(
        definitions: &[AbilityDef],
        persisted: &[PersistedScore],
        budget: impl Into<RawScore>,
    ) -> Self {
        let scores = definitions
            .iter()
            .map(|def| AbilityScore {
                id: def.id,
                name: def.name.clone(),
                value: persisted
                    .iter()
                    .find(|p| p.ability_id == def.id)
                    .map(|p| p.score.max(0))
                    .unwrap_or(0),
            })
            .collect();
        Self {
            scores,
            budget: budget.into().coerce(),
        }
    }

    /// Export to the persistence shape, one entry per ability.
    pub fn to_persisted(&self) -> Vec<PersistedScore> {
        self.scores
            .iter()
            .map(|s| PersistedScore {
                ability_id: s.id,
                score: s.value,
            })
            .collect()
    }

    /// All scores in display order.
    pub fn scores(&self) -> &[AbilityScore] {
        &self.scores
    }

    /// Total points available.
    pub fn budget(&self) -> i64 {
        self.budget
    }

    /// Current value of one ability.
    ///
    /// Panics if `id` is not part of this state; see [`AllocationState::set_score`].
    pub fn value(&self, id: AbilityId) -> i64 {
        self.scores[self.index_of(id)].value
    }

    /// Sum of all allocated points, saturating at `i64::MAX`.
    pub fn used_points(&self) -> i64 {
        self.scores
            .iter()
            .fold(0i64, |acc, s| acc.saturating_add(s.value))
    }

    /// Budget minus used points.
    ///
    /// Negative only when `set_budget` shrank the budget below committed
    /// usage; score edits always self-correct before settling.
    pub fn remaining(&self) -> i64 {
        self.budget.saturating_sub(self.used_points())
    }

    /// Replace the budget with a coerced, clamped value.
    ///
    /// Never redistributes existing scores: shrinking below current usage
    /// leaves the state over-budget until the next score edit catches it.
    pub fn set_budget(&mut self, raw: impl Into<RawScore>) {
        self.budget = raw.into().coerce();
    }

    /// Set one ability to a raw value and settle the state.
    ///
    /// If the coerced value pushes the total over budget, the overflow is
    /// subtracted from the just-edited ability only, clamped at 0. Other
    /// abilities are never touched; if the edited ability alone cannot
    /// absorb the overflow the state stays over-budget, which the caller
    /// sees as a negative `remaining`.
    ///
    /// Returns the settled value, which is what the caller should persist.
    ///
    /// Panics if `id` does not reference a score in this state: the view
    /// and the allocator have desynchronized, which is a caller bug, not
    /// a runtime condition to recover from.
    pub fn set_score(&mut self, id: AbilityId, raw: impl Into<RawScore>) -> i64 {
        let idx = self.index_of(id);
        self.scores[idx].value = raw.into().coerce();

        let used = self.used_points();
        if used > self.budget {
            let diff = used - self.budget;
            let value = &mut self.scores[idx].value;
            *value = value.saturating_sub(diff).max(0);
        }
        self.scores[idx].value
    }

    /// Add one point to an ability, refused at the budget boundary.
    ///
    /// A no-op when `remaining() <= 0`; the increment is rejected up front
    /// rather than applied and clawed back.
    pub fn increment(&mut self, id: AbilityId) -> i64 {
        let idx = self.index_of(id);
        if self.remaining() <= 0 {
            return self.scores[idx].value;
        }
        let next = self.scores[idx].value + 1;
        self.set_score(id, next)
    }

    /// Remove one point from an ability, floored at 0.
    pub fn decrement(&mut self, id: AbilityId) -> i64 {
        let current = self.value(id);
        self.set_score(id, (current - 1).max(0))
    }

    fn index_of(&self, id: AbilityId) -> usize {
        self.scores
            .iter()
            .position(|s| s.id == id)
            .unwrap_or_else(|| panic!("ability id {id} is not part of this allocation state"))
    }
}
