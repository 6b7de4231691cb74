//! Last-write-wins persistence of settled ability scores.
//!
//! Every edit on the creation page produces a settled value that must be
//! saved, but the user can outrun the network. `ScoreSync` keeps at most
//! one PATCH in flight per ability: newer values for the same ability
//! coalesce into a single queued slot, and a completion whose sequence
//! number is no longer current is dropped instead of being recorded as
//! authoritative. A failed save is logged and leaves both local state
//! and the confirmed map untouched.

use crate::DicekeeperClient;
use dicekeeper_core::character::CharacterId;
use dicekeeper_core::sync::SaveSequencer;
use dicekeeper_core::AbilityId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

#[derive(Default)]
struct SyncState {
    sequencer: SaveSequencer,
    in_flight: HashSet<AbilityId>,
    /// Newest value queued behind an in-flight save, per ability.
    queued: HashMap<AbilityId, (u64, i64)>,
    /// Last value the backend confirmed and that is still current.
    confirmed: HashMap<AbilityId, i64>,
}

/// Coalescing, per-ability score saver.
#[derive(Clone)]
pub struct ScoreSync {
    client: DicekeeperClient,
    character: CharacterId,
    state: Arc<Mutex<SyncState>>,
    idle: Arc<Notify>,
}

impl ScoreSync {
    pub fn new(client: DicekeeperClient, character: CharacterId) -> Self {
        Self {
            client,
            character,
            state: Arc::new(Mutex::new(SyncState::default())),
            idle: Arc::new(Notify::new()),
        }
    }

    /// Queue a settled value for persistence.
    ///
    /// Returns immediately; the PATCH runs on a spawned task. If a save
    /// for the same ability is already in flight, the value replaces any
    /// previously queued one and is sent when the in-flight save ends.
    pub async fn enqueue(&self, ability: AbilityId, score: i64) {
        let mut state = self.state.lock().await;
        let seq = state.sequencer.begin(ability);
        if state.in_flight.contains(&ability) {
            state.queued.insert(ability, (seq, score));
            return;
        }
        state.in_flight.insert(ability);
        drop(state);

        let sync = self.clone();
        tokio::spawn(async move {
            sync.drain(ability, seq, score).await;
        });
    }

    async fn drain(&self, ability: AbilityId, mut seq: u64, mut score: i64) {
        loop {
            let result = self
                .client
                .update_ability_score(self.character, ability, score)
                .await;

            let mut state = self.state.lock().await;
            match result {
                Ok(saved) => {
                    if state.sequencer.is_current(ability, seq) {
                        state.confirmed.insert(ability, saved.score);
                    } else {
                        tracing::debug!(
                            %ability,
                            seq,
                            newest = state.sequencer.current(ability),
                            "dropping stale save completion"
                        );
                    }
                }
                Err(error) => {
                    tracing::warn!(%ability, score, %error, "ability score save failed");
                }
            }

            match state.queued.remove(&ability) {
                Some((next_seq, next_score)) => {
                    seq = next_seq;
                    score = next_score;
                }
                None => {
                    state.in_flight.remove(&ability);
                    drop(state);
                    self.idle.notify_waiters();
                    return;
                }
            }
        }
    }

    /// The last confirmed, still-current value for an ability.
    pub async fn confirmed(&self, ability: AbilityId) -> Option<i64> {
        self.state.lock().await.confirmed.get(&ability).copied()
    }

    /// Whether any save is currently in flight.
    pub async fn is_idle(&self) -> bool {
        self.state.lock().await.in_flight.is_empty()
    }

    /// Wait until every queued and in-flight save has completed.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.is_idle().await {
                return;
            }
            notified.await;
        }
    }
}

/// Convenience bundle: a view's allocation plus its saver.
///
/// Ties the two halves of the contract together: `apply` settles the
/// edit locally, then queues exactly the settled value for persistence.
pub struct SyncedScores {
    pub allocation: dicekeeper_core::AllocationState,
    sync: ScoreSync,
}

impl SyncedScores {
    pub fn new(allocation: dicekeeper_core::AllocationState, sync: ScoreSync) -> Self {
        Self { allocation, sync }
    }

    /// Settle a raw edit and queue the settled value.
    pub async fn set_score(
        &mut self,
        ability: AbilityId,
        raw: impl Into<dicekeeper_core::allocator::RawScore>,
    ) -> i64 {
        let settled = self.allocation.set_score(ability, raw);
        self.sync.enqueue(ability, settled).await;
        settled
    }

    /// Increment and queue, unless refused at the budget boundary.
    pub async fn increment(&mut self, ability: AbilityId) -> i64 {
        let before = self.allocation.value(ability);
        let settled = self.allocation.increment(ability);
        if settled != before {
            self.sync.enqueue(ability, settled).await;
        }
        settled
    }

    /// Decrement and queue.
    pub async fn decrement(&mut self, ability: AbilityId) -> i64 {
        let settled = self.allocation.decrement(ability);
        self.sync.enqueue(ability, settled).await;
        settled
    }

    pub fn sync(&self) -> &ScoreSync {
        &self.sync
    }
}
