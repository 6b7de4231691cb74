//! Domain logic for the Dicekeeper tabletop companion.
//!
//! This crate provides:
//! - The point-buy ability-score allocator that every character form
//!   funnels its edits through
//! - Character, campaign, notification and player types matching the
//!   backend wire format
//! - Local drafts for the character-creation flow
//! - Per-ability write sequencing so out-of-order saves never clobber a
//!   newer value
//!
//! # Quick Start
//!
//! ```
//! use dicekeeper_core::allocator::{AllocationState, DEFAULT_BUDGET};
//! use dicekeeper_core::allocator::{AbilityId, AbilityScore};
//!
//! let scores = vec![
//!     AbilityScore { id: AbilityId(1), name: "Strength".into(), value: 0 },
//!     AbilityScore { id: AbilityId(2), name: "Dexterity".into(), value: 0 },
//! ];
//! let mut state = AllocationState::new(scores, DEFAULT_BUDGET);
//!
//! let settled = state.set_score(AbilityId(1), "15");
//! assert_eq!(settled, 15);
//! assert_eq!(state.remaining(), 12);
//! ```

pub mod allocator;
pub mod campaign;
pub mod character;
pub mod notification;
pub mod persist;
pub mod player;
pub mod sync;
pub mod testing;

// Primary public API
pub use allocator::{AbilityId, AbilityScore, AllocationState, PersistedScore, DEFAULT_BUDGET};
pub use campaign::{Campaign, CampaignDashboard, CampaignId, CampaignPlayer, CharacterStatus, Role};
pub use character::{AbilityDef, Character, CharacterId, CharacterUpdate};
pub use notification::{Notification, NotificationKind};
pub use persist::CharacterDraft;
pub use player::{Player, PlayerId};
pub use sync::SaveSequencer;
