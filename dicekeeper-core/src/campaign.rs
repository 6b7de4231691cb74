//! Campaign and membership domain types.
//!
//! Mirrors the backend's campaign, campaign-player and approval-flow
//! records: a campaign has one DM, joined players each hold a membership
//! row, and a player's character moves through a small submission state
//! machine (NONE -> PENDING -> APPROVED or REJECTED -> PENDING ...).

use crate::character::CharacterId;
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Identifier of a campaign.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct CampaignId(pub i64);

impl std::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a campaign membership row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct CampaignPlayerId(pub i64);

/// A campaign as returned by the backend.
///
/// `story` is DM-only on the wire: the backend omits it for everyone
/// else, so it deserializes as `None` for regular players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub story: Option<String>,
    /// The DM's player id.
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub map_image_path: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub max_player_count: Option<i64>,
    #[serde(default)]
    pub started: bool,
}

/// POST body for creating a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_player_count: Option<i64>,
}

impl CampaignDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    pub fn with_max_players(mut self, max: i64) -> Self {
        self.max_player_count = Some(max);
        self
    }
}

/// A member's role within a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "DM")]
    Dm,
    #[serde(rename = "PLAYER")]
    Player,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Dm => "DM",
            Role::Player => "Player",
        }
    }
}

/// Where a player's character sits in the DM approval flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharacterStatus {
    #[default]
    None,
    Pending,
    Approved,
    Rejected,
}

impl CharacterStatus {
    /// Whether the player still owes the DM a (re)submission.
    pub fn needs_submission(&self) -> bool {
        matches!(self, CharacterStatus::None | CharacterStatus::Rejected)
    }
}

/// One player's membership in a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPlayer {
    pub id: CampaignPlayerId,
    pub campaign_id: CampaignId,
    pub player_id: PlayerId,
    pub role: Role,
    /// Unix millis.
    #[serde(default)]
    pub joined_at: i64,
    #[serde(default)]
    pub character_id: Option<CharacterId>,
    #[serde(default)]
    pub character_status: CharacterStatus,
    #[serde(default)]
    pub dm_notes: Option<String>,
}

/// Response to a join request; `needs_character` tells the UI to route
/// the player into character creation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutcome {
    pub campaign_player: CampaignPlayer,
    #[serde(default)]
    pub needs_character: bool,
}

/// Counts for the campaign dashboard, derived purely from membership rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignDashboard {
    pub player_count: usize,
    pub pending_submissions: usize,
    pub approved_characters: usize,
    /// `None` when the campaign has no player cap.
    pub seats_left: Option<i64>,
}

impl CampaignDashboard {
    pub fn from_members(campaign: &Campaign, members: &[CampaignPlayer]) -> Self {
        let players = members.iter().filter(|m| m.role == Role::Player);
        let player_count = players.clone().count();
        let pending_submissions = players
            .clone()
            .filter(|m| m.character_status == CharacterStatus::Pending)
            .count();
        let approved_characters = players
            .filter(|m| m.character_status == CharacterStatus::Approved)
            .count();
        let seats_left = campaign
            .max_player_count
            .map(|max| (max - members.len() as i64).max(0));
        Self {
            player_count,
            pending_submissions,
            approved_characters,
            seats_left,
        }
    }
}

/// Whether the given player is the DM of this member list.
pub fn is_dm(members: &[CampaignPlayer], player_id: PlayerId) -> bool {
    members
        .iter()
        .any(|m| m.player_id == player_id && m.role == Role::Dm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(
        id: i64,
        player: i64,
        role: Role,
        status: CharacterStatus,
    ) -> CampaignPlayer {
        CampaignPlayer {
            id: CampaignPlayerId(id),
            campaign_id: CampaignId(1),
            player_id: PlayerId(player),
            role,
            joined_at: 0,
            character_id: None,
            character_status: status,
            dm_notes: None,
        }
    }

    fn campaign(max: Option<i64>) -> Campaign {
        Campaign {
            id: CampaignId(1),
            name: "The Sunken Keep".to_string(),
            description: None,
            story: None,
            player_id: Some(PlayerId(10)),
            map_image_path: None,
            is_public: true,
            max_player_count: max,
            started: false,
        }
    }

    #[test]
    fn test_role_and_status_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Dm).unwrap(), "\"DM\"");
        assert_eq!(
            serde_json::to_string(&CharacterStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        let status: CharacterStatus = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(status, CharacterStatus::Rejected);
    }

    #[test]
    fn test_dashboard_counts() {
        let members = vec![
            member(1, 10, Role::Dm, CharacterStatus::None),
            member(2, 11, Role::Player, CharacterStatus::Pending),
            member(3, 12, Role::Player, CharacterStatus::Approved),
            member(4, 13, Role::Player, CharacterStatus::Rejected),
        ];
        let dashboard = CampaignDashboard::from_members(&campaign(Some(6)), &members);
        assert_eq!(dashboard.player_count, 3);
        assert_eq!(dashboard.pending_submissions, 1);
        assert_eq!(dashboard.approved_characters, 1);
        assert_eq!(dashboard.seats_left, Some(2));
    }

    #[test]
    fn test_dashboard_without_cap() {
        let dashboard = CampaignDashboard::from_members(&campaign(None), &[]);
        assert_eq!(dashboard.seats_left, None);
        assert_eq!(dashboard.player_count, 0);
    }

    #[test]
    fn test_is_dm() {
        let members = vec![
            member(1, 10, Role::Dm, CharacterStatus::None),
            member(2, 11, Role::Player, CharacterStatus::None),
        ];
        assert!(is_dm(&members, PlayerId(10)));
        assert!(!is_dm(&members, PlayerId(11)));
        assert!(!is_dm(&members, PlayerId(99)));
    }

    #[test]
    fn test_needs_submission() {
        assert!(CharacterStatus::None.needs_submission());
        assert!(CharacterStatus::Rejected.needs_submission());
        assert!(!CharacterStatus::Pending.needs_submission());
        assert!(!CharacterStatus::Approved.needs_submission());
    }

    #[test]
    fn test_story_hidden_for_players() {
        let json = r#"{"id": 1, "name": "Keep", "isPublic": true}"#;
        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert!(campaign.story.is_none());
    }
}
