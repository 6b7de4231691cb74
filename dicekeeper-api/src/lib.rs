//! REST client for the Dicekeeper backend.
//!
//! This crate provides a focused client for the backend's JSON API:
//! - Ability catalog and per-character ability scores
//! - Character creation and PATCH updates
//! - Class and background catalogs
//! - Campaigns, membership and the character approval flow
//! - Notifications and player lookup
//!
//! The client surfaces the backend's plain-text error bodies unchanged;
//! it does not retry or roll back anything. Local allocation state is
//! settled before a save is attempted, so a failed save leaves the
//! in-memory state intact (see [`ScoreSync`]).

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use dicekeeper_core::campaign::{
    Campaign, CampaignDraft, CampaignId, CampaignPlayer, CampaignPlayerId, JoinOutcome,
};
use dicekeeper_core::character::{
    AbilityDef, AbilityScoreEntry, BackgroundId, BackgroundSummary, Character, CharacterId,
    CharacterUpdate, ClassId, ClassSummary,
};
use dicekeeper_core::notification::{Notification, NotificationId};
use dicekeeper_core::player::{Player, PlayerId};
use dicekeeper_core::AbilityId;

mod score_sync;
pub use score_sync::{ScoreSync, SyncedScores};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Dicekeeper API client.
#[derive(Clone)]
pub struct DicekeeperClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl DicekeeperClient {
    /// Create a client for the given base URL (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer token to every request.
    ///
    /// How the token is obtained is the login flow's business; the client
    /// only carries it.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    // ------------------------------------------------------------------
    // Abilities and scores
    // ------------------------------------------------------------------

    /// List all ability definitions.
    pub async fn abilities(&self) -> Result<Vec<AbilityDef>, Error> {
        self.get_json("/api/ability/all").await
    }

    /// Get a character's current ability scores.
    ///
    /// Abilities the character has never touched are absent from the
    /// response; [`AllocationState::from_definitions`] defaults them to 0.
    ///
    /// [`AllocationState::from_definitions`]: dicekeeper_core::AllocationState::from_definitions
    pub async fn ability_scores(
        &self,
        character: CharacterId,
    ) -> Result<Vec<AbilityScoreEntry>, Error> {
        self.get_json(&format!("/api/character/{character}/getAbilityScores"))
            .await
    }

    /// Persist one settled ability score.
    pub async fn update_ability_score(
        &self,
        character: CharacterId,
        ability: AbilityId,
        score: i64,
    ) -> Result<AbilityScoreEntry, Error> {
        #[derive(Serialize)]
        struct ScoreUpdate {
            score: i64,
        }
        self.patch_json(
            &format!("/api/character-ability/{character}/{ability}"),
            &ScoreUpdate { score },
        )
        .await
    }

    // ------------------------------------------------------------------
    // Characters
    // ------------------------------------------------------------------

    /// Create a fresh, empty character for the creation flow.
    pub async fn create_character(&self) -> Result<Character, Error> {
        self.post_json_empty("/api/character/createInitialCharacter")
            .await
    }

    /// List all characters visible to the current player.
    pub async fn characters(&self) -> Result<Vec<Character>, Error> {
        self.get_json("/api/character/all").await
    }

    /// Get one character with class, background and scores resolved.
    pub async fn character(&self, id: CharacterId) -> Result<Character, Error> {
        self.get_json(&format!("/api/character/{id}")).await
    }

    /// Patch character fields; only set fields are sent.
    pub async fn update_character(
        &self,
        id: CharacterId,
        update: &CharacterUpdate,
    ) -> Result<Character, Error> {
        self.patch_json(&format!("/api/character/{id}"), update)
            .await
    }

    // ------------------------------------------------------------------
    // Class and background catalogs
    // ------------------------------------------------------------------

    pub async fn classes(&self) -> Result<Vec<ClassSummary>, Error> {
        self.get_json("/api/classes/all").await
    }

    pub async fn class(&self, id: ClassId) -> Result<ClassSummary, Error> {
        self.get_json(&format!("/api/classes/{}", id.0)).await
    }

    pub async fn backgrounds(&self) -> Result<Vec<BackgroundSummary>, Error> {
        self.get_json("/api/background/all").await
    }

    pub async fn background(&self, id: BackgroundId) -> Result<BackgroundSummary, Error> {
        self.get_json(&format!("/api/background/{}", id.0)).await
    }

    // ------------------------------------------------------------------
    // Campaigns
    // ------------------------------------------------------------------

    /// List the current player's campaigns.
    pub async fn campaigns(&self) -> Result<Vec<Campaign>, Error> {
        self.get_json("/api/campaign").await
    }

    /// List joinable public campaigns.
    pub async fn public_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        self.get_json("/api/campaign/public/all").await
    }

    /// Get one campaign; `story` is only present when the requester is
    /// the DM.
    pub async fn campaign(&self, id: CampaignId) -> Result<Campaign, Error> {
        self.get_json(&format!("/api/campaign/{id}")).await
    }

    pub async fn create_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, Error> {
        self.post_json("/api/campaign", draft).await
    }

    /// Fetch the campaign story (DM only).
    pub async fn story(&self, id: CampaignId) -> Result<String, Error> {
        let text = self.get_text(&format!("/api/campaign/{id}/story")).await?;
        // The backend returns the bare story; tolerate a JSON-quoted one.
        Ok(serde_json::from_str::<String>(&text).unwrap_or(text))
    }

    /// Replace the campaign story (DM only).
    pub async fn update_story(
        &self,
        id: CampaignId,
        story: impl Into<String>,
    ) -> Result<Campaign, Error> {
        #[derive(Serialize)]
        struct StoryUpdate {
            story: String,
        }
        self.patch_json(
            &format!("/api/campaign/{id}/story"),
            &StoryUpdate {
                story: story.into(),
            },
        )
        .await
    }

    // ------------------------------------------------------------------
    // Campaign membership and the approval flow
    // ------------------------------------------------------------------

    /// All members of a campaign.
    pub async fn campaign_players(
        &self,
        campaign: CampaignId,
    ) -> Result<Vec<CampaignPlayer>, Error> {
        self.get_json(&format!("/api/campaign-player/{campaign}"))
            .await
    }

    /// Memberships with a character awaiting DM review.
    pub async fn pending_characters(
        &self,
        campaign: CampaignId,
    ) -> Result<Vec<CampaignPlayer>, Error> {
        self.get_json(&format!("/api/campaign-player/{campaign}/pending-characters"))
            .await
    }

    /// One player's membership row (includes their role).
    pub async fn membership(
        &self,
        campaign: CampaignId,
        player: PlayerId,
    ) -> Result<CampaignPlayer, Error> {
        self.get_json(&format!("/api/campaign-player/{campaign}/{player}/role"))
            .await
    }

    /// All memberships of one player, across campaigns.
    pub async fn player_campaigns(&self, player: PlayerId) -> Result<Vec<CampaignPlayer>, Error> {
        self.get_json(&format!("/api/campaign-player/player/{player}"))
            .await
    }

    /// Join a public campaign as a player.
    pub async fn join_campaign(&self, campaign: CampaignId) -> Result<JoinOutcome, Error> {
        self.post_json_empty(&format!("/api/campaign-player/{campaign}/join"))
            .await
    }

    /// Submit a character for DM approval.
    pub async fn submit_character(
        &self,
        campaign: CampaignId,
        player: PlayerId,
        character: CharacterId,
    ) -> Result<CampaignPlayer, Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Submit {
            character_id: CharacterId,
        }
        self.post_json(
            &format!("/api/campaign-player/{campaign}/{player}/submit-character"),
            &Submit {
                character_id: character,
            },
        )
        .await
    }

    /// Approve a pending character (DM only).
    pub async fn approve_character(
        &self,
        campaign: CampaignId,
        membership: CampaignPlayerId,
    ) -> Result<CampaignPlayer, Error> {
        self.post_json_empty(&format!(
            "/api/campaign-player/{campaign}/approve-character/{}",
            membership.0
        ))
        .await
    }

    /// Reject a pending character with notes for the player (DM only).
    pub async fn reject_character(
        &self,
        campaign: CampaignId,
        membership: CampaignPlayerId,
        notes: impl Into<String>,
    ) -> Result<CampaignPlayer, Error> {
        #[derive(Serialize)]
        struct Reject {
            notes: String,
        }
        self.post_json(
            &format!(
                "/api/campaign-player/{campaign}/reject-character/{}",
                membership.0
            ),
            &Reject {
                notes: notes.into(),
            },
        )
        .await
    }

    /// Resubmit a previously rejected character.
    pub async fn resubmit_character(
        &self,
        campaign: CampaignId,
        player: PlayerId,
    ) -> Result<CampaignPlayer, Error> {
        self.post_json_empty(&format!(
            "/api/campaign-player/{campaign}/{player}/resubmit-character"
        ))
        .await
    }

    /// Leave a campaign, or (as DM) remove another player.
    pub async fn leave_campaign(
        &self,
        campaign: CampaignId,
        player: PlayerId,
    ) -> Result<(), Error> {
        self.delete(&format!("/api/campaign-player/{campaign}/leave/{player}"))
            .await
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub async fn notifications(&self, player: PlayerId) -> Result<Vec<Notification>, Error> {
        self.get_json(&format!("/api/notification/player/{player}"))
            .await
    }

    pub async fn unread_notifications(
        &self,
        player: PlayerId,
    ) -> Result<Vec<Notification>, Error> {
        self.get_json(&format!("/api/notification/player/{player}/unread"))
            .await
    }

    /// Unread count for the sidebar badge.
    pub async fn unread_count(&self, player: PlayerId) -> Result<u64, Error> {
        self.get_json(&format!("/api/notification/player/{player}/unread/count"))
            .await
    }

    pub async fn mark_read(&self, id: NotificationId) -> Result<Notification, Error> {
        self.patch_empty(&format!("/api/notification/{}/read", id.0))
            .await
    }

    /// Mark every notification of a player as read. The backend replies
    /// with an empty 200.
    pub async fn mark_all_read(&self, player: PlayerId) -> Result<(), Error> {
        tracing::debug!(player = %player, "PATCH read-all");
        let response = self
            .client
            .patch(self.url(&format!("/api/notification/player/{player}/read-all")))
            .headers(self.build_headers()?)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn delete_notification(&self, id: NotificationId) -> Result<(), Error> {
        self.delete(&format!("/api/notification/{}", id.0)).await
    }

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    /// Look up the current player's profile by email.
    pub async fn player_by_email(&self, email: &str) -> Result<Player, Error> {
        self.get_json(&format!("/api/player/{email}")).await
    }

    pub async fn player(&self, id: PlayerId) -> Result<Player, Error> {
        self.get_json(&format!("/api/player/id/{id}")).await
    }

    // ------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------

    fn build_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| Error::Config(format!("Invalid token: {e}")))?,
            );
        }
        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(Error::Api { status, message })
        }
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
        response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        tracing::debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::parse(Self::check(response).await?).await
    }

    async fn get_text(&self, path: &str) -> Result<String, Error> {
        tracing::debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::check(response)
            .await?
            .text()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        tracing::debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .headers(self.build_headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::parse(Self::check(response).await?).await
    }

    async fn post_json_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.post_json(path, &serde_json::json!({})).await
    }

    async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        tracing::debug!(path, "PATCH");
        let response = self
            .client
            .patch(self.url(path))
            .headers(self.build_headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::parse(Self::check(response).await?).await
    }

    async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.patch_json(path, &serde_json::json!({})).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        tracing::debug!(path, "DELETE");
        let response = self
            .client
            .delete(self.url(path))
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = DicekeeperClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/ability/all"), "http://localhost:8080/api/ability/all");
    }

    #[test]
    fn test_with_token_sets_authorization_header() {
        let client = DicekeeperClient::new("http://localhost:8080").with_token("abc123");
        let headers = client.build_headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
    }

    #[test]
    fn test_headers_without_token() {
        let client = DicekeeperClient::new("http://localhost:8080");
        let headers = client.build_headers().unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let client = DicekeeperClient::new("http://localhost:8080").with_token("bad\ntoken");
        assert!(matches!(client.build_headers(), Err(Error::Config(_))));
    }
}
