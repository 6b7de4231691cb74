//! Character domain types matching the Dicekeeper wire format.

use crate::allocator::AbilityId;
use serde::{Deserialize, Serialize};

/// Identifier of a character.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct CharacterId(pub i64);

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a character class.
///
/// The backend treats 0 as "no class selected"; see [`ClassId::NONE`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ClassId(pub i64);

impl ClassId {
    /// Sentinel the backend uses to clear a class selection.
    pub const NONE: ClassId = ClassId(0);
}

/// Identifier of a character background.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct BackgroundId(pub i64);

impl BackgroundId {
    /// Sentinel the backend uses to clear a background selection.
    pub const NONE: BackgroundId = BackgroundId(0);
}

/// One ability definition from the catalog (`GET /api/ability/all`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: AbilityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A character's score for one ability, as returned by
/// `GET /api/character/{id}/getAbilityScores`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScoreEntry {
    pub ability_id: AbilityId,
    #[serde(default)]
    pub ability_name: String,
    #[serde(default)]
    pub ability_description: String,
    pub score: i64,
}

/// A class catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub id: ClassId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A background catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundSummary {
    pub id: BackgroundId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A character as the backend returns it, with related data resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub is_created: bool,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default)]
    pub character_class: Option<ClassSummary>,
    #[serde(default)]
    pub background: Option<BackgroundSummary>,
    #[serde(default)]
    pub ability_scores: Option<Vec<AbilityScoreEntry>>,
}

impl Character {
    /// Display name, falling back to a placeholder for unnamed drafts.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "Unnamed character",
        }
    }
}

/// PATCH body for `PATCH /api/character/{id}`.
///
/// Only fields that are set are serialized; the backend leaves the rest
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_id: Option<BackgroundId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
}

impl CharacterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_class(mut self, class_id: ClassId) -> Self {
        self.class_id = Some(class_id);
        self
    }

    pub fn with_background(mut self, background_id: BackgroundId) -> Self {
        self.background_id = Some(background_id);
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn clearing_class(self) -> Self {
        self.with_class(ClassId::NONE)
    }

    pub fn clearing_background(self) -> Self {
        self.with_background(BackgroundId::NONE)
    }
}
