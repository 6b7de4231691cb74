//! Local drafts of in-progress characters.
//!
//! The backend owns every committed change; a draft is a client-side
//! snapshot of the creation flow (name, selections, allocation) so a
//! half-built character survives the view being closed. Drafts are
//! plain JSON files with a version stamp.

use crate::allocator::AllocationState;
use crate::character::{BackgroundId, CharacterId, ClassId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from draft persistence.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current draft file version.
const DRAFT_VERSION: u32 = 1;

/// A saved character-creation draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDraft {
    /// Draft format version for compatibility checking.
    pub version: u32,

    /// When the draft was saved (unix seconds, as a string).
    pub saved_at: String,

    /// Server-side character this draft belongs to, if one was created.
    pub character_id: Option<CharacterId>,

    /// Character name as typed so far.
    pub name: String,

    /// Free-form character info.
    pub info: String,

    /// Selected class, if any.
    pub class_id: Option<ClassId>,

    /// Selected background, if any.
    pub background_id: Option<BackgroundId>,

    /// The ability allocation at the time of saving.
    pub allocation: AllocationState,

    /// Quick-access metadata for draft listings.
    pub metadata: DraftMetadata,
}

/// Metadata about a draft for display without loading the whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftMetadata {
    /// Character name (may be empty for a fresh draft).
    pub name: String,

    /// Points allocated so far.
    pub used_points: i64,

    /// Budget at the time of saving.
    pub budget: i64,
}

impl CharacterDraft {
    /// Create a draft from the current creation-flow state.
    pub fn new(
        character_id: Option<CharacterId>,
        name: impl Into<String>,
        info: impl Into<String>,
        class_id: Option<ClassId>,
        background_id: Option<BackgroundId>,
        allocation: AllocationState,
    ) -> Self {
        let name = name.into();
        let metadata = DraftMetadata {
            name: name.clone(),
            used_points: allocation.used_points(),
            budget: allocation.budget(),
        };
        Self {
            version: DRAFT_VERSION,
            saved_at: unix_now(),
            character_id,
            name,
            info: info.into(),
            class_id,
            background_id,
            allocation,
            metadata,
        }
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let draft: Self = serde_json::from_str(&content)?;

        if draft.version != DRAFT_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: DRAFT_VERSION,
                found: draft.version,
            });
        }

        Ok(draft)
    }

    /// Get metadata without loading the full draft.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<DraftMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: DraftMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != DRAFT_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: DRAFT_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Information about a draft file.
#[derive(Debug, Clone)]
pub struct DraftInfo {
    /// Path to the draft file.
    pub path: String,

    /// Draft metadata.
    pub metadata: DraftMetadata,
}

/// List all draft files in a directory, creating it if missing.
pub async fn list_drafts(dir: impl AsRef<Path>) -> Result<Vec<DraftInfo>, PersistError> {
    let mut drafts = Vec::new();

    let dir_path = dir.as_ref();
    if !dir_path.exists() {
        fs::create_dir_all(dir_path).await?;
        return Ok(drafts);
    }

    let mut entries = fs::read_dir(dir_path).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Ok(metadata) = CharacterDraft::peek_metadata(&path).await {
                drafts.push(DraftInfo {
                    path: path.to_string_lossy().to_string(),
                    metadata,
                });
            }
        }
    }

    drafts.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
    Ok(drafts)
}

/// Generate a draft path from a character name.
pub fn draft_path(dir: impl AsRef<Path>, name: &str) -> std::path::PathBuf {
    let sanitized = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    dir.as_ref().join(format!("{sanitized}.json"))
}

/// Current timestamp as unix seconds.
fn unix_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{AbilityId, AbilityScore, DEFAULT_BUDGET};

    fn sample_allocation() -> AllocationState {
        let scores = vec![
            AbilityScore {
                id: AbilityId(1),
                name: "Strength".to_string(),
                value: 15,
            },
            AbilityScore {
                id: AbilityId(2),
                name: "Dexterity".to_string(),
                value: 12,
            },
        ];
        AllocationState::new(scores, DEFAULT_BUDGET)
    }

    #[test]
    fn test_draft_metadata() {
        let draft = CharacterDraft::new(
            Some(CharacterId(7)),
            "Thorin",
            "A dour dwarf",
            Some(ClassId(2)),
            None,
            sample_allocation(),
        );

        assert_eq!(draft.version, DRAFT_VERSION);
        assert_eq!(draft.metadata.name, "Thorin");
        assert_eq!(draft.metadata.used_points, 27);
        assert_eq!(draft.metadata.budget, 27);
    }

    #[test]
    fn test_draft_path_sanitizes_name() {
        let path = draft_path("drafts", "Bob's Character!@#");
        assert!(path.to_string_lossy().contains("Bob_s_Character"));
        assert!(path.to_string_lossy().ends_with(".json"));
        assert!(!path.to_string_lossy().contains('!'));
    }

    #[tokio::test]
    async fn test_draft_save_and_load() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("draft.json");

        let draft = CharacterDraft::new(
            None,
            "Aria",
            "",
            None,
            Some(BackgroundId(3)),
            sample_allocation(),
        );
        draft.save_json(&path).await.expect("Save should succeed");

        let loaded = CharacterDraft::load_json(&path)
            .await
            .expect("Load should succeed");

        assert_eq!(loaded.name, "Aria");
        assert_eq!(loaded.background_id, Some(BackgroundId(3)));
        assert_eq!(loaded.allocation, draft.allocation);
    }

    #[tokio::test]
    async fn test_version_mismatch_rejected() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("old.json");

        let mut draft = CharacterDraft::new(None, "Old", "", None, None, sample_allocation());
        draft.version = 99;
        let content = serde_json::to_string(&draft).unwrap();
        tokio::fs::write(&path, content).await.unwrap();

        let result = CharacterDraft::load_json(&path).await;
        assert!(matches!(
            result,
            Err(PersistError::VersionMismatch {
                expected: 1,
                found: 99
            })
        ));
    }

    #[tokio::test]
    async fn test_list_drafts_sorted_by_name() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("drafts");
        std::fs::create_dir_all(&dir).expect("Create dir should succeed");

        for name in ["Charlie", "Alpha", "Beta"] {
            let draft = CharacterDraft::new(None, name, "", None, None, sample_allocation());
            draft
                .save_json(draft_path(&dir, name))
                .await
                .expect("Save should succeed");
        }

        let drafts = list_drafts(&dir).await.expect("List should succeed");
        let names: Vec<_> = drafts.iter().map(|d| d.metadata.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Charlie"]);
    }

    #[tokio::test]
    async fn test_list_drafts_creates_missing_dir() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("nothing_here");

        let drafts = list_drafts(&dir).await.expect("List should succeed");
        assert!(drafts.is_empty());
        assert!(dir.exists());
    }
}
