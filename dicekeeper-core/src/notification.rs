//! Notifications for the approval flow.

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Identifier of a notification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct NotificationId(pub i64);

/// What happened. The backend only emits approval-flow events today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    CharacterSubmitted,
    CharacterApproved,
    CharacterRejected,
}

impl NotificationKind {
    pub fn name(&self) -> &'static str {
        match self {
            NotificationKind::CharacterSubmitted => "Character submitted",
            NotificationKind::CharacterApproved => "Character approved",
            NotificationKind::CharacterRejected => "Character rejected",
        }
    }
}

/// A notification addressed to one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub player_id: PlayerId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Usually the campaign id the event belongs to.
    #[serde(default)]
    pub reference_id: Option<i64>,
    /// Usually a campaign-player or character id for direct navigation.
    #[serde(default)]
    pub secondary_reference_id: Option<i64>,
    #[serde(default)]
    pub is_read: bool,
    /// Unix millis.
    #[serde(default)]
    pub created_at: i64,
}

/// Count of unread notifications, for the sidebar badge.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_format() {
        let json = r#"{
            "id": 3,
            "playerId": 7,
            "type": "CHARACTER_REJECTED",
            "title": "Character Needs Changes",
            "referenceId": 12,
            "secondaryReferenceId": 5,
            "isRead": false,
            "createdAt": 1700000000000
        }"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.kind, NotificationKind::CharacterRejected);
        assert_eq!(notification.reference_id, Some(12));
        assert!(!notification.is_read);
    }

    #[test]
    fn test_unread_count() {
        let make = |id: i64, read: bool| Notification {
            id: NotificationId(id),
            player_id: PlayerId(1),
            kind: NotificationKind::CharacterApproved,
            title: String::new(),
            message: None,
            reference_id: None,
            secondary_reference_id: None,
            is_read: read,
            created_at: 0,
        };
        let list = vec![make(1, true), make(2, false), make(3, false)];
        assert_eq!(unread_count(&list), 2);
        assert_eq!(unread_count(&[]), 0);
    }
}
