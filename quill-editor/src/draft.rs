//! Draft model and storage keys
//!
//! A draft is the locally cached, unsaved state of one editing session.
//! Create-mode sessions share a fixed key; edit-mode sessions are keyed by
//! the post id, so tabs editing different posts never collide.

use quill_core::text::count_words;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Locally cached editor state for one session.
///
/// Serialized field names match the persisted wire layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    /// Time of last local persistence, epoch milliseconds
    #[serde(rename = "savedAt")]
    pub saved_at: i64,
    /// Present only for edit-mode drafts
    #[serde(rename = "postId", default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
}

impl Draft {
    /// Whether the draft holds anything worth restoring: a non-empty title
    /// or visible content. Empty drafts are never offered or autosaved.
    pub fn is_substantial(&self) -> bool {
        !self.title.trim().is_empty() || count_words(&self.content) > 0
    }
}

/// The user-editable fields of a draft; the store stamps the rest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftContent {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Storage key for one editing session's draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftKey {
    /// The single create-mode session
    Create,
    /// Edit-mode session for a specific post
    Edit(i64),
}

impl DraftKey {
    /// Key string used for the persisted record
    pub fn storage_key(&self) -> String {
        match self {
            DraftKey::Create => "draft_create".to_string(),
            DraftKey::Edit(post_id) => format!("draft_edit_{}", post_id),
        }
    }

    /// Post id carried by edit-mode keys
    pub fn post_id(&self) -> Option<i64> {
        match self {
            DraftKey::Create => None,
            DraftKey::Edit(post_id) => Some(*post_id),
        }
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_partition_by_mode_and_post() {
        assert_eq!(DraftKey::Create.storage_key(), "draft_create");
        assert_eq!(DraftKey::Edit(42).storage_key(), "draft_edit_42");
        assert_ne!(
            DraftKey::Edit(1).storage_key(),
            DraftKey::Edit(2).storage_key()
        );
    }

    #[test]
    fn test_substantial_requires_title_or_content() {
        let empty = Draft {
            title: "  ".to_string(),
            content: "<p></p>".to_string(),
            tags: vec![],
            saved_at: 0,
            post_id: None,
        };
        assert!(!empty.is_substantial());

        let titled = Draft {
            title: "Draft".to_string(),
            ..empty.clone()
        };
        assert!(titled.is_substantial());

        let with_content = Draft {
            content: "<p>x</p>".to_string(),
            ..empty
        };
        assert!(with_content.is_substantial());
    }

    #[test]
    fn test_serialized_field_names() {
        let draft = Draft {
            title: "T".to_string(),
            content: "c".to_string(),
            tags: vec!["a".to_string()],
            saved_at: 1000,
            post_id: Some(7),
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert!(json.contains("\"savedAt\":1000"));
        assert!(json.contains("\"postId\":7"));

        let create = Draft {
            post_id: None,
            ..draft
        };
        assert!(!serde_json::to_string(&create).unwrap().contains("postId"));
    }
}
