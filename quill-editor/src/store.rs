//! Durable draft storage
//!
//! A best-effort local cache, not a source of truth: saves and clears never
//! surface failures to the caller, and a corrupt record reads as absent.
//! `FileDraftStore` keeps one JSON file per draft key.

use crate::draft::{now_millis, Draft, DraftContent, DraftKey};
use crate::EditorError;
use async_trait::async_trait;
use quill_core::Result;
use std::path::PathBuf;
use tokio::fs;

/// Key-value persistence for drafts
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Persist editor state under the key, stamping `saved_at`. Overwrites
    /// any prior draft. Storage failures are logged and swallowed.
    async fn save(&self, key: DraftKey, content: DraftContent);

    /// Load the draft for the key. Missing and unparseable records are both
    /// `None`.
    async fn load(&self, key: DraftKey) -> Option<Draft>;

    /// Delete the draft for the key; clearing an absent draft is not an
    /// error.
    async fn clear(&self, key: DraftKey);
}

/// File-backed draft store, one JSON file per key
pub struct FileDraftStore {
    drafts_dir: PathBuf,
}

impl FileDraftStore {
    /// Create a store over the given directory
    pub fn new(drafts_dir: PathBuf) -> Self {
        Self { drafts_dir }
    }

    fn path_for(&self, key: DraftKey) -> PathBuf {
        self.drafts_dir.join(format!("{}.json", key.storage_key()))
    }

    async fn try_save(&self, key: DraftKey, content: DraftContent) -> Result<()> {
        fs::create_dir_all(&self.drafts_dir).await.map_err(|e| {
            EditorError::DraftStorageFailed(format!("Failed to create drafts directory: {}", e))
        })?;

        // saved_at never moves backwards within one key, even if the wall
        // clock does.
        let previous_saved_at = self.load(key).await.map(|d| d.saved_at).unwrap_or(0);
        let draft = Draft {
            title: content.title,
            content: content.content,
            tags: content.tags,
            saved_at: now_millis().max(previous_saved_at),
            post_id: key.post_id(),
        };

        let payload = serde_json::to_vec(&draft)?;
        fs::write(self.path_for(key), payload).await.map_err(|e| {
            EditorError::DraftStorageFailed(format!("Failed to write draft: {}", e))
        })?;

        tracing::debug!("Saved draft {} at {}", key, draft.saved_at);
        Ok(())
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn save(&self, key: DraftKey, content: DraftContent) {
        if let Err(e) = self.try_save(key, content).await {
            tracing::warn!("Draft save for {} failed, editing continues: {}", key, e);
        }
    }

    async fn load(&self, key: DraftKey) -> Option<Draft> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(_) => return None,
        };

        match serde_json::from_str::<Draft>(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::warn!("Corrupt draft {} treated as absent: {}", key, e);
                None
            }
        }
    }

    async fn clear(&self, key: DraftKey) {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => tracing::debug!("Cleared draft {}", key),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Draft clear for {} failed: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn content(title: &str, body: &str) -> DraftContent {
        DraftContent {
            title: title.to_string(),
            content: body.to_string(),
            tags: vec!["rust".to_string()],
        }
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf());

        let before = now_millis();
        store.save(DraftKey::Create, content("Draft", "<p>x</p>")).await;

        let loaded = store.load(DraftKey::Create).await.unwrap();
        assert_eq!(loaded.title, "Draft");
        assert_eq!(loaded.content, "<p>x</p>");
        assert_eq!(loaded.tags, vec!["rust".to_string()]);
        assert!(loaded.saved_at >= before);
        assert_eq!(loaded.post_id, None);
    }

    #[tokio::test]
    async fn test_edit_key_stamps_post_id() {
        let dir = tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf());

        store.save(DraftKey::Edit(42), content("T", "c")).await;

        let loaded = store.load(DraftKey::Edit(42)).await.unwrap();
        assert_eq!(loaded.post_id, Some(42));
        assert!(store.load(DraftKey::Edit(41)).await.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_draft() {
        let dir = tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf());

        store.save(DraftKey::Create, content("First", "a")).await;
        store.save(DraftKey::Create, content("Second", "b")).await;

        let loaded = store.load(DraftKey::Create).await.unwrap();
        assert_eq!(loaded.title, "Second");
    }

    #[tokio::test]
    async fn test_saved_at_is_monotonic() {
        let dir = tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf());

        // A record stamped in the future must not move backwards on the
        // next save.
        let future = now_millis() + 60_000;
        let stale = Draft {
            title: "F".to_string(),
            content: "c".to_string(),
            tags: vec![],
            saved_at: future,
            post_id: None,
        };
        fs::create_dir_all(dir.path()).await.unwrap();
        fs::write(
            dir.path().join("draft_create.json"),
            serde_json::to_vec(&stale).unwrap(),
        )
        .await
        .unwrap();

        store.save(DraftKey::Create, content("New", "c")).await;
        let loaded = store.load(DraftKey::Create).await.unwrap();
        assert!(loaded.saved_at >= future);
        assert_eq!(loaded.title, "New");
    }

    #[tokio::test]
    async fn test_clear_then_load_returns_none() {
        let dir = tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf());

        store.save(DraftKey::Create, content("T", "c")).await;
        store.clear(DraftKey::Create).await;
        assert!(store.load(DraftKey::Create).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf());

        store.clear(DraftKey::Create).await;
        store.clear(DraftKey::Create).await;
        assert!(store.load(DraftKey::Create).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_reads_as_absent() {
        let dir = tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf());

        fs::write(dir.path().join("draft_create.json"), b"{not json")
            .await
            .unwrap();
        assert!(store.load(DraftKey::Create).await.is_none());
    }

    #[tokio::test]
    async fn test_unwritable_store_swallows_failure() {
        // Point the store at a path occupied by a regular file, so the
        // directory can never be created.
        let dir = tempdir().unwrap();
        let blocked = dir.path().join("occupied");
        fs::write(&blocked, b"file").await.unwrap();

        let store = FileDraftStore::new(blocked);
        store.save(DraftKey::Create, content("T", "c")).await;
        assert!(store.load(DraftKey::Create).await.is_none());
    }
}
