//! Editor sessions and the draft reconciliation protocol
//!
//! A session owns the editor state for one create- or edit-mode editing
//! surface. Initialization arbitrates between the local draft and the
//! server's version, a periodic task autosaves substantial state, and the
//! publish flow clears the draft only after the backend confirms success.

use crate::draft::{now_millis, Draft, DraftContent, DraftKey};
use crate::editor_state::EditorState;
use crate::store::DraftStore;
use crate::EditorError;
use quill_api::{PostAddRequest, PostApi, PostUpdateRequest, PostVo};
use quill_core::config::EditorConfig;
use quill_core::text::{count_words, excerpt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Maximum excerpt length used for auto-generated summaries
const SUMMARY_LENGTH: usize = 200;

/// Editing mode for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Writing a new post
    Create,
    /// Editing an existing post
    Edit(i64),
}

impl EditorMode {
    /// Draft key for this session's local storage
    pub fn draft_key(&self) -> DraftKey {
        match self {
            EditorMode::Create => DraftKey::Create,
            EditorMode::Edit(post_id) => DraftKey::Edit(*post_id),
        }
    }
}

/// The user's answer to the draft restoration prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreChoice {
    /// Adopt the local draft
    Restore,
    /// Drop the local draft in favor of a clean slate or server content
    Discard,
}

/// Blocking restore/discard decision shown at session start.
///
/// Session initialization does not continue until the implementation
/// returns; the two versions are never merged.
pub trait RestorePrompt: Send + Sync {
    /// Decide whether to restore the draft saved at `saved_at_ms`
    fn decide(&self, saved_at_ms: i64) -> RestoreChoice;
}

/// How a session's initial state was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInit {
    /// Whether a local draft was restored
    pub restored_draft: bool,
    /// Error shown to the user when the remote fetch failed
    pub load_error: Option<String>,
}

/// Optional publish settings supplied by the user
#[derive(Debug, Clone, Default)]
pub struct PublishSettings {
    pub category_id: Option<i64>,
    pub cover_image: Option<String>,
    pub summary: Option<String>,
}

/// Result of a successful publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Id of the created or updated post
    pub post_id: i64,
}

/// One editing session over a create- or edit-mode surface
pub struct EditorSession {
    /// Unique session identifier
    pub id: Uuid,
    /// Editing mode
    pub mode: EditorMode,
    state: Arc<RwLock<EditorState>>,
    store: Arc<dyn DraftStore>,
    api: Arc<dyn PostApi>,
    config: EditorConfig,
    autosave_handle: Option<tokio::task::JoinHandle<()>>,
    load_error: Option<String>,
}

impl EditorSession {
    /// Create a session; call `initialize` before editing
    pub fn new(
        mode: EditorMode,
        store: Arc<dyn DraftStore>,
        api: Arc<dyn PostApi>,
        config: EditorConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            state: Arc::new(RwLock::new(EditorState::new())),
            store,
            api,
            config,
            autosave_handle: None,
            load_error: None,
        }
    }

    /// Initialize the session state, arbitrating between the local draft
    /// and the server's version.
    pub async fn initialize(&mut self, prompt: &dyn RestorePrompt) -> SessionInit {
        let init = match self.mode {
            EditorMode::Create => self.initialize_create(prompt).await,
            EditorMode::Edit(post_id) => self.initialize_edit(post_id, prompt).await,
        };

        self.load_error = init.load_error.clone();
        tracing::info!(
            "Initialized session {} ({:?}), restored draft: {}",
            self.id,
            self.mode,
            init.restored_draft
        );
        init
    }

    /// Create mode: any substantial local draft is offered for restore;
    /// there is no remote version to compare against.
    async fn initialize_create(&mut self, prompt: &dyn RestorePrompt) -> SessionInit {
        let key = self.mode.draft_key();
        let restored = match self.store.load(key).await {
            Some(draft) if draft.is_substantial() => {
                match prompt.decide(draft.saved_at) {
                    RestoreChoice::Restore => {
                        self.adopt_draft(draft).await;
                        true
                    }
                    RestoreChoice::Discard => {
                        self.store.clear(key).await;
                        false
                    }
                }
            }
            _ => false,
        };

        SessionInit {
            restored_draft: restored,
            load_error: None,
        }
    }

    /// Edit mode: fetch the remote post, then compare timestamps. A local
    /// draft strictly newer than the server's version triggers the prompt;
    /// otherwise the remote content is adopted silently and the stale draft
    /// left in place.
    async fn initialize_edit(&mut self, post_id: i64, prompt: &dyn RestorePrompt) -> SessionInit {
        let key = self.mode.draft_key();

        let remote = match self.api.fetch_post(post_id).await {
            Ok(post) => post,
            Err(e) => {
                // No remote baseline: fall back to offering the local
                // draft, surfacing the load error to the user layer.
                tracing::warn!("Post {} fetch failed: {}", post_id, e);
                let message = e.user_message();
                let mut init = self.initialize_create(prompt).await;
                init.load_error = Some(message);
                return init;
            }
        };

        let restored = match self.store.load(key).await {
            Some(draft) if draft.saved_at > remote_updated_millis(&remote) => {
                match prompt.decide(draft.saved_at) {
                    RestoreChoice::Restore => {
                        self.adopt_draft(draft).await;
                        true
                    }
                    RestoreChoice::Discard => {
                        self.adopt_remote(&remote).await;
                        self.store.clear(key).await;
                        false
                    }
                }
            }
            _ => {
                // Stale or missing draft: adopt the server content and
                // leave any stored draft untouched until the next save.
                self.adopt_remote(&remote).await;
                false
            }
        };

        SessionInit {
            restored_draft: restored,
            load_error: None,
        }
    }

    async fn adopt_draft(&self, draft: Draft) {
        let mut state = self.state.write().await;
        *state = EditorState::with_content(draft.title, draft.content, draft.tags);
        state.mark_saved(draft.saved_at);
    }

    async fn adopt_remote(&self, post: &PostVo) {
        let mut state = self.state.write().await;
        *state = EditorState::with_content(
            post.title.clone(),
            post.content.clone(),
            post.tag_list.clone(),
        );
    }

    /// Shared editor state handle
    pub fn state(&self) -> Arc<RwLock<EditorState>> {
        self.state.clone()
    }

    /// Clone of the current editor state
    pub async fn snapshot(&self) -> EditorState {
        self.state.read().await.clone()
    }

    /// Error from the remote fetch at initialization, if any
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Replace the document content
    pub async fn update_content(&self, content: String) {
        self.state.write().await.update_content(content);
    }

    /// Replace the title
    pub async fn update_title(&self, title: String) {
        self.state.write().await.update_title(title);
    }

    /// Replace the tags
    pub async fn update_tags(&self, tags: Vec<String>) {
        self.state.write().await.update_tags(tags);
    }

    /// Persist the current state as a draft (manual "save draft" action)
    pub async fn save_draft(&self) {
        let key = self.mode.draft_key();
        let content = {
            let state = self.state.read().await;
            DraftContent {
                title: state.title.clone(),
                content: state.content.clone(),
                tags: state.tags.clone(),
            }
        };
        self.store.save(key, content).await;
        self.state.write().await.mark_saved(now_millis());
    }

    /// Start the periodic autosave task. Ticks persist the current state
    /// only while it is substantial; the task is an owned resource torn
    /// down by `close`.
    pub fn start_autosave(&mut self) {
        if self.autosave_handle.is_some() {
            return;
        }

        let period = Duration::from_secs(self.config.autosave_interval_secs);
        let key = self.mode.draft_key();
        let state = self.state.clone();
        let store = self.store.clone();
        let session_id = self.id;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately; skip it so saves only
            // happen after a full period of editing.
            interval.tick().await;

            loop {
                interval.tick().await;

                let content = {
                    let state = state.read().await;
                    if !state.is_substantial() {
                        continue;
                    }
                    DraftContent {
                        title: state.title.clone(),
                        content: state.content.clone(),
                        tags: state.tags.clone(),
                    }
                };

                store.save(key, content).await;
                state.write().await.mark_saved(now_millis());
                tracing::debug!("Autosaved draft for session {}", session_id);
            }
        });

        self.autosave_handle = Some(handle);
    }

    /// Whether the autosave task is running
    pub fn autosave_running(&self) -> bool {
        self.autosave_handle.is_some()
    }

    /// Publish the session: create or update the remote post. The draft is
    /// cleared only after the backend confirms success; a failure keeps it
    /// so no work is lost.
    pub async fn publish(&self, settings: PublishSettings) -> Result<PublishReport, EditorError> {
        let (title, content, tags) = {
            let state = self.state.read().await;
            (
                state.title.clone(),
                state.content.clone(),
                state.tags.clone(),
            )
        };

        if title.trim().is_empty() {
            return Err(EditorError::Validation("Title must not be empty".to_string()));
        }
        if count_words(&content) < self.config.min_content_chars {
            return Err(EditorError::Validation(format!(
                "Content needs at least {} characters",
                self.config.min_content_chars
            )));
        }

        let summary = settings
            .summary
            .or_else(|| Some(excerpt(&content, SUMMARY_LENGTH)));

        let post_id = match self.mode {
            EditorMode::Create => {
                let request = PostAddRequest {
                    title,
                    content,
                    tags,
                    category_id: settings.category_id,
                    cover_image: settings.cover_image,
                    summary,
                };
                self.api
                    .create_post(&request)
                    .await
                    .map_err(|e| EditorError::PublishFailed(e.user_message()))?
            }
            EditorMode::Edit(post_id) => {
                let request = PostUpdateRequest {
                    id: post_id,
                    title,
                    content,
                    tags,
                    category_id: settings.category_id,
                    cover_image: settings.cover_image,
                    summary,
                };
                self.api
                    .update_post(&request)
                    .await
                    .map_err(|e| EditorError::PublishFailed(e.user_message()))?;
                post_id
            }
        };

        self.store.clear(self.mode.draft_key()).await;
        tracing::info!("Published post {} from session {}", post_id, self.id);
        Ok(PublishReport { post_id })
    }

    /// Tear down the session, stopping the autosave task
    pub fn close(&mut self) {
        if let Some(handle) = self.autosave_handle.take() {
            handle.abort();
            tracing::debug!("Stopped autosave for session {}", self.id);
        }
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Remote last-modified time in epoch milliseconds; a missing or
/// unparseable timestamp compares as zero, so any local draft wins.
fn remote_updated_millis(post: &PostVo) -> i64 {
    post.update_time_millis().unwrap_or(0)
}
