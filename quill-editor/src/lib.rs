//! Quill Editor - draft persistence and editing sessions
//!
//! Owns the client-side state of one editing surface: the durable draft
//! cache, the session-initialization protocol that arbitrates between a
//! local draft and the server's version, the autosave loop, and the
//! publish flow.

use quill_core::QuillError;

pub mod draft;
pub mod editor_state;
pub mod session;
pub mod store;

pub use draft::{now_millis, Draft, DraftContent, DraftKey};
pub use editor_state::{CursorPosition, EditorState};
pub use session::{
    EditorMode, EditorSession, PublishReport, PublishSettings, RestoreChoice, RestorePrompt,
    SessionInit,
};
pub use store::{DraftStore, FileDraftStore};

/// Editor-specific errors
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Draft storage failed; callers treat this as soft
    #[error("Draft storage failed: {0}")]
    DraftStorageFailed(String),

    /// The session state is not publishable
    #[error("{0}")]
    Validation(String),

    /// The backend rejected the publish; the draft is kept
    #[error("{0}")]
    PublishFailed(String),
}

impl From<EditorError> for QuillError {
    fn from(err: EditorError) -> Self {
        QuillError::Session(err.to_string())
    }
}
