//! Error handling for the Quill client

use thiserror::Error;

/// Result type alias for Quill operations
pub type Result<T> = std::result::Result<T, QuillError>;

/// Main error type for the Quill client
#[derive(Error, Debug)]
pub enum QuillError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Markdown parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Draft storage errors
    #[error("Draft error: {0}")]
    Draft(String),

    /// Remote post API errors
    #[error("API error: {0}")]
    Api(String),

    /// Editor session errors
    #[error("Session error: {0}")]
    Session(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuillError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new draft error
    pub fn draft<S: Into<String>>(msg: S) -> Self {
        Self::Draft(msg.into())
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(msg: S) -> Self {
        Self::Api(msg.into())
    }

    /// Create a new session error
    pub fn session<S: Into<String>>(msg: S) -> Self {
        Self::Session(msg.into())
    }
}
