//! Configuration management for the Quill client

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{QuillError, Result};

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

impl Config {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            api: ApiConfig::default(),
            editor: EditorConfig::default(),
            storage: StorageConfig::default(),
            logging: LogConfig::default(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| QuillError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| QuillError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| QuillError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| QuillError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(QuillError::Config("API base URL must not be empty".to_string()));
        }

        if self.editor.autosave_interval_secs == 0 {
            return Err(QuillError::Config(
                "Autosave interval must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Remote post API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `http://localhost:8124`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8124".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Editor behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Seconds between autosave ticks
    pub autosave_interval_secs: u64,
    /// Minimum visible characters required to publish
    pub min_content_chars: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: 30,
            min_content_chars: 10,
        }
    }
}

/// Local draft storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per draft key
    pub drafts_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            drafts_dir: base.join("quill").join("drafts"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
