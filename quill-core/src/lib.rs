//! Quill Core - foundations of the Quill blogging client
//!
//! This crate provides the shared pieces the editor, API client and CLI
//! build on: error types, configuration, the markdown AST and parser, the
//! HTML renderer with heading anchors, the outline synchronizer and
//! plain-text content utilities.

pub mod ast;
pub mod config;
pub mod error;
pub mod outline;
pub mod parser;
pub mod render;
pub mod text;

// Re-export commonly used types
pub use ast::{Node, NodeType, Tree};
pub use config::{ApiConfig, Config, EditorConfig, LogConfig, StorageConfig};
pub use error::{QuillError, Result};
pub use outline::{HeadingEntry, Outline};
pub use parser::MarkdownParser;
pub use render::{HtmlRenderer, RenderOptions};
