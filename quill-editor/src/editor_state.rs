//! Editor state with dirty tracking, word count and outline bookkeeping

use quill_core::outline::Outline;
use quill_core::text::count_words;
use quill_core::MarkdownParser;
use serde::{Deserialize, Serialize};

/// Cursor position in the editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    /// Line number (0-based)
    pub line: usize,
    /// Column number (0-based)
    pub column: usize,
}

impl CursorPosition {
    /// Create a new cursor position
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Cursor position at document start
    pub fn start() -> Self {
        Self::new(0, 0)
    }
}

/// Complete editor state for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorState {
    /// Post title being edited
    pub title: String,
    /// Document content (markdown text)
    pub content: String,
    /// Post tags
    pub tags: Vec<String>,
    /// Current cursor position
    pub cursor: CursorPosition,
    /// Whether the content differs from the adopted baseline
    pub is_dirty: bool,
    /// Visible character count of the content
    pub word_count: usize,
    /// Outline derived from the current content
    pub outline: Outline,
    /// When a draft of this state was last persisted, epoch milliseconds
    pub last_saved_at: Option<i64>,
    /// Baseline hash for dirty detection
    baseline_hash: String,
}

impl EditorState {
    /// Create state with empty content
    pub fn new() -> Self {
        Self::with_content(String::new(), String::new(), Vec::new())
    }

    /// Create state adopted from existing content (a restored draft or the
    /// server's version); the content becomes the clean baseline.
    pub fn with_content(title: String, content: String, tags: Vec<String>) -> Self {
        let baseline_hash = content_hash(&title, &content, &tags);
        let word_count = count_words(&content);
        let outline = derive_outline(&content);

        Self {
            title,
            content,
            tags,
            cursor: CursorPosition::start(),
            is_dirty: false,
            word_count,
            outline,
            last_saved_at: None,
            baseline_hash,
        }
    }

    /// Replace the content, recomputing word count, outline and dirty flag
    pub fn update_content(&mut self, new_content: String) {
        self.content = new_content;
        self.word_count = count_words(&self.content);
        self.outline = derive_outline(&self.content);
        self.refresh_dirty();
    }

    /// Replace the title
    pub fn update_title(&mut self, new_title: String) {
        self.title = new_title;
        self.refresh_dirty();
    }

    /// Replace the tags
    pub fn update_tags(&mut self, new_tags: Vec<String>) {
        self.tags = new_tags;
        self.refresh_dirty();
    }

    /// Mark the current state as saved at the given time
    pub fn mark_saved(&mut self, saved_at: i64) {
        self.last_saved_at = Some(saved_at);
    }

    /// Whether there is anything worth persisting: non-empty title or
    /// visible content. Autosave ticks are skipped otherwise.
    pub fn is_substantial(&self) -> bool {
        !self.title.trim().is_empty() || self.word_count > 0
    }

    /// Move the cursor to the heading with the given outline id.
    /// Returns false when the id is not in the current outline.
    pub fn jump_to_heading(&mut self, id: &str) -> bool {
        match self.outline.find(id).and_then(|entry| entry.line) {
            Some(line) => {
                self.cursor = CursorPosition::new(line, 0);
                true
            }
            None => false,
        }
    }

    fn refresh_dirty(&mut self) {
        self.is_dirty = content_hash(&self.title, &self.content, &self.tags) != self.baseline_hash;
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse content and derive its outline in one pass
fn derive_outline(content: &str) -> Outline {
    Outline::from_tree(&MarkdownParser::new().parse(content))
}

/// Hash of the editable fields for change detection
fn content_hash(title: &str, content: &str, tags: &[String]) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    title.hash(&mut hasher);
    content.hash(&mut hasher);
    tags.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_tracking_against_baseline() {
        let mut state = EditorState::with_content(
            "Title".to_string(),
            "original".to_string(),
            vec![],
        );
        assert!(!state.is_dirty);

        state.update_content("modified".to_string());
        assert!(state.is_dirty);

        state.update_content("original".to_string());
        assert!(!state.is_dirty);
    }

    #[test]
    fn test_update_content_recomputes_outline_and_count() {
        let mut state = EditorState::new();
        assert!(state.outline.is_empty());
        assert_eq!(state.word_count, 0);

        state.update_content("# One\n\ntext\n## Two\n".to_string());
        assert_eq!(state.outline.len(), 2);
        assert_eq!(state.outline.entries[0].id, "one");
        assert!(state.word_count > 0);
    }

    #[test]
    fn test_substantial_gate() {
        let mut state = EditorState::new();
        assert!(!state.is_substantial());

        state.update_title("  ".to_string());
        assert!(!state.is_substantial());

        state.update_title("Draft".to_string());
        assert!(state.is_substantial());

        state.update_title(String::new());
        state.update_content("<p>x</p>".to_string());
        assert!(state.is_substantial());
    }

    #[test]
    fn test_jump_to_heading_moves_cursor() {
        let mut state = EditorState::new();
        state.update_content("intro\n\n# First\ntext\n## Second\n".to_string());

        assert!(state.jump_to_heading("second"));
        assert_eq!(state.cursor.line, 4);
        assert!(!state.jump_to_heading("missing"));
    }
}
