//! Heading outline synchronization
//!
//! Derives a deterministic, collision-free list of heading anchors from post
//! content. Two adapters feed the same id algorithm: a line-oriented scan
//! over raw markdown (reader side) and a walk over an already-parsed tree
//! (editor side). Occurrence counters reset on every pass, so re-running a
//! pass over the same content always yields the same ids.

use crate::ast::Tree;
use crate::parser::strip_closing_markers;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fallback base slug for headings whose text reduces to nothing
const FALLBACK_SLUG: &str = "section";

/// One entry in a derived outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    /// URL-fragment-safe id, unique within one pass
    pub id: String,
    /// Visible heading text with closing markers stripped
    pub text: String,
    /// Heading level 1-6
    pub level: u8,
    /// Source line (scan adapter) or node line (tree adapter)
    pub line: Option<usize>,
}

/// Ordered outline of a document's headings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Entries in document order
    pub entries: Vec<HeadingEntry>,
}

impl Outline {
    /// Build an outline from raw markdown text.
    ///
    /// Recognizes lines starting with 1-6 `#` markers followed by
    /// whitespace; lines inside triple-backtick fences are never headings.
    pub fn scan_markdown(markdown: &str) -> Self {
        let heading_re = Regex::new(r"^(#{1,6})\s+(.+)$").unwrap();
        let mut allocator = SlugAllocator::new();
        let mut entries = Vec::new();
        let mut in_code_fence = false;

        for (line_index, raw_line) in markdown.lines().enumerate() {
            let line = raw_line.trim();
            if line.starts_with("```") {
                in_code_fence = !in_code_fence;
                continue;
            }
            if in_code_fence {
                continue;
            }

            let Some(captures) = heading_re.captures(line) else {
                continue;
            };
            let level = captures.get(1).unwrap().as_str().len() as u8;
            let text = strip_closing_markers(captures.get(2).unwrap().as_str());

            entries.push(HeadingEntry {
                id: allocator.allocate(&text),
                text,
                level,
                line: Some(line_index),
            });
        }

        Self { entries }
    }

    /// Build an outline from an already-parsed tree, walking heading nodes
    /// in document order.
    pub fn from_tree(tree: &Tree) -> Self {
        let mut allocator = SlugAllocator::new();
        let entries = tree
            .headings()
            .into_iter()
            .map(|node| {
                let text = node.text_content();
                HeadingEntry {
                    id: allocator.allocate(&text),
                    text,
                    level: node.level.unwrap_or(1),
                    line: node.line,
                }
            })
            .collect();

        Self { entries }
    }

    /// Whether the outline has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up an entry by its anchor id
    pub fn find(&self, id: &str) -> Option<&HeadingEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The entry whose heading is the top-most at or above the given source
    /// line; used by consumers tracking which section is currently in view.
    pub fn entry_at_line(&self, line: usize) -> Option<&HeadingEntry> {
        self.entries
            .iter()
            .take_while(|e| e.line.map(|l| l <= line).unwrap_or(false))
            .last()
    }
}

/// Per-pass slug allocation with collision suffixing.
///
/// The first occurrence of a base slug keeps it bare; the k-th occurrence
/// becomes `base-k`. Counters live only for one pass.
struct SlugAllocator {
    used: HashMap<String, usize>,
}

impl SlugAllocator {
    fn new() -> Self {
        Self {
            used: HashMap::new(),
        }
    }

    fn allocate(&mut self, text: &str) -> String {
        let base = match slugify(text) {
            s if s.is_empty() => FALLBACK_SLUG.to_string(),
            s => s,
        };
        let count = self.used.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{}-{}", base, count)
        }
    }
}

/// Characters removed from heading text before slug assembly
const STRIPPED_PUNCTUATION: &str = "`~!@#$%^&*()+=[]{}\\|;:'\",.<>/?";

/// Derive a URL-fragment-safe base slug from heading text.
///
/// Lowercases, strips a fixed punctuation set, collapses whitespace runs to
/// single hyphens, collapses hyphen runs, and trims edge hyphens. May return
/// an empty string; callers substitute the fallback.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_hyphen = false;

    for ch in input.trim().chars() {
        if STRIPPED_PUNCTUATION.contains(ch) {
            continue;
        }
        if ch.is_whitespace() || ch == '-' {
            if !last_was_hyphen {
                slug.push('-');
                last_was_hyphen = true;
            }
            continue;
        }
        for lower in ch.to_lowercase() {
            slug.push(lower);
        }
        last_was_hyphen = false;
    }

    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MarkdownParser;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Spaced   Out  "), "spaced-out");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn test_slugify_strips_punctuation_to_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("(...)"), "");
    }

    #[test]
    fn test_scan_finds_headings_in_order() {
        let outline = Outline::scan_markdown("# Hello World\n\ntext\n## Hello World\n");
        assert_eq!(
            outline.entries,
            vec![
                HeadingEntry {
                    id: "hello-world".to_string(),
                    text: "Hello World".to_string(),
                    level: 1,
                    line: Some(0),
                },
                HeadingEntry {
                    id: "hello-world-2".to_string(),
                    text: "Hello World".to_string(),
                    level: 2,
                    line: Some(3),
                },
            ]
        );
    }

    #[test]
    fn test_scan_skips_fenced_code_blocks() {
        let outline = Outline::scan_markdown("```\n# Not A Heading\n```\n# Real Heading\n");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.entries[0].id, "real-heading");
        assert_eq!(outline.entries[0].text, "Real Heading");
        assert_eq!(outline.entries[0].level, 1);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let content = "# A\n## A\n# B\n```\n# C\n```\n### A\n";
        let first = Outline::scan_markdown(content);
        let second = Outline::scan_markdown(content);
        assert_eq!(first, second);
    }

    #[test]
    fn test_collision_suffixes_count_occurrences() {
        let outline = Outline::scan_markdown("# Same\n# Same\n# Same\n");
        let ids: Vec<&str> = outline.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["same", "same-2", "same-3"]);
    }

    #[test]
    fn test_punctuation_only_headings_fall_back_to_section() {
        let outline = Outline::scan_markdown("# !!!\n# ???\n");
        let ids: Vec<&str> = outline.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["section", "section-2"]);
    }

    #[test]
    fn test_marker_only_heading_falls_back_to_section() {
        let outline = Outline::scan_markdown("# ###\n");
        assert_eq!(outline.entries[0].id, "section");
        assert_eq!(outline.entries[0].text, "");
    }

    #[test]
    fn test_tree_adapter_matches_scan_ids() {
        let content = "# Hello World\n\ntext\n## Hello World\n### Done\n";
        let scanned = Outline::scan_markdown(content);
        let parsed = Outline::from_tree(&MarkdownParser::new().parse(content));

        let scan_ids: Vec<&str> = scanned.entries.iter().map(|e| e.id.as_str()).collect();
        let tree_ids: Vec<&str> = parsed.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(scan_ids, tree_ids);
    }

    #[test]
    fn test_entry_at_line_picks_topmost_preceding_heading() {
        let outline = Outline::scan_markdown("# One\ntext\n# Two\nmore\nstill more\n# Three\n");
        assert_eq!(outline.entry_at_line(0).unwrap().id, "one");
        assert_eq!(outline.entry_at_line(4).unwrap().id, "two");
        assert_eq!(outline.entry_at_line(99).unwrap().id, "three");
    }

    #[test]
    fn test_find_by_id() {
        let outline = Outline::scan_markdown("# Intro\n## Details\n");
        assert!(outline.find("details").is_some());
        assert!(outline.find("missing").is_none());
    }
}
