//! Plain-text utilities over post content
//!
//! Editor content is either rich markup (from the structured editor) or raw
//! markdown; these helpers reduce both to plain text for word counting,
//! excerpt generation and the "saved ... ago" labels shown next to drafts.

use chrono::{DateTime, Datelike, Utc};
use regex::Regex;

/// Remove HTML tags, returning the visible text
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    Regex::new(r"<[^>]+>").unwrap().replace_all(html, "").to_string()
}

/// Remove markdown syntax, returning best-effort plain text
pub fn strip_markdown(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let mut text = markdown.to_string();

    // Fenced code blocks disappear entirely
    text = Regex::new(r"(?s)```.*?```")
        .unwrap()
        .replace_all(&text, "")
        .to_string();
    // Inline code keeps its content
    text = Regex::new(r"`([^`]+)`")
        .unwrap()
        .replace_all(&text, "$1")
        .to_string();
    // Images keep their alt text, links their label
    text = Regex::new(r"!\[([^\]]*)\]\([^)]+\)")
        .unwrap()
        .replace_all(&text, "$1")
        .to_string();
    text = Regex::new(r"\[([^\]]+)\]\([^)]+\)")
        .unwrap()
        .replace_all(&text, "$1")
        .to_string();
    // Heading, quote and list markers
    text = Regex::new(r"(?m)^\s{0,3}#{1,6}\s+")
        .unwrap()
        .replace_all(&text, "")
        .to_string();
    text = Regex::new(r"(?m)^\s{0,3}>\s+")
        .unwrap()
        .replace_all(&text, "")
        .to_string();
    text = Regex::new(r"(?m)^\s{0,3}[-*+]\s+")
        .unwrap()
        .replace_all(&text, "")
        .to_string();
    text = Regex::new(r"(?m)^\s{0,3}\d+\.\s+")
        .unwrap()
        .replace_all(&text, "")
        .to_string();
    // Emphasis markers
    text = Regex::new(r"\*\*([^*]+)\*\*")
        .unwrap()
        .replace_all(&text, "$1")
        .to_string();
    text = Regex::new(r"__([^_]+)__")
        .unwrap()
        .replace_all(&text, "$1")
        .to_string();
    text = Regex::new(r"\*([^*]+)\*")
        .unwrap()
        .replace_all(&text, "$1")
        .to_string();
    text = Regex::new(r"_([^_]+)_")
        .unwrap()
        .replace_all(&text, "$1")
        .to_string();
    text = Regex::new(r"~~([^~]+)~~")
        .unwrap()
        .replace_all(&text, "$1")
        .to_string();
    // Table separators and rules
    text = text.replace('|', " ");
    text = Regex::new(r"-{3,}")
        .unwrap()
        .replace_all(&text, " ")
        .to_string();
    // Collapse whitespace
    Regex::new(r"\s+")
        .unwrap()
        .replace_all(&text, " ")
        .trim()
        .to_string()
}

/// Strip either HTML or markdown depending on what the content looks like
pub fn strip_rich_text(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    if looks_like_html(content) {
        strip_html(content)
    } else {
        strip_markdown(content)
    }
}

/// Whether the content appears to be HTML markup
pub fn looks_like_html(content: &str) -> bool {
    Regex::new(r"<[^>]+>").unwrap().is_match(content)
}

/// Count visible characters, excluding markup and whitespace
pub fn count_words(content: &str) -> usize {
    strip_rich_text(content)
        .chars()
        .filter(|c| !c.is_whitespace())
        .count()
}

/// Plain-text excerpt truncated to `max_length` characters
pub fn excerpt(content: &str, max_length: usize) -> String {
    let text = strip_rich_text(content);
    if text.chars().count() <= max_length {
        return text;
    }
    let truncated: String = text.chars().take(max_length).collect();
    format!("{}...", truncated)
}

/// Humanized label for a draft's save time, relative to `now_ms`
pub fn format_saved_time(saved_at_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(saved_at_ms);

    if diff < 60 * 1000 {
        return "just now".to_string();
    }

    if diff < 60 * 60 * 1000 {
        let minutes = diff / (60 * 1000);
        return format!("{} minutes ago", minutes);
    }

    let saved: DateTime<Utc> = DateTime::from_timestamp_millis(saved_at_ms).unwrap_or_default();
    let now: DateTime<Utc> = DateTime::from_timestamp_millis(now_ms).unwrap_or_default();

    if saved.date_naive() == now.date_naive() {
        return format!("today {}", saved.format("%H:%M"));
    }

    format!("{}/{} {}", saved.month(), saved.day(), saved.format("%H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_strip_markdown() {
        let md = "# Title\n\nSome **bold** and a [link](https://e.com).\n\n```\ncode\n```\n";
        assert_eq!(strip_markdown(md), "Title Some bold and a link.");
    }

    #[test]
    fn test_strip_rich_text_detects_html() {
        assert_eq!(strip_rich_text("<p>x</p>"), "x");
        assert_eq!(strip_rich_text("**x**"), "x");
    }

    #[test]
    fn test_count_words_ignores_markup_and_whitespace() {
        assert_eq!(count_words("<p>ab cd</p>"), 4);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_excerpt_truncates() {
        assert_eq!(excerpt("<p>short</p>", 200), "short");
        let long = "a".repeat(250);
        let result = excerpt(&long, 200);
        assert_eq!(result.chars().count(), 203);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_format_saved_time_buckets() {
        let base = 1_700_000_000_000i64;
        assert_eq!(format_saved_time(base, base + 30_000), "just now");
        assert_eq!(format_saved_time(base, base + 5 * 60_000), "5 minutes ago");

        // 1,700,000,000,000 ms is 2023-11-14T22:13:20Z; 90 minutes later is
        // still the same UTC day.
        let label = format_saved_time(base, base + 90 * 60_000);
        assert!(label.starts_with("today "), "got {}", label);

        let label = format_saved_time(base, base + 72 * 60 * 60_000);
        assert!(!label.starts_with("today"), "got {}", label);
    }
}
