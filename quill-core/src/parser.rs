//! Markdown parser for converting post content to an AST
//!
//! Line-oriented block parsing with a small inline pass, covering the
//! constructs the reader and editor surfaces need. Not a full CommonMark
//! implementation.

use crate::ast::{Node, NodeType, Tree};
use regex::Regex;

/// Markdown parser for converting text to an AST
pub struct MarkdownParser {
    heading_re: Regex,
    ordered_item_re: Regex,
    link_re: Regex,
    image_re: Regex,
}

impl MarkdownParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self {
            heading_re: Regex::new(r"^(#{1,6})\s+(.*)$").unwrap(),
            ordered_item_re: Regex::new(r"^\s*\d+\.\s").unwrap(),
            link_re: Regex::new(r"^\[([^\]]*)\]\(([^)]*)\)").unwrap(),
            image_re: Regex::new(r"^!\[([^\]]*)\]\(([^)]*)\)").unwrap(),
        }
    }

    /// Parse markdown text into a tree
    pub fn parse(&self, markdown: &str) -> Tree {
        let mut tree = Tree::new();
        let lines = markdown.lines().collect::<Vec<_>>();

        let mut line_index = 0;
        while line_index < lines.len() {
            line_index += self.parse_block(&mut tree.root, &lines, line_index);
        }

        tree
    }

    /// Parse a block element starting at the given line index.
    /// Returns the number of lines consumed.
    fn parse_block(&self, parent: &mut Node, lines: &[&str], start_index: usize) -> usize {
        let line = lines[start_index].trim_end();

        // Empty line
        if line.trim().is_empty() {
            return 1;
        }

        // Heading
        if let Some(heading) = self.parse_heading(line, start_index) {
            parent.append_child(heading);
            return 1;
        }

        // Fenced code block
        if line.trim_start().starts_with("```") {
            return self.parse_code_block(parent, lines, start_index);
        }

        // Blockquote
        if line.starts_with("> ") {
            return self.parse_blockquote(parent, lines, start_index);
        }

        // List
        if self.is_list_item(line) {
            return self.parse_list(parent, lines, start_index);
        }

        // Thematic break
        if is_thematic_break(line) {
            let mut hr = Node::new(NodeType::ThematicBreak);
            hr.line = Some(start_index);
            parent.append_child(hr);
            return 1;
        }

        // Default: paragraph
        self.parse_paragraph(parent, lines, start_index)
    }

    /// Parse an ATX heading, stripping trailing marker characters
    fn parse_heading(&self, line: &str, line_index: usize) -> Option<Node> {
        let captures = self.heading_re.captures(line.trim())?;
        let level = captures.get(1).unwrap().as_str().len() as u8;
        let text = strip_closing_markers(captures.get(2).unwrap().as_str());

        let mut heading = Node::new(NodeType::Heading);
        heading.level = Some(level);
        heading.line = Some(line_index);
        self.parse_inline_content(&mut heading, &text);

        Some(heading)
    }

    /// Parse a fenced code block
    fn parse_code_block(&self, parent: &mut Node, lines: &[&str], start_index: usize) -> usize {
        let first_line = lines[start_index].trim_start();
        let language = first_line.strip_prefix("```").unwrap_or("").trim();

        let mut code_block = Node::new(NodeType::CodeBlock);
        code_block.line = Some(start_index);
        if !language.is_empty() {
            code_block.set_attribute("class", &format!("language-{}", language));
        }

        let mut content_lines = Vec::new();
        let mut line_index = start_index + 1;

        while line_index < lines.len() {
            if lines[line_index].trim() == "```" {
                break;
            }
            content_lines.push(lines[line_index]);
            line_index += 1;
        }

        code_block.data = content_lines.join("\n");
        parent.append_child(code_block);
        line_index - start_index + 1
    }

    /// Parse a blockquote by re-parsing its stripped content
    fn parse_blockquote(&self, parent: &mut Node, lines: &[&str], start_index: usize) -> usize {
        let mut blockquote = Node::new(NodeType::Blockquote);
        blockquote.line = Some(start_index);
        let mut quote_lines = Vec::new();
        let mut line_index = start_index;

        while line_index < lines.len() {
            let line = lines[line_index];
            if let Some(stripped) = line.strip_prefix("> ") {
                quote_lines.push(stripped);
                line_index += 1;
            } else if line.trim().is_empty()
                && line_index + 1 < lines.len()
                && lines[line_index + 1].starts_with("> ")
            {
                quote_lines.push("");
                line_index += 1;
            } else {
                break;
            }
        }

        let quote_content = quote_lines.join("\n");
        let quote_tree = self.parse(&quote_content);
        for child in quote_tree.root.children {
            blockquote.append_child(child);
        }

        parent.append_child(blockquote);
        line_index - start_index
    }

    /// Check if a line is a list item
    fn is_list_item(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        if trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ") {
            return true;
        }
        self.ordered_item_re.is_match(trimmed)
    }

    /// Parse a list and its items
    fn parse_list(&self, parent: &mut Node, lines: &[&str], start_index: usize) -> usize {
        let mut list = Node::new(NodeType::List);
        list.line = Some(start_index);
        let first_line = lines[start_index].trim_start();

        if first_line.starts_with("- ")
            || first_line.starts_with("* ")
            || first_line.starts_with("+ ")
        {
            list.set_attribute("type", "unordered");
        } else {
            list.set_attribute("type", "ordered");
        }

        let mut line_index = start_index;

        while line_index < lines.len() {
            let line = lines[line_index];
            if !self.is_list_item(line) {
                break;
            }

            let trimmed = line.trim_start();
            let content = if trimmed.starts_with("- ")
                || trimmed.starts_with("* ")
                || trimmed.starts_with("+ ")
            {
                trimmed[2..].to_string()
            } else {
                self.ordered_item_re.replace(line, "").to_string()
            };

            let mut list_item = Node::new(NodeType::ListItem);
            self.parse_inline_content(&mut list_item, &content);
            list.append_child(list_item);
            line_index += 1;
        }

        parent.append_child(list);
        line_index - start_index
    }

    /// Parse a paragraph, consuming lines until a blank line or new block
    fn parse_paragraph(&self, parent: &mut Node, lines: &[&str], start_index: usize) -> usize {
        let mut paragraph = Node::new(NodeType::Paragraph);
        paragraph.line = Some(start_index);
        let mut paragraph_lines = Vec::new();
        let mut line_index = start_index;

        while line_index < lines.len() {
            let line = lines[line_index];
            if line.trim().is_empty() {
                break;
            }
            if line_index > start_index && self.starts_block(line) {
                break;
            }
            paragraph_lines.push(line);
            line_index += 1;
        }

        let content = paragraph_lines.join(" ");
        self.parse_inline_content(&mut paragraph, &content);

        parent.append_child(paragraph);
        line_index - start_index
    }

    /// Check if a line starts a new block element
    fn starts_block(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.starts_with('#')
            || trimmed.starts_with("```")
            || trimmed.starts_with("> ")
            || self.is_list_item(line)
            || is_thematic_break(line)
    }

    /// Parse inline content (emphasis, code, links)
    fn parse_inline_content(&self, parent: &mut Node, text: &str) {
        let mut remaining = text;

        while !remaining.is_empty() {
            if let Some((element, consumed)) = self.parse_next_inline(remaining) {
                parent.append_child(element);
                remaining = &remaining[consumed..];
            } else {
                // No inline element found, take one character as text
                let ch = remaining.chars().next().unwrap();
                match parent.children.last_mut() {
                    Some(last) if last.node_type == NodeType::Text => last.data.push(ch),
                    _ => parent.append_child(Node::text(&ch.to_string())),
                }
                remaining = &remaining[ch.len_utf8()..];
            }
        }
    }

    /// Parse the next inline element from the text
    fn parse_next_inline(&self, text: &str) -> Option<(Node, usize)> {
        // Strong (**text** or __text__)
        for delimiter in ["**", "__"] {
            if let Some((content, end)) = find_delimiter_pair(text, delimiter) {
                let mut strong = Node::new(NodeType::Strong);
                self.parse_inline_content(&mut strong, &content);
                return Some((strong, end));
            }
        }

        // Emphasis (*text* or _text_)
        for delimiter in ["*", "_"] {
            if let Some((content, end)) = find_delimiter_pair(text, delimiter) {
                let mut emph = Node::new(NodeType::Emph);
                self.parse_inline_content(&mut emph, &content);
                return Some((emph, end));
            }
        }

        // Inline code (`code`)
        if let Some((content, end)) = find_delimiter_pair(text, "`") {
            let mut code = Node::new(NodeType::Code);
            code.data = content;
            return Some((code, end));
        }

        // Images ![alt](url), checked before links
        if text.starts_with("![") {
            if let Some(captures) = self.image_re.captures(text) {
                let mut image = Node::new(NodeType::Image);
                image.set_attribute("src", captures.get(2).unwrap().as_str());
                image.set_attribute("alt", captures.get(1).unwrap().as_str());
                return Some((image, captures.get(0).unwrap().as_str().len()));
            }
        }

        // Links [text](url)
        if text.starts_with('[') {
            if let Some(captures) = self.link_re.captures(text) {
                let mut link = Node::new(NodeType::Link);
                link.set_attribute("href", captures.get(2).unwrap().as_str());
                self.parse_inline_content(&mut link, captures.get(1).unwrap().as_str());
                return Some((link, captures.get(0).unwrap().as_str().len()));
            }
        }

        None
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Find a delimiter pair (e.g. **strong**, *emph*)
fn find_delimiter_pair(text: &str, delimiter: &str) -> Option<(String, usize)> {
    if !text.starts_with(delimiter) {
        return None;
    }

    let content_start = delimiter.len();
    let end_pos = text[content_start..].find(delimiter)?;
    if end_pos == 0 {
        return None;
    }

    let content = text[content_start..content_start + end_pos].to_string();
    Some((content, content_start + end_pos + delimiter.len()))
}

/// Check if a line is a thematic break (---, ***, ___)
fn is_thematic_break(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3
        && (trimmed.chars().all(|c| c == '-')
            || trimmed.chars().all(|c| c == '*')
            || trimmed.chars().all(|c| c == '_'))
}

/// Strip a trailing ATX marker run and surrounding whitespace from heading
/// text. The run only counts as a closing sequence when whitespace (or
/// nothing) precedes it, so text like "C#" keeps its marker.
pub(crate) fn strip_closing_markers(text: &str) -> String {
    let trimmed = text.trim();
    let without = trimmed.trim_end_matches('#');
    if without.len() != trimmed.len()
        && (without.is_empty() || without.ends_with(char::is_whitespace))
    {
        without.trim_end().to_string()
    } else {
        trimmed.to_string()
    }
}
