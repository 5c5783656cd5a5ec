//! HTML renderer for the content AST
//!
//! Converts a parsed tree to HTML for the reader view. Heading elements get
//! an `id` attribute from the same slug pass the outline uses, so fragment
//! navigation and outline clicks resolve to the same element.

use crate::ast::{Node, NodeType, Tree};
use crate::outline::{slugify, Outline};
use std::collections::HashMap;

/// Render options for controlling output
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Inject slug ids on heading elements (reader view); the editor's
    /// preview pane is not anchor-linkable and turns this off.
    pub heading_anchors: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_anchors: true,
        }
    }
}

/// HTML renderer for converting an AST to markup
pub struct HtmlRenderer {
    options: RenderOptions,
    output: String,
    slug_counts: HashMap<String, usize>,
}

impl HtmlRenderer {
    /// Create a new renderer
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            output: String::new(),
            slug_counts: HashMap::new(),
        }
    }

    /// Render a tree to HTML. Slug counters reset at the start of every
    /// call, matching the outline's per-pass semantics.
    pub fn render(&mut self, tree: &Tree) -> String {
        self.output.clear();
        self.slug_counts.clear();
        self.render_node(&tree.root);
        self.output.clone()
    }

    /// Render a tree and return the outline derived from the same pass
    pub fn render_with_outline(&mut self, tree: &Tree) -> (String, Outline) {
        (self.render(tree), Outline::from_tree(tree))
    }

    fn render_node(&mut self, node: &Node) {
        match node.node_type {
            NodeType::Document => {
                for child in &node.children {
                    self.render_node(child);
                }
            }

            NodeType::Paragraph => {
                self.output.push_str("<p>");
                for child in &node.children {
                    self.render_node(child);
                }
                self.output.push_str("</p>\n");
            }

            NodeType::Heading => {
                let level = node.level.unwrap_or(1);
                self.output.push_str(&format!("<h{}", level));
                if self.options.heading_anchors {
                    let id = self.allocate_heading_id(&node.text_content());
                    self.output
                        .push_str(&format!(" id=\"{}\"", html_escape(&id)));
                }
                self.output.push('>');
                for child in &node.children {
                    self.render_node(child);
                }
                self.output.push_str(&format!("</h{}>\n", level));
            }

            NodeType::CodeBlock => {
                self.output.push_str("<pre><code");
                if let Some(class) = node.get_attribute("class") {
                    self.output
                        .push_str(&format!(" class=\"{}\"", html_escape(class)));
                }
                self.output.push('>');
                self.output.push_str(&html_escape(&node.data));
                self.output.push_str("</code></pre>\n");
            }

            NodeType::Blockquote => {
                self.output.push_str("<blockquote>\n");
                for child in &node.children {
                    self.render_node(child);
                }
                self.output.push_str("</blockquote>\n");
            }

            NodeType::List => {
                let ordered_type = "ordered".to_string();
                let tag = if node.get_attribute("type") == Some(&ordered_type) {
                    "ol"
                } else {
                    "ul"
                };
                self.output.push_str(&format!("<{}>\n", tag));
                for child in &node.children {
                    self.render_node(child);
                }
                self.output.push_str(&format!("</{}>\n", tag));
            }

            NodeType::ListItem => {
                self.output.push_str("<li>");
                for child in &node.children {
                    self.render_node(child);
                }
                self.output.push_str("</li>\n");
            }

            NodeType::ThematicBreak => {
                self.output.push_str("<hr />\n");
            }

            NodeType::Text => {
                self.output.push_str(&html_escape(&node.data));
            }

            NodeType::Code => {
                self.output.push_str("<code>");
                self.output.push_str(&html_escape(&node.data));
                self.output.push_str("</code>");
            }

            NodeType::Emph => {
                self.output.push_str("<em>");
                for child in &node.children {
                    self.render_node(child);
                }
                self.output.push_str("</em>");
            }

            NodeType::Strong => {
                self.output.push_str("<strong>");
                for child in &node.children {
                    self.render_node(child);
                }
                self.output.push_str("</strong>");
            }

            NodeType::Link => {
                let href = node.get_attribute("href").cloned().unwrap_or_default();
                self.output
                    .push_str(&format!("<a href=\"{}\">", html_escape(&href)));
                for child in &node.children {
                    self.render_node(child);
                }
                self.output.push_str("</a>");
            }

            NodeType::Image => {
                let src = node.get_attribute("src").cloned().unwrap_or_default();
                let alt = node.get_attribute("alt").cloned().unwrap_or_default();
                self.output.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\" />",
                    html_escape(&src),
                    html_escape(&alt)
                ));
            }
        }
    }

    /// Allocate a heading id with the outline's collision rule
    fn allocate_heading_id(&mut self, text: &str) -> String {
        let base = match slugify(text) {
            s if s.is_empty() => "section".to_string(),
            s => s,
        };
        let count = self.slug_counts.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{}-{}", base, count)
        }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Escape HTML special characters
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MarkdownParser;

    #[test]
    fn test_heading_ids_match_outline_ids() {
        let content = "# Hello World\n\ntext\n## Hello World\n";
        let tree = MarkdownParser::new().parse(content);
        let (html, outline) = HtmlRenderer::default().render_with_outline(&tree);

        for entry in &outline.entries {
            assert!(
                html.contains(&format!("id=\"{}\"", entry.id)),
                "missing anchor for {}",
                entry.id
            );
        }
        assert!(html.contains("<h1 id=\"hello-world\">"));
        assert!(html.contains("<h2 id=\"hello-world-2\">"));
    }

    #[test]
    fn test_anchors_can_be_disabled() {
        let tree = MarkdownParser::new().parse("# Title");
        let html = HtmlRenderer::new(RenderOptions {
            heading_anchors: false,
        })
        .render(&tree);

        assert_eq!(html, "<h1>Title</h1>\n");
    }

    #[test]
    fn test_code_block_content_is_escaped() {
        let tree = MarkdownParser::new().parse("```html\n<b>&nbsp;</b>\n```");
        let html = HtmlRenderer::default().render(&tree);

        assert!(html.contains("&lt;b&gt;&amp;nbsp;&lt;/b&gt;"));
        assert!(html.contains("class=\"language-html\""));
    }

    #[test]
    fn test_repeated_render_calls_reset_counters() {
        let tree = MarkdownParser::new().parse("# Same\n# Same\n");
        let mut renderer = HtmlRenderer::default();

        let first = renderer.render(&tree);
        let second = renderer.render(&tree);
        assert_eq!(first, second);
        assert!(second.contains("id=\"same\""));
        assert!(second.contains("id=\"same-2\""));
    }

    #[test]
    fn test_inline_elements_render() {
        let tree = MarkdownParser::new().parse("Mix **bold** and [link](https://e.com).");
        let html = HtmlRenderer::default().render(&tree);

        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<a href=\"https://e.com\">link</a>"));
    }
}
