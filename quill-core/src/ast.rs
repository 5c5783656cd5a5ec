//! AST structure for parsed post content
//!
//! The tree is rebuilt from scratch on every parse; block nodes remember
//! their source line so outline consumers can jump back into the document.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node types for the content AST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    // Document structure
    Document,

    // Block elements
    Paragraph,
    Heading,
    ThematicBreak,
    CodeBlock,
    Blockquote,
    List,
    ListItem,

    // Inline elements
    Text,
    Code,
    Emph,
    Strong,
    Link,
    Image,
}

/// AST node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Node type
    pub node_type: NodeType,

    /// Child nodes
    pub children: Vec<Node>,

    /// Raw text content (for Text and Code nodes)
    pub data: String,

    /// Node attributes (rendered as HTML attributes)
    pub attributes: HashMap<String, String>,

    /// Source line the node starts on (block nodes only, 0-based)
    pub line: Option<usize>,

    /// Heading level 1-6
    pub level: Option<u8>,
}

impl Node {
    /// Create a new node with the given type
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            children: Vec::new(),
            data: String::new(),
            attributes: HashMap::new(),
            line: None,
            level: None,
        }
    }

    /// Create a text node with content
    pub fn text(content: &str) -> Self {
        let mut node = Self::new(NodeType::Text);
        node.data = content.to_string();
        node
    }

    /// Add a child node
    pub fn append_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Set an attribute on the node
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        self.attributes.insert(key.to_string(), value.to_string());
    }

    /// Get an attribute value
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Concatenated text content of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text | NodeType::Code => out.push_str(&self.data),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

/// Parsed document tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    /// Root document node
    pub root: Node,
}

impl Tree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            root: Node::new(NodeType::Document),
        }
    }

    /// All heading nodes in document order
    pub fn headings(&self) -> Vec<&Node> {
        let mut found = Vec::new();
        Self::collect_headings(&self.root, &mut found);
        found
    }

    fn collect_headings<'a>(node: &'a Node, found: &mut Vec<&'a Node>) {
        if node.node_type == NodeType::Heading {
            found.push(node);
        }
        for child in &node.children {
            Self::collect_headings(child, found);
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut heading = Node::new(NodeType::Heading);
        heading.level = Some(1);
        heading.append_child(Node::text("Hello "));
        let mut strong = Node::new(NodeType::Strong);
        strong.append_child(Node::text("World"));
        heading.append_child(strong);

        assert_eq!(heading.text_content(), "Hello World");
    }

    #[test]
    fn test_headings_in_document_order() {
        let mut tree = Tree::new();
        let mut h1 = Node::new(NodeType::Heading);
        h1.level = Some(1);
        h1.append_child(Node::text("First"));
        tree.root.append_child(h1);

        let mut quote = Node::new(NodeType::Blockquote);
        let mut h2 = Node::new(NodeType::Heading);
        h2.level = Some(2);
        h2.append_child(Node::text("Nested"));
        quote.append_child(h2);
        tree.root.append_child(quote);

        let headings = tree.headings();
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text_content(), "First");
        assert_eq!(headings[1].text_content(), "Nested");
    }
}
