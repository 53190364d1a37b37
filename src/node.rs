//! Rendered node trees.
//!
//! A [`Node`] is what the Markdown renderer hands back: text and number
//! leaves, ordered sequences, and elements that wrap a single child node
//! together with a tag and an optional class name. Trees are plain values;
//! nothing in them is shared or mutated after construction.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// A node of a rendered markup tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawNode")]
pub enum Node {
    /// A text leaf.
    Text(String),
    /// A numeric leaf.
    Number(f64),
    /// An ordered run of sibling nodes.
    Sequence(Vec<Node>),
    /// A tagged element wrapping child content.
    Element(Element),
    /// Anything else (null, booleans, unknown shapes). Contributes no text.
    #[default]
    Empty,
}

/// An element node: tag, optional class name and child content.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Element {
    #[serde(deserialize_with = "null_as_empty")]
    pub tag: String,
    #[serde(rename = "className", alias = "class_name")]
    pub class_name: Option<String>,
    pub children: Box<Node>,
}

/// Shape-based decoding of untyped trees (e.g. JSON dumps of a DOM).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNode {
    Text(String),
    Number(f64),
    Sequence(Vec<Node>),
    Element(Element),
    Other(IgnoredAny),
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        match raw {
            RawNode::Text(text) => Self::Text(text),
            RawNode::Number(value) => Self::Number(value),
            RawNode::Sequence(nodes) => Self::Sequence(nodes),
            RawNode::Element(element) => Self::Element(element),
            RawNode::Other(_) => Self::Empty,
        }
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn element(tag: &str, class_name: Option<&str>, children: Self) -> Self {
        Self::Element(Element::new(tag, class_name, children))
    }

    /// Returns the element if this node is one.
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl Element {
    pub fn new(tag: &str, class_name: Option<&str>, children: Node) -> Self {
        Self {
            tag: tag.to_string(),
            class_name: class_name.map(ToString::to_string),
            children: Box::new(children),
        }
    }

    /// The class name, or an empty string when absent.
    pub fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or("")
    }

    /// The first child that would actually render.
    ///
    /// Empty nodes are skipped, so `[null, <code>]` yields the `code` element.
    pub fn first_child(&self) -> Option<&Node> {
        match self.children.as_ref() {
            Node::Sequence(nodes) => nodes.iter().find(|node| !matches!(node, Node::Empty)),
            Node::Empty => None,
            node => Some(node),
        }
    }
}

/// Flatten a node tree into plain text.
///
/// Leaves are concatenated in document order with no separators and no
/// whitespace normalization. Element metadata is ignored and empty nodes
/// contribute nothing.
pub fn extract_text(node: &Node) -> String {
    let mut text = String::new();
    extract_text_into(node, &mut text);
    text
}

fn extract_text_into(node: &Node, text: &mut String) {
    match node {
        Node::Text(leaf) => text.push_str(leaf),
        Node::Number(value) => text.push_str(&number_to_string(*value)),
        Node::Sequence(nodes) => {
            for child in nodes {
                extract_text_into(child, text);
            }
        }
        Node::Element(element) => extract_text_into(&element.children, text),
        Node::Empty => {}
    }
}

/// Stringify a number the way markup renderers print numeric children:
/// integral values have no fractional part, and very large or very small
/// magnitudes use exponent form (`1e+21`, `1e-7`).
fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value.is_sign_positive() { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        };
    }
    format!("{value}")
}
