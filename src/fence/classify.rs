//! Diagram-or-code decision for rendered code blocks.
//!
//! Two independent signals mark a block as a diagram: an explicit
//! `language-mermaid` class token, and diagram syntax at the start of the
//! block text. The class wins when present; the keyword sniff covers blocks
//! whose class was stripped somewhere upstream. Anything else is code.

use serde::Serialize;

use super::patterns::{DIAGRAM_KEYWORD, LANGUAGE_TOKEN, MERMAID_CLASS};

/// Whether a block renders as a diagram or as highlighted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FenceKind {
    Diagram,
    Code,
}

impl FenceKind {
    pub const fn is_diagram(self) -> bool {
        matches!(self, Self::Diagram)
    }
}

/// A classified block together with the payload its renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Classification {
    Diagram {
        spec: String,
    },
    Code {
        text: String,
        language_hint: Option<String>,
    },
}

impl Classification {
    pub const fn kind(&self) -> FenceKind {
        match self {
            Self::Diagram { .. } => FenceKind::Diagram,
            Self::Code { .. } => FenceKind::Code,
        }
    }
}

/// True when the class string carries `language-mermaid` as a whole token.
pub fn has_diagram_class(class_name: &str) -> bool {
    MERMAID_CLASS.is_match(class_name)
}

/// True when the text opens with a diagram keyword such as `flowchart`.
///
/// Only the start of the text counts; `print('graph')` is not a diagram.
pub fn looks_like_diagram(raw_text: &str) -> bool {
    DIAGRAM_KEYWORD.is_match(raw_text.trim())
}

/// Classify a code block from its joined class names and flattened text.
pub fn classify_fence(class_name: &str, raw_text: &str) -> FenceKind {
    if has_diagram_class(class_name) || looks_like_diagram(raw_text) {
        FenceKind::Diagram
    } else {
        FenceKind::Code
    }
}

/// Classify a code block and attach its payload.
///
/// Diagrams carry the trimmed text; code keeps the text as given so
/// indentation and trailing newlines survive highlighting.
pub fn classify_block(class_name: &str, raw_text: &str) -> Classification {
    match classify_fence(class_name, raw_text) {
        FenceKind::Diagram => Classification::Diagram {
            spec: raw_text.trim().to_string(),
        },
        FenceKind::Code => Classification::Code {
            text: raw_text.to_string(),
            language_hint: language_hint(class_name),
        },
    }
}

/// The id of the first `language-<id>` token, if any.
pub fn language_hint(class_name: &str) -> Option<String> {
    LANGUAGE_TOKEN
        .captures(class_name)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

/// True when any of `langs` appears as a bare class token or as
/// `language-<lang>`.
pub fn has_lang(class_name: &str, langs: &[&str]) -> bool {
    let tokens: Vec<&str> = class_name.split_whitespace().collect();
    langs.iter().any(|lang| {
        tokens
            .iter()
            .any(|token| token == lang || token.strip_prefix("language-") == Some(*lang))
    })
}
