//! Fenced code block helpers.
//!
//! This module handles:
//! - Deciding whether a rendered code block is a diagram or code
//! - Pulling the first fenced block out of raw Markdown for copying
//! - Language tag lookups on class strings

mod classify;
mod extract;
mod patterns;

pub use classify::{
    Classification, FenceKind, classify_block, classify_fence, has_diagram_class, has_lang,
    language_hint, looks_like_diagram,
};
pub use extract::{FirstFence, copy_text, extract_first_fence};
pub use patterns::DIAGRAM_KEYWORDS;
