#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    clippy::module_name_repetitions
)]

//! # Snipdeck
//!
//! Render, classify and copy Markdown code snippets.
//!
//! A snippet is a short Markdown document, usually a sentence of context
//! and a fenced code block. Snipdeck renders it the way a snippet card
//! does:
//! - Fenced code is syntax highlighted
//! - Mermaid fences (tagged, or recognised by their first keyword) are
//!   rendered as diagrams, with the source shown when rendering fails
//! - Shell commands get a lighter, command-aware colouring
//! - "Copy" takes the first fenced block, or the whole snippet
//!
//! ## Modules
//!
//! - [`node`]: Rendered node trees and text extraction
//! - [`fence`]: Diagram/code classification and first-fence extraction
//! - [`markdown`]: Markdown to node tree (comrak)
//! - [`render`]: The rendering pipeline and terminal printer
//! - [`highlight`]: Syntax highlighting
//! - [`colorize`]: Shell command colouring
//! - [`diagram`]: Mermaid rendering with fallback
//! - [`config`]: Saved default flags

pub mod colorize;
pub mod config;
pub mod diagram;
pub mod fence;
pub mod highlight;
pub mod markdown;
pub mod node;
pub mod perf;
pub mod render;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::fence::{Classification, FenceKind, FirstFence, classify_fence, extract_first_fence};
    pub use crate::node::{Element, Node, extract_text};
    pub use crate::render::{Block, RenderOptions, render_markdown};
}
