//! Snippet rendering pipeline.
//!
//! Markdown → node tree → one [`Block`] per run of prose or code block.
//! Each `pre` element is classified; diagrams go to the diagram renderer
//! and everything else to the highlighter.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};
use serde::Serialize;

use crate::colorize::{colorize_cli, to_lines};
use crate::diagram::{DiagramOutput, DiagramRenderer, render_diagram};
use crate::fence::{Classification, classify_block, has_lang};
use crate::highlight::{HighlightSpan, highlight_code};
use crate::markdown::{combined_class, pre_blocks, to_node};
use crate::node::{Element, Node, extract_text};

/// Languages routed through the shell command colorizer.
pub const SHELL_LANGS: &[&str] = &["bash", "sh", "shell", "zsh", "console"];

/// Tags that end a line of prose.
const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "tr", "hr", "br", "table",
    "ul", "ol",
];

pub struct RenderOptions<'r> {
    pub diagrams: &'r dyn DiagramRenderer,
    /// Colour shell blocks with the command colorizer instead of syntect.
    pub shell_colors: bool,
}

/// A rendered piece of a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Prose {
        text: String,
    },
    Code {
        language: Option<String>,
        lines: Vec<Vec<HighlightSpan>>,
    },
    Diagram {
        source: String,
        output: DiagramOutput,
    },
}

/// Render a Markdown snippet into blocks.
pub fn render_markdown(markdown: &str, options: &RenderOptions<'_>) -> Vec<Block> {
    let _scope = crate::perf::scope("render.markdown");
    let tree = to_node(markdown);
    let mut walker = Walker {
        options,
        blocks: Vec::new(),
        prose: String::new(),
    };
    walker.walk(&tree);
    walker.flush_prose();
    walker.blocks
}

/// Classify every code block of a snippet, in document order.
pub fn classify_document(markdown: &str) -> Vec<Classification> {
    let tree = to_node(markdown);
    pre_blocks(&tree)
        .into_iter()
        .map(|pre| classify_block(&combined_class(pre), &extract_text(&pre.children)))
        .collect()
}

/// Plain text of a whole snippet, for search indexing.
pub fn document_text(markdown: &str) -> String {
    extract_text(&to_node(markdown))
}

struct Walker<'o, 'r> {
    options: &'o RenderOptions<'r>,
    blocks: Vec<Block>,
    prose: String,
}

impl Walker<'_, '_> {
    fn walk(&mut self, node: &Node) {
        match node {
            Node::Element(element) if element.tag == "pre" => {
                self.flush_prose();
                let block = self.code_block(element);
                self.blocks.push(block);
            }
            Node::Element(element) => {
                self.walk(&element.children);
                if BLOCK_TAGS.contains(&element.tag.as_str()) && !self.prose.ends_with('\n') {
                    self.prose.push('\n');
                }
            }
            Node::Sequence(nodes) => {
                for child in nodes {
                    self.walk(child);
                }
            }
            leaf => self.prose.push_str(&extract_text(leaf)),
        }
    }

    fn code_block(&self, pre: &Element) -> Block {
        let class_name = combined_class(pre);
        let raw = extract_text(&pre.children);
        match classify_block(&class_name, &raw) {
            Classification::Diagram { spec } => {
                tracing::debug!(class_name = %class_name, "rendering diagram block");
                let output = render_diagram(self.options.diagrams, &spec);
                Block::Diagram {
                    source: spec,
                    output,
                }
            }
            Classification::Code {
                text,
                language_hint,
            } => {
                let lines = if self.options.shell_colors && has_lang(&class_name, SHELL_LANGS) {
                    to_lines(&colorize_cli(text.trim_end_matches('\n')))
                } else {
                    highlight_code(language_hint.as_deref(), &text)
                };
                Block::Code {
                    language: language_hint,
                    lines,
                }
            }
        }
    }

    fn flush_prose(&mut self) {
        let text = self.prose.trim();
        if !text.is_empty() {
            self.blocks.push(Block::Prose {
                text: text.to_string(),
            });
        }
        self.prose.clear();
    }
}

/// Write blocks to a terminal, with colour when `color` is set.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn print_blocks(out: &mut impl Write, blocks: &[Block], color: bool) -> io::Result<()> {
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        match block {
            Block::Prose { text } => writeln!(out, "{text}")?,
            Block::Code { language, lines } => {
                writeln!(out, "┌ {} ", language.as_deref().unwrap_or("code"))?;
                for spans in lines {
                    write!(out, "│ ")?;
                    for span in spans {
                        match span.fg {
                            Some(fg) if color => {
                                let styled = span.text.as_str().with(Color::Rgb {
                                    r: fg.r,
                                    g: fg.g,
                                    b: fg.b,
                                });
                                write!(out, "{styled}")?;
                            }
                            _ => write!(out, "{}", span.text)?,
                        }
                    }
                    writeln!(out)?;
                }
                writeln!(out, "└")?;
            }
            Block::Diagram { output, .. } => match output {
                DiagramOutput::Blank => {}
                DiagramOutput::Svg(svg) => {
                    writeln!(out, "[diagram: {} bytes of SVG]", svg.len())?;
                }
                DiagramOutput::Fallback(text) if color => {
                    writeln!(out, "{}", text.as_str().dim())?;
                }
                DiagramOutput::Fallback(text) => writeln!(out, "{text}")?,
            },
        }
    }
    Ok(())
}
