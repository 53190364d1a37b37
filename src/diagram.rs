//! Mermaid diagram rendering.
//!
//! Diagram text is handed to a [`DiagramRenderer`], which turns it into SVG.
//! The stock renderer shells out to the mermaid CLI (`mmdc`). Rendering can
//! fail on malformed input or a missing binary; [`render_diagram`] turns any
//! failure into a visible fallback that still shows the diagram source.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use serde::Serialize;
use thiserror::Error;

/// First line of the text shown in place of a diagram that failed to render.
pub const FALLBACK_MARKER: &str = "[Mermaid render failed]";

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("diagram rendering is disabled")]
    Disabled,
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("diagram scratch file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can turn diagram text into SVG.
pub trait DiagramRenderer {
    /// Render `source` to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed or the renderer is
    /// unavailable.
    fn render(&self, source: &str) -> Result<String, DiagramError>;
}

/// Renders through the mermaid CLI.
#[derive(Debug, Clone)]
pub struct MermaidCli {
    program: PathBuf,
    leading_args: Vec<String>,
    theme: String,
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new("mmdc")
    }
}

impl MermaidCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            theme: "dark".to_string(),
        }
    }

    /// Arguments placed before the mermaid flags, e.g.
    /// `npx -p @mermaid-js/mermaid-cli mmdc`.
    #[must_use]
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }
}

impl DiagramRenderer for MermaidCli {
    fn render(&self, source: &str) -> Result<String, DiagramError> {
        let _scope = crate::perf::scope("diagram.mmdc");
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("diagram.mmd");
        let output = scratch.path().join("diagram.svg");
        fs::write(&input, source)?;

        let program = self.program.display().to_string();
        let result = Command::new(&self.program)
            .args(&self.leading_args)
            .arg("--quiet")
            .arg("-t")
            .arg(&self.theme)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .output()
            .map_err(|source| DiagramError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(DiagramError::Failed {
                program,
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(fs::read_to_string(&output)?)
    }
}

/// Stand-in used when diagrams are switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagrams;

impl DiagramRenderer for NoDiagrams {
    fn render(&self, _source: &str) -> Result<String, DiagramError> {
        Err(DiagramError::Disabled)
    }
}

/// What to show for a diagram block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum DiagramOutput {
    /// Nothing to draw.
    Blank,
    /// Rendered SVG.
    Svg(String),
    /// Failure notice followed by the original source.
    Fallback(String),
}

/// Render a diagram, falling back to its source text on failure.
pub fn render_diagram(renderer: &dyn DiagramRenderer, source: &str) -> DiagramOutput {
    let source = source.trim();
    if source.is_empty() {
        return DiagramOutput::Blank;
    }
    match renderer.render(source) {
        Ok(svg) => DiagramOutput::Svg(svg),
        Err(err) => {
            tracing::warn!(error = %err, "diagram render failed, showing source");
            crate::perf::log_event("diagram.render.error", format!("err={err}"));
            DiagramOutput::Fallback(format!("{FALLBACK_MARKER}\n{source}"))
        }
    }
}
