//! Snipdeck - render, classify and copy Markdown code snippets.
//!
//! # Usage
//!
//! ```bash
//! snipdeck render snippet.md
//! snipdeck render --svg-dir out/ diagrams.md
//! snipdeck copy snippet.md | pbcopy
//! snipdeck classify --json snippet.md
//! ```

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use snipdeck::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use snipdeck::diagram::{DiagramOutput, DiagramRenderer, MermaidCli, NoDiagrams};
use snipdeck::fence::{Classification, copy_text, extract_first_fence};
use snipdeck::highlight::{HighlightBackground, set_background_mode};
use snipdeck::perf;
use snipdeck::render::{
    Block, RenderOptions, classify_document, document_text, print_blocks, render_markdown,
};

/// Render, classify and copy Markdown code snippets
#[derive(Parser, Debug)]
#[command(name = "snipdeck", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Force syntax highlight theme background (light or dark)
    #[arg(long, value_enum, global = true)]
    theme: Option<ThemeMode>,

    /// Enable performance logging
    #[arg(long, global = true)]
    perf: bool,

    /// Write render events (diagram failures etc.) to a file
    #[arg(long, value_name = "PATH", global = true)]
    render_debug_log: Option<PathBuf>,

    /// Show diagram sources instead of rendering them
    #[arg(long, global = true)]
    no_diagrams: bool,

    /// Mermaid CLI binary used to render diagrams
    #[arg(long, value_name = "PATH", global = true)]
    mmdc: Option<PathBuf>,

    /// Highlight shell blocks with syntect instead of the command colorizer
    #[arg(long, global = true)]
    plain_shell: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a snippet to the terminal
    Render {
        /// Markdown file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also write rendered diagrams as SVG files into this directory
        #[arg(long, value_name = "DIR")]
        svg_dir: Option<PathBuf>,
    },
    /// Print what the copy action copies: the first fenced block
    Copy {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// List every code block with its diagram/code classification
    Classify {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the snippet's plain text, as used for search
    Text {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn effective_flags(cli: &Cli, raw_args: &[String]) -> Result<ConfigFlags> {
    let global_path = global_config_path();
    let cli_flags = parse_flag_tokens(raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_override_path())?;
        global_flags.union(&local_flags)
    };
    Ok(file_flags.union(&cli_flags))
}

fn diagram_renderer(flags: &ConfigFlags, theme: ThemeMode) -> Box<dyn DiagramRenderer> {
    if flags.no_diagrams {
        return Box::new(NoDiagrams);
    }
    let program = flags.mmdc.clone().unwrap_or_else(|| PathBuf::from("mmdc"));
    let mermaid_theme = match theme {
        ThemeMode::Light => "default",
        ThemeMode::Auto | ThemeMode::Dark => "dark",
    };
    Box::new(MermaidCli::new(program).with_theme(mermaid_theme))
}

fn write_svgs(dir: &Path, blocks: &[Block]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let svgs = blocks.iter().filter_map(|block| match block {
        Block::Diagram {
            output: DiagramOutput::Svg(svg),
            ..
        } => Some(svg),
        _ => None,
    });
    for (index, svg) in svgs.enumerate() {
        let path = dir.join(format!("diagram-{}.svg", index + 1));
        fs::write(&path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote diagram");
    }
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode JSON")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let effective = effective_flags(&cli, &raw_args)?;

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("SNIPDECK_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            path = ?render_debug_log_path,
            error = %err,
            "failed to initialize render debug log"
        );
    }

    let theme = effective.theme.unwrap_or(ThemeMode::Auto);
    match theme {
        ThemeMode::Auto => set_background_mode(None),
        ThemeMode::Light => set_background_mode(Some(HighlightBackground::Light)),
        ThemeMode::Dark => set_background_mode(Some(HighlightBackground::Dark)),
    }

    match &cli.command {
        Command::Render { file, svg_dir } => {
            let source = read_source(file)?;
            let diagrams = diagram_renderer(&effective, theme);
            let options = RenderOptions {
                diagrams: diagrams.as_ref(),
                shell_colors: !effective.plain_shell,
            };
            let blocks = render_markdown(&source, &options);
            if let Some(dir) = svg_dir {
                write_svgs(dir, &blocks)?;
            }
            if effective.json {
                return print_json(&blocks);
            }
            let color = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
            let mut stdout = io::stdout().lock();
            print_blocks(&mut stdout, &blocks, color).context("Failed to write output")?;
            stdout.flush().context("Failed to write output")
        }
        Command::Copy { file } => {
            let source = read_source(file)?;
            if effective.json {
                return print_json(&extract_first_fence(&source));
            }
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(copy_text(&source).as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write output")
        }
        Command::Classify { file } => {
            let source = read_source(file)?;
            let classifications = classify_document(&source);
            if effective.json {
                return print_json(&classifications);
            }
            for (index, classification) in classifications.iter().enumerate() {
                let (kind, detail) = match classification {
                    Classification::Diagram { spec } => ("diagram", spec.lines().next().unwrap_or("")),
                    Classification::Code { language_hint, .. } => {
                        ("code", language_hint.as_deref().unwrap_or("-"))
                    }
                };
                println!("{}\t{kind}\t{detail}", index + 1);
            }
            Ok(())
        }
        Command::Text { file } => {
            let source = read_source(file)?;
            print!("{}", document_text(&source));
            Ok(())
        }
    }
}
