//! Syntax highlighting for code blocks.
//!
//! Uses syntect for highlighting with Sublime Text syntax definitions.

use std::sync::{Mutex, OnceLock};

use serde::Serialize;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// A 24-bit foreground colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A run of code text with an optional foreground colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub text: String,
    pub fg: Option<Rgb>,
}

impl HighlightSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fg: None,
        }
    }
}

/// Highlight `code` as `language`, one span list per line.
///
/// Unknown or missing languages come back as uncoloured lines.
pub fn highlight_code(language: Option<&str>, code: &str) -> Vec<Vec<HighlightSpan>> {
    let syntax_set = syntax_set();
    let mode = background_mode();
    let syntax = language
        .and_then(|lang| syntax_set.find_syntax_by_token(lang))
        .or_else(|| language.and_then(|lang| syntax_set.find_syntax_by_name(lang)));

    let Some(syntax) = syntax else {
        tracing::debug!(?language, "no syntax found, rendering plain");
        return code
            .lines()
            .map(|line| vec![HighlightSpan::plain(line)])
            .collect();
    };

    let mut lines = Vec::new();
    let mut highlighter = HighlightLines::new(syntax, theme());
    // The newline syntax set needs each line with its ending attached.
    for line in LinesWithEndings::from(code) {
        let ranges = highlighter
            .highlight_line(line, syntax_set)
            .unwrap_or_default();
        let spans = ranges
            .into_iter()
            .filter_map(|(style, text)| {
                let text = strip_line_ending(text);
                if text.is_empty() {
                    return None;
                }
                let fg = Rgb {
                    r: style.foreground.r,
                    g: style.foreground.g,
                    b: style.foreground.b,
                };
                Some(HighlightSpan {
                    text: text.to_string(),
                    fg: Some(adjust_fg_for_background(fg, mode)),
                })
            })
            .collect();
        lines.push(spans);
    }

    lines
}

fn strip_line_ending(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.syntax_set.load_defaults");
        SyntaxSet::load_defaults_newlines()
    })
}

fn theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.theme.load_defaults");
        let theme_set = ThemeSet::load_defaults();
        let preferred = match background_mode() {
            BackgroundMode::Dark => [
                "Monokai Extended",
                "base16-monokai.dark",
                "base16-ocean.dark",
            ]
            .as_slice(),
            BackgroundMode::Light => ["InspiredGitHub", "base16-ocean.light"].as_slice(),
        };

        for name in preferred {
            if let Some(theme) = theme_set.themes.get(*name) {
                return theme.clone();
            }
        }

        theme_set
            .themes
            .values()
            .next()
            .cloned()
            .unwrap_or_default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<HighlightBackground>>> = OnceLock::new();

pub fn set_background_mode(mode: Option<HighlightBackground>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

fn background_mode() -> BackgroundMode {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock()
        && let Some(mode) = *guard
    {
        return match mode {
            HighlightBackground::Light => BackgroundMode::Light,
            HighlightBackground::Dark => BackgroundMode::Dark,
        };
    }
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    let Ok(bg) = bg_str.parse::<u8>() else {
        return BackgroundMode::Dark;
    };

    if bg >= 7 {
        BackgroundMode::Light
    } else {
        BackgroundMode::Dark
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn adjust_fg_for_background(color: Rgb, mode: BackgroundMode) -> Rgb {
    match mode {
        BackgroundMode::Dark => color,
        BackgroundMode::Light => {
            let luma = 0.0722f32.mul_add(
                f32::from(color.b),
                0.2126f32.mul_add(f32::from(color.r), 0.7152 * f32::from(color.g)),
            );
            if luma < 155.0 {
                return color;
            }

            Rgb {
                r: (f32::from(color.r) * 0.42).round() as u8,
                g: (f32::from(color.g) * 0.42).round() as u8,
                b: (f32::from(color.b) * 0.42).round() as u8,
            }
        }
    }
}
