//! Saved default flags.
//!
//! Defaults are stored as command-line flags, one or more per line, in a
//! global config file with an optional `.snipdeckrc` override in the
//! working directory. Flags given on the command line win over both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub perf: bool,
    pub json: bool,
    pub no_diagrams: bool,
    pub plain_shell: bool,
    pub theme: Option<ThemeMode>,
    pub mmdc: Option<PathBuf>,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches add up, valued options from
    /// `other` replace ours.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            perf: self.perf || other.perf,
            json: self.json || other.json,
            no_diagrams: self.no_diagrams || other.no_diagrams,
            plain_shell: self.plain_shell || other.plain_shell,
            theme: other.theme.or(self.theme),
            mmdc: other.mmdc.clone().or_else(|| self.mmdc.clone()),
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("snipdeck").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("snipdeck")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("snipdeck").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("snipdeck")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".snipdeckrc")
}

/// Read saved flags; a missing file means no saved flags.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// # Errors
///
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# snipdeck defaults (saved with --save)".to_string()];
    let switches = [
        (flags.perf, "--perf"),
        (flags.json, "--json"),
        (flags.no_diagrams, "--no-diagrams"),
        (flags.plain_shell, "--plain-shell"),
    ];
    lines.extend(
        switches
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, flag)| (*flag).to_string()),
    );
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    if let Some(path) = &flags.mmdc {
        lines.push(format!("--mmdc {}", path.display()));
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of a token list; everything else is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--perf" => flags.perf = true,
            "--json" => flags.json = true,
            "--no-diagrams" => flags.no_diagrams = true,
            "--plain-shell" => flags.plain_shell = true,
            "--theme" | "--mmdc" | "--render-debug-log" => {
                if let Some(next) = tokens.get(i + 1) {
                    apply_value(&mut flags, token, next);
                    i += 1;
                }
            }
            _ => {
                if let Some((name, value)) = token.split_once('=') {
                    apply_value(&mut flags, name, value);
                }
            }
        }
        i += 1;
    }
    flags
}

fn apply_value(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--theme" => flags.theme = parse_theme(value),
        "--mmdc" => flags.mmdc = Some(PathBuf::from(value)),
        "--render-debug-log" => flags.render_debug_log = Some(PathBuf::from(value)),
        _ => {}
    }
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = tokens(&[
            "snipdeck",
            "render",
            "--json",
            "--no-diagrams",
            "--theme",
            "dark",
            "--mmdc=/opt/mmdc",
            "--render-debug-log=render.log",
            "snippet.md",
        ]);
        let flags = parse_flag_tokens(&args);
        assert!(flags.json);
        assert!(flags.no_diagrams);
        assert!(!flags.plain_shell);
        assert_eq!(flags.theme, Some(ThemeMode::Dark));
        assert_eq!(flags.mmdc, Some(PathBuf::from("/opt/mmdc")));
        assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
    }

    #[test]
    fn test_unknown_theme_is_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--theme", "sepia"]));
        assert_eq!(flags.theme, None);
    }

    #[test]
    fn test_trailing_valued_flag_without_value() {
        let flags = parse_flag_tokens(&tokens(&["--perf", "--mmdc"]));
        assert!(flags.perf);
        assert_eq!(flags.mmdc, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            perf: true,
            theme: Some(ThemeMode::Light),
            mmdc: Some(PathBuf::from("mmdc")),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            json: true,
            theme: Some(ThemeMode::Dark),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.perf);
        assert!(merged.json);
        assert_eq!(merged.theme, Some(ThemeMode::Dark));
        assert_eq!(merged.mmdc, Some(PathBuf::from("mmdc")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            perf: true,
            json: true,
            no_diagrams: true,
            plain_shell: true,
            theme: Some(ThemeMode::Light),
            mmdc: Some(PathBuf::from("/usr/local/bin/mmdc")),
            render_debug_log: Some(PathBuf::from("render.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
