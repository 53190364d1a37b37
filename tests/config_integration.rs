use std::path::PathBuf;

use snipdeck::config::{ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".snipdeckrc");
    let content = r#"
# comment
--no-diagrams

--theme light
   
--mmdc=/opt/mermaid/bin/mmdc
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.no_diagrams);
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.mmdc, Some(PathBuf::from("/opt/mermaid/bin/mmdc")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".snipdeckrc");
    let content = "--plain-shell\n--theme light\n--render-debug-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "snipdeck".to_string(),
        "render".to_string(),
        "--theme".to_string(),
        "dark".to_string(),
        "--json".to_string(),
        "snippet.md".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.plain_shell, "file flags should remain enabled");
    assert!(effective.json, "cli flags should be applied");
    assert_eq!(effective.theme, Some(ThemeMode::Dark), "cli should override theme");
    assert_eq!(
        effective.render_debug_log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_missing_config_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}
