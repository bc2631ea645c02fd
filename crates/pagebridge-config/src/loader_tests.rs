use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

use pagebridge_protocols::{FillStrategyKind, SelectorRole};

#[test]
fn test_load_empty_config() {
    let config = ConfigLoader::load_str("").unwrap();
    assert_eq!(config.broker.timeout_ms, 5000);
}

#[test]
fn test_load_basic_config() {
    let content = r#"
        [broker]
        timeout_ms = 1500

        [logging]
        level = "debug"
        dir = "/tmp/pagebridge"
    "#;
    let config = ConfigLoader::load_str(content).unwrap();
    assert_eq!(config.broker.timeout_ms, 1500);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.dir.as_deref(), Some("/tmp/pagebridge"));
}

#[test]
fn test_load_site_profile() {
    let content = r#"
        [[sites]]
        platform = "forum"
        hosts = ["forum.example.org"]
        post_containers = ["article.topic"]
        fill = "rich_text"
        rich_editor_markers = [".ProseMirror"]
        max_reply_chars = 500

        [sites.title]
        role = "title"
        candidates = ["h1.topic-title"]

        [sites.content]
        role = "content"
        candidates = [".topic-body"]

        [sites.input]
        role = "input"
        candidates = ["div.reply [contenteditable]"]

        [[sites.heuristics]]
        kind = "paragraphs"
        selectors = ["article p"]
        min_chars = 40
    "#;
    let config = ConfigLoader::load_str(content).unwrap();
    assert_eq!(config.sites.len(), 1);
    let site = &config.sites[0];
    assert_eq!(site.platform, "forum");
    assert_eq!(site.title.role, SelectorRole::Title);
    assert_eq!(site.input.candidates, vec!["div.reply [contenteditable]".to_string()]);
    assert_eq!(site.fill, FillStrategyKind::RichText);
    assert_eq!(site.max_reply_chars, Some(500));
    assert_eq!(site.heuristics.len(), 1);
}

#[test]
fn test_load_duplicate_profiles_rejected() {
    let content = r#"
        [[sites]]
        platform = "forum"
        title = { role = "title", candidates = ["h1"] }
        content = { role = "content", candidates = ["p"] }
        input = { role = "input", candidates = ["textarea"] }

        [[sites]]
        platform = "forum"
        title = { role = "title", candidates = ["h2"] }
        content = { role = "content", candidates = ["p"] }
        input = { role = "input", candidates = ["textarea"] }
    "#;
    let err = ConfigLoader::load_str(content).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateProfile(ref p) if p == "forum"));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[broker]").unwrap();
    writeln!(file, "timeout_ms = 800").unwrap();

    let config = ConfigLoader::load(file.path()).unwrap();
    assert_eq!(config.broker.timeout_ms, 800);
}

#[test]
fn test_load_nonexistent_file() {
    let result = ConfigLoader::load(Path::new("/nonexistent/path/pagebridge.toml"));
    assert!(result.is_err());
}

#[test]
fn test_load_or_default_missing_file() {
    let config =
        ConfigLoader::load_or_default(Path::new("/nonexistent/path/pagebridge.toml")).unwrap();
    assert_eq!(config.broker.timeout_ms, 5000);
}

#[test]
fn test_load_invalid_toml() {
    let result = ConfigLoader::load_str("invalid = [unclosed");
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_expand_env_vars() {
    // SAFETY: This test runs in isolation and sets a unique test-only env var
    unsafe {
        std::env::set_var("PAGEBRIDGE_TEST_LEVEL", "trace");
    }
    let config = ConfigLoader::load_str("[logging]\nlevel = \"${PAGEBRIDGE_TEST_LEVEL}\"").unwrap();
    assert_eq!(config.logging.level, "trace");
    unsafe {
        std::env::remove_var("PAGEBRIDGE_TEST_LEVEL");
    }
}

#[test]
fn test_expand_env_vars_not_set() {
    let content = "value = \"${PAGEBRIDGE_NONEXISTENT_VAR_12345}\"";
    let result = ConfigLoader::expand_env_vars(content);
    assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
}

#[test]
fn test_expand_path_with_tilde() {
    let expanded = ConfigLoader::expand_path("~/logs");
    assert!(!expanded.starts_with('~'));
    assert!(expanded.ends_with("/logs"));
}

#[test]
fn test_expand_path_no_tilde() {
    assert_eq!(ConfigLoader::expand_path("/var/log"), "/var/log");
}
