use super::*;

use pagebridge_protocols::{SelectorRole, SelectorSet, SiteProfile};

fn site(platform: &str) -> SiteProfile {
    SiteProfile {
        platform: platform.to_string(),
        hosts: vec![format!("{platform}.example")],
        post_containers: vec![],
        fallback_containers: vec![],
        title: SelectorSet::new(SelectorRole::Title, ["h1"]),
        content: SelectorSet::new(SelectorRole::Content, ["article p"]),
        input: SelectorSet::new(SelectorRole::Input, ["textarea"]),
        heuristics: vec![],
        fill: Default::default(),
        rich_editor_markers: vec![],
        max_reply_chars: None,
    }
}

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_zero_timeout() {
    let mut config = Config::default();
    config.broker.timeout_ms = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "broker.timeout_ms"));
}

#[test]
fn test_validate_long_timeout_warning() {
    let mut config = Config::default();
    config.broker.timeout_ms = 120_000;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "broker.timeout_ms"));
}

#[test]
fn test_validate_empty_chrome_phrase() {
    let mut config = Config::default();
    config.extraction.chrome_phrases.push("  ".to_string());

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
}

#[test]
fn test_validate_empty_marker() {
    let mut config = Config::default();
    config.injection.marker = String::new();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "injection.marker"));
}

#[test]
fn test_validate_site_ok() {
    let mut config = Config::default();
    config.sites.push(site("forum"));

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_site_without_input() {
    let mut config = Config::default();
    let mut forum = site("forum");
    forum.input.candidates.clear();
    config.sites.push(forum);

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "sites[0].input"));
}

#[test]
fn test_validate_site_empty_platform() {
    let mut config = Config::default();
    config.sites.push(site(""));

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "sites[0].platform"));
}

#[test]
fn test_validate_duplicate_platform() {
    let mut config = Config::default();
    config.sites.push(site("forum"));
    config.sites.push(site("forum"));

    let result = ConfigValidator::validate(&config).unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "sites[1].platform");
}

#[test]
fn test_validate_site_warnings() {
    let mut config = Config::default();
    let mut bare = site("bare");
    bare.hosts.clear();
    bare.title.candidates.clear();
    bare.content.candidates.clear();
    config.sites.push(bare);

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 2);
}

#[test]
fn test_validate_zero_reply_limit() {
    let mut config = Config::default();
    let mut forum = site("forum");
    forum.max_reply_chars = Some(0);
    config.sites.push(forum);

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
}

#[test]
fn test_validation_result_default() {
    let result = ValidationResult::default();
    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}
