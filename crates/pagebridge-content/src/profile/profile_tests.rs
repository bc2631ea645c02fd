use super::*;

use pagebridge_protocols::{SelectorRole, SelectorSet};

#[test]
fn test_builtin_profiles() {
    let registry = ProfileRegistry::new();
    let names: Vec<&str> = registry.profiles().map(|p| p.platform.as_str()).collect();
    assert_eq!(names, vec!["reddit", "twitter", "linkedin", "facebook", "generic"]);
}

#[test]
fn test_every_builtin_has_input_candidates() {
    for profile in ProfileRegistry::new().profiles() {
        assert!(!profile.input.is_empty(), "{} has no input", profile.platform);
        assert_eq!(profile.input.role, SelectorRole::Input);
        assert_eq!(profile.title.role, SelectorRole::Title);
        assert_eq!(profile.content.role, SelectorRole::Content);
    }
}

#[test]
fn test_for_url_by_host() {
    let registry = ProfileRegistry::new();
    assert_eq!(
        registry.for_url("https://www.reddit.com/r/rust/comments/abc/").platform,
        "reddit"
    );
    assert_eq!(registry.for_url("https://old.reddit.com/").platform, "reddit");
    assert_eq!(registry.for_url("https://x.com/someone/status/1").platform, "twitter");
    assert_eq!(registry.for_url("https://twitter.com/home").platform, "twitter");
    assert_eq!(
        registry.for_url("https://www.linkedin.com/feed/").platform,
        "linkedin"
    );
}

#[test]
fn test_for_url_unknown_host_is_generic() {
    let registry = ProfileRegistry::new();
    assert_eq!(registry.for_url("https://notreddit.com/").platform, "generic");
    assert_eq!(registry.for_url("https://blog.example.org/post").platform, "generic");
    assert_eq!(registry.for_url("not a url").platform, "generic");
}

#[test]
fn test_twitter_reply_limit() {
    let registry = ProfileRegistry::new();
    assert_eq!(registry.get("twitter").unwrap().max_reply_chars, Some(280));
}

#[test]
fn test_override_replaces_builtin() {
    let mut custom = builtin::reddit();
    custom.title = SelectorSet::new(SelectorRole::Title, ["h2.custom"]);
    let registry = ProfileRegistry::new().with_overrides([custom]);

    assert_eq!(registry.profiles().count(), 5);
    assert_eq!(
        registry.get("reddit").unwrap().title.candidates,
        vec!["h2.custom".to_string()]
    );
}

#[test]
fn test_override_adds_new_site() {
    let mut forum = builtin::generic();
    forum.platform = "forum".to_string();
    forum.hosts = vec!["forum.example.org".to_string()];
    let registry = ProfileRegistry::new().with_overrides([forum]);

    assert_eq!(registry.profiles().count(), 6);
    assert_eq!(
        registry.for_url("https://forum.example.org/t/1").platform,
        "forum"
    );
    assert_eq!(registry.profiles().last().unwrap().platform, "generic");
}

#[test]
fn test_override_generic_fallback() {
    let mut generic = builtin::generic();
    generic.max_reply_chars = Some(500);
    let registry = ProfileRegistry::new().with_overrides([generic]);
    assert_eq!(
        registry.for_url("https://unknown.example/").max_reply_chars,
        Some(500)
    );
}
