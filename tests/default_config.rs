//! The shipped configuration file loads, validates and yields working
//! components.

use std::path::Path;

use pagebridge_config::{ConfigLoader, ConfigValidator};
use pagebridge_content::{ContextExtractor, ExtractionSettings, ProfileRegistry};
use pagebridge_dom::StaticDocument;

fn shipped() -> pagebridge_config::Config {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
    ConfigLoader::load(&path).unwrap()
}

#[test]
fn default_config_is_valid() {
    let config = shipped();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid(), "{:?}", result.errors);
    assert_eq!(config.broker.timeout_ms, 5000);
    assert_eq!(config.injection.marker, "pagebridge-visited");
}

#[test]
fn configured_site_profile_is_selected() {
    let config = shipped();
    let registry = ProfileRegistry::new().with_overrides(config.sites.clone());
    let url = "https://news.ycombinator.com/item?id=1";
    let profile = registry.for_url(url);
    assert_eq!(profile.platform, "hackernews");

    let doc = StaticDocument::parse(
        r#"<table class="fatitem"><tr><td><span class="titleline"><a href="/">Show HN: a crate</a></span></td></tr>
           <tr><td><div class="toptext">It extracts context from pages.</div></td></tr></table>"#,
        url,
    );
    let extractor = ContextExtractor::new(ExtractionSettings {
        min_heuristic_chars: config.extraction.min_heuristic_chars,
        chrome_phrases: config.extraction.chrome_phrases.clone(),
    });
    let context = extractor.extract(profile, &doc);
    assert_eq!(context.title, "Show HN: a crate");
    assert_eq!(context.content, "It extracts context from pages.");
    assert_eq!(context.platform, "hackernews");
}
