//! Building runtime components from configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use pagebridge_config::{Config, ConfigLoader, ConfigValidator, ExtractionConfig};
use pagebridge_content::{ContextExtractor, ExtractionSettings, InjectionManager, ProfileRegistry};
use pagebridge_dom::StaticDocument;

/// Load the configuration at `path`, or the defaults when the file does not
/// exist.
pub(crate) fn load_config(path: &Path) -> Result<Config> {
    ConfigLoader::load_or_default(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

/// Log validation warnings and fail on errors.
pub(crate) fn check_config(config: &Config) -> Result<()> {
    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    if !result.is_valid() {
        let errors: Vec<String> = result
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        bail!("invalid configuration: {}", errors.join("; "));
    }
    Ok(())
}

pub(crate) fn extraction_settings(config: &ExtractionConfig) -> ExtractionSettings {
    ExtractionSettings {
        min_heuristic_chars: config.min_heuristic_chars,
        chrome_phrases: config.chrome_phrases.clone(),
    }
}

/// Components shared by every subcommand.
pub(crate) struct Components {
    pub profiles: ProfileRegistry,
    pub extractor: ContextExtractor,
    pub injection: InjectionManager,
    pub timeout: Duration,
}

impl Components {
    pub(crate) fn from_config(config: &Config) -> Self {
        let profiles = ProfileRegistry::new().with_overrides(config.sites.iter().cloned());
        info!(
            profiles = profiles.profiles().count(),
            configured = config.sites.len(),
            "profiles loaded"
        );
        Self {
            profiles,
            extractor: ContextExtractor::new(extraction_settings(&config.extraction)),
            injection: InjectionManager::new(config.injection.marker.clone()),
            timeout: Duration::from_millis(config.broker.timeout_ms),
        }
    }
}

/// Parse a saved page.
pub(crate) fn read_page(file: &Path, url: &str) -> Result<StaticDocument> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Ok(StaticDocument::parse(&html, url))
}
