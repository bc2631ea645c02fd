//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

use pagebridge_protocols::SiteProfile;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub broker: BrokerConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub injection: InjectionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Extra site profiles; a profile whose platform matches a built-in one
    /// replaces it.
    #[serde(default)]
    pub sites: Vec<SiteProfile>,
}

/// Messaging broker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Deadline for a content script to answer, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    5000
}

/// Context extraction tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Heuristic candidates must be longer than this many characters.
    #[serde(default = "default_min_heuristic_chars")]
    pub min_heuristic_chars: usize,

    /// UI phrases that disqualify a heuristic candidate.
    #[serde(default = "default_chrome_phrases")]
    pub chrome_phrases: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_heuristic_chars: default_min_heuristic_chars(),
            chrome_phrases: default_chrome_phrases(),
        }
    }
}

fn default_min_heuristic_chars() -> usize {
    20
}

fn default_chrome_phrases() -> Vec<String> {
    [
        "Write a comment",
        "Add a comment",
        "Post your reply",
        "Sign in",
        "Log in",
        "Cookie",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Affordance injection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionConfig {
    /// Marker name recorded on elements that already received an affordance.
    #[serde(default = "default_marker")]
    pub marker: String,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
        }
    }
}

fn default_marker() -> String {
    "pagebridge-visited".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rotated log files; console only when unset.
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
