//! Configuration validation.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::schema::Config;

/// Timeouts above this are accepted but reported.
const LONG_TIMEOUT_MS: u64 = 60_000;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_broker(config, &mut result);
        Self::validate_extraction(config, &mut result);
        Self::validate_injection(config, &mut result);
        Self::validate_sites(config, &mut result);

        Ok(result)
    }

    fn validate_broker(config: &Config, result: &mut ValidationResult) {
        if config.broker.timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "broker.timeout_ms",
                "timeout_ms must be greater than 0",
            ));
        }

        if config.broker.timeout_ms > LONG_TIMEOUT_MS {
            result.add_warning(ValidationWarning::new(
                "broker.timeout_ms",
                "timeout_ms is very high (>60s), a dead tab will stall the caller",
            ));
        }
    }

    fn validate_extraction(config: &Config, result: &mut ValidationResult) {
        if config.extraction.chrome_phrases.iter().any(|p| p.trim().is_empty()) {
            result.add_error(ValidationError::new(
                "extraction.chrome_phrases",
                "Empty phrase would exclude every candidate",
            ));
        }
    }

    fn validate_injection(config: &Config, result: &mut ValidationResult) {
        if config.injection.marker.trim().is_empty() {
            result.add_error(ValidationError::new(
                "injection.marker",
                "Marker cannot be empty",
            ));
        }
    }

    fn validate_sites(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();
        for (idx, site) in config.sites.iter().enumerate() {
            let path = format!("sites[{idx}]");

            if site.platform.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("{path}.platform"),
                    "Platform cannot be empty",
                ));
            } else if !seen.insert(site.platform.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{path}.platform"),
                    format!("Platform '{}' is defined more than once", site.platform),
                ));
            }

            if site.input.is_empty() {
                result.add_error(ValidationError::new(
                    format!("{path}.input"),
                    "At least one input selector is required",
                ));
            }

            if site.hosts.is_empty() {
                result.add_warning(ValidationWarning::new(
                    format!("{path}.hosts"),
                    "No hosts listed, profile can only be selected by name",
                ));
            }

            if site.title.is_empty() && site.content.is_empty() && site.heuristics.is_empty() {
                result.add_warning(ValidationWarning::new(
                    path.clone(),
                    "No title, content or heuristic selectors, extraction will be empty",
                ));
            }

            if site.max_reply_chars == Some(0) {
                result.add_error(ValidationError::new(
                    format!("{path}.max_reply_chars"),
                    "max_reply_chars must be greater than 0",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
