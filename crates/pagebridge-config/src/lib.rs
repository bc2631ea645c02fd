//! # PageBridge Config
//!
//! TOML configuration for broker timeouts, extraction tuning, logging and
//! additional site profiles.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
