//! Content generation service contract.
//!
//! The generator itself (prompt templates, LLM calls, billing) lives outside
//! this workspace; drafting code only hands it a [`PageContext`] and receives
//! candidate texts back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::types::PageContext;

/// What is being promoted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Shape of the requested output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConstraints {
    /// Number of candidates wanted.
    pub candidates: usize,
    /// Upper bound on each candidate, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

impl Default for GenerationConstraints {
    fn default() -> Self {
        Self {
            candidates: 3,
            max_chars: None,
            tone: None,
        }
    }
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produce zero or more candidate texts for `context`.
    async fn generate(
        &self,
        context: &PageContext,
        product: &ProductInfo,
        constraints: &GenerationConstraints,
    ) -> Result<Vec<String>, GenerationError>;
}
