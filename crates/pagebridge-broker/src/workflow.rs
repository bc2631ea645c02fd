//! Drafting workflow: read the page, generate replies, keep a record and
//! write the first candidate back into the composer.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use pagebridge_content::ProfileRegistry;
use pagebridge_protocols::{
    ContentGenerator, FillRequest, GenerationConstraints, PageContext, ProductInfo, Record,
    RecordStore, TabId, cap_chars,
};

use crate::coordinator::BackgroundCoordinator;
use crate::error::WorkflowError;

/// Table receiving one record per generated draft.
pub const CONTENT_TABLE: &str = "content";
/// Table receiving usage events.
pub const ANALYTICS_TABLE: &str = "analytics";

/// Result of one drafting run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftOutcome {
    pub context: PageContext,
    pub candidates: Vec<String>,
    pub filled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_error: Option<String>,
}

pub struct DraftWorkflow {
    coordinator: Arc<BackgroundCoordinator>,
    generator: Arc<dyn ContentGenerator>,
    store: Arc<dyn RecordStore>,
    profiles: ProfileRegistry,
}

impl DraftWorkflow {
    pub fn new(
        coordinator: Arc<BackgroundCoordinator>,
        generator: Arc<dyn ContentGenerator>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            coordinator,
            generator,
            store,
            profiles: ProfileRegistry::new(),
        }
    }

    pub fn with_profiles(mut self, profiles: ProfileRegistry) -> Self {
        self.profiles = profiles;
        self
    }

    pub async fn run(
        &self,
        tab: Option<TabId>,
        product: &ProductInfo,
        constraints: &GenerationConstraints,
    ) -> Result<DraftOutcome, WorkflowError> {
        let tab = self.coordinator.resolve_tab(tab).await?;
        let context = self.coordinator.page_context(Some(tab)).await?;
        if context.is_empty() {
            warn!(tab, url = %context.url, "drafting without page context");
        }

        let limit = self.profiles.for_url(&context.url).max_reply_chars;
        let mut constraints = constraints.clone();
        constraints.max_chars = match (constraints.max_chars, limit) {
            (Some(asked), Some(limit)) => Some(asked.min(limit)),
            (asked, limit) => asked.or(limit),
        };

        let candidates: Vec<String> = self
            .generator
            .generate(&context, product, &constraints)
            .await?
            .into_iter()
            .map(|text| match constraints.max_chars {
                Some(max) => cap_chars(&text, max),
                None => text,
            })
            .filter(|text| !text.trim().is_empty())
            .collect();
        let Some(first) = candidates.first() else {
            return Err(WorkflowError::NoCandidates);
        };

        self.store
            .append(Record::new(
                CONTENT_TABLE,
                json!({
                    "platform": context.platform,
                    "url": context.url,
                    "product": product.name,
                    "candidates": candidates,
                }),
            ))
            .await?;

        let response = self
            .coordinator
            .fill(FillRequest::new(first.clone()), Some(tab))
            .await?;
        let filled = response.success;

        self.store
            .append(Record::new(
                ANALYTICS_TABLE,
                json!({ "event": "draft", "platform": context.platform, "filled": filled }),
            ))
            .await?;
        info!(tab, platform = %context.platform, candidates = candidates.len(), filled, "draft finished");

        Ok(DraftOutcome {
            context,
            candidates,
            filled,
            fill_error: response.error,
        })
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
