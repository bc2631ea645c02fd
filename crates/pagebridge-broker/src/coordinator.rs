//! Background coordinator.
//!
//! Relays UI requests to the right tab through the [`Broker`] and turns
//! bridge failures into text a user can act on.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info};

use pagebridge_protocols::{
    BridgeError, BridgeMessage, BridgeResponse, ExtensionRuntime, FillRequest, PageContext, TabId,
};

use crate::broker::Broker;

/// Default reply deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

pub struct BackgroundCoordinator {
    broker: Broker,
    timeout: Duration,
}

impl BackgroundCoordinator {
    pub fn new(runtime: Arc<dyn ExtensionRuntime>) -> Self {
        Self {
            broker: Broker::new(runtime),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn broker(&self) -> &Broker {
        &self.broker
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `tab`, or the active tab when none is given.
    pub async fn resolve_tab(&self, tab: Option<TabId>) -> Result<TabId, BridgeError> {
        match tab {
            Some(tab) => Ok(tab),
            None => self.broker.runtime().active_tab().await,
        }
    }

    /// Relay `message` to `tab` (or the active tab) and return its reply.
    pub async fn forward(
        &self,
        message: &BridgeMessage,
        tab: Option<TabId>,
    ) -> Result<BridgeResponse, BridgeError> {
        let tab = self.resolve_tab(tab).await?;
        debug!(tab, kind = message.kind(), "forwarding");
        self.broker.request(tab, message, self.timeout).await
    }

    /// Ask the content script for the page context.
    pub async fn page_context(&self, tab: Option<TabId>) -> Result<PageContext, BridgeError> {
        let response = self
            .forward(&BridgeMessage::GetPageContext, tab)
            .await?
            .into_result()?;
        response
            .context
            .ok_or_else(|| BridgeError::Malformed("page context response without context".to_string()))
    }

    /// Ask the content script to write `request` into the page.
    pub async fn fill(
        &self,
        request: FillRequest,
        tab: Option<TabId>,
    ) -> Result<BridgeResponse, BridgeError> {
        self.forward(&BridgeMessage::FillForm(request), tab).await
    }

    /// Send `message` to every tab in `tabs` concurrently.
    pub async fn broadcast(
        &self,
        message: &BridgeMessage,
        tabs: &[TabId],
    ) -> Vec<(TabId, Result<BridgeResponse, BridgeError>)> {
        let replies = join_all(
            tabs.iter()
                .map(|&tab| self.broker.request(tab, message, self.timeout)),
        )
        .await;
        info!(kind = message.kind(), tabs = tabs.len(), "broadcast finished");
        tabs.iter().copied().zip(replies).collect()
    }
}

/// User-facing text for a bridge failure.
pub fn user_message(error: &BridgeError) -> String {
    match error {
        BridgeError::Timeout { .. } => {
            "The page did not respond in time. Please refresh the page and retry.".to_string()
        }
        BridgeError::Disconnected(_) => {
            "The page is not connected to the extension. Please refresh the page and retry."
                .to_string()
        }
        BridgeError::TabNotFound(_) | BridgeError::NoActiveTab => {
            "Open a supported page and try again.".to_string()
        }
        BridgeError::UnknownMessageType(_) | BridgeError::Malformed(_) => {
            "The page did not understand the request. Please update the extension.".to_string()
        }
        BridgeError::Remote(message) => message.clone(),
        BridgeError::Serialization(_) => "Unexpected reply from the page.".to_string(),
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
