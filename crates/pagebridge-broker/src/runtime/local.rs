//! In-process runtime.
//!
//! Each registered tab is an mpsc channel of envelopes carrying the raw JSON
//! message and a oneshot for the reply. The tab's content script drains the
//! channel through its [`TabPort`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use pagebridge_protocols::{
    BridgeError, BridgeMessage, BridgeResponse, ExtensionRuntime, MessageListener, TabId,
};

/// A message delivered to a tab, with the channel its reply goes back on.
pub struct Envelope {
    pub message: Value,
    pub reply: oneshot::Sender<Value>,
}

struct TabEntry {
    url: String,
    tx: mpsc::UnboundedSender<Envelope>,
}

/// Tab registry backed by in-process channels.
pub struct LocalRuntime {
    tabs: RwLock<HashMap<TabId, TabEntry>>,
    active: RwLock<Option<TabId>>,
}

impl LocalRuntime {
    pub fn new() -> Self {
        Self {
            tabs: RwLock::new(HashMap::new()),
            active: RwLock::new(None),
        }
    }

    /// Open `tab` at `url`. Registering an existing id replaces it, which
    /// disconnects the previous port.
    pub fn register_tab(&self, tab: TabId, url: impl Into<String>) -> TabPort {
        let (tx, rx) = mpsc::unbounded_channel();
        let url = url.into();
        info!(tab, url = %url, "tab registered");
        self.tabs.write().insert(tab, TabEntry { url, tx });
        TabPort { tab, rx }
    }

    /// Close `tab`. Pending requests fail with `Disconnected`.
    pub fn close_tab(&self, tab: TabId) -> bool {
        let removed = self.tabs.write().remove(&tab).is_some();
        let mut active = self.active.write();
        if *active == Some(tab) {
            *active = None;
        }
        removed
    }

    pub fn set_active(&self, tab: TabId) -> Result<(), BridgeError> {
        if !self.tabs.read().contains_key(&tab) {
            return Err(BridgeError::TabNotFound(tab));
        }
        *self.active.write() = Some(tab);
        Ok(())
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        let mut ids: Vec<_> = self.tabs.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for LocalRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtensionRuntime for LocalRuntime {
    fn name(&self) -> &str {
        "local"
    }

    async fn active_tab(&self) -> Result<TabId, BridgeError> {
        (*self.active.read()).ok_or(BridgeError::NoActiveTab)
    }

    async fn tab_url(&self, tab: TabId) -> Result<String, BridgeError> {
        self.tabs
            .read()
            .get(&tab)
            .map(|entry| entry.url.clone())
            .ok_or(BridgeError::TabNotFound(tab))
    }

    async fn send_to_tab(&self, tab: TabId, message: Value) -> Result<Value, BridgeError> {
        let tx = self
            .tabs
            .read()
            .get(&tab)
            .map(|entry| entry.tx.clone())
            .ok_or(BridgeError::TabNotFound(tab))?;

        let (reply, rx) = oneshot::channel();
        tx.send(Envelope { message, reply })
            .map_err(|_| BridgeError::Disconnected(format!("tab {} is not listening", tab)))?;

        rx.await
            .map_err(|_| BridgeError::Disconnected(format!("tab {} closed before replying", tab)))
    }
}

/// Receiving end of one tab.
pub struct TabPort {
    tab: TabId,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl TabPort {
    pub fn tab(&self) -> TabId {
        self.tab
    }

    /// Next raw envelope, for callers that answer by hand.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }

    /// Answer every message with `listeners` until the tab is closed.
    /// Returns the number of messages answered.
    pub async fn serve(mut self, listeners: Vec<Arc<dyn MessageListener>>) -> usize {
        let mut answered = 0;
        while let Some(envelope) = self.rx.recv().await {
            let response = dispatch(&listeners, envelope.message).await;
            let value = serde_json::to_value(&response).unwrap_or_default();
            if envelope.reply.send(value).is_err() {
                debug!(tab = self.tab, "reply dropped, requester gave up");
            }
            answered += 1;
        }
        info!(tab = self.tab, answered, "tab port closed");
        answered
    }

    pub fn spawn(self, listeners: Vec<Arc<dyn MessageListener>>) -> JoinHandle<usize> {
        tokio::spawn(self.serve(listeners))
    }
}

/// Decode a raw message and hand it to the first listener that answers.
pub async fn dispatch(listeners: &[Arc<dyn MessageListener>], raw: Value) -> BridgeResponse {
    let message = match BridgeMessage::decode(raw) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "rejecting message");
            return BridgeResponse::rejected(&e);
        }
    };

    for listener in listeners {
        if let Some(response) = listener.on_message(&message).await {
            debug!(listener = listener.name(), kind = message.kind(), "message handled");
            return response;
        }
    }
    BridgeResponse::failure(format!("{} not handled", message.kind()))
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
