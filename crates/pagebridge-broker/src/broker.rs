//! Request/response broker with a per-request deadline.
//!
//! Every request is tracked from the moment it is handed to the runtime
//! until it either gets a reply or its deadline passes. A reply that arrives
//! after the deadline is dropped by the runtime; nothing is retried.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use pagebridge_protocols::{BridgeError, BridgeMessage, BridgeResponse, ExtensionRuntime, TabId};

/// Lifecycle of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// Registered, not yet handed to the runtime.
    Sent,
    /// Handed to the runtime, waiting for the reply.
    Awaiting,
    /// The deadline passed first.
    TimedOut,
    /// A reply arrived in time.
    Responded,
    /// The runtime failed to deliver the message or the reply.
    Failed,
}

impl RequestState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestState::Sent | RequestState::Awaiting)
    }
}

/// Snapshot of a request that has not finished yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InFlightRequest {
    pub id: u64,
    pub tab: TabId,
    pub kind: String,
    pub state: RequestState,
    pub started_at: DateTime<Utc>,
}

/// Counters of finished requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BrokerStats {
    pub responded: u64,
    pub timed_out: u64,
    pub failed: u64,
}

/// Sends bridge messages to tabs and waits for replies.
pub struct Broker {
    runtime: Arc<dyn ExtensionRuntime>,
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, InFlightRequest>>,
    stats: Mutex<BrokerStats>,
}

impl Broker {
    pub fn new(runtime: Arc<dyn ExtensionRuntime>) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            stats: Mutex::new(BrokerStats::default()),
        }
    }

    pub fn runtime(&self) -> &Arc<dyn ExtensionRuntime> {
        &self.runtime
    }

    /// Send `message` to `tab` and wait at most `timeout` for the reply.
    pub async fn request(
        &self,
        tab: TabId,
        message: &BridgeMessage,
        timeout: Duration,
    ) -> Result<BridgeResponse, BridgeError> {
        self.request_raw(tab, message.encode(), timeout).await
    }

    /// Send an already encoded message. The receiving side decides whether
    /// the `type` is acceptable.
    pub async fn request_raw(
        &self,
        tab: TabId,
        message: Value,
        timeout: Duration,
    ) -> Result<BridgeResponse, BridgeError> {
        let kind = message
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("<untyped>")
            .to_string();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.pending.lock().insert(
            id,
            InFlightRequest {
                id,
                tab,
                kind: kind.clone(),
                state: RequestState::Sent,
                started_at: Utc::now(),
            },
        );
        debug!(id, tab, kind = %kind, "request sent");

        self.set_state(id, RequestState::Awaiting);
        let outcome = tokio::time::timeout(timeout, self.runtime.send_to_tab(tab, message)).await;

        match outcome {
            Ok(Ok(raw)) => {
                self.finish(id, RequestState::Responded);
                let response: BridgeResponse = serde_json::from_value(raw)?;
                debug!(id, tab, success = response.success, "request answered");
                Ok(response)
            }
            Ok(Err(e)) => {
                self.finish(id, RequestState::Failed);
                warn!(id, tab, kind = %kind, error = %e, "request failed");
                Err(e)
            }
            Err(_) => {
                self.finish(id, RequestState::TimedOut);
                let after_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(id, tab, kind = %kind, after_ms, "request timed out");
                Err(BridgeError::Timeout { tab, after_ms })
            }
        }
    }

    /// Requests still waiting for a reply, oldest first.
    pub fn in_flight(&self) -> Vec<InFlightRequest> {
        let mut requests: Vec<_> = self.pending.lock().values().cloned().collect();
        requests.sort_by_key(|r| r.id);
        requests
    }

    pub fn stats(&self) -> BrokerStats {
        *self.stats.lock()
    }

    fn set_state(&self, id: u64, state: RequestState) {
        if let Some(request) = self.pending.lock().get_mut(&id) {
            request.state = state;
        }
    }

    fn finish(&self, id: u64, state: RequestState) {
        self.pending.lock().remove(&id);
        let mut stats = self.stats.lock();
        match state {
            RequestState::Responded => stats.responded += 1,
            RequestState::TimedOut => stats.timed_out += 1,
            RequestState::Failed => stats.failed += 1,
            RequestState::Sent | RequestState::Awaiting => {}
        }
    }
}

#[cfg(test)]
#[path = "broker_tests.rs"]
mod tests;
