//! Extension runtime seam.
//!
//! The broker never talks to a browser API directly. An [`ExtensionRuntime`]
//! is selected once at startup and hides how messages reach a tab's content
//! script; [`MessageListener`]s are the receiving side.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BridgeError;
use crate::message::{BridgeMessage, BridgeResponse};

/// Browser tab identifier.
pub type TabId = u32;

/// Platform adapter for one browser runtime.
#[async_trait]
pub trait ExtensionRuntime: Send + Sync {
    /// Runtime name, for logs.
    fn name(&self) -> &str;

    /// Tab the user is currently looking at.
    async fn active_tab(&self) -> Result<TabId, BridgeError>;

    /// URL loaded in `tab`.
    async fn tab_url(&self, tab: TabId) -> Result<String, BridgeError>;

    /// Deliver a JSON message to the content script of `tab` and wait for its
    /// JSON reply. Implementations do not time out on their own.
    async fn send_to_tab(&self, tab: TabId, message: Value) -> Result<Value, BridgeError>;
}

/// Receiving side of the bridge inside one context.
///
/// A listener returns `Some` only for message kinds it answers. Returning
/// `None` leaves the message to other listeners in the same context.
#[async_trait]
pub trait MessageListener: Send + Sync {
    fn name(&self) -> &str;

    async fn on_message(&self, message: &BridgeMessage) -> Option<BridgeResponse>;
}
