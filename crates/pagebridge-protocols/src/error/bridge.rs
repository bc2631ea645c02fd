//! Cross-context messaging errors.

use thiserror::Error;

use crate::runtime::TabId;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The target context did not answer before the deadline.
    #[error("Tab {tab} did not respond within {after_ms}ms")]
    Timeout { tab: TabId, after_ms: u64 },

    /// The `type` discriminator names no known message.
    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    /// The message is structurally invalid (missing `type`, bad payload).
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("No tab with id {0}")]
    TabNotFound(TabId),

    #[error("No active tab")]
    NoActiveTab,

    /// The receiving end went away before replying.
    #[error("Receiving end does not exist: {0}")]
    Disconnected(String),

    /// The target answered with `success: false`.
    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// True for [`BridgeError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::Timeout { .. })
    }

    /// True for errors caused by a malformed or unrecognised message.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            BridgeError::UnknownMessageType(_) | BridgeError::Malformed(_)
        )
    }
}
