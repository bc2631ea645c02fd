//! Bridge messages exchanged between the UI, the background coordinator and
//! content scripts.
//!
//! ## Wire shape
//!
//! Requests are JSON objects with a `type` discriminator and a `payload`:
//!
//! ```json
//! { "type": "FILL_FORM", "payload": { "text": "hello" } }
//! ```
//!
//! Responses are `{ "success": bool, "context"?: {...}, "error"?: "...", "data"?: ... }`.
//! Every request kind has exactly one response shape. Decoding an unknown
//! `type` is an explicit [`BridgeError::UnknownMessageType`], never a silent
//! drop, so a sender is not left waiting on a channel nobody answers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;
use crate::types::PageContext;

/// Wire names of the message kinds.
pub mod kind {
    pub const GET_PAGE_CONTEXT: &str = "GET_PAGE_CONTEXT";
    pub const FILL_FORM: &str = "FILL_FORM";
    pub const TOGGLE_SIDEBAR: &str = "TOGGLE_SIDEBAR";
    pub const PING: &str = "PING";
}

/// Where a fill request should land.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetDescriptor {
    /// Resolve the site profile's input role at fill time.
    #[default]
    ProfileInput,
    /// A selector captured by the caller.
    Selector { selector: String },
    /// Whatever element currently has focus.
    Focused,
}

/// Request to write text into the page.
///
/// `text` is written as-is; callers truncate to platform limits beforehand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillRequest {
    #[serde(default)]
    pub target: TargetDescriptor,
    #[serde(alias = "content")]
    pub text: String,
}

impl FillRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            target: TargetDescriptor::ProfileInput,
            text: text.into(),
        }
    }

    pub fn with_target(mut self, target: TargetDescriptor) -> Self {
        self.target = target;
        self
    }
}

/// A typed bridge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMessage", into = "RawMessage")]
pub enum BridgeMessage {
    GetPageContext,
    FillForm(FillRequest),
    ToggleSidebar,
    Ping,
}

impl BridgeMessage {
    /// The wire discriminator for this message.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeMessage::GetPageContext => kind::GET_PAGE_CONTEXT,
            BridgeMessage::FillForm(_) => kind::FILL_FORM,
            BridgeMessage::ToggleSidebar => kind::TOGGLE_SIDEBAR,
            BridgeMessage::Ping => kind::PING,
        }
    }

    /// Decode a raw JSON message, keeping the precise protocol error.
    pub fn decode(value: Value) -> Result<Self, BridgeError> {
        let raw: RawMessage =
            serde_json::from_value(value).map_err(|e| BridgeError::Malformed(e.to_string()))?;
        Self::try_from(raw)
    }

    /// Encode to the JSON wire shape.
    pub fn encode(&self) -> Value {
        let raw = RawMessage::from(self.clone());
        serde_json::json!({ "type": raw.kind, "payload": raw.payload })
    }
}

/// Untyped `{ type, payload }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl TryFrom<RawMessage> for BridgeMessage {
    type Error = BridgeError;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            kind::GET_PAGE_CONTEXT => Ok(BridgeMessage::GetPageContext),
            kind::FILL_FORM => {
                let request: FillRequest = serde_json::from_value(raw.payload)
                    .map_err(|e| BridgeError::Malformed(format!("FILL_FORM payload: {}", e)))?;
                Ok(BridgeMessage::FillForm(request))
            }
            kind::TOGGLE_SIDEBAR => Ok(BridgeMessage::ToggleSidebar),
            kind::PING => Ok(BridgeMessage::Ping),
            other => Err(BridgeError::UnknownMessageType(other.to_string())),
        }
    }
}

impl From<BridgeMessage> for RawMessage {
    fn from(message: BridgeMessage) -> Self {
        let kind = message.kind().to_string();
        let payload = match message {
            BridgeMessage::FillForm(request) => {
                serde_json::to_value(request).unwrap_or(Value::Null)
            }
            _ => Value::Object(Default::default()),
        };
        RawMessage { kind, payload }
    }
}

/// Response to a bridge request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<PageContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Kind-specific extras (fill report, sidebar state, pong).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl BridgeResponse {
    /// A bare successful response.
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    /// Successful response carrying a page context.
    pub fn with_context(context: PageContext) -> Self {
        Self {
            success: true,
            context: Some(context),
            ..Default::default()
        }
    }

    /// Failed response with a user-presentable message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Explicit rejection of a message the receiver could not accept.
    pub fn rejected(error: &BridgeError) -> Self {
        Self::failure(error.to_string())
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Turn `success: false` into [`BridgeError::Remote`].
    pub fn into_result(self) -> Result<Self, BridgeError> {
        if self.success {
            Ok(self)
        } else {
            Err(BridgeError::Remote(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
