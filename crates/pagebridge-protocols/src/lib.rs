//! # PageBridge Protocols
//!
//! Wire types, data model and seam traits shared by every PageBridge crate.
//! Contains only definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`DocumentProvider`] / [`DocumentMut`] / [`ObservableDocument`] - the DOM seam
//! - [`ExtensionRuntime`] - platform adapter for routing messages to tabs
//! - [`MessageListener`] - receiving side of the bridge
//! - [`ContentGenerator`] - external text generation service
//! - [`RecordStore`] - external persistence

pub mod document;
pub mod error;
pub mod generation;
pub mod message;
pub mod runtime;
pub mod store;
pub mod types;

pub use document::{
    ChangeFeed, ChangeSender, DocumentMut, DocumentProvider, DomEvent, DomEventKind, EditCommand,
    EventOutcome, MutationBatch, ObservableDocument,
};
pub use error::{BridgeError, DomError, GenerationError, StoreError};
pub use generation::{ContentGenerator, GenerationConstraints, ProductInfo};
pub use message::{BridgeMessage, BridgeResponse, FillRequest, RawMessage, TargetDescriptor};
pub use runtime::{ExtensionRuntime, MessageListener, TabId};
pub use store::{Record, RecordStore};
pub use types::*;
