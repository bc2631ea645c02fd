//! # PageBridge Broker
//!
//! The background side of the bridge. A [`Broker`] sends typed requests to a
//! tab's content script through an
//! [`ExtensionRuntime`](pagebridge_protocols::ExtensionRuntime) and enforces a
//! deadline on every reply. The [`BackgroundCoordinator`] sits between UI
//! callers and the broker, and [`DraftWorkflow`] chains extraction,
//! generation, persistence and fill.
//!
//! [`LocalRuntime`] is an in-process runtime adapter: tabs are channels, and
//! content scripts serve them with their [`MessageListener`](pagebridge_protocols::MessageListener)s.

pub mod broker;
pub mod coordinator;
pub mod error;
pub mod runtime;
pub mod store;
pub mod workflow;

pub use broker::{Broker, BrokerStats, InFlightRequest, RequestState};
pub use coordinator::{BackgroundCoordinator, user_message};
pub use error::WorkflowError;
pub use runtime::local::{LocalRuntime, TabPort};
pub use store::MemoryStore;
pub use workflow::{DraftOutcome, DraftWorkflow};
