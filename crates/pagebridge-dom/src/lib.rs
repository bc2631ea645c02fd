//! # PageBridge DOM
//!
//! [`StaticDocument`]: an HTML document parsed with `scraper` whose tree can
//! be edited in place. It implements the document seam from
//! `pagebridge-protocols`, which lets extraction, fill and injection logic run
//! offline and in tests exactly as they would against a live page.
//!
//! Host-page editor behaviour (whether a paste is handled by the page, whether
//! `execCommand` is available) is simulated through [`HostBehavior`], and every
//! synthetic event is recorded in an event log for inspection.

mod document;
mod fragment;
mod host;

pub use document::StaticDocument;
pub use ego_tree::NodeId;
pub use host::{DispatchedEvent, HostBehavior};
