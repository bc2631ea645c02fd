//! # PageBridge Content
//!
//! Everything that runs inside a page: finding the post and the composer,
//! turning them into a [`PageContext`](pagebridge_protocols::PageContext),
//! writing generated text back, and attaching affordances to late-arriving
//! composers.
//!
//! All DOM access goes through the document seam in `pagebridge-protocols`;
//! behaviour per website comes from declarative
//! [`SiteProfile`](pagebridge_protocols::SiteProfile)s.

pub mod extract;
pub mod fill;
pub mod inject;
pub mod listener;
pub mod profile;
pub mod resolve;

pub use extract::{ContextExtractor, ExtractionSettings};
pub use fill::{FillMethod, FillReport, FormFiller, NO_FILLABLE_FIELD};
pub use inject::{ElementMatcher, InjectionManager};
pub use listener::ContentScript;
pub use profile::ProfileRegistry;
pub use resolve::{element_text, resolve, select_all_with_fallback};
