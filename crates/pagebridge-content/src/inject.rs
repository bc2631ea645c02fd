//! Injection lifecycle.
//!
//! Attaches an affordance to every element a matcher selects, exactly once per
//! element, both at load time and as elements arrive later through the
//! document's change feed. Idempotence comes from a marker stored on the
//! element itself, set before the callback runs.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use pagebridge_protocols::{ChangeFeed, DocumentMut, DocumentProvider, DomError, SiteProfile};

use crate::resolve::select_all_with_fallback;

/// Which elements should receive an affordance.
#[derive(Debug, Clone, Default)]
pub struct ElementMatcher {
    pub selectors: Vec<String>,
    /// Used only when `selectors` match nothing.
    pub fallback_selectors: Vec<String>,
    /// Skip elements that are not rendered.
    pub rendered_only: bool,
}

impl ElementMatcher {
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selectors: selectors.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_fallback<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    pub fn rendered_only(mut self, rendered_only: bool) -> Self {
        self.rendered_only = rendered_only;
        self
    }

    /// Matcher for a profile's composer elements.
    pub fn for_inputs(profile: &SiteProfile) -> Self {
        Self::new(profile.input.candidates.iter().cloned())
    }

    /// Current matches in document order.
    pub fn find<D>(&self, doc: &D) -> Result<Vec<D::Element>, DomError>
    where
        D: DocumentProvider + ?Sized,
    {
        let found = select_all_with_fallback(doc, None, &self.selectors, &self.fallback_selectors)?;
        if !self.rendered_only {
            return Ok(found);
        }
        Ok(found
            .into_iter()
            .filter(|el| doc.is_rendered(*el).unwrap_or(false))
            .collect())
    }
}

/// Tracks which elements already carry an affordance.
#[derive(Debug, Clone)]
pub struct InjectionManager {
    marker: String,
}

impl InjectionManager {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Mark every unmarked match and call `on_match` for it. Returns the
    /// number of new matches.
    pub fn scan<D, F>(&self, doc: &mut D, matcher: &ElementMatcher, on_match: &mut F) -> usize
    where
        D: DocumentMut + ?Sized,
        F: FnMut(D::Element),
    {
        let found = match matcher.find(doc) {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "injection scan failed");
                return 0;
            }
        };

        let mut attached = 0;
        for element in found {
            match doc.mark(element, &self.marker) {
                Ok(true) => {
                    on_match(element);
                    attached += 1;
                }
                Ok(false) => {}
                Err(DomError::StaleElement) => trace!(?element, "skipping detached element"),
                Err(e) => warn!(?element, error = %e, "could not mark element"),
            }
        }
        if attached > 0 {
            debug!(attached, marker = %self.marker, "affordances attached");
        }
        attached
    }

    /// Scan now, then rescan on every mutation batch until the feed ends.
    /// Returns the total number of elements matched.
    ///
    /// Batches already queued when a rescan starts are folded into it.
    pub async fn observe<D, F>(
        &self,
        doc: Arc<Mutex<D>>,
        mut feed: ChangeFeed<D::Element>,
        matcher: &ElementMatcher,
        mut on_match: F,
    ) -> usize
    where
        D: DocumentMut + Send,
        F: FnMut(D::Element) + Send,
    {
        let mut total = self.scan(&mut *doc.lock(), matcher, &mut on_match);

        while let Some(batch) = feed.next().await {
            let mut added = batch.added.len();
            while let Some(queued) = feed.try_next() {
                added += queued.added.len();
            }
            if added == 0 {
                continue;
            }
            trace!(added, "rescanning after mutation");
            total += self.scan(&mut *doc.lock(), matcher, &mut on_match);
        }

        debug!(total, "change feed ended");
        total
    }
}

#[cfg(test)]
#[path = "inject_tests.rs"]
mod tests;
