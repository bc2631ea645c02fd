//! Context extraction.
//!
//! Turns a page into a [`PageContext`] using a [`SiteProfile`]:
//!
//! 1. Pick the main-post container (primary, then fallback containers).
//! 2. Resolve title and content inside it, then document-wide.
//! 3. Run the profile's heuristics while content is still empty, inside
//!    the container and then document-wide.
//! 4. Fill an empty title from `<title>` or the URL.
//! 5. Trim and cap.
//!
//! The page is untrusted, so extraction never fails: any document error
//! yields the empty context.

use tracing::{debug, warn};

use pagebridge_protocols::{DocumentProvider, DomError, Heuristic, PageContext, SiteProfile};

use crate::resolve::{element_text, resolve, select_all_with_fallback};

/// Tuning shared by every profile's heuristics.
#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    /// Candidates must be longer than this unless a heuristic sets its own.
    pub min_heuristic_chars: usize,
    /// UI phrases that disqualify a candidate, matched case-insensitively.
    pub chrome_phrases: Vec<String>,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            min_heuristic_chars: 20,
            chrome_phrases: [
                "Write a comment",
                "Add a comment",
                "Post your reply",
                "Sign in",
                "Log in",
                "Cookie",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Extracts page context according to a site profile.
#[derive(Debug, Clone, Default)]
pub struct ContextExtractor {
    settings: ExtractionSettings,
}

impl ContextExtractor {
    pub fn new(settings: ExtractionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    /// Extract the current post. Never fails.
    pub fn extract<D>(&self, profile: &SiteProfile, doc: &D) -> PageContext
    where
        D: DocumentProvider + ?Sized,
    {
        match self.try_extract(profile, doc) {
            Ok(context) => context,
            Err(e) => {
                warn!(platform = %profile.platform, error = %e, "extraction failed");
                PageContext::empty(&profile.platform, doc.url())
            }
        }
    }

    fn try_extract<D>(&self, profile: &SiteProfile, doc: &D) -> Result<PageContext, DomError>
    where
        D: DocumentProvider + ?Sized,
    {
        let scope = find_container(doc, profile)?;

        let mut title = scoped_text(doc, scope, |s| resolve(doc, s, &profile.title))?;
        let mut content = scoped_text(doc, scope, |s| resolve(doc, s, &profile.content))?;

        if content.is_empty() {
            content = self.run_heuristics(profile, doc, scope)?;
        }
        if content.is_empty() && scope.is_some() {
            debug!(platform = %profile.platform, "container had no body, searching document");
            content = self.run_heuristics(profile, doc, None)?;
        }

        if title.is_empty() && content.is_empty() {
            debug!(platform = %profile.platform, "page shape not recognised");
            return Ok(PageContext::empty(&profile.platform, doc.url()));
        }

        if title.is_empty() {
            title = doc
                .title()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| doc.url().to_string());
        }

        Ok(PageContext::new(title, content, &profile.platform, doc.url()))
    }

    fn run_heuristics<D>(
        &self,
        profile: &SiteProfile,
        doc: &D,
        scope: Option<D::Element>,
    ) -> Result<String, DomError>
    where
        D: DocumentProvider + ?Sized,
    {
        for heuristic in &profile.heuristics {
            let found = match heuristic {
                Heuristic::Paragraphs {
                    selectors,
                    fallback_selectors,
                    min_chars,
                    exclude_phrases,
                } => {
                    let min = min_chars.unwrap_or(self.settings.min_heuristic_chars);
                    let mut found = None;
                    for candidate in select_all_with_fallback(doc, scope, selectors, fallback_selectors)? {
                        let text = element_text(doc, candidate)?;
                        if self.accepts(&text, min, exclude_phrases) {
                            found = Some(text);
                            break;
                        }
                    }
                    found
                }
                Heuristic::MetaDescription { min_chars } => {
                    let min = min_chars.unwrap_or(self.settings.min_heuristic_chars);
                    meta_description(doc)?.filter(|text| self.accepts(text, min, &[]))
                }
            };
            if let Some(text) = found {
                debug!(platform = %profile.platform, ?heuristic, "content from heuristic");
                return Ok(text);
            }
        }
        Ok(String::new())
    }

    fn accepts(&self, text: &str, min_chars: usize, exclude: &[String]) -> bool {
        let text = text.trim();
        if text.chars().count() <= min_chars {
            return false;
        }
        let lower = text.to_lowercase();
        !exclude
            .iter()
            .chain(self.settings.chrome_phrases.iter())
            .any(|phrase| lower.contains(&phrase.to_lowercase()))
    }
}

/// First primary container present, else first fallback container, else the
/// whole document.
fn find_container<D>(doc: &D, profile: &SiteProfile) -> Result<Option<D::Element>, DomError>
where
    D: DocumentProvider + ?Sized,
{
    for (tier, selectors) in [
        ("primary", &profile.post_containers),
        ("fallback", &profile.fallback_containers),
    ] {
        for selector in selectors {
            match doc.query_selector(None, selector) {
                Ok(Some(container)) => {
                    debug!(tier, selector = %selector, "container found");
                    return Ok(Some(container));
                }
                Ok(None) => {}
                Err(e) if e.is_invalid_selector() => {
                    warn!(selector = %selector, error = %e, "skipping invalid container selector");
                }
                Err(e) => return Err(e),
            }
        }
    }
    Ok(None)
}

/// Resolve inside `scope` first, then document-wide, returning the text.
fn scoped_text<D, F>(doc: &D, scope: Option<D::Element>, lookup: F) -> Result<String, DomError>
where
    D: DocumentProvider + ?Sized,
    F: Fn(Option<D::Element>) -> Result<Option<D::Element>, DomError>,
{
    let mut found = lookup(scope)?;
    if found.is_none() && scope.is_some() {
        found = lookup(None)?;
    }
    match found {
        Some(element) => element_text(doc, element),
        None => Ok(String::new()),
    }
}

fn meta_description<D>(doc: &D) -> Result<Option<String>, DomError>
where
    D: DocumentProvider + ?Sized,
{
    for selector in ["meta[name=\"description\"]", "meta[property=\"og:description\"]"] {
        if let Some(meta) = doc.query_selector(None, selector)? {
            if let Some(text) = doc.attribute(meta, "content")? {
                let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !text.is_empty() {
                    return Ok(Some(text));
                }
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
