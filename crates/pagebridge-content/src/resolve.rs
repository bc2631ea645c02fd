//! Selector resolution.
//!
//! Finds the element playing a role (title, content, input) on a page from an
//! ordered list of candidate selectors. The first candidate that yields a
//! usable element wins, so structural selectors should precede generic ones.

use tracing::{debug, warn};

use pagebridge_protocols::{DocumentProvider, DomError, SelectorRole, SelectorSet};

/// Resolve `set` within `scope` (or the whole document).
///
/// A miss is `Ok(None)`. Invalid selector strings are skipped; any other
/// document failure is returned to the caller.
pub fn resolve<D>(
    doc: &D,
    scope: Option<D::Element>,
    set: &SelectorSet,
) -> Result<Option<D::Element>, DomError>
where
    D: DocumentProvider + ?Sized,
{
    match set.role {
        SelectorRole::Title | SelectorRole::Content => resolve_text(doc, scope, set),
        SelectorRole::Input => resolve_input(doc, scope, set),
    }
}

/// Trimmed text of an element: the value of form controls, the text content
/// of everything else.
///
/// Line breaks survive, with at most one blank line between paragraphs.
/// Spaces inside a line collapse and lines are trimmed.
pub fn element_text<D>(doc: &D, element: D::Element) -> Result<String, DomError>
where
    D: DocumentProvider + ?Sized,
{
    let raw = match doc.value(element)? {
        Some(value) => value,
        None => doc.text_content(element)?,
    };
    Ok(normalize_lines(&raw))
}

fn normalize_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0usize;
    for line in raw.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(&line);
        blank_run = 0;
    }
    out
}

fn resolve_text<D>(
    doc: &D,
    scope: Option<D::Element>,
    set: &SelectorSet,
) -> Result<Option<D::Element>, DomError>
where
    D: DocumentProvider + ?Sized,
{
    for candidate in &set.candidates {
        let Some(element) = skip_invalid(candidate, doc.query_selector(scope, candidate))? else {
            continue;
        };
        if !element_text(doc, element)?.is_empty() {
            debug!(role = ?set.role, selector = %candidate, "resolved");
            return Ok(Some(element));
        }
    }
    Ok(None)
}

fn resolve_input<D>(
    doc: &D,
    scope: Option<D::Element>,
    set: &SelectorSet,
) -> Result<Option<D::Element>, DomError>
where
    D: DocumentProvider + ?Sized,
{
    // Composers are often revealed only on focus, so a hidden match is still
    // better than nothing.
    for candidate in &set.candidates {
        let Some(all) = skip_invalid(candidate, doc.query_selector_all(scope, candidate).map(Some))?
        else {
            continue;
        };
        for element in all {
            if doc.is_rendered(element)? {
                debug!(selector = %candidate, "resolved rendered input");
                return Ok(Some(element));
            }
        }
    }

    for candidate in &set.candidates {
        if let Some(element) = skip_invalid(candidate, doc.query_selector(scope, candidate))? {
            debug!(selector = %candidate, "resolved input ignoring visibility");
            return Ok(Some(element));
        }
    }
    Ok(None)
}

/// All elements matched by `primary`, or by `fallback` when `primary` matches
/// nothing. Results keep document order per selector and contain no duplicates.
pub fn select_all_with_fallback<D>(
    doc: &D,
    scope: Option<D::Element>,
    primary: &[String],
    fallback: &[String],
) -> Result<Vec<D::Element>, DomError>
where
    D: DocumentProvider + ?Sized,
{
    let chosen = select_all(doc, scope, primary)?;
    if chosen.is_empty() {
        select_all(doc, scope, fallback)
    } else {
        Ok(chosen)
    }
}

fn select_all<D>(
    doc: &D,
    scope: Option<D::Element>,
    selectors: &[String],
) -> Result<Vec<D::Element>, DomError>
where
    D: DocumentProvider + ?Sized,
{
    let mut out: Vec<D::Element> = Vec::new();
    for selector in selectors {
        let Some(found) = skip_invalid(selector, doc.query_selector_all(scope, selector).map(Some))?
        else {
            continue;
        };
        for element in found {
            if !out.contains(&element) {
                out.push(element);
            }
        }
    }
    Ok(out)
}

fn skip_invalid<T>(selector: &str, result: Result<Option<T>, DomError>) -> Result<Option<T>, DomError> {
    match result {
        Err(e) if e.is_invalid_selector() => {
            warn!(selector = %selector, error = %e, "skipping invalid selector");
            Ok(None)
        }
        other => other,
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
