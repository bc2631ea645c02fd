//! Form filling.
//!
//! Writes text into a page element so that the page's own framework notices.
//! Plain controls get a value plus `input`/`change` events. Rich editors that
//! keep their own document model are tried with a synthetic paste, then edit
//! commands, then a rebuilt paragraph DOM. Plain contenteditable regions get
//! edit commands, then paste.
//!
//! Filling reports failure as data; it never returns an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use pagebridge_protocols::{
    DocumentMut, DomError, DomEvent, DomEventKind, EditCommand, FillRequest, FillStrategyKind,
    SiteProfile, TargetDescriptor,
};

use crate::resolve::resolve;

/// User-facing message when nothing could be filled.
pub const NO_FILLABLE_FIELD: &str = "could not find a fillable field";

const EDITING_HOST: &str = "[contenteditable]:not([contenteditable=\"false\"])";

/// Input types that do not take free text.
const NON_TEXT_INPUTS: [&str; 10] = [
    "hidden", "checkbox", "radio", "submit", "button", "reset", "file", "image", "range", "color",
];

/// A fill technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    /// Value assignment with `input` and `change` events.
    Value,
    /// Synthetic paste carrying plain-text clipboard data.
    Paste,
    /// Select-all, delete and insert-text edit commands.
    EditCommands,
    /// Paragraph-per-line DOM followed by `beforeinput`/`input`.
    DomReconstruction,
}

/// Outcome of a fill attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    pub success: bool,
    /// Method that succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<FillMethod>,
    /// Methods tried, in order.
    #[serde(default)]
    pub attempts: Vec<FillMethod>,
    /// Selectors considered while locating the target.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub considered: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FillReport {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    Control,
    RichEditor,
    Editable,
    Unfillable,
}

/// Fills page elements with text.
#[derive(Debug, Clone, Default)]
pub struct FormFiller {
    rich_editor_markers: Vec<String>,
    strategy: FillStrategyKind,
}

impl FormFiller {
    pub fn new(rich_editor_markers: Vec<String>) -> Self {
        Self {
            rich_editor_markers,
            strategy: FillStrategyKind::Auto,
        }
    }

    /// Filler configured from a profile's editor markers and strategy.
    pub fn for_profile(profile: &SiteProfile) -> Self {
        Self {
            rich_editor_markers: profile.rich_editor_markers.clone(),
            strategy: profile.fill,
        }
    }

    pub fn with_strategy(mut self, strategy: FillStrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fill `element` with `text`. Returns whether any method succeeded.
    pub fn fill<D: DocumentMut + ?Sized>(&self, doc: &mut D, element: D::Element, text: &str) -> bool {
        self.fill_with_report(doc, element, text).success
    }

    /// Fill `element` with `text`, reporting every method attempted.
    pub fn fill_with_report<D: DocumentMut + ?Sized>(
        &self,
        doc: &mut D,
        element: D::Element,
        text: &str,
    ) -> FillReport {
        let kind = match self.classify(doc, element) {
            Ok(kind) => kind,
            Err(e) => {
                warn!(error = %e, "fill target unusable");
                return FillReport::failed(e.to_string());
            }
        };
        debug!(?kind, chars = text.chars().count(), "filling element");

        let tiers: &[FillMethod] = match kind {
            TargetKind::Control => &[FillMethod::Value],
            TargetKind::RichEditor => &[
                FillMethod::Paste,
                FillMethod::EditCommands,
                FillMethod::DomReconstruction,
            ],
            TargetKind::Editable => &[FillMethod::EditCommands, FillMethod::Paste],
            TargetKind::Unfillable => {
                return FillReport::failed("element does not accept text");
            }
        };

        let mut report = FillReport::default();
        for &method in tiers {
            report.attempts.push(method);
            let delete_first = kind == TargetKind::RichEditor;
            let outcome = match method {
                FillMethod::Value => fill_value(doc, element, text),
                FillMethod::Paste => fill_paste(doc, element, text),
                FillMethod::EditCommands => fill_commands(doc, element, text, delete_first),
                FillMethod::DomReconstruction => fill_rebuild(doc, element, text),
            };
            match outcome {
                Ok(true) => {
                    info!(?method, "element filled");
                    report.success = true;
                    report.method = Some(method);
                    return report;
                }
                Ok(false) => debug!(?method, "fill method rejected"),
                Err(e) => warn!(?method, error = %e, "fill method failed"),
            }
        }
        report.error = Some("every fill method was rejected".to_string());
        report
    }

    /// Locate the target named by `request` and fill it.
    pub fn fill_request<D: DocumentMut + ?Sized>(
        &self,
        doc: &mut D,
        profile: &SiteProfile,
        request: &FillRequest,
    ) -> FillReport {
        let (target, considered) = match &request.target {
            TargetDescriptor::ProfileInput => (
                resolve(doc, None, &profile.input),
                profile.input.candidates.clone(),
            ),
            TargetDescriptor::Selector { selector } => {
                (doc.query_selector(None, selector), vec![selector.clone()])
            }
            TargetDescriptor::Focused => (Ok(doc.focused()), vec![":focus".to_string()]),
        };

        let mut report = match target {
            Ok(Some(element)) => self.fill_with_report(doc, element, &request.text),
            Ok(None) => FillReport::failed(NO_FILLABLE_FIELD),
            Err(e) => {
                warn!(error = %e, "fill target lookup failed");
                FillReport::failed(e.to_string())
            }
        };
        report.considered = considered;
        report
    }

    fn classify<D: DocumentMut + ?Sized>(
        &self,
        doc: &D,
        element: D::Element,
    ) -> Result<TargetKind, DomError> {
        let tag = doc.tag_name(element)?;
        let control = match tag.as_str() {
            "textarea" => true,
            "input" => {
                let input_type = doc
                    .attribute(element, "type")?
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                !NON_TEXT_INPUTS.contains(&input_type.as_str())
            }
            _ => false,
        };
        let editable = doc.closest(element, EDITING_HOST)?.is_some();

        let kind = match self.strategy {
            FillStrategyKind::Value if control => TargetKind::Control,
            FillStrategyKind::RichText if editable => TargetKind::RichEditor,
            FillStrategyKind::Editable if editable => TargetKind::Editable,
            _ if control => TargetKind::Control,
            _ if editable && self.is_rich_editor(doc, element) => TargetKind::RichEditor,
            _ if editable => TargetKind::Editable,
            _ => TargetKind::Unfillable,
        };
        Ok(kind)
    }

    fn is_rich_editor<D: DocumentMut + ?Sized>(&self, doc: &D, element: D::Element) -> bool {
        self.rich_editor_markers.iter().any(|marker| match doc.closest(element, marker) {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(selector = %marker, error = %e, "skipping invalid editor marker");
                false
            }
        })
    }
}

fn fill_value<D: DocumentMut + ?Sized>(
    doc: &mut D,
    element: D::Element,
    text: &str,
) -> Result<bool, DomError> {
    doc.set_value(element, text)?;
    doc.dispatch(element, DomEvent::bubbling(DomEventKind::Input))?;
    doc.dispatch(element, DomEvent::bubbling(DomEventKind::Change))?;
    Ok(doc.value(element)?.as_deref() == Some(text))
}

fn fill_paste<D: DocumentMut + ?Sized>(
    doc: &mut D,
    element: D::Element,
    text: &str,
) -> Result<bool, DomError> {
    doc.focus(element)?;
    let outcome = doc.dispatch(element, DomEvent::paste(text))?;
    if !outcome.default_prevented {
        return Ok(false);
    }
    reflects(doc, element, text)
}

fn fill_commands<D: DocumentMut + ?Sized>(
    doc: &mut D,
    element: D::Element,
    text: &str,
    delete_first: bool,
) -> Result<bool, DomError> {
    doc.focus(element)?;
    if !doc.exec_command(element, EditCommand::SelectAll)? {
        return Ok(false);
    }
    if delete_first && !doc.exec_command(element, EditCommand::Delete)? {
        return Ok(false);
    }
    if !doc.exec_command(element, EditCommand::InsertText(text.to_string()))? {
        return Ok(false);
    }
    reflects(doc, element, text)
}

fn fill_rebuild<D: DocumentMut + ?Sized>(
    doc: &mut D,
    element: D::Element,
    text: &str,
) -> Result<bool, DomError> {
    let lines: Vec<&str> = text.split('\n').collect();
    doc.replace_with_paragraphs(element, &lines)?;
    doc.dispatch(element, DomEvent::insert_text(DomEventKind::BeforeInput, text))?;
    doc.dispatch(element, DomEvent::insert_text(DomEventKind::Input, text))?;
    reflects(doc, element, text)
}

/// Whether the element's text now equals `text`, ignoring whitespace layout.
fn reflects<D: DocumentMut + ?Sized>(
    doc: &D,
    element: D::Element,
    text: &str,
) -> Result<bool, DomError> {
    let current = doc.text_content(element)?;
    Ok(squash(&current) == squash(text))
}

fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
#[path = "fill_tests.rs"]
mod tests;
