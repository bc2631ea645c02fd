//! Document provider seam.
//!
//! All DOM reads and writes made by extraction, fill and injection logic go
//! through these traits, so that logic runs unchanged against a live page
//! adapter or an in-memory document.
//!
//! ## Traits
//!
//! - [`DocumentProvider`] - read-only queries
//! - [`DocumentMut`] - value assignment, synthetic events, edit commands, markers
//! - [`ObservableDocument`] - a [`ChangeFeed`] of added elements

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::DomError;

/// Read access to a document.
///
/// Queries return elements in document order. A selector that matches nothing
/// yields `Ok(None)` / an empty vector; errors are reserved for invalid
/// selectors and detached elements.
pub trait DocumentProvider {
    /// Opaque, cheap handle to an element node.
    type Element: Copy + Eq + Hash + fmt::Debug + Send + 'static;

    /// Current page URL.
    fn url(&self) -> &str;

    /// Text of the `<title>` element, if present.
    fn title(&self) -> Option<String>;

    /// First descendant of `scope` (or of the document) matching `selector`.
    fn query_selector(
        &self,
        scope: Option<Self::Element>,
        selector: &str,
    ) -> Result<Option<Self::Element>, DomError>;

    /// All descendants of `scope` (or of the document) matching `selector`.
    fn query_selector_all(
        &self,
        scope: Option<Self::Element>,
        selector: &str,
    ) -> Result<Vec<Self::Element>, DomError>;

    /// Whether `element` itself matches `selector`.
    fn matches(&self, element: Self::Element, selector: &str) -> Result<bool, DomError>;

    /// Nearest inclusive ancestor of `element` matching `selector`.
    fn closest(
        &self,
        element: Self::Element,
        selector: &str,
    ) -> Result<Option<Self::Element>, DomError>;

    /// Lowercase tag name.
    fn tag_name(&self, element: Self::Element) -> Result<String, DomError>;

    fn attribute(&self, element: Self::Element, name: &str) -> Result<Option<String>, DomError>;

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self, element: Self::Element) -> Result<String, DomError>;

    /// Current value of a form control; `None` for other elements.
    fn value(&self, element: Self::Element) -> Result<Option<String>, DomError>;

    /// Whether the element takes part in layout (`offsetParent !== null`).
    fn is_rendered(&self, element: Self::Element) -> Result<bool, DomError>;

    /// Whether the element is still attached to the document.
    fn is_connected(&self, element: Self::Element) -> bool;

    /// Element that currently has focus.
    fn focused(&self) -> Option<Self::Element>;
}

/// Kinds of synthetic events a fill strategy dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomEventKind {
    Input,
    Change,
    BeforeInput,
    Paste,
    Focus,
}

impl DomEventKind {
    /// DOM event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomEventKind::Input => "input",
            DomEventKind::Change => "change",
            DomEventKind::BeforeInput => "beforeinput",
            DomEventKind::Paste => "paste",
            DomEventKind::Focus => "focus",
        }
    }
}

impl fmt::Display for DomEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthetic event.
///
/// For `Paste`, `data` is the `text/plain` clipboard payload; for
/// `Input`/`BeforeInput` it is the inserted text and `input_type` names the
/// edit (`insertText`, `insertFromPaste`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomEvent {
    pub kind: DomEventKind,
    pub bubbles: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
}

impl DomEvent {
    /// Bubbling event without data.
    pub fn bubbling(kind: DomEventKind) -> Self {
        Self {
            kind,
            bubbles: true,
            data: None,
            input_type: None,
        }
    }

    /// Bubbling `input`/`beforeinput` event describing inserted text.
    pub fn insert_text(kind: DomEventKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            bubbles: true,
            data: Some(text.into()),
            input_type: Some("insertText".to_string()),
        }
    }

    /// Bubbling paste carrying plain-text clipboard data.
    pub fn paste(text: impl Into<String>) -> Self {
        Self {
            kind: DomEventKind::Paste,
            bubbles: true,
            data: Some(text.into()),
            input_type: Some("insertFromPaste".to_string()),
        }
    }
}

/// Result of dispatching an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// A listener on the page called `preventDefault()`, i.e. handled it.
    pub default_prevented: bool,
}

/// Editing commands in the spirit of `document.execCommand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    SelectAll,
    Delete,
    InsertText(String),
}

impl EditCommand {
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::SelectAll => "selectAll",
            EditCommand::Delete => "delete",
            EditCommand::InsertText(_) => "insertText",
        }
    }
}

/// Write access to a document.
pub trait DocumentMut: DocumentProvider {
    /// Assign the value of a form control.
    fn set_value(&mut self, element: Self::Element, value: &str) -> Result<(), DomError>;

    fn focus(&mut self, element: Self::Element) -> Result<(), DomError>;

    /// Dispatch a synthetic event at `element`.
    fn dispatch(&mut self, element: Self::Element, event: DomEvent)
    -> Result<EventOutcome, DomError>;

    /// Run an editing command against the focused editable `element`.
    ///
    /// Returns `false` when the host page rejects or does not support it.
    fn exec_command(
        &mut self,
        element: Self::Element,
        command: EditCommand,
    ) -> Result<bool, DomError>;

    /// Replace the children of `element` with one paragraph per line.
    fn replace_with_paragraphs(
        &mut self,
        element: Self::Element,
        lines: &[&str],
    ) -> Result<(), DomError>;

    /// Attach `marker` to `element`. Returns `true` if it was not set before.
    fn mark(&mut self, element: Self::Element, marker: &str) -> Result<bool, DomError>;

    fn is_marked(&self, element: Self::Element, marker: &str) -> bool;
}

/// A batch of elements added to the document by one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationBatch<E> {
    pub added: Vec<E>,
}

/// Cancellable subscription to document mutations.
///
/// Yields batches of added elements until cancelled or dropped, or until the
/// document goes away.
#[derive(Debug)]
pub struct ChangeFeed<E> {
    rx: mpsc::UnboundedReceiver<MutationBatch<E>>,
}

impl<E> ChangeFeed<E> {
    /// Create a feed and the sender a document uses to publish into it.
    pub fn channel() -> (ChangeSender<E>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChangeSender { tx }, Self { rx })
    }

    /// Next batch, or `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<MutationBatch<E>> {
        self.rx.recv().await
    }

    /// Next batch if one is already queued.
    pub fn try_next(&mut self) -> Option<MutationBatch<E>> {
        self.rx.try_recv().ok()
    }

    /// Stop delivery. Batches already queued are still returned by `next`.
    pub fn cancel(&mut self) {
        self.rx.close();
    }
}

/// Publishing half of a [`ChangeFeed`].
#[derive(Debug)]
pub struct ChangeSender<E> {
    tx: mpsc::UnboundedSender<MutationBatch<E>>,
}

impl<E> ChangeSender<E> {
    /// Publish a batch. Returns `false` once the subscriber is gone.
    pub fn publish(&self, batch: MutationBatch<E>) -> bool {
        self.tx.send(batch).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// A document that can report added elements.
pub trait ObservableDocument: DocumentProvider {
    fn subscribe(&mut self) -> ChangeFeed<Self::Element>;
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
