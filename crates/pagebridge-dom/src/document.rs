//! The in-memory document.

use std::collections::{HashMap, HashSet};

use ego_tree::NodeId;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use pagebridge_protocols::{
    ChangeFeed, ChangeSender, DocumentMut, DocumentProvider, DomError, DomEvent, DomEventKind,
    EditCommand, EventOutcome, MutationBatch, ObservableDocument,
};

use crate::fragment::{graft_fragment, paragraphs_html, typed_text_html};
use crate::host::{DispatchedEvent, HostBehavior};

/// A parsed HTML page with mutable tree, form values, focus and markers.
///
/// Element handles are `ego_tree` node ids. A handle whose node has been
/// removed stays valid as a value but every element operation on it fails
/// with [`DomError::StaleElement`].
#[derive(Debug)]
pub struct StaticDocument {
    html: Html,
    url: String,
    values: HashMap<NodeId, String>,
    markers: HashMap<NodeId, HashSet<String>>,
    focused: Option<NodeId>,
    selection: Option<NodeId>,
    host: HostBehavior,
    events: Vec<DispatchedEvent>,
    subscribers: Vec<ChangeSender<NodeId>>,
}

impl StaticDocument {
    /// Parse a full HTML document loaded from `url`.
    pub fn parse(html: &str, url: impl Into<String>) -> Self {
        Self {
            html: Html::parse_document(html),
            url: url.into(),
            values: HashMap::new(),
            markers: HashMap::new(),
            focused: None,
            selection: None,
            host: HostBehavior::default(),
            events: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn with_host(mut self, host: HostBehavior) -> Self {
        self.host = host;
        self
    }

    pub fn host(&self) -> HostBehavior {
        self.host
    }

    pub fn set_host(&mut self, host: HostBehavior) {
        self.host = host;
    }

    /// Every event dispatched so far, oldest first.
    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    /// Event kinds dispatched at `target`, oldest first.
    pub fn event_kinds_for(&self, target: NodeId) -> Vec<DomEventKind> {
        self.events
            .iter()
            .filter(|e| e.target == target)
            .map(|e| e.event.kind)
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// The `<body>` element.
    pub fn body(&self) -> Option<NodeId> {
        self.query_selector(None, "body").ok().flatten()
    }

    pub fn outer_html(&self, element: NodeId) -> Result<String, DomError> {
        Ok(self.element(element)?.html())
    }

    pub fn inner_html(&self, element: NodeId) -> Result<String, DomError> {
        Ok(self.element(element)?.inner_html())
    }

    /// Append parsed `html` to `parent` and notify subscribers of the
    /// top-level elements added.
    pub fn append_html(&mut self, parent: NodeId, html: &str) -> Result<Vec<NodeId>, DomError> {
        self.element(parent)?;
        let added = graft_fragment(&mut self.html.tree, parent, html).ok_or(DomError::StaleElement)?;
        let elements: Vec<NodeId> = added
            .into_iter()
            .filter(|id| {
                self.html
                    .tree
                    .get(*id)
                    .is_some_and(|node| node.value().is_element())
            })
            .collect();
        self.publish(&elements);
        Ok(elements)
    }

    /// Detach `element` and its subtree from the document.
    pub fn remove(&mut self, element: NodeId) -> Result<(), DomError> {
        self.element(element)?;
        if let Some(mut node) = self.html.tree.get_mut(element) {
            node.detach();
        }
        if self.focused.is_some_and(|id| !self.is_connected(id)) {
            self.focused = None;
        }
        if self.selection.is_some_and(|id| !self.is_connected(id)) {
            self.selection = None;
        }
        Ok(())
    }

    /// End every change feed, as when the page unloads.
    pub fn close_feeds(&mut self) {
        self.subscribers.clear();
    }

    fn element(&self, id: NodeId) -> Result<ElementRef<'_>, DomError> {
        if !self.is_connected(id) {
            return Err(DomError::StaleElement);
        }
        self.html
            .tree
            .get(id)
            .and_then(ElementRef::wrap)
            .ok_or(DomError::StaleElement)
    }

    /// Nearest inclusive ancestor that is an editing host.
    fn editable_root(&self, id: NodeId) -> Option<NodeId> {
        let el = self.element(id).ok()?;
        inclusive_ancestors(el)
            .find(|e| {
                e.value()
                    .attr("contenteditable")
                    .is_some_and(|v| !v.eq_ignore_ascii_case("false"))
            })
            .map(|e| e.id())
    }

    fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = match self.html.tree.get(id) {
            Some(node) => node.children().map(|c| c.id()).collect(),
            None => return,
        };
        for child in children {
            if let Some(mut node) = self.html.tree.get_mut(child) {
                node.detach();
            }
        }
    }

    fn replace_children(&mut self, id: NodeId, html: &str) -> Result<(), DomError> {
        self.clear_children(id);
        graft_fragment(&mut self.html.tree, id, html).ok_or(DomError::StaleElement)?;
        Ok(())
    }

    fn record(&mut self, target: NodeId, event: DomEvent, default_prevented: bool) {
        trace!(kind = %event.kind, ?target, default_prevented, "event dispatched");
        self.events.push(DispatchedEvent {
            target,
            event,
            default_prevented,
        });
    }

    fn publish(&mut self, added: &[NodeId]) {
        if added.is_empty() {
            return;
        }
        self.subscribers.retain(|sender| {
            sender.publish(MutationBatch {
                added: added.to_vec(),
            })
        });
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DomError> {
    Selector::parse(selector).map_err(|e| DomError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

fn inclusive_ancestors(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    std::iter::once(el).chain(el.ancestors().filter_map(ElementRef::wrap))
}

/// Whether `element` itself removes its subtree from layout.
fn hides_subtree(element: &Element) -> bool {
    if matches!(element.name(), "head" | "template" | "script" | "style" | "noscript") {
        return true;
    }
    if element.attr("hidden").is_some() {
        return true;
    }
    element.attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.split(';').any(|decl| decl == "display:none")
    })
}

impl DocumentProvider for StaticDocument {
    type Element = NodeId;

    fn url(&self) -> &str {
        &self.url
    }

    fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .root_element()
            .select(&selector)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
    }

    fn query_selector(
        &self,
        scope: Option<NodeId>,
        selector: &str,
    ) -> Result<Option<NodeId>, DomError> {
        let selector = parse_selector(selector)?;
        let root = match scope {
            Some(id) => self.element(id)?,
            None => self.html.root_element(),
        };
        Ok(root
            .select(&selector)
            .map(|e| e.id())
            .find(|id| Some(*id) != scope))
    }

    fn query_selector_all(
        &self,
        scope: Option<NodeId>,
        selector: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        let selector = parse_selector(selector)?;
        let root = match scope {
            Some(id) => self.element(id)?,
            None => self.html.root_element(),
        };
        Ok(root
            .select(&selector)
            .map(|e| e.id())
            .filter(|id| Some(*id) != scope)
            .collect())
    }

    fn matches(&self, element: NodeId, selector: &str) -> Result<bool, DomError> {
        let selector = parse_selector(selector)?;
        Ok(selector.matches(&self.element(element)?))
    }

    fn closest(&self, element: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        let selector = parse_selector(selector)?;
        let el = self.element(element)?;
        Ok(inclusive_ancestors(el)
            .find(|e| selector.matches(e))
            .map(|e| e.id()))
    }

    fn tag_name(&self, element: NodeId) -> Result<String, DomError> {
        Ok(self.element(element)?.value().name().to_ascii_lowercase())
    }

    fn attribute(&self, element: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.element(element)?.value().attr(name).map(str::to_string))
    }

    fn text_content(&self, element: NodeId) -> Result<String, DomError> {
        Ok(self.element(element)?.text().collect())
    }

    fn value(&self, element: NodeId) -> Result<Option<String>, DomError> {
        let el = self.element(element)?;
        let assigned = self.values.get(&element).cloned();
        let value = match el.value().name() {
            "input" => assigned.unwrap_or_else(|| el.value().attr("value").unwrap_or_default().to_string()),
            "textarea" => assigned.unwrap_or_else(|| el.text().collect()),
            "select" => assigned.unwrap_or_default(),
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    fn is_rendered(&self, element: NodeId) -> Result<bool, DomError> {
        let el = self.element(element)?;
        let hidden_input = el.value().name() == "input"
            && el
                .value()
                .attr("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("hidden"));
        if hidden_input {
            return Ok(false);
        }
        Ok(!inclusive_ancestors(el).any(|e| hides_subtree(e.value())))
    }

    fn is_connected(&self, element: NodeId) -> bool {
        let root = self.html.tree.root().id();
        if element == root {
            return true;
        }
        self.html
            .tree
            .get(element)
            .is_some_and(|node| node.ancestors().any(|a| a.id() == root))
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|id| self.is_connected(*id))
    }
}

impl DocumentMut for StaticDocument {
    fn set_value(&mut self, element: NodeId, value: &str) -> Result<(), DomError> {
        let tag = self.tag_name(element)?;
        if !matches!(tag.as_str(), "input" | "textarea" | "select") {
            return Err(DomError::Unsupported {
                tag,
                operation: "set_value".to_string(),
            });
        }
        self.values.insert(element, value.to_string());
        Ok(())
    }

    fn focus(&mut self, element: NodeId) -> Result<(), DomError> {
        self.element(element)?;
        self.focused = Some(element);
        self.record(
            element,
            DomEvent {
                kind: DomEventKind::Focus,
                bubbles: false,
                data: None,
                input_type: None,
            },
            false,
        );
        Ok(())
    }

    fn dispatch(&mut self, element: NodeId, event: DomEvent) -> Result<EventOutcome, DomError> {
        self.element(element)?;
        let mut default_prevented = false;
        if event.kind == DomEventKind::Paste && self.host.paste_handled {
            if let Some(root) = self.editable_root(element) {
                let text = event.data.clone().unwrap_or_default();
                if root == element {
                    let lines: Vec<&str> = text.split('\n').collect();
                    self.replace_children(root, &paragraphs_html(&lines))?;
                } else {
                    // The caret sits in a block inside the editor; only that
                    // block is replaced so the target stays attached.
                    self.replace_children(element, &typed_text_html(&text))?;
                }
                default_prevented = true;
            }
        }
        self.record(element, event, default_prevented);
        Ok(EventOutcome { default_prevented })
    }

    fn exec_command(&mut self, element: NodeId, command: EditCommand) -> Result<bool, DomError> {
        let tag = self.tag_name(element)?;
        if !self.host.exec_command_supported {
            debug!(command = command.name(), "edit commands unavailable on this page");
            return Ok(false);
        }
        if self.focused != Some(element) {
            debug!(command = command.name(), "edit command target is not focused");
            return Ok(false);
        }
        let value_control = matches!(tag.as_str(), "input" | "textarea");
        if !value_control && self.editable_root(element).is_none() {
            return Ok(false);
        }

        match command {
            EditCommand::SelectAll => {
                self.selection = Some(element);
            }
            EditCommand::Delete => {
                if self.selection == Some(element) {
                    if value_control {
                        self.values.insert(element, String::new());
                    } else {
                        self.clear_children(element);
                    }
                    self.selection = None;
                }
            }
            EditCommand::InsertText(text) => {
                let replace = self.selection.take() == Some(element);
                if value_control {
                    let mut current = if replace {
                        String::new()
                    } else {
                        self.value(element)?.unwrap_or_default()
                    };
                    current.push_str(&text);
                    self.values.insert(element, current);
                } else {
                    if replace {
                        self.clear_children(element);
                    }
                    graft_fragment(&mut self.html.tree, element, &typed_text_html(&text))
                        .ok_or(DomError::StaleElement)?;
                }
                self.record(element, DomEvent::insert_text(DomEventKind::Input, text), false);
            }
        }
        Ok(true)
    }

    fn replace_with_paragraphs(&mut self, element: NodeId, lines: &[&str]) -> Result<(), DomError> {
        self.element(element)?;
        self.replace_children(element, &paragraphs_html(lines))
    }

    fn mark(&mut self, element: NodeId, marker: &str) -> Result<bool, DomError> {
        self.element(element)?;
        Ok(self
            .markers
            .entry(element)
            .or_default()
            .insert(marker.to_string()))
    }

    fn is_marked(&self, element: NodeId, marker: &str) -> bool {
        self.markers
            .get(&element)
            .is_some_and(|set| set.contains(marker))
    }
}

impl ObservableDocument for StaticDocument {
    fn subscribe(&mut self) -> ChangeFeed<NodeId> {
        let (sender, feed) = ChangeFeed::channel();
        self.subscribers.push(sender);
        feed
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
