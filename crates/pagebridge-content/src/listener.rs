//! Content-script message listener.
//!
//! Answers bridge messages for one page: context extraction, form fill,
//! sidebar toggling and liveness pings.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, info};

use pagebridge_protocols::{
    BridgeMessage, BridgeResponse, DocumentMut, FillRequest, MessageListener, ObservableDocument,
    PageContext, SiteProfile,
};

use crate::extract::ContextExtractor;
use crate::fill::{FillReport, FormFiller, NO_FILLABLE_FIELD};
use crate::inject::{ElementMatcher, InjectionManager};

/// The per-page side of the bridge.
pub struct ContentScript<D: DocumentMut> {
    doc: Arc<Mutex<D>>,
    profile: SiteProfile,
    extractor: ContextExtractor,
    filler: FormFiller,
    injection: InjectionManager,
    sidebar_open: AtomicBool,
    affordances: Arc<Mutex<Vec<D::Element>>>,
}

impl<D: DocumentMut> ContentScript<D> {
    pub fn new(
        doc: Arc<Mutex<D>>,
        profile: SiteProfile,
        extractor: ContextExtractor,
        injection: InjectionManager,
    ) -> Self {
        let filler = FormFiller::for_profile(&profile);
        Self {
            doc,
            profile,
            extractor,
            filler,
            injection,
            sidebar_open: AtomicBool::new(false),
            affordances: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    pub fn document(&self) -> &Arc<Mutex<D>> {
        &self.doc
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open.load(Ordering::SeqCst)
    }

    /// Elements that received an affordance so far.
    pub fn affordances(&self) -> Vec<D::Element> {
        self.affordances.lock().clone()
    }

    pub fn page_context(&self) -> PageContext {
        let doc = self.doc.lock();
        self.extractor.extract(&self.profile, &*doc)
    }

    pub fn fill(&self, request: &FillRequest) -> FillReport {
        let mut doc = self.doc.lock();
        self.filler.fill_request(&mut *doc, &self.profile, request)
    }

    fn toggle_sidebar(&self) -> bool {
        !self.sidebar_open.fetch_xor(true, Ordering::SeqCst)
    }
}

impl<D> ContentScript<D>
where
    D: DocumentMut + ObservableDocument + Send,
{
    /// Attach affordances to the profile's composers now and whenever the
    /// page adds more. Resolves when the page's change feed ends.
    pub async fn attach_affordances(&self) -> usize {
        let feed = self.doc.lock().subscribe();
        let matcher = ElementMatcher::for_inputs(&self.profile);
        let affordances = self.affordances.clone();
        let total = self
            .injection
            .observe(self.doc.clone(), feed, &matcher, move |element| {
                affordances.lock().push(element);
            })
            .await;
        info!(platform = %self.profile.platform, total, "affordance observer stopped");
        total
    }
}

#[async_trait]
impl<D> MessageListener for ContentScript<D>
where
    D: DocumentMut + Send + 'static,
{
    fn name(&self) -> &str {
        "content-script"
    }

    async fn on_message(&self, message: &BridgeMessage) -> Option<BridgeResponse> {
        debug!(kind = message.kind(), platform = %self.profile.platform, "content script message");
        let response = match message {
            BridgeMessage::GetPageContext => BridgeResponse::with_context(self.page_context()),
            BridgeMessage::FillForm(request) => {
                let report = self.fill(request);
                let data = serde_json::to_value(&report).unwrap_or_default();
                if report.success {
                    BridgeResponse::ok().data(data)
                } else {
                    BridgeResponse::failure(NO_FILLABLE_FIELD).data(data)
                }
            }
            BridgeMessage::ToggleSidebar => {
                let open = self.toggle_sidebar();
                BridgeResponse::ok().data(json!({ "open": open }))
            }
            BridgeMessage::Ping => BridgeResponse::ok().data(json!("pong")),
        };
        Some(response)
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
