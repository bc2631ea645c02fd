use super::*;

use async_trait::async_trait;
use parking_lot::Mutex;
use pagebridge_content::{ContentScript, ContextExtractor, InjectionManager};
use pagebridge_dom::StaticDocument;
use pagebridge_protocols::{DocumentProvider, GenerationError, MessageListener};

use crate::runtime::local::LocalRuntime;
use crate::store::MemoryStore;

const TWEET: &str = "https://x.com/someone/status/1";
const PAGE: &str = r#"<html><body>
  <article data-testid="tweet" tabindex="-1">
    <div data-testid="User-Name">someone</div>
    <div data-testid="tweetText">Which async runtime do you use for CLIs?</div>
  </article>
  <textarea id="reply" data-testid="tweetTextarea_0"></textarea>
</body></html>"#;

/// Echoes a fixed set of candidates and remembers what it was asked.
struct FakeGenerator {
    candidates: Vec<String>,
    seen: Mutex<Vec<(String, Option<usize>)>>,
}

impl FakeGenerator {
    fn new(candidates: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn generate(
        &self,
        context: &PageContext,
        _product: &ProductInfo,
        constraints: &GenerationConstraints,
    ) -> Result<Vec<String>, GenerationError> {
        self.seen
            .lock()
            .push((context.content.clone(), constraints.max_chars));
        Ok(self.candidates.clone())
    }
}

struct FailingGenerator;

#[async_trait]
impl ContentGenerator for FailingGenerator {
    async fn generate(
        &self,
        _context: &PageContext,
        _product: &ProductInfo,
        _constraints: &GenerationConstraints,
    ) -> Result<Vec<String>, GenerationError> {
        Err(GenerationError::RateLimited {
            retry_after_seconds: 10,
        })
    }
}

fn product() -> ProductInfo {
    ProductInfo {
        name: "Tokio".to_string(),
        description: "An async runtime".to_string(),
        url: None,
    }
}

fn setup() -> (Arc<Mutex<StaticDocument>>, Arc<BackgroundCoordinator>) {
    let doc = Arc::new(Mutex::new(StaticDocument::parse(PAGE, TWEET)));
    let script = ContentScript::new(
        doc.clone(),
        pagebridge_content::profile::builtin::twitter(),
        ContextExtractor::default(),
        InjectionManager::new("pagebridge-visited"),
    );
    let listener: Arc<dyn MessageListener> = Arc::new(script);
    let runtime = Arc::new(LocalRuntime::new());
    runtime.register_tab(1, TWEET).spawn(vec![listener]);
    runtime.set_active(1).unwrap();
    (doc, Arc::new(BackgroundCoordinator::new(runtime)))
}

#[tokio::test]
async fn test_draft_fills_first_candidate() {
    let (doc, coordinator) = setup();
    let generator = FakeGenerator::new(&["Tokio, every time.", "smol for tiny tools"]);
    let store = Arc::new(MemoryStore::new());
    let workflow = DraftWorkflow::new(coordinator, generator.clone(), store.clone());

    let outcome = workflow
        .run(None, &product(), &GenerationConstraints::default())
        .await
        .unwrap();
    assert!(outcome.filled, "{outcome:?}");
    assert_eq!(outcome.context.platform, "twitter");
    assert_eq!(outcome.candidates.len(), 2);

    {
        let doc = doc.lock();
        let reply = doc.query_selector(None, "#reply").unwrap().unwrap();
        assert_eq!(doc.value(reply).unwrap().as_deref(), Some("Tokio, every time."));
    }

    let seen = generator.seen.lock().clone();
    assert_eq!(
        seen,
        vec![(
            "Which async runtime do you use for CLIs?".to_string(),
            Some(280)
        )]
    );

    let content = store.records(CONTENT_TABLE).await.unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0].body["candidates"][1], "smol for tiny tools");
    let analytics = store.records(ANALYTICS_TABLE).await.unwrap();
    assert_eq!(analytics[0].body["filled"], true);
}

#[tokio::test]
async fn test_candidates_truncated_to_platform_limit() {
    let (doc, coordinator) = setup();
    let long = "y".repeat(400);
    let workflow = DraftWorkflow::new(
        coordinator,
        FakeGenerator::new(&[long.as_str()]),
        Arc::new(MemoryStore::new()),
    );

    let outcome = workflow
        .run(Some(1), &product(), &GenerationConstraints::default())
        .await
        .unwrap();
    assert_eq!(outcome.candidates[0].chars().count(), 280);

    let doc = doc.lock();
    let reply = doc.query_selector(None, "#reply").unwrap().unwrap();
    assert_eq!(doc.value(reply).unwrap().map(|v| v.len()), Some(280));
}

#[tokio::test]
async fn test_smaller_requested_limit_wins() {
    let (_doc, coordinator) = setup();
    let generator = FakeGenerator::new(&["ok"]);
    let workflow = DraftWorkflow::new(coordinator, generator.clone(), Arc::new(MemoryStore::new()));
    let constraints = GenerationConstraints {
        max_chars: Some(100),
        ..Default::default()
    };
    workflow.run(None, &product(), &constraints).await.unwrap();
    assert_eq!(generator.seen.lock()[0].1, Some(100));
}

#[tokio::test]
async fn test_no_candidates() {
    let (_doc, coordinator) = setup();
    let store = Arc::new(MemoryStore::new());
    let workflow = DraftWorkflow::new(coordinator, FakeGenerator::new(&["  "]), store.clone());
    let err = workflow
        .run(None, &product(), &GenerationConstraints::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NoCandidates));
    assert!(store.records(CONTENT_TABLE).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generation_error_propagates() {
    let (_doc, coordinator) = setup();
    let workflow = DraftWorkflow::new(
        coordinator,
        Arc::new(FailingGenerator),
        Arc::new(MemoryStore::new()),
    );
    let err = workflow
        .run(None, &product(), &GenerationConstraints::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Generation(GenerationError::RateLimited { .. })
    ));
}
