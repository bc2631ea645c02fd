use super::*;

use pagebridge_dom::{NodeId, StaticDocument};
use pagebridge_protocols::{DocumentProvider, TargetDescriptor};

use crate::extract::ContextExtractor;
use crate::profile::builtin;

const PAGE: &str = r#"<html><head><title>r/rust</title></head><body>
  <shreddit-post tabindex="-1">
    <h1 id="post-title-t3_1">Hello</h1>
    <div slot="text-body">World this is long enough</div>
  </shreddit-post>
  <shreddit-composer><div id="composer" contenteditable="true" role="textbox"></div></shreddit-composer>
</body></html>"#;

fn script(html: &str) -> ContentScript<StaticDocument> {
    let doc = StaticDocument::parse(html, "https://www.reddit.com/r/rust/comments/1/hello");
    ContentScript::new(
        Arc::new(Mutex::new(doc)),
        builtin::reddit(),
        ContextExtractor::default(),
        InjectionManager::new("pagebridge-visited"),
    )
}

#[tokio::test]
async fn test_get_page_context() {
    let script = script(PAGE);
    let response = script.on_message(&BridgeMessage::GetPageContext).await.unwrap();
    assert!(response.success);
    let context = response.context.unwrap();
    assert_eq!(context.title, "Hello");
    assert_eq!(context.content, "World this is long enough");
    assert_eq!(context.platform, "reddit");
}

#[tokio::test]
async fn test_fill_form() {
    let script = script(PAGE);
    let message = BridgeMessage::FillForm(FillRequest::new("Nice post"));
    let response = script.on_message(&message).await.unwrap();
    assert!(response.success, "{response:?}");
    let data = response.data.unwrap();
    assert_eq!(data["success"], true);
    assert_eq!(data["method"], "edit_commands");

    let doc = script.document().lock();
    let composer = doc.query_selector(None, "#composer").unwrap().unwrap();
    assert_eq!(doc.text_content(composer).unwrap(), "Nice post");
}

#[tokio::test]
async fn test_fill_form_without_field() {
    let script = script("<p>nothing to fill</p>");
    let message = BridgeMessage::FillForm(FillRequest::new("text").with_target(
        TargetDescriptor::Selector {
            selector: "#missing".to_string(),
        },
    ));
    let response = script.on_message(&message).await.unwrap();
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some(NO_FILLABLE_FIELD));
    assert_eq!(response.data.unwrap()["considered"][0], "#missing");
}

#[tokio::test]
async fn test_toggle_sidebar() {
    let script = script(PAGE);
    assert!(!script.sidebar_open());

    let first = script.on_message(&BridgeMessage::ToggleSidebar).await.unwrap();
    assert_eq!(first.data.unwrap()["open"], true);
    assert!(script.sidebar_open());

    let second = script.on_message(&BridgeMessage::ToggleSidebar).await.unwrap();
    assert_eq!(second.data.unwrap()["open"], false);
    assert!(!script.sidebar_open());
}

#[tokio::test]
async fn test_ping() {
    let script = script(PAGE);
    let response = script.on_message(&BridgeMessage::Ping).await.unwrap();
    assert!(response.success);
    assert_eq!(response.data.unwrap(), "pong");
    assert_eq!(script.name(), "content-script");
}

#[tokio::test]
async fn test_attach_affordances() {
    let script = Arc::new(script(PAGE));
    let task = {
        let script = script.clone();
        tokio::spawn(async move { script.attach_affordances().await })
    };
    // The initial scan runs after the subscription is in place.
    while script.affordances().is_empty() {
        tokio::task::yield_now().await;
    }

    let added: Vec<NodeId> = {
        let mut doc = script.document().lock();
        let body = doc.body().unwrap();
        let added = doc
            .append_html(body, r#"<textarea name="text"></textarea>"#)
            .unwrap();
        doc.close_feeds();
        added
    };

    let total = task.await.unwrap();
    assert_eq!(total, 2);
    let affordances = script.affordances();
    assert_eq!(affordances.len(), 2);
    assert!(affordances.contains(&added[0]));
}
