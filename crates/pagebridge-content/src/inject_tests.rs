use super::*;

use pagebridge_dom::{NodeId, StaticDocument};
use pagebridge_protocols::{MutationBatch, ObservableDocument};

const MARKER: &str = "pagebridge-visited";

fn doc(html: &str) -> StaticDocument {
    StaticDocument::parse(html, "https://example.org/feed")
}

#[test]
fn test_matcher_find() {
    let doc = doc(r#"<textarea id="a"></textarea><div hidden><textarea id="b"></textarea></div>"#);
    assert_eq!(ElementMatcher::new(["textarea"]).find(&doc).unwrap().len(), 2);
    assert_eq!(
        ElementMatcher::new(["textarea"])
            .rendered_only(true)
            .find(&doc)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_matcher_fallback() {
    let doc = doc(r#"<div contenteditable="true"></div>"#);
    let matcher = ElementMatcher::new(["textarea"]).with_fallback(["[contenteditable]"]);
    assert_eq!(matcher.find(&doc).unwrap().len(), 1);
}

#[test]
fn test_scan_marks_once() {
    let mut doc = doc(r#"<textarea></textarea><textarea></textarea>"#);
    let manager = InjectionManager::new(MARKER);
    let matcher = ElementMatcher::new(["textarea"]);
    let mut seen: Vec<NodeId> = Vec::new();

    assert_eq!(manager.scan(&mut doc, &matcher, &mut |el| seen.push(el)), 2);
    assert_eq!(manager.scan(&mut doc, &matcher, &mut |el| seen.push(el)), 0);
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|el| doc.is_marked(*el, MARKER)));
}

#[test]
fn test_scan_with_invalid_selector_attaches_nothing() {
    let mut doc = doc(r#"<textarea></textarea>"#);
    let manager = InjectionManager::new(MARKER);
    let matcher = ElementMatcher::new(["textarea["]);
    assert_eq!(manager.scan(&mut doc, &matcher, &mut |_| {}), 0);
}

#[test]
fn test_different_markers_are_independent() {
    let mut doc = doc(r#"<textarea></textarea>"#);
    let matcher = ElementMatcher::new(["textarea"]);
    assert_eq!(InjectionManager::new("one").scan(&mut doc, &matcher, &mut |_| {}), 1);
    assert_eq!(InjectionManager::new("two").scan(&mut doc, &matcher, &mut |_| {}), 1);
}

#[tokio::test]
async fn test_observe_late_elements_once() {
    let doc = Arc::new(Mutex::new(doc(r#"<main id="feed"><textarea></textarea></main>"#)));
    let feed = doc.lock().subscribe();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let task = {
        let doc = doc.clone();
        let seen = seen.clone();
        tokio::spawn(async move {
            let manager = InjectionManager::new(MARKER);
            let matcher = ElementMatcher::new(["textarea"]);
            manager
                .observe(doc, feed, &matcher, move |el| seen.lock().push(el))
                .await
        })
    };

    {
        let mut doc = doc.lock();
        let main = doc.query_selector(None, "#feed").unwrap().unwrap();
        doc.append_html(main, "<article><textarea></textarea></article>").unwrap();
        doc.append_html(main, "<article><p>no composer</p></article>").unwrap();
        doc.append_html(main, "<textarea></textarea><textarea></textarea>").unwrap();
        doc.close_feeds();
    }

    let total = task.await.unwrap();
    assert_eq!(total, 4);

    let seen = seen.lock();
    assert_eq!(seen.len(), 4);
    let mut unique = seen.clone();
    unique.sort_by_key(|id| format!("{id:?}"));
    unique.dedup();
    assert_eq!(unique.len(), 4);
}

#[tokio::test]
async fn test_observe_repeated_batches_are_idempotent() {
    let doc = Arc::new(Mutex::new(doc(r#"<div id="root"></div>"#)));
    let (sender, feed) = ChangeFeed::channel();
    let added = {
        let mut doc = doc.lock();
        let root = doc.query_selector(None, "#root").unwrap().unwrap();
        doc.append_html(root, "<textarea></textarea>").unwrap()
    };

    // The same element reported by several overlapping bursts.
    for _ in 0..5 {
        assert!(sender.publish(MutationBatch {
            added: added.clone(),
        }));
    }
    drop(sender);

    let mut calls = 0;
    let total = InjectionManager::new(MARKER)
        .observe(doc, feed, &ElementMatcher::new(["textarea"]), |_| calls += 1)
        .await;
    assert_eq!(total, 1);
    assert_eq!(calls, 1);
}

#[tokio::test]
async fn test_observe_skips_removed_elements() {
    let doc = Arc::new(Mutex::new(doc(r#"<div id="root"></div>"#)));
    let (sender, feed) = ChangeFeed::channel();
    {
        let mut doc = doc.lock();
        let root = doc.query_selector(None, "#root").unwrap().unwrap();
        let added = doc.append_html(root, "<textarea></textarea>").unwrap();
        doc.remove(added[0]).unwrap();
        sender.publish(MutationBatch { added });
    }
    drop(sender);

    let total = InjectionManager::new(MARKER)
        .observe(doc, feed, &ElementMatcher::new(["textarea"]), |_| {})
        .await;
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_observe_cancelled_feed_stops() {
    let doc = Arc::new(Mutex::new(doc(r#"<textarea></textarea>"#)));
    let mut feed = doc.lock().subscribe();
    feed.cancel();
    let total = InjectionManager::new(MARKER)
        .observe(doc, feed, &ElementMatcher::new(["textarea"]), |_| {})
        .await;
    assert_eq!(total, 1);
}
