use super::*;

#[test]
fn test_event_kind_names() {
    assert_eq!(DomEventKind::Input.as_str(), "input");
    assert_eq!(DomEventKind::BeforeInput.to_string(), "beforeinput");
    assert_eq!(DomEventKind::Paste.as_str(), "paste");
}

#[test]
fn test_bubbling_event() {
    let event = DomEvent::bubbling(DomEventKind::Change);
    assert!(event.bubbles);
    assert!(event.data.is_none());
}

#[test]
fn test_paste_event_carries_text() {
    let event = DomEvent::paste("hello");
    assert_eq!(event.kind, DomEventKind::Paste);
    assert_eq!(event.data.as_deref(), Some("hello"));
    assert_eq!(event.input_type.as_deref(), Some("insertFromPaste"));
}

#[test]
fn test_edit_command_names() {
    assert_eq!(EditCommand::SelectAll.name(), "selectAll");
    assert_eq!(EditCommand::InsertText("x".into()).name(), "insertText");
}

#[tokio::test]
async fn test_change_feed_delivers_batches() {
    let (sender, mut feed) = ChangeFeed::<u32>::channel();
    assert!(sender.publish(MutationBatch { added: vec![1, 2] }));
    assert!(sender.publish(MutationBatch { added: vec![3] }));

    assert_eq!(feed.next().await.unwrap().added, vec![1, 2]);
    assert_eq!(feed.try_next().unwrap().added, vec![3]);
    assert!(feed.try_next().is_none());
}

#[tokio::test]
async fn test_change_feed_cancel_stops_delivery() {
    let (sender, mut feed) = ChangeFeed::<u32>::channel();
    feed.cancel();
    assert!(!sender.publish(MutationBatch { added: vec![1] }));
    assert!(sender.is_closed());
    assert!(feed.next().await.is_none());
}

#[tokio::test]
async fn test_change_feed_ends_when_sender_dropped() {
    let (sender, mut feed) = ChangeFeed::<u32>::channel();
    drop(sender);
    assert!(feed.next().await.is_none());
}
