//! Building new nodes from HTML fragments.
//!
//! `scraper` nodes are produced by the parser, so new content is parsed as a
//! fragment and its nodes are copied into the target tree.

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{Html, Node};

/// Escape text for inclusion in an HTML fragment.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Fragment markup with one `<p>` per line; blank lines keep a `<br>`.
pub(crate) fn paragraphs_html(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                "<p><br></p>".to_string()
            } else {
                format!("<p>{}</p>", escape_text(line))
            }
        })
        .collect()
}

/// Fragment markup for typed text; newlines become `<br>`.
pub(crate) fn typed_text_html(text: &str) -> String {
    text.split('\n')
        .map(escape_text)
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Copy the top-level nodes of `html` under `parent`. Returns the ids of the
/// copied top-level nodes, or `None` if `parent` is not in `tree`.
pub(crate) fn graft_fragment(
    tree: &mut Tree<Node>,
    parent: NodeId,
    html: &str,
) -> Option<Vec<NodeId>> {
    let fragment = Html::parse_fragment(html);
    let root = fragment.root_element();
    let mut added = Vec::new();
    for child in root.children() {
        added.push(graft(tree, parent, child)?);
    }
    Some(added)
}

fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) -> Option<NodeId> {
    let id = tree.get_mut(parent)?.append(source.value().clone()).id();
    for child in source.children() {
        graft(tree, id, child)?;
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_text("plain"), "plain");
    }

    #[test]
    fn test_paragraphs_html() {
        assert_eq!(
            paragraphs_html(&["one", "", "<two>"]),
            "<p>one</p><p><br></p><p>&lt;two&gt;</p>"
        );
    }

    #[test]
    fn test_typed_text_html() {
        assert_eq!(typed_text_html("a\nb"), "a<br>b");
    }

    #[test]
    fn test_graft_fragment_copies_subtree() {
        let mut doc = Html::parse_document("<html><body><div id='t'></div></body></html>");
        let target = doc
            .root_element()
            .select(&scraper::Selector::parse("#t").unwrap())
            .next()
            .unwrap()
            .id();

        let added = graft_fragment(&mut doc.tree, target, "<p>x <b>y</b></p><p>z</p>").unwrap();
        assert_eq!(added.len(), 2);

        let target_ref = scraper::ElementRef::wrap(doc.tree.get(target).unwrap()).unwrap();
        assert_eq!(target_ref.text().collect::<String>(), "x yz");
        assert_eq!(target_ref.inner_html(), "<p>x <b>y</b></p><p>z</p>");
    }
}
