//! Built-in site profiles.
//!
//! Selector tables change with every redesign of the target sites; keep them
//! short and ordered from most structural to most generic.

use pagebridge_protocols::{FillStrategyKind, Heuristic, SelectorRole, SelectorSet, SiteProfile};

/// Containers tried when a site has no recognisable main-post wrapper.
const GENERIC_CONTAINERS: [&str; 3] = ["main", "[role=\"main\"]", "article"];

/// Markers of editors that run their own editing model.
const RICH_EDITORS: [&str; 5] = [
    "[data-lexical-editor=\"true\"]",
    ".ProseMirror",
    ".ql-editor",
    "[data-contents=\"true\"]",
    ".DraftEditor-root",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// All built-in profiles except the generic one.
pub fn sites() -> Vec<SiteProfile> {
    vec![reddit(), twitter(), linkedin(), facebook()]
}

pub fn reddit() -> SiteProfile {
    SiteProfile {
        platform: "reddit".to_string(),
        hosts: strings(&["reddit.com"]),
        post_containers: strings(&[
            "shreddit-post[tabindex=\"-1\"]",
            "shreddit-post",
            "div[data-test-id=\"post-content\"]",
        ]),
        fallback_containers: strings(&GENERIC_CONTAINERS),
        title: SelectorSet::new(
            SelectorRole::Title,
            ["h1[id^=\"post-title\"]", "[slot=\"title\"]", "h1"],
        ),
        content: SelectorSet::new(
            SelectorRole::Content,
            [
                "[slot=\"text-body\"]",
                "div[id$=\"-post-rtjson-content\"]",
                "div[data-click-id=\"text\"]",
                ".md",
            ],
        ),
        input: SelectorSet::new(
            SelectorRole::Input,
            [
                "shreddit-composer div[contenteditable=\"true\"]",
                "div[contenteditable=\"true\"][role=\"textbox\"]",
                "textarea[name=\"text\"]",
                "textarea",
            ],
        ),
        heuristics: vec![Heuristic::Paragraphs {
            selectors: strings(&["[slot=\"text-body\"] p", "p"]),
            fallback_selectors: strings(&["div[dir=\"auto\"]"]),
            min_chars: None,
            exclude_phrases: strings(&["Add a comment", "Join the conversation"]),
        }],
        fill: FillStrategyKind::Auto,
        rich_editor_markers: strings(&["[data-lexical-editor=\"true\"]", "shreddit-composer"]),
        max_reply_chars: Some(10_000),
    }
}

pub fn twitter() -> SiteProfile {
    SiteProfile {
        platform: "twitter".to_string(),
        hosts: strings(&["twitter.com", "x.com"]),
        post_containers: strings(&[
            "article[data-testid=\"tweet\"][tabindex=\"-1\"]",
            "article[data-testid=\"tweet\"]",
        ]),
        fallback_containers: strings(&GENERIC_CONTAINERS),
        title: SelectorSet::new(SelectorRole::Title, ["[data-testid=\"User-Name\"]"]),
        content: SelectorSet::new(SelectorRole::Content, ["[data-testid=\"tweetText\"]"]),
        input: SelectorSet::new(
            SelectorRole::Input,
            [
                "[data-testid=\"tweetTextarea_0\"]",
                "div[role=\"textbox\"][contenteditable=\"true\"]",
            ],
        ),
        heuristics: vec![Heuristic::MetaDescription { min_chars: None }],
        fill: FillStrategyKind::Auto,
        rich_editor_markers: strings(&[
            ".DraftEditor-root",
            "[data-contents=\"true\"]",
            ".public-DraftEditor-content",
        ]),
        max_reply_chars: Some(280),
    }
}

pub fn linkedin() -> SiteProfile {
    SiteProfile {
        platform: "linkedin".to_string(),
        hosts: strings(&["linkedin.com"]),
        post_containers: strings(&[
            ".feed-shared-update-v2",
            "[data-urn^=\"urn:li:activity\"]",
        ]),
        fallback_containers: strings(&GENERIC_CONTAINERS),
        title: SelectorSet::new(
            SelectorRole::Title,
            [
                ".update-components-actor__name",
                ".feed-shared-actor__name",
            ],
        ),
        content: SelectorSet::new(
            SelectorRole::Content,
            [
                ".update-components-text",
                ".feed-shared-text",
                ".feed-shared-update-v2__description",
            ],
        ),
        input: SelectorSet::new(
            SelectorRole::Input,
            [
                ".comments-comment-box__form .ql-editor",
                "div.ql-editor[contenteditable=\"true\"]",
            ],
        ),
        heuristics: vec![Heuristic::Paragraphs {
            selectors: strings(&["span[dir=\"ltr\"]"]),
            fallback_selectors: strings(&["p"]),
            min_chars: Some(40),
            exclude_phrases: strings(&["Add a comment", "Start a post"]),
        }],
        fill: FillStrategyKind::RichText,
        rich_editor_markers: strings(&[".ql-editor"]),
        max_reply_chars: Some(1250),
    }
}

pub fn facebook() -> SiteProfile {
    SiteProfile {
        platform: "facebook".to_string(),
        hosts: strings(&["facebook.com"]),
        post_containers: strings(&["div[role=\"article\"]"]),
        fallback_containers: strings(&GENERIC_CONTAINERS),
        title: SelectorSet::new(
            SelectorRole::Title,
            ["h2 strong", "h3 strong", "strong a[role=\"link\"]"],
        ),
        content: SelectorSet::new(
            SelectorRole::Content,
            [
                "div[data-ad-preview=\"message\"]",
                "div[data-ad-comet-preview=\"message\"]",
                "[data-testid=\"post_message\"]",
            ],
        ),
        input: SelectorSet::new(
            SelectorRole::Input,
            [
                "div[role=\"textbox\"][contenteditable=\"true\"]",
                "form textarea",
            ],
        ),
        heuristics: vec![Heuristic::Paragraphs {
            selectors: strings(&["div[dir=\"auto\"]"]),
            fallback_selectors: Vec::new(),
            min_chars: Some(30),
            exclude_phrases: strings(&["Write a comment", "Write a public comment"]),
        }],
        fill: FillStrategyKind::Auto,
        rich_editor_markers: strings(&["[data-lexical-editor=\"true\"]"]),
        max_reply_chars: Some(8000),
    }
}

/// Profile for any page no site profile claims.
pub fn generic() -> SiteProfile {
    SiteProfile {
        platform: "generic".to_string(),
        hosts: Vec::new(),
        post_containers: Vec::new(),
        fallback_containers: strings(&GENERIC_CONTAINERS),
        title: SelectorSet::new(SelectorRole::Title, ["h1", "h2"]),
        content: SelectorSet::new(
            SelectorRole::Content,
            [
                "[itemprop=\"articleBody\"]",
                ".post-content",
                ".entry-content",
            ],
        ),
        input: SelectorSet::new(
            SelectorRole::Input,
            [
                "textarea",
                "[contenteditable=\"true\"]",
                "input[type=\"text\"]",
            ],
        ),
        heuristics: vec![
            Heuristic::Paragraphs {
                selectors: strings(&["p"]),
                fallback_selectors: strings(&["div"]),
                min_chars: None,
                exclude_phrases: Vec::new(),
            },
            Heuristic::MetaDescription { min_chars: None },
        ],
        fill: FillStrategyKind::Auto,
        rich_editor_markers: strings(&RICH_EDITORS),
        max_reply_chars: None,
    }
}
