//! Declarative site profiles.
//!
//! A [`SiteProfile`] describes, for one website, where the "current post" and
//! the comment composer live. Profiles are read-only configuration: the
//! extraction and fill engines are generic and only consult this data.

use serde::{Deserialize, Serialize};

/// The part of a page a selector set locates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorRole {
    Title,
    Content,
    Input,
}

impl SelectorRole {
    /// Whether a match must carry non-empty text to be accepted.
    pub fn requires_text(self) -> bool {
        matches!(self, SelectorRole::Title | SelectorRole::Content)
    }
}

/// Candidate selectors for one role, ordered by preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSet {
    pub role: SelectorRole,
    #[serde(default)]
    pub candidates: Vec<String>,
}

impl SelectorSet {
    pub fn new<I, S>(role: SelectorRole, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            role,
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// A fallback used when no content selector produced text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Heuristic {
    /// First paragraph-like node that is long enough and is not UI chrome.
    ///
    /// `fallback_selectors` are consulted only when `selectors` match no node
    /// at all.
    Paragraphs {
        selectors: Vec<String>,
        #[serde(default)]
        fallback_selectors: Vec<String>,
        #[serde(default)]
        min_chars: Option<usize>,
        #[serde(default)]
        exclude_phrases: Vec<String>,
    },
    /// The page's `<meta name="description">` / `og:description`.
    MetaDescription {
        #[serde(default)]
        min_chars: Option<usize>,
    },
}

/// Which fill tier family a profile's composer needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategyKind {
    /// Decide from the element kind at fill time.
    #[default]
    Auto,
    /// Plain `value` assignment plus `input`/`change` events.
    Value,
    /// Rich-text editor tiers: paste, edit commands, DOM reconstruction.
    RichText,
    /// Generic contenteditable: edit commands, then paste.
    Editable,
}

/// How to read and write one website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Platform label reported in `PageContext::platform`.
    pub platform: String,
    /// Host names (or suffixes) this profile applies to.
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Containers holding the main post, searched before anything else.
    #[serde(default)]
    pub post_containers: Vec<String>,
    /// Generic containers tried when no main-post container exists.
    #[serde(default)]
    pub fallback_containers: Vec<String>,
    pub title: SelectorSet,
    pub content: SelectorSet,
    pub input: SelectorSet,
    #[serde(default)]
    pub heuristics: Vec<Heuristic>,
    #[serde(default)]
    pub fill: FillStrategyKind,
    /// Selectors identifying a rich-text editor root (element or ancestor).
    #[serde(default)]
    pub rich_editor_markers: Vec<String>,
    /// Platform length limit for a reply; callers pre-truncate to this.
    #[serde(default)]
    pub max_reply_chars: Option<usize>,
}

impl SiteProfile {
    /// Whether this profile applies to `host`, matching whole labels only.
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.trim_start_matches("www.").to_ascii_lowercase();
        self.hosts.iter().any(|candidate| {
            let candidate = candidate.trim_start_matches("www.").to_ascii_lowercase();
            host == candidate || host.ends_with(&format!(".{candidate}"))
        })
    }
}
