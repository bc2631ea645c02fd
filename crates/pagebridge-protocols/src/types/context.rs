//! Page context returned by extraction.

use serde::{Deserialize, Serialize};

/// Hard cap on `PageContext::content`, in characters.
pub const MAX_CONTENT_CHARS: usize = 1000;

/// What the current page is about, as seen by a content script.
///
/// Constructed fresh for every extraction request and never mutated after
/// it is returned. Title and content are trimmed; content is capped at
/// [`MAX_CONTENT_CHARS`]. Missing text is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub url: String,
}

impl PageContext {
    /// Build a normalized context.
    pub fn new(
        title: impl AsRef<str>,
        content: impl AsRef<str>,
        platform: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.as_ref().trim().to_string(),
            content: cap_chars(content.as_ref().trim(), MAX_CONTENT_CHARS),
            platform: platform.into(),
            url: url.into(),
        }
    }

    /// A context with no title and no content.
    pub fn empty(platform: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            platform: platform.into(),
            url: url.into(),
        }
    }

    /// True when neither title nor content was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }
}

/// Truncate to at most `max` characters, then drop any trailing whitespace
/// the cut exposed.
pub fn cap_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
