//! Document access errors.

use thiserror::Error;

/// Errors raised by a document provider.
///
/// A selector that matches nothing is not an error; these describe failures of
/// the document itself (detached nodes, unparseable selectors, unsupported
/// operations on an element kind).
#[derive(Debug, Error)]
pub enum DomError {
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Element is no longer attached to the document")]
    StaleElement,

    #[error("Unsupported operation on <{tag}>: {operation}")]
    Unsupported { tag: String, operation: String },

    #[error("Document unavailable: {0}")]
    Unavailable(String),
}

impl DomError {
    /// Whether this error only concerns a single selector string.
    pub fn is_invalid_selector(&self) -> bool {
        matches!(self, DomError::InvalidSelector { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_error() {
        let err = DomError::InvalidSelector {
            selector: "div[".to_string(),
            reason: "unexpected end".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("div["));
        assert!(display.contains("unexpected end"));
        assert!(err.is_invalid_selector());
    }

    #[test]
    fn test_stale_element_error() {
        let err = DomError::StaleElement;
        assert!(err.to_string().contains("no longer attached"));
        assert!(!err.is_invalid_selector());
    }

    #[test]
    fn test_unsupported_error() {
        let err = DomError::Unsupported {
            tag: "img".to_string(),
            operation: "set_value".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("<img>"));
        assert!(display.contains("set_value"));
    }
}
