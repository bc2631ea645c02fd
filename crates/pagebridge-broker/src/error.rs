//! Drafting workflow errors.

use thiserror::Error;

use pagebridge_protocols::{BridgeError, GenerationError, StoreError};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Generator returned no candidates")]
    NoCandidates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bridge_error() {
        let err: WorkflowError = BridgeError::Timeout { tab: 2, after_ms: 50 }.into();
        assert!(matches!(err, WorkflowError::Bridge(ref e) if e.is_timeout()));
        assert!(err.to_string().contains("50ms"));
    }

    #[test]
    fn test_no_candidates_display() {
        assert!(WorkflowError::NoCandidates.to_string().contains("no candidates"));
    }
}
