//! Error types for action primitives

use dom_adapter::DocumentError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// No element carries the requested identifier
    #[error("Element {0} not found")]
    ElementNotFound(String),

    /// scroll_window received something other than up/down/top/bottom
    #[error("Invalid scroll direction: {0}")]
    InvalidDirection(String),

    /// The document has no browsing context to navigate
    #[error("Navigation unavailable: {0}")]
    NavigationUnavailable(String),

    /// The document rejected the operation
    #[error("Document error: {0}")]
    Document(String),
}

impl ActionError {
    /// Lookup failures are reported as "not found" rather than as execution errors
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, ActionError::ElementNotFound(_))
    }
}

impl From<DocumentError> for ActionError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NavigationUnavailable(reason) => {
                ActionError::NavigationUnavailable(reason)
            }
            DocumentError::InvalidUrl { .. } => ActionError::NavigationUnavailable(err.to_string()),
            other => ActionError::Document(other.to_string()),
        }
    }
}
