use thiserror::Error;

use crate::model::NodeId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("navigation unavailable: {0}")]
    NavigationUnavailable(String),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid page fixture: {0}")]
    Fixture(String),
}

impl DocumentError {
    pub fn fixture(reason: impl Into<String>) -> Self {
        Self::Fixture(reason.into())
    }

    pub fn detached() -> Self {
        Self::NavigationUnavailable("document has no browsing context".to_string())
    }
}
