use thiserror::Error;

/// Errors emitted by the agent-core crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The remote call failed: network, HTTP status or provider error.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider answered with something that is not a usable reply.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The transport cannot be built from the supplied configuration.
    #[error("invalid agent configuration: {0}")]
    Config(String),
}

impl AgentError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
