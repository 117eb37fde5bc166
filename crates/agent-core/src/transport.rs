use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sitepilot_core_types::ToolArgs;

use crate::errors::AgentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelToolCall {
    pub name: String,
    #[serde(default)]
    pub args: ToolArgs,
}

/// What the model returned for one turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ModelToolCall>,
}

/// Narrow boundary to a conversational model session.
///
/// Implementations own the turn history: a turn is appended only once a
/// well-formed reply came back, so a failed call leaves the history untouched.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    async fn send_turn(&self, message: &str) -> Result<ModelReply, AgentError>;

    /// Number of turns (user + model) held in the history.
    fn history_len(&self) -> usize;
}

#[async_trait]
impl<T: SessionTransport + ?Sized> SessionTransport for Box<T> {
    async fn send_turn(&self, message: &str) -> Result<ModelReply, AgentError> {
        (**self).send_turn(message).await
    }

    fn history_len(&self) -> usize {
        (**self).history_len()
    }
}

#[async_trait]
impl<T: SessionTransport + ?Sized> SessionTransport for std::sync::Arc<T> {
    async fn send_turn(&self, message: &str) -> Result<ModelReply, AgentError> {
        (**self).send_turn(message).await
    }

    fn history_len(&self) -> usize {
        (**self).history_len()
    }
}
