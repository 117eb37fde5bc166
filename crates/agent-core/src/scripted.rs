use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AgentError;
use crate::transport::{ModelReply, ModelToolCall, SessionTransport};

/// One queued outcome of a scripted turn.
///
/// ```yaml
/// - text: Taking you there.
///   tool_calls:
///     - name: scroll_to_section
///       args: { id: "#contact" }
/// - error: provider unavailable
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptedReply {
    Failure { error: String },
    Reply(ModelReply),
}

#[derive(Debug, Default)]
struct ScriptState {
    queue: VecDeque<ScriptedReply>,
    received: Vec<String>,
    history: Vec<String>,
}

/// Deterministic transport replaying a fixed script, for tests and offline runs.
///
/// When the script runs dry every further turn fails.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    state: Mutex<ScriptState>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            state: Mutex::new(ScriptState {
                queue: replies.into_iter().collect(),
                ..ScriptState::default()
            }),
        }
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, AgentError> {
        let replies: Vec<ScriptedReply> = serde_yaml::from_str(source)
            .map_err(|err| AgentError::config(format!("invalid reply script: {err}")))?;
        Ok(Self::new(replies))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| AgentError::config(format!("{}: {}", path.display(), err)))?;
        Self::from_yaml_str(&source)
    }

    pub fn push(&self, reply: ScriptedReply) {
        self.state.lock().queue.push_back(reply);
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(ScriptedReply::Reply(ModelReply {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }));
    }

    pub fn push_failure(&self, error: impl Into<String>) {
        self.push(ScriptedReply::Failure {
            error: error.into(),
        });
    }

    /// Every message sent to the transport, including failed turns.
    pub fn received(&self) -> Vec<String> {
        self.state.lock().received.clone()
    }

    pub fn remaining(&self) -> usize {
        self.state.lock().queue.len()
    }
}

impl ScriptedReply {
    pub fn tool_calls(calls: Vec<ModelToolCall>, text: Option<String>) -> Self {
        Self::Reply(ModelReply {
            text,
            tool_calls: calls,
        })
    }
}

#[async_trait]
impl SessionTransport for ScriptedTransport {
    async fn send_turn(&self, message: &str) -> Result<ModelReply, AgentError> {
        let mut state = self.state.lock();
        state.received.push(message.to_string());
        match state.queue.pop_front() {
            Some(ScriptedReply::Reply(reply)) => {
                state.history.push(message.to_string());
                state
                    .history
                    .push(serde_json::to_string(&reply).unwrap_or_default());
                debug!(remaining = state.queue.len(), "Scripted reply served");
                Ok(reply)
            }
            Some(ScriptedReply::Failure { error }) => Err(AgentError::transport(error)),
            None => Err(AgentError::transport("reply script exhausted")),
        }
    }

    fn history_len(&self) -> usize {
        self.state.lock().history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    const SCRIPT: &str = r##"
- text: Taking you there.
  tool_calls:
    - name: scroll_to_section
      args: { id: "#contact" }
- error: provider unavailable
"##;

    #[test]
    fn replays_script_in_order() {
        let transport = ScriptedTransport::from_yaml_str(SCRIPT).expect("script");
        let first = block_on(transport.send_turn("one")).expect("reply");
        assert_eq!(first.tool_calls[0].name, "scroll_to_section");
        assert_eq!(first.text.as_deref(), Some("Taking you there."));

        let second = block_on(transport.send_turn("two")).unwrap_err();
        assert_eq!(second, AgentError::Transport("provider unavailable".into()));

        assert!(block_on(transport.send_turn("three")).is_err());
        assert_eq!(transport.received(), vec!["one", "two", "three"]);
    }

    #[test]
    fn history_grows_only_on_success() {
        let transport = ScriptedTransport::default();
        transport.push_failure("boom");
        transport.push_text("hello");

        assert!(block_on(transport.send_turn("first")).is_err());
        assert_eq!(transport.history_len(), 0);
        block_on(transport.send_turn("second")).expect("reply");
        assert_eq!(transport.history_len(), 2);
    }
}
