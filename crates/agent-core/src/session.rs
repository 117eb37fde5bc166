use sitepilot_core_types::SessionId;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::action::AgentAction;
use crate::prompt::compose_prompt;
use crate::transport::{ModelReply, SessionTransport};

pub const APOLOGY_MESSAGE: &str = "I encountered an error processing your request.";

/// One conversation with the model.
///
/// At most one remote round trip is in flight per session; concurrent callers
/// queue on the internal lock. Failures never escape: they turn into a single
/// apology response and leave the transport history untouched.
pub struct AgentSession<T: SessionTransport> {
    id: SessionId,
    transport: T,
    in_flight: Mutex<()>,
}

impl<T: SessionTransport> AgentSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            id: SessionId::new(),
            transport,
            in_flight: Mutex::new(()),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one turn and decompose the reply into ordered actions.
    pub async fn process_message(&self, user_text: &str, context: &str) -> Vec<AgentAction> {
        let prompt = compose_prompt(context, user_text);
        let _turn = self.in_flight.lock().await;

        debug!(
            session_id = %self.id,
            context_chars = context.chars().count(),
            "Sending turn to model"
        );
        match self.transport.send_turn(&prompt).await {
            Ok(reply) => {
                let actions = decompose(reply);
                info!(
                    session_id = %self.id,
                    actions = actions.len(),
                    history = self.transport.history_len(),
                    "Model turn completed"
                );
                actions
            }
            Err(err) => {
                error!(session_id = %self.id, error = %err, "Model turn failed");
                vec![AgentAction::response(APOLOGY_MESSAGE)]
            }
        }
    }
}

/// Tool calls in model order, then at most one trailing text response.
fn decompose(reply: ModelReply) -> Vec<AgentAction> {
    let mut actions: Vec<AgentAction> = reply
        .tool_calls
        .into_iter()
        .map(|call| AgentAction::tool_call(call.name, call.args))
        .collect();
    if let Some(text) = reply.text.filter(|text| !text.trim().is_empty()) {
        actions.push(AgentAction::response(text));
    }
    actions
}
