use std::sync::Arc;

use agent_core::{AgentSession, SessionTransport};
use chrono::{DateTime, Utc};

pub type SharedSession = Arc<AgentSession<Box<dyn SessionTransport>>>;

/// One agent session per server process, shared by every request.
#[derive(Clone)]
pub struct ServeState {
    pub(crate) session: SharedSession,
    pub(crate) started_at: DateTime<Utc>,
}

impl ServeState {
    pub fn new(transport: Box<dyn SessionTransport>) -> Self {
        Self {
            session: Arc::new(AgentSession::new(transport)),
            started_at: Utc::now(),
        }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }
}
