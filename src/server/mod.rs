//! HTTP boundary exposing the agent session to a hosting front end.

mod chat;
mod router;
mod state;

pub use chat::{ChatRequest, ChatResponse, INTERNAL_ERROR_MESSAGE, MESSAGE_REQUIRED};
pub use router::build_router;
pub use state::ServeState;
