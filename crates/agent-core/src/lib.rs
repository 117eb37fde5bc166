//! L8 Agent Core.
//!
//! Wraps a conversational model session behind a narrow `send_turn`
//! interface and turns each reply into an ordered list of [`AgentAction`]s.

pub mod action;
pub mod config;
pub mod errors;
pub mod gemini;
pub mod prompt;
pub mod scripted;
pub mod session;
pub mod tools;
pub mod transport;

pub use action::AgentAction;
pub use config::AgentConfig;
pub use errors::AgentError;
pub use gemini::GeminiTransport;
pub use prompt::{compose_prompt, SYSTEM_INSTRUCTION};
pub use scripted::{ScriptedReply, ScriptedTransport};
pub use session::{AgentSession, APOLOGY_MESSAGE};
pub use tools::{function_declarations, FunctionDeclaration};
pub use transport::{ModelReply, ModelToolCall, SessionTransport};
