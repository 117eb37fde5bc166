//! SitePilot library
//!
//! Turn orchestration, configuration, CLI and HTTP boundary. Exposed as a
//! library for integration testing.

pub mod agent;
pub mod cli;
pub mod config;
pub mod server;

pub use agent::{ActivityLog, LogEntry, LogSource, TurnOutcome, TurnRunner};
pub use config::Config;
