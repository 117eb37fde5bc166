//! Core data types for action primitives

use std::str::FromStr;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitepilot_core_types::{ActionId, ToolName};

use crate::errors::ActionError;

/// Execution context for a single tool call
#[derive(Clone, Debug)]
pub struct ExecCtx {
    /// Unique identifier for this action, carried on every log event
    pub action_id: ActionId,

    /// Wall-clock start, reported back in the action report
    pub started_at: DateTime<Utc>,

    started: Instant,
}

impl ExecCtx {
    pub fn new() -> Self {
        Self {
            action_id: ActionId::new(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Default for ExecCtx {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a tool call that found its target and initiated its full effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    pub ok: bool,

    pub tool: ToolName,

    /// Identifier, direction or path the tool acted on
    pub target: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,

    pub latency_ms: u64,

    /// Whether a deferred style restore is still pending for this call
    pub reversal_scheduled: bool,
}

impl ActionReport {
    pub fn success(ctx: &ExecCtx, tool: ToolName, target: impl Into<String>) -> Self {
        Self {
            ok: true,
            tool,
            target: target.into(),
            started_at: ctx.started_at,
            latency_ms: ctx.elapsed_ms(),
            reversal_scheduled: false,
        }
    }

    pub fn with_reversal(mut self) -> Self {
        self.reversal_scheduled = true;
        self
    }
}

/// Direction accepted by `scroll_window`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Top,
    Bottom,
}

impl FromStr for ScrollDirection {
    type Err = ActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(ScrollDirection::Up),
            "down" => Ok(ScrollDirection::Down),
            "top" => Ok(ScrollDirection::Top),
            "bottom" => Ok(ScrollDirection::Bottom),
            _ => Err(ActionError::InvalidDirection(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directions() {
        assert_eq!("down".parse::<ScrollDirection>(), Ok(ScrollDirection::Down));
        assert_eq!(" Top ".parse::<ScrollDirection>(), Ok(ScrollDirection::Top));
        assert_eq!(
            "sideways".parse::<ScrollDirection>(),
            Err(ActionError::InvalidDirection("sideways".into()))
        );
    }
}
