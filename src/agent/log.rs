//! Append-only activity log shared with the presentation layer.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

const SUBSCRIBER_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    User,
    Agent,
    System,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::User => "user",
            LogSource::Agent => "agent",
            LogSource::System => "system",
        }
    }
}

impl std::fmt::Display for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub source: LogSource,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Observability only. Nothing in the turn loop reads entries back.
pub struct ActivityLog {
    entries: RwLock<Vec<LogEntry>>,
    sender: broadcast::Sender<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        Self {
            entries: RwLock::new(Vec::new()),
            sender,
        }
    }

    pub fn push(
        &self,
        source: LogSource,
        content: impl Into<String>,
        metadata: Option<Value>,
    ) -> LogEntry {
        let entry = LogEntry {
            id: Uuid::new_v4(),
            source,
            content: content.into(),
            timestamp: Utc::now(),
            metadata,
        };
        self.entries.write().push(entry.clone());
        // no subscribers is fine
        let _ = self.sender.send(entry.clone());
        entry
    }

    pub fn user(&self, content: impl Into<String>) -> LogEntry {
        self.push(LogSource::User, content, None)
    }

    pub fn agent(&self, content: impl Into<String>) -> LogEntry {
        self.push(LogSource::Agent, content, None)
    }

    pub fn system(&self, content: impl Into<String>) -> LogEntry {
        self.push(LogSource::System, content, None)
    }

    pub fn system_with(&self, content: impl Into<String>, metadata: Value) -> LogEntry {
        self.push(LogSource::System, content, Some(metadata))
    }

    /// Snapshot of every entry so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    /// Entries appended after the first `offset`.
    pub fn since(&self, offset: usize) -> Vec<LogEntry> {
        self.entries
            .read()
            .get(offset..)
            .map(<[LogEntry]>::to_vec)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn last(&self) -> Option<LogEntry> {
        self.entries.read().last().cloned()
    }

    /// Live feed of entries appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLog")
            .field("entries", &self.len())
            .finish()
    }
}
