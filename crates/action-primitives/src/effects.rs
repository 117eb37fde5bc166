//! Transient visual effects with scheduled reversal.
//!
//! A [`ScopedStyleMutation`] snapshots the inline style properties it is about
//! to touch, applies the effect and schedules exactly one release that writes
//! the snapshot back. Overlapping effects on the same element each restore
//! their own snapshot, so the last restore to fire wins.

use std::sync::Arc;
use std::time::Duration;

use dom_adapter::{Document, NodeId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::ActionError;

pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#3b82f6";
pub const HIGHLIGHT_GLOW: &str = "0 0 15px rgba(59, 130, 246, 0.6)";
pub const HIGHLIGHT_TRANSITION: &str = "all 0.5s ease";
pub const ZOOM_TRANSFORM: &str = "scale(1.1)";
pub const ZOOM_Z_INDEX: &str = "50";
pub const ZOOM_TRANSITION: &str = "transform 0.5s ease";

/// Delays before transient effects are reverted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTimings {
    pub highlight_ms: u64,
    pub zoom_ms: u64,
    /// Extra delay before the zoom transition itself is reset.
    pub zoom_transition_reset_ms: u64,
}

impl Default for EffectTimings {
    fn default() -> Self {
        Self {
            highlight_ms: 2000,
            zoom_ms: 3000,
            zoom_transition_reset_ms: 500,
        }
    }
}

impl EffectTimings {
    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    pub fn zoom(&self) -> Duration {
        Duration::from_millis(self.zoom_ms)
    }

    pub fn zoom_transition_reset(&self) -> Duration {
        Duration::from_millis(self.zoom_ms + self.zoom_transition_reset_ms)
    }
}

/// Keeps track of scheduled restores so callers can wait for them.
#[derive(Clone, Default)]
pub struct ReversalTracker {
    handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ReversalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self.handles.lock();
        handles.retain(|handle| !handle.is_finished());
        handles.push(handle);
    }

    /// Restores scheduled but not yet run.
    pub fn pending(&self) -> usize {
        self.handles
            .lock()
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Wait until every outstanding restore has run.
    pub async fn settle(&self) {
        loop {
            let batch: Vec<JoinHandle<()>> = std::mem::take(&mut *self.handles.lock());
            if batch.is_empty() {
                return;
            }
            for handle in batch {
                if let Err(err) = handle.await {
                    warn!(error = %err, "Style restore task failed");
                }
            }
        }
    }
}

impl std::fmt::Debug for ReversalTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReversalTracker")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Snapshot of inline style properties on one element, restorable once.
pub struct ScopedStyleMutation<D: Document + 'static> {
    document: Arc<D>,
    node: NodeId,
    snapshot: Vec<(String, Option<String>)>,
}

impl<D: Document + 'static> ScopedStyleMutation<D> {
    /// Capture the current inline values of `properties`.
    pub fn acquire(document: Arc<D>, node: NodeId, properties: &[&str]) -> Self {
        let snapshot = properties
            .iter()
            .map(|property| {
                (
                    property.to_string(),
                    document.style_property(node, property),
                )
            })
            .collect();
        Self {
            document,
            node,
            snapshot,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn snapshot(&self) -> &[(String, Option<String>)] {
        &self.snapshot
    }

    pub fn apply(&self, values: &[(&str, &str)]) -> Result<(), ActionError> {
        for (property, value) in values {
            self.document
                .set_style_property(self.node, property, Some(value))?;
        }
        Ok(())
    }

    /// Split off the listed properties into a separately released scope.
    pub fn partition(self, properties: &[&str]) -> (Self, Self) {
        let (taken, kept): (Vec<_>, Vec<_>) = self
            .snapshot
            .into_iter()
            .partition(|(property, _)| properties.contains(&property.as_str()));
        (
            Self {
                document: Arc::clone(&self.document),
                node: self.node,
                snapshot: kept,
            },
            Self {
                document: self.document,
                node: self.node,
                snapshot: taken,
            },
        )
    }

    /// Write the snapshot back unless the element left the document.
    pub fn restore(&self) {
        if !self.document.contains(self.node) {
            debug!(node = %self.node, "Element removed before restore; skipping");
            return;
        }
        for (property, value) in &self.snapshot {
            if let Err(err) =
                self.document
                    .set_style_property(self.node, property, value.as_deref())
            {
                warn!(node = %self.node, property = %property, error = %err, "Style restore failed");
            }
        }
        debug!(node = %self.node, properties = self.snapshot.len(), "Restored element style");
    }

    /// Restore after `delay` on the current tokio runtime.
    pub fn schedule_release(self, delay: Duration, tracker: &ReversalTracker) {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let handle = runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    self.restore();
                });
                tracker.track(handle);
            }
            Err(_) => {
                warn!(node = %self.node, "No async runtime; restoring style immediately");
                self.restore();
            }
        }
    }
}
