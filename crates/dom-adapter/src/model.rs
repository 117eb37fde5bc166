use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque handle to a node of a document arena.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Rendered box in document coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// True when the box lies entirely above or left of the document origin.
    pub fn is_off_canvas(&self) -> bool {
        self.right() <= 0.0 || self.bottom() <= 0.0
    }
}

/// Visible window onto the document plus the current scroll offset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub document_height: f64,
}

impl Viewport {
    pub fn max_scroll_y(&self) -> f64 {
        (self.document_height - self.height).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    #[default]
    Start,
    Center,
    End,
    Nearest,
}

/// One scroll performed on the document, kept for inspection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollRecord {
    pub x: f64,
    pub y: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    Input,
    Change,
    Custom(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Click => "click",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: NodeId,
    pub bubbles: bool,
}

impl DomEvent {
    pub fn bubbling(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            bubbles: true,
        }
    }
}

/// Event listener registered on a node.
pub type Listener = Arc<dyn Fn(&DomEvent) + Send + Sync>;
