use url::Url;

use crate::errors::DocumentError;
use crate::model::{DomEvent, LayoutBox, NodeId, ScrollBehavior, ScrollBlock, Viewport};

/// Minimal live-document surface required by the perceiver and the action layer.
///
/// Every call resolves against the current state of the document; handles
/// obtained earlier may refer to nodes that have since been removed, which
/// `contains` reports.
pub trait Document: Send + Sync {
    fn body(&self) -> NodeId;

    /// Element children in document order. Text nodes are not returned.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Upper-cased tag name, `None` for text nodes and unknown handles.
    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn element_id(&self, node: NodeId) -> Option<String> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    /// Rendered descendant text joined by single spaces.
    fn inner_text(&self, node: NodeId) -> String;

    /// Current form value for inputs and textareas.
    fn value(&self, node: NodeId) -> Option<String>;

    fn layout_box(&self, node: NodeId) -> LayoutBox;

    /// Inline style value, falling back to the initial value of the property.
    fn computed_style(&self, node: NodeId, property: &str) -> String;

    fn get_element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Whether the node is still attached to the document.
    fn contains(&self, node: NodeId) -> bool;

    fn is_rendered(&self, node: NodeId) -> bool {
        if !self.contains(node) || self.tag_name(node).is_none() {
            return false;
        }
        let layout = self.layout_box(node);
        if layout.is_empty() || layout.is_off_canvas() {
            return false;
        }
        if self.computed_style(node, "display") == "none"
            || self.computed_style(node, "visibility") == "hidden"
        {
            return false;
        }
        self.computed_style(node, "opacity")
            .trim()
            .parse::<f64>()
            .map(|opacity| opacity > 0.0)
            .unwrap_or(true)
    }

    fn viewport(&self) -> Viewport;

    fn scroll_to(&self, x: f64, y: f64, behavior: ScrollBehavior);

    fn scroll_by(&self, dx: f64, dy: f64, behavior: ScrollBehavior) {
        let viewport = self.viewport();
        self.scroll_to(viewport.scroll_x + dx, viewport.scroll_y + dy, behavior);
    }

    fn scroll_into_view(
        &self,
        node: NodeId,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    ) -> Result<(), DocumentError>;

    /// Inline style value only, `None` when unset.
    fn style_property(&self, node: NodeId, property: &str) -> Option<String>;

    /// Write an inline style property; `None` clears it. No-op on removed nodes.
    fn set_style_property(
        &self,
        node: NodeId,
        property: &str,
        value: Option<&str>,
    ) -> Result<(), DocumentError>;

    /// Run the element's activation behaviour.
    fn click(&self, node: NodeId) -> Result<(), DocumentError>;

    /// Set the value without going through any framework value tracking.
    fn set_native_value(&self, node: NodeId, value: &str) -> Result<(), DocumentError>;

    /// Deliver an event to the target's listeners, then its ancestors' when it bubbles.
    fn dispatch_event(&self, event: &DomEvent) -> Result<(), DocumentError>;

    /// Full navigation to `path`, resolved against the current location.
    fn navigate(&self, path: &str) -> Result<Url, DocumentError>;

    fn location(&self) -> Option<Url>;

    fn remove(&self, node: NodeId) -> Result<(), DocumentError>;
}
