use dom_adapter::{Document, NodeId};
use sitepilot_core_types::normalize_element_id;
use tracing::warn;

use crate::errors::ActionError;

/// Resolve a model-supplied identifier to a live element.
///
/// The lookup runs on every call; handles are never cached across calls.
pub fn resolve_element(document: &dyn Document, raw_id: &str) -> Result<NodeId, ActionError> {
    let id = normalize_element_id(raw_id);
    match document.get_element_by_id(id) {
        Some(node) => Ok(node),
        None => {
            warn!(id = %raw_id, "Element lookup failed");
            Err(ActionError::ElementNotFound(raw_id.to_string()))
        }
    }
}
