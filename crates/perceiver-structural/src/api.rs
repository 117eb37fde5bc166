use dom_adapter::Document;

use crate::model::SerializedContext;

/// Read-only perception of a live document.
pub trait StructuralPerceiver: Send + Sync {
    /// Produce a fresh digest of the document; never mutates it.
    fn serialize(&self, document: &dyn Document) -> SerializedContext;
}
