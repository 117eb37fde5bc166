//! Structural perceiver.
//!
//! Walks the rendered document depth-first and produces a compact,
//! line-oriented digest the language model uses as grounding context.

pub mod api;
pub mod judges;
pub mod model;
pub mod policy;
pub mod structural;
pub mod text;

pub use api::StructuralPerceiver;
pub use model::SerializedContext;
pub use policy::{SerializerConfig, MAX_OUTPUT_CHARS, MAX_TEXT_CHARS, TRUNCATION_MARKER};
pub use structural::DocumentSerializer;
