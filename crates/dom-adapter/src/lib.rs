//! SitePilot L0 document adapter.
//!
//! Upper layers perceive and mutate the page exclusively through the
//! [`Document`] trait. [`VirtualDocument`] is the in-memory implementation used
//! by the CLI, the HTTP boundary and the test-suites; pages are loaded from
//! YAML or JSON fixtures.

pub mod document;
pub mod errors;
pub mod fixture;
pub mod model;
pub mod virtual_doc;

pub use document::Document;
pub use errors::DocumentError;
pub use fixture::{ChildFixture, NodeFixture, PageFixture, ViewportFixture};
pub use model::{
    DomEvent, EventKind, LayoutBox, Listener, NodeId, ScrollBehavior, ScrollBlock, ScrollRecord,
    Viewport,
};
pub use virtual_doc::VirtualDocument;
