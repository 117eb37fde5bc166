//! L3 Action Primitives - page tools executed against the live document
//!
//! This crate provides the executor behind the agent's tool vocabulary:
//! - 7 tools: scroll_to_section, highlight_element, click_element, fill_form,
//!   scroll_window, navigate_to_page, zoom_element
//! - Scoped style mutations with deferred, self-reverting visual effects
//! - A single exhaustive dispatcher over the tool catalog

pub mod effects;
pub mod errors;
mod locator;
mod primitives;
pub mod types;

pub use effects::*;
pub use errors::*;
pub use locator::*;
pub use primitives::*;
pub use types::*;
