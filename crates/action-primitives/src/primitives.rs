//! Action primitives implementation
//!
//! Seven tools the agent may call:
//! 1. scroll_to_section - Smooth-scroll an element into view
//! 2. highlight_element - Outline and glow an element for a moment
//! 3. click_element - Run an element's activation behaviour
//! 4. fill_form - Set an input value and notify listeners
//! 5. scroll_window - Move the viewport up/down/top/bottom
//! 6. navigate_to_page - Full navigation to a path
//! 7. zoom_element - Scale an element up for a moment

mod click;
mod fill;
mod highlight;
mod navigate;
mod scroll;
mod zoom;

pub use click::*;
pub use fill::*;
pub use highlight::*;
pub use navigate::*;
pub use scroll::*;
pub use zoom::*;

use std::sync::Arc;

use dom_adapter::Document;
use sitepilot_core_types::{
    ElementTarget, FillFormArgs, HighlightArgs, NavigateArgs, ScrollWindowArgs, ToolInvocation,
};

use crate::{
    effects::{EffectTimings, ReversalTracker},
    errors::ActionError,
    types::{ActionReport, ExecCtx},
};

/// Action primitives trait
///
/// One method per tool. Each primitive either finds its target and initiates
/// its full effect sequence, or fails without touching the document.
pub trait ActionPrimitives: Send + Sync {
    fn scroll_to_section(
        &self,
        ctx: &ExecCtx,
        args: &ElementTarget,
    ) -> Result<ActionReport, ActionError>;

    fn highlight_element(
        &self,
        ctx: &ExecCtx,
        args: &HighlightArgs,
    ) -> Result<ActionReport, ActionError>;

    fn click_element(&self, ctx: &ExecCtx, args: &ElementTarget)
        -> Result<ActionReport, ActionError>;

    fn fill_form(&self, ctx: &ExecCtx, args: &FillFormArgs) -> Result<ActionReport, ActionError>;

    fn scroll_window(
        &self,
        ctx: &ExecCtx,
        args: &ScrollWindowArgs,
    ) -> Result<ActionReport, ActionError>;

    fn navigate_to_page(
        &self,
        ctx: &ExecCtx,
        args: &NavigateArgs,
    ) -> Result<ActionReport, ActionError>;

    fn zoom_element(&self, ctx: &ExecCtx, args: &ElementTarget)
        -> Result<ActionReport, ActionError>;

    /// Route a validated invocation to its primitive.
    fn dispatch(&self, invocation: &ToolInvocation) -> Result<ActionReport, ActionError> {
        let ctx = ExecCtx::new();
        match invocation {
            ToolInvocation::ScrollToSection(args) => self.scroll_to_section(&ctx, args),
            ToolInvocation::HighlightElement(args) => self.highlight_element(&ctx, args),
            ToolInvocation::ClickElement(args) => self.click_element(&ctx, args),
            ToolInvocation::FillForm(args) => self.fill_form(&ctx, args),
            ToolInvocation::ScrollWindow(args) => self.scroll_window(&ctx, args),
            ToolInvocation::NavigateToPage(args) => self.navigate_to_page(&ctx, args),
            ToolInvocation::ZoomElement(args) => self.zoom_element(&ctx, args),
        }
    }
}

/// Default implementation of action primitives
pub struct DefaultActionPrimitives<D: Document + 'static> {
    /// Live document the tools act on
    document: Arc<D>,

    /// Reversal delays
    timings: EffectTimings,

    /// Outstanding style restores
    reversals: ReversalTracker,
}

impl<D: Document + 'static> DefaultActionPrimitives<D> {
    pub fn new(document: Arc<D>) -> Self {
        Self::with_timings(document, EffectTimings::default())
    }

    pub fn with_timings(document: Arc<D>, timings: EffectTimings) -> Self {
        Self {
            document,
            timings,
            reversals: ReversalTracker::new(),
        }
    }

    pub fn document(&self) -> &Arc<D> {
        &self.document
    }

    pub fn timings(&self) -> &EffectTimings {
        &self.timings
    }

    pub fn reversals(&self) -> &ReversalTracker {
        &self.reversals
    }
}

impl<D: Document + 'static> ActionPrimitives for DefaultActionPrimitives<D> {
    fn scroll_to_section(
        &self,
        ctx: &ExecCtx,
        args: &ElementTarget,
    ) -> Result<ActionReport, ActionError> {
        execute_scroll_to_section(self, ctx, args)
    }

    fn highlight_element(
        &self,
        ctx: &ExecCtx,
        args: &HighlightArgs,
    ) -> Result<ActionReport, ActionError> {
        execute_highlight(self, ctx, args)
    }

    fn click_element(
        &self,
        ctx: &ExecCtx,
        args: &ElementTarget,
    ) -> Result<ActionReport, ActionError> {
        execute_click(self, ctx, args)
    }

    fn fill_form(&self, ctx: &ExecCtx, args: &FillFormArgs) -> Result<ActionReport, ActionError> {
        execute_fill_form(self, ctx, args)
    }

    fn scroll_window(
        &self,
        ctx: &ExecCtx,
        args: &ScrollWindowArgs,
    ) -> Result<ActionReport, ActionError> {
        execute_scroll_window(self, ctx, args)
    }

    fn navigate_to_page(
        &self,
        ctx: &ExecCtx,
        args: &NavigateArgs,
    ) -> Result<ActionReport, ActionError> {
        execute_navigate(self, ctx, args)
    }

    fn zoom_element(
        &self,
        ctx: &ExecCtx,
        args: &ElementTarget,
    ) -> Result<ActionReport, ActionError> {
        execute_zoom(self, ctx, args)
    }
}
