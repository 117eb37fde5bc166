//! Scroll primitives - bring a section into view or move the viewport

use dom_adapter::{Document, ScrollBehavior, ScrollBlock};
use sitepilot_core_types::{ElementTarget, ScrollWindowArgs, ToolName};
use tracing::{debug, info};

use crate::{
    errors::ActionError,
    locator::resolve_element,
    primitives::DefaultActionPrimitives,
    types::{ActionReport, ExecCtx, ScrollDirection},
};

/// Execute scroll_to_section primitive
///
/// Steps:
/// 1. Resolve the identifier against the live document
/// 2. Smooth-scroll the element to the top of the viewport
/// 3. Generate action report
pub fn execute_scroll_to_section<D: Document + 'static>(
    primitives: &DefaultActionPrimitives<D>,
    ctx: &ExecCtx,
    args: &ElementTarget,
) -> Result<ActionReport, ActionError> {
    info!(
        action_id = %ctx.action_id,
        target = %args.id,
        "Executing scroll_to_section primitive"
    );

    let document = primitives.document().as_ref();
    let node = resolve_element(document, &args.id)?;
    document.scroll_into_view(node, ScrollBehavior::Smooth, ScrollBlock::Start)?;

    debug!(scroll_y = document.viewport().scroll_y, "Section scrolled into view");
    Ok(ActionReport::success(ctx, ToolName::ScrollToSection, &args.id))
}

/// Execute scroll_window primitive
///
/// up/down move by half a viewport height, top/bottom jump to the document
/// extremes. An unrecognised direction fails before anything moves.
pub fn execute_scroll_window<D: Document + 'static>(
    primitives: &DefaultActionPrimitives<D>,
    ctx: &ExecCtx,
    args: &ScrollWindowArgs,
) -> Result<ActionReport, ActionError> {
    info!(
        action_id = %ctx.action_id,
        direction = %args.direction,
        "Executing scroll_window primitive"
    );

    let direction: ScrollDirection = args.direction.parse()?;
    let document = primitives.document().as_ref();
    let viewport = document.viewport();
    let half = viewport.height / 2.0;

    match direction {
        ScrollDirection::Up => document.scroll_by(0.0, -half, ScrollBehavior::Smooth),
        ScrollDirection::Down => document.scroll_by(0.0, half, ScrollBehavior::Smooth),
        ScrollDirection::Top => document.scroll_to(0.0, 0.0, ScrollBehavior::Smooth),
        ScrollDirection::Bottom => {
            document.scroll_to(0.0, viewport.document_height, ScrollBehavior::Smooth)
        }
    }

    Ok(ActionReport::success(
        ctx,
        ToolName::ScrollWindow,
        &args.direction,
    ))
}
