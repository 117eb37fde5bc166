//! Zoom primitive - scale an element up, then shrink it back

use dom_adapter::{Document, ScrollBehavior, ScrollBlock};
use sitepilot_core_types::{ElementTarget, ToolName};
use tracing::info;

use crate::{
    effects::{ScopedStyleMutation, ZOOM_TRANSFORM, ZOOM_TRANSITION, ZOOM_Z_INDEX},
    errors::ActionError,
    locator::resolve_element,
    primitives::DefaultActionPrimitives,
    types::{ActionReport, ExecCtx},
};

const ZOOM_PROPERTIES: [&str; 3] = ["transform", "z-index", "transition"];

/// Execute zoom_element primitive
///
/// transform and z-index are restored after `zoom_ms`; the transition is
/// reset `zoom_transition_reset_ms` later so the shrink-back still animates.
pub fn execute_zoom<D: Document + 'static>(
    primitives: &DefaultActionPrimitives<D>,
    ctx: &ExecCtx,
    args: &ElementTarget,
) -> Result<ActionReport, ActionError> {
    info!(
        action_id = %ctx.action_id,
        target = %args.id,
        "Executing zoom primitive"
    );

    let document = primitives.document();
    let node = resolve_element(document.as_ref(), &args.id)?;

    let mutation = ScopedStyleMutation::acquire(document.clone(), node, &ZOOM_PROPERTIES);
    mutation.apply(&[
        ("transition", ZOOM_TRANSITION),
        ("z-index", ZOOM_Z_INDEX),
        ("transform", ZOOM_TRANSFORM),
    ])?;
    document.scroll_into_view(node, ScrollBehavior::Smooth, ScrollBlock::Center)?;

    let timings = primitives.timings();
    let (shape, transition) = mutation.partition(&["transition"]);
    shape.schedule_release(timings.zoom(), primitives.reversals());
    transition.schedule_release(timings.zoom_transition_reset(), primitives.reversals());

    Ok(ActionReport::success(ctx, ToolName::ZoomElement, &args.id).with_reversal())
}
