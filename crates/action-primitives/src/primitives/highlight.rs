//! Highlight primitive - outline an element, then restore it

use dom_adapter::{Document, ScrollBehavior, ScrollBlock};
use sitepilot_core_types::{HighlightArgs, ToolName};
use tracing::info;

use crate::{
    effects::{
        ScopedStyleMutation, DEFAULT_HIGHLIGHT_COLOR, HIGHLIGHT_GLOW, HIGHLIGHT_TRANSITION,
    },
    errors::ActionError,
    locator::resolve_element,
    primitives::DefaultActionPrimitives,
    types::{ActionReport, ExecCtx},
};

const HIGHLIGHT_PROPERTIES: [&str; 3] = ["border", "box-shadow", "transition"];

/// Execute highlight_element primitive
///
/// Steps:
/// 1. Resolve the element
/// 2. Snapshot border, box-shadow and transition
/// 3. Apply the outline and glow, center the element in the viewport
/// 4. Schedule the snapshot restore after `highlight_ms`
pub fn execute_highlight<D: Document + 'static>(
    primitives: &DefaultActionPrimitives<D>,
    ctx: &ExecCtx,
    args: &HighlightArgs,
) -> Result<ActionReport, ActionError> {
    let color = args
        .color
        .as_deref()
        .map(str::trim)
        .filter(|color| !color.is_empty())
        .unwrap_or(DEFAULT_HIGHLIGHT_COLOR);

    info!(
        action_id = %ctx.action_id,
        target = %args.id,
        color = %color,
        "Executing highlight primitive"
    );

    let document = primitives.document();
    let node = resolve_element(document.as_ref(), &args.id)?;

    let mutation = ScopedStyleMutation::acquire(document.clone(), node, &HIGHLIGHT_PROPERTIES);
    let border = format!("2px solid {color}");
    mutation.apply(&[
        ("transition", HIGHLIGHT_TRANSITION),
        ("border", border.as_str()),
        ("box-shadow", HIGHLIGHT_GLOW),
    ])?;
    document.scroll_into_view(node, ScrollBehavior::Smooth, ScrollBlock::Center)?;
    mutation.schedule_release(primitives.timings().highlight(), primitives.reversals());

    Ok(ActionReport::success(ctx, ToolName::HighlightElement, &args.id).with_reversal())
}
