//! Click primitive - run the element's native activation behaviour

use dom_adapter::Document;
use sitepilot_core_types::{ElementTarget, ToolName};
use tracing::info;

use crate::{
    errors::ActionError,
    locator::resolve_element,
    primitives::DefaultActionPrimitives,
    types::{ActionReport, ExecCtx},
};

/// Execute click primitive
///
/// Buttons and links are not told apart: whatever activation the element
/// supports runs (fragment links scroll, other links navigate).
pub fn execute_click<D: Document + 'static>(
    primitives: &DefaultActionPrimitives<D>,
    ctx: &ExecCtx,
    args: &ElementTarget,
) -> Result<ActionReport, ActionError> {
    info!(
        action_id = %ctx.action_id,
        target = %args.id,
        "Executing click primitive"
    );

    let document = primitives.document().as_ref();
    let node = resolve_element(document, &args.id)?;
    document.click(node)?;

    Ok(ActionReport::success(ctx, ToolName::ClickElement, &args.id))
}
