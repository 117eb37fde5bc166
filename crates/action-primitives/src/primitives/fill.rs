//! Fill primitive - set a field value the way a user edit would

use dom_adapter::{Document, DomEvent, EventKind};
use sitepilot_core_types::{FillFormArgs, ToolName};
use tracing::{debug, info};

use crate::{
    errors::ActionError,
    locator::resolve_element,
    primitives::DefaultActionPrimitives,
    types::{ActionReport, ExecCtx},
};

/// Execute fill_form primitive
///
/// Steps:
/// 1. Resolve the field
/// 2. Write the value through the native setter
/// 3. Dispatch bubbling `input` then `change` so reactive layers observe it
pub fn execute_fill_form<D: Document + 'static>(
    primitives: &DefaultActionPrimitives<D>,
    ctx: &ExecCtx,
    args: &FillFormArgs,
) -> Result<ActionReport, ActionError> {
    info!(
        action_id = %ctx.action_id,
        target = %args.field_id,
        value_len = args.value.chars().count(),
        "Executing fill_form primitive"
    );

    let document = primitives.document().as_ref();
    let node = resolve_element(document, &args.field_id)?;
    document.set_native_value(node, &args.value)?;
    document.dispatch_event(&DomEvent::bubbling(EventKind::Input, node))?;
    document.dispatch_event(&DomEvent::bubbling(EventKind::Change, node))?;

    debug!(action_id = %ctx.action_id, "Input and change notifications dispatched");
    Ok(ActionReport::success(ctx, ToolName::FillForm, &args.field_id))
}
