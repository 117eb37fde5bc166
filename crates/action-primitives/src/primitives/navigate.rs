//! Navigate primitive - full navigation to a path

use dom_adapter::Document;
use sitepilot_core_types::{NavigateArgs, ToolName};
use tracing::{info, warn};

use crate::{
    errors::ActionError,
    primitives::DefaultActionPrimitives,
    types::{ActionReport, ExecCtx},
};

/// Execute navigate_to_page primitive
///
/// Fails when the document has no browsing context or the path cannot be resolved.
pub fn execute_navigate<D: Document + 'static>(
    primitives: &DefaultActionPrimitives<D>,
    ctx: &ExecCtx,
    args: &NavigateArgs,
) -> Result<ActionReport, ActionError> {
    info!(
        action_id = %ctx.action_id,
        path = %args.path,
        "Executing navigate primitive"
    );

    let document = primitives.document().as_ref();
    match document.navigate(&args.path) {
        Ok(url) => {
            info!(action_id = %ctx.action_id, url = %url, "Navigation completed");
            Ok(ActionReport::success(ctx, ToolName::NavigateToPage, &args.path))
        }
        Err(err) => {
            warn!(action_id = %ctx.action_id, error = %err, "Navigation failed");
            Err(err.into())
        }
    }
}
