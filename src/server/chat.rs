use agent_core::AgentAction;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument};

use super::state::ServeState;

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Serialized page; older clients send it as `dom`.
    #[serde(default, rename = "domContext", alias = "dom")]
    pub dom_context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub actions: Vec<AgentAction>,
}

#[instrument(skip_all)]
pub(crate) async fn chat_handler(
    State(state): State<ServeState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!(error = %rejection, "Chat request body unreadable");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE);
        }
    };
    let Some(message) = request
        .message
        .filter(|message| !message.trim().is_empty())
    else {
        return error_response(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED);
    };
    let context = request.dom_context.unwrap_or_default();

    let actions = state.session.process_message(&message, &context).await;
    info!(
        actions = actions.len(),
        context_chars = context.chars().count(),
        "Chat turn answered"
    );
    Json(ChatResponse { actions }).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
