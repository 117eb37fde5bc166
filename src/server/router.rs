use agent_core::SessionTransport;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use super::chat::chat_handler;
use super::state::ServeState;

pub fn build_router(state: ServeState, cors_origin: &str) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin.trim() {
        "" | "*" => AllowOrigin::from(Any),
        other => match HeaderValue::from_str(other) {
            Ok(value) => AllowOrigin::exact(value),
            Err(err) => {
                warn!(origin = %other, ?err, "invalid CORS origin; allowing any");
                AllowOrigin::from(Any)
            }
        },
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn health_handler(State(state): State<ServeState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "session_id": state.session.id(),
        "history": state.session.transport().history_len(),
        "started_at": state.started_at,
    }))
}
