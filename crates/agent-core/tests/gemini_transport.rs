use std::collections::HashMap;
use std::sync::Arc;

use agent_core::{
    AgentAction, AgentConfig, AgentError, AgentSession, GeminiTransport, SessionTransport,
    APOLOGY_MESSAGE,
};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct FakeGemini {
    /// Keys that answer 429.
    limited: Arc<Vec<String>>,
    /// Replies served in order once a key is accepted.
    replies: Arc<Mutex<Vec<(StatusCode, Value)>>>,
    seen_keys: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn generate(
    State(fake): State<FakeGemini>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let key = query.get("key").cloned().unwrap_or_default();
    fake.seen_keys.lock().push(key.clone());
    if fake.limited.contains(&key) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"code": 429, "message": "quota exceeded"}})),
        )
            .into_response();
    }
    fake.bodies.lock().push(body);
    let next = {
        let mut replies = fake.replies.lock();
        if replies.is_empty() {
            None
        } else {
            Some(replies.remove(0))
        }
    };
    match next {
        Some((status, value)) => (status, Json(value)).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn spawn(fake: FakeGemini) -> String {
    let app = Router::new().fallback(generate).with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1beta")
}

fn config(api_base: String, keys: &[&str]) -> AgentConfig {
    AgentConfig {
        api_base,
        api_keys: keys.iter().map(|key| key.to_string()).collect(),
        timeout_secs: 5,
        ..AgentConfig::default()
    }
}

fn candidate(parts: Value) -> (StatusCode, Value) {
    (
        StatusCode::OK,
        json!({"candidates": [{"content": {"role": "model", "parts": parts}}]}),
    )
}

#[tokio::test]
async fn rate_limited_key_falls_through_to_next() {
    let fake = FakeGemini {
        limited: Arc::new(vec!["first".into()]),
        replies: Arc::new(Mutex::new(vec![candidate(json!([{"text": "Hi there"}]))])),
        ..FakeGemini::default()
    };
    let base = spawn(fake.clone()).await;
    let transport = GeminiTransport::new(config(base, &["first", "second"])).unwrap();

    let reply = transport.send_turn("hello").await.unwrap();
    assert_eq!(reply.text.as_deref(), Some("Hi there"));
    assert_eq!(*fake.seen_keys.lock(), vec!["first", "second"]);
    assert_eq!(transport.history_len(), 2);
}

#[tokio::test]
async fn history_is_resent_and_grows_only_on_success() {
    let fake = FakeGemini {
        replies: Arc::new(Mutex::new(vec![
            candidate(json!([{"text": "First answer"}])),
            (StatusCode::BAD_REQUEST, json!({"error": {"message": "bad turn"}})),
            candidate(json!([{"functionCall": {"name": "click_element", "args": {"id": "cta"}}}])),
        ])),
        ..FakeGemini::default()
    };
    let base = spawn(fake.clone()).await;
    let transport = GeminiTransport::new(config(base, &["only"])).unwrap();

    transport.send_turn("one").await.unwrap();
    assert_eq!(transport.history_len(), 2);

    let err = transport.send_turn("two").await.unwrap_err();
    assert!(matches!(err, AgentError::Transport(message) if message.contains("bad turn")));
    assert_eq!(transport.history_len(), 2);

    let reply = transport.send_turn("three").await.unwrap();
    assert_eq!(reply.tool_calls[0].name, "click_element");
    assert_eq!(transport.history_len(), 4);

    let bodies = fake.bodies.lock();
    let last = bodies.last().unwrap();
    let contents = last["contents"].as_array().unwrap();
    // one + answer, then three; the failed turn is gone
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["parts"][0]["text"], "one");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["parts"][0]["text"], "three");
}

#[tokio::test]
async fn session_apologises_when_provider_fails() {
    let fake = FakeGemini {
        replies: Arc::new(Mutex::new(vec![(
            StatusCode::OK,
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
        )])),
        ..FakeGemini::default()
    };
    let base = spawn(fake).await;
    let session = AgentSession::new(GeminiTransport::new(config(base, &["k"])).unwrap());

    let actions = session.process_message("hi", "[SECTION id=\"hero\"]").await;
    assert_eq!(actions, vec![AgentAction::response(APOLOGY_MESSAGE)]);
    assert_eq!(session.transport().history_len(), 0);
}
