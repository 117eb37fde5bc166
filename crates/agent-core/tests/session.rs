use std::sync::Arc;

use agent_core::{
    AgentAction, AgentSession, ModelToolCall, ScriptedReply, ScriptedTransport, SessionTransport,
    APOLOGY_MESSAGE,
};
use serde_json::json;
use sitepilot_core_types::ToolArgs;

fn args(value: serde_json::Value) -> ToolArgs {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn tool_calls_precede_the_response() {
    let transport = ScriptedTransport::new([ScriptedReply::tool_calls(
        vec![
            ModelToolCall {
                name: "scroll_to_section".into(),
                args: args(json!({"id": "contact"})),
            },
            ModelToolCall {
                name: "highlight_element".into(),
                args: args(json!({"id": "email"})),
            },
        ],
        Some("Here is the contact form.".into()),
    )]);
    let session = AgentSession::new(transport);

    let actions = session
        .process_message("take me to contact", "[SECTION id=\"contact\"]")
        .await;
    assert_eq!(
        actions,
        vec![
            AgentAction::tool_call("scroll_to_section", args(json!({"id": "contact"}))),
            AgentAction::tool_call("highlight_element", args(json!({"id": "email"}))),
            AgentAction::response("Here is the contact form."),
        ]
    );
}

#[tokio::test]
async fn prompt_contains_context_and_request() {
    let transport = ScriptedTransport::default();
    transport.push_text("ok");
    let session = AgentSession::new(transport);

    session.process_message("what is this?", "# Jane Doe").await;
    assert_eq!(
        session.transport().received(),
        vec!["Context (DOM Structure):\n# Jane Doe\n\nUser Request: what is this?"]
    );
}

#[tokio::test]
async fn failure_yields_single_apology_and_keeps_history() {
    let transport = ScriptedTransport::default();
    transport.push_text("first");
    transport.push_failure("network down");
    let session = AgentSession::new(transport);

    session.process_message("one", "").await;
    assert_eq!(session.transport().history_len(), 2);

    let actions = session.process_message("two", "").await;
    assert_eq!(actions, vec![AgentAction::response(APOLOGY_MESSAGE)]);
    assert_eq!(session.transport().history_len(), 2);
}

#[tokio::test]
async fn empty_reply_yields_no_actions() {
    let transport = ScriptedTransport::new([ScriptedReply::tool_calls(Vec::new(), None)]);
    let session = AgentSession::new(transport);
    assert!(session.process_message("hi", "").await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_turns_are_serialized() {
    let transport = ScriptedTransport::default();
    transport.push_text("a");
    transport.push_text("b");
    let session = Arc::new(AgentSession::new(transport));

    let first = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.process_message("one", "").await }
    });
    let second = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.process_message("two", "").await }
    });
    let (first, second) = (first.await.unwrap(), second.await.unwrap());

    let mut texts: Vec<AgentAction> = first.into_iter().chain(second).collect();
    texts.sort_by_key(|action| action.describe());
    assert_eq!(
        texts,
        vec![AgentAction::response("a"), AgentAction::response("b")]
    );
    assert_eq!(session.transport().history_len(), 4);
}
