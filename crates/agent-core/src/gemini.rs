//! Gemini `generateContent` transport with function calling.
//!
//! The transport keeps the whole conversation and re-sends it on every turn.
//! A turn joins the history only after the provider returned a usable reply.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use sitepilot_core_types::ToolArgs;
use tracing::{debug, warn};

use crate::config::AgentConfig;
use crate::errors::AgentError;
use crate::prompt::SYSTEM_INSTRUCTION;
use crate::tools::{function_declarations, FunctionDeclaration};
use crate::transport::{ModelReply, ModelToolCall, SessionTransport};

const USER_ROLE: &str = "user";
const MODEL_ROLE: &str = "model";

pub struct GeminiTransport {
    client: Client,
    config: AgentConfig,
    declarations: Vec<FunctionDeclaration>,
    history: Mutex<Vec<Content>>,
}

impl GeminiTransport {
    pub fn new(config: AgentConfig) -> Result<Self, AgentError> {
        if config.api_keys.iter().all(|key| key.trim().is_empty()) {
            return Err(AgentError::config("missing Gemini API key"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| AgentError::config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            config,
            declarations: function_declarations(),
            history: Mutex::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, message: &str) -> (Content, GenerateRequest<'_>) {
        let turn = Content::user(message);
        let mut contents = self.history.lock().clone();
        contents.push(turn.clone());
        let request = GenerateRequest {
            contents,
            system_instruction: SystemInstruction {
                parts: vec![Part::text(SYSTEM_INSTRUCTION)],
            },
            tools: vec![ToolSet {
                function_declarations: &self.declarations,
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };
        (turn, request)
    }

    async fn post(&self, body: &GenerateRequest<'_>) -> Result<String, AgentError> {
        let url = self.endpoint();
        let keys: Vec<&str> = self
            .config
            .api_keys
            .iter()
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
            .collect();

        let mut last_error: Option<AgentError> = None;
        for (index, key) in keys.iter().enumerate() {
            let response = match self
                .client
                .post(&url)
                .query(&[("key", key)])
                .json(body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    last_error = Some(AgentError::transport(format!("gemini request failed: {err}")));
                    continue;
                }
            };

            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            if status.is_success() {
                return Ok(text);
            }
            if status == StatusCode::TOO_MANY_REQUESTS && index + 1 < keys.len() {
                warn!(
                    target: "gemini",
                    attempt = index + 1,
                    remaining = keys.len() - index - 1,
                    "Gemini rate limited turn; switching API key"
                );
                last_error = Some(AgentError::transport(format!("gemini returned {status}")));
                continue;
            }
            return Err(AgentError::transport(format!(
                "gemini returned {}: {}",
                status,
                provider_message(&text)
            )));
        }

        Err(last_error
            .unwrap_or_else(|| AgentError::transport("Gemini request exhausted all API keys")))
    }
}

#[async_trait]
impl SessionTransport for GeminiTransport {
    async fn send_turn(&self, message: &str) -> Result<ModelReply, AgentError> {
        let (turn, body) = self.build_request(message);
        let raw = self.post(&body).await?;
        let (content, reply) = parse_response(&raw)?;

        let mut history = self.history.lock();
        history.push(turn);
        history.push(content);
        debug!(
            target: "gemini",
            tool_calls = reply.tool_calls.len(),
            history = history.len(),
            "Gemini turn appended"
        );
        Ok(reply)
    }

    fn history_len(&self) -> usize {
        self.history.lock().len()
    }
}

/// Decode a `generateContent` body into the model content and its reply view.
fn parse_response(raw: &str) -> Result<(Content, ModelReply), AgentError> {
    let parsed: GenerateResponse = serde_json::from_str(raw)
        .map_err(|err| AgentError::malformed(format!("gemini response invalid: {err}")))?;
    if let Some(error) = parsed.error {
        return Err(AgentError::transport(format!(
            "Gemini API error: {}",
            error.message
        )));
    }
    let mut content = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .ok_or_else(|| AgentError::malformed("gemini response missing content"))?;
    content.role = MODEL_ROLE.to_string();

    let mut text = String::new();
    let mut tool_calls = Vec::new();
    for part in &content.parts {
        if let Some(chunk) = &part.text {
            text.push_str(chunk);
        }
        if let Some(call) = &part.function_call {
            tool_calls.push(ModelToolCall {
                name: call.name.clone(),
                args: call.args.clone(),
            });
        }
    }
    let reply = ModelReply {
        text: (!text.is_empty()).then_some(text),
        tool_calls,
    };
    Ok((content, reply))
}

fn provider_message(body: &str) -> String {
    serde_json::from_str::<GenerateResponse>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .map(|error| error.message)
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content>,
    system_instruction: SystemInstruction,
    tools: Vec<ToolSet<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolSet<'a> {
    function_declarations: &'a [FunctionDeclaration],
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: USER_ROLE.to_string(),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            function_call: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: ToolArgs,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_keys_are_rejected() {
        let config = AgentConfig {
            api_keys: vec!["  ".into()],
            ..AgentConfig::default()
        };
        assert!(matches!(
            GeminiTransport::new(config),
            Err(AgentError::Config(_))
        ));
    }

    #[test]
    fn request_carries_history_tools_and_instruction() {
        let transport = GeminiTransport::new(AgentConfig {
            api_keys: vec!["k".into()],
            ..AgentConfig::default()
        })
        .unwrap();
        let (_, body) = transport.build_request("hello");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            value["tools"][0]["functionDeclarations"]
                .as_array()
                .map(Vec::len),
            Some(7)
        );
        assert!(value["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("scroll_to_section"));
        assert!(value["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn parses_function_calls_and_text() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"functionCall": {"name": "scroll_to_section", "args": {"id": "contact"}}},
                        {"functionCall": {"name": "highlight_element", "args": {"id": "email"}}},
                        {"text": "Here is the contact form."}
                    ]
                }
            }]
        })
        .to_string();
        let (content, reply) = parse_response(&raw).unwrap();
        assert_eq!(content.role, "model");
        assert_eq!(reply.tool_calls.len(), 2);
        assert_eq!(reply.tool_calls[0].name, "scroll_to_section");
        assert_eq!(reply.tool_calls[0].args["id"], "contact");
        assert_eq!(reply.text.as_deref(), Some("Here is the contact form."));
    }

    #[test]
    fn provider_error_and_empty_candidates_fail() {
        let error = json!({"error": {"code": 400, "message": "API key not valid"}}).to_string();
        assert_eq!(
            parse_response(&error).unwrap_err(),
            AgentError::Transport("Gemini API error: API key not valid".into())
        );

        let empty = json!({"candidates": []}).to_string();
        assert!(matches!(
            parse_response(&empty),
            Err(AgentError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response("not json"),
            Err(AgentError::MalformedResponse(_))
        ));
    }
}
