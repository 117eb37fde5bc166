use serde::{Deserialize, Serialize};

/// Provider settings for the model-backed transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub model: String,
    pub api_base: String,
    /// Tried in order; a rate-limited key falls through to the next one.
    pub api_keys: Vec<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_keys: Vec::new(),
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}
