//! Application configuration.
//!
//! Loaded from YAML, then overridden from the environment.

use action_primitives::EffectTimings;
use agent_core::AgentConfig;
use perceiver_structural::SerializerConfig;
use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "SITEPILOT_MODEL";
pub const API_BASE_ENV: &str = "SITEPILOT_API_BASE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
    pub serializer: SerializerConfig,
    pub effects: EffectTimings,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// `*` allows any origin.
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            cors_origin: "*".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Provider settings from `lookup`; blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(keys) = lookup(API_KEY_ENV) {
            self.agent.api_keys = keys
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(model) = lookup(MODEL_ENV) {
            self.agent.model = model.trim().to_string();
        }
        if let Some(base) = lookup(API_BASE_ENV) {
            self.agent.api_base = base.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml_str(
            "agent:\n  model: gemini-pro\nserializer:\n  max_output_chars: 1000\n",
        )
        .unwrap();
        assert_eq!(config.agent.model, "gemini-pro");
        assert_eq!(config.agent.temperature, 0.2);
        assert_eq!(config.serializer.max_output_chars, 1000);
        assert_eq!(config.serializer.max_text_chars, 300);
        assert_eq!(config.effects.highlight_ms, 2000);
        assert_eq!(config.server.bind, "127.0.0.1:8787");
    }

    #[test]
    fn env_overrides_split_keys() {
        let env: HashMap<&str, &str> = HashMap::from([
            (API_KEY_ENV, "alpha, beta,,"),
            (MODEL_ENV, "gemini-2.0-flash"),
            (API_BASE_ENV, "  "),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.agent.api_keys, vec!["alpha", "beta"]);
        assert_eq!(config.agent.model, "gemini-2.0-flash");
        assert_eq!(
            config.agent.api_base,
            AgentConfig::default().api_base,
            "blank override ignored"
        );
    }
}
