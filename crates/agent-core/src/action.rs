use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitepilot_core_types::ToolArgs;

/// One structured step decided by the model for the current turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentAction {
    ToolCall { name: String, args: ToolArgs },
    Response { text: String },
}

impl AgentAction {
    pub fn tool_call(name: impl Into<String>, args: ToolArgs) -> Self {
        Self::ToolCall {
            name: name.into(),
            args,
        }
    }

    pub fn response(text: impl Into<String>) -> Self {
        Self::Response { text: text.into() }
    }

    pub fn is_tool_call(&self) -> bool {
        matches!(self, Self::ToolCall { .. })
    }

    /// Human readable narration used in logs.
    pub fn describe(&self) -> String {
        match self {
            Self::ToolCall { name, args } => format!(
                "Invoking tool: {} with args: {}",
                name,
                Value::Object(args.clone())
            ),
            Self::Response { text } => text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_kind_tag() {
        let args = json!({"id": "#about"}).as_object().cloned().unwrap();
        let action = AgentAction::tool_call("scroll_to_section", args);
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"kind": "tool_call", "name": "scroll_to_section", "args": {"id": "#about"}})
        );
        assert_eq!(
            action.describe(),
            r##"Invoking tool: scroll_to_section with args: {"id":"#about"}"##
        );
        assert_eq!(
            serde_json::to_value(AgentAction::response("Done")).unwrap(),
            json!({"kind": "response", "text": "Done"})
        );
    }
}
