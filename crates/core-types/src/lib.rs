use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod tools;

pub use tools::{
    ElementTarget, FillFormArgs, HighlightArgs, NavigateArgs, ScrollWindowArgs, ToolArgs,
    ToolInvocation, ToolName, ToolParseError,
};

/// One conversation with the model provider.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user request -> context -> decision -> action(s) cycle.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub String);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip the optional leading `#` the model tends to copy from the serialized page.
pub fn normalize_element_id(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(TurnId::new(), TurnId::new());
        assert_ne!(ActionId::new().0, ActionId::new().0);
    }

    #[test]
    fn normalize_strips_single_hash() {
        assert_eq!(normalize_element_id("#contact"), "contact");
        assert_eq!(normalize_element_id("contact"), "contact");
        assert_eq!(normalize_element_id(" #hero "), "hero");
        assert_eq!(normalize_element_id("##odd"), "#odd");
    }
}
