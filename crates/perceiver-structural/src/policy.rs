use serde::{Deserialize, Serialize};

pub const MAX_OUTPUT_CHARS: usize = 50_000;
pub const MAX_TEXT_CHARS: usize = 300;
pub const TRUNCATION_MARKER: &str = "\n...[Content Truncated]...";
pub const TEXT_ELLIPSIS: &str = "...";

/// Caps applied while serializing. Lengths are counted in chars.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    pub max_output_chars: usize,
    pub max_text_chars: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            max_output_chars: MAX_OUTPUT_CHARS,
            max_text_chars: MAX_TEXT_CHARS,
        }
    }
}
