use std::fmt;

/// Line-oriented digest of the document, produced fresh on every turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SerializedContext {
    text: String,
    truncated: bool,
}

impl SerializedContext {
    pub fn new(text: String, truncated: bool) -> Self {
        Self { text, truncated }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether traversal stopped at the output cap.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for SerializedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for SerializedContext {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
