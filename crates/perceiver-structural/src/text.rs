//! Text normalization helpers.

use crate::policy::TEXT_ELLIPSIS;

/// Collapse runs of whitespace to single spaces and trim.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to `max_chars` chars, appending an ellipsis when anything was dropped.
pub fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut truncated = text[..byte_index].to_string();
            truncated.push_str(TEXT_ELLIPSIS);
            truncated
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_collapses_whitespace() {
        assert_eq!(clean_text("  Hello \n\t world  "), "Hello world");
        assert_eq!(clean_text(" \n "), "");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let text = "é".repeat(305);
        let cut = truncate_chars(text, 300);
        assert_eq!(cut.chars().count(), 303);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_chars("short".into(), 300), "short");
        assert_eq!(truncate_chars("x".repeat(300), 300), "x".repeat(300));
    }
}
