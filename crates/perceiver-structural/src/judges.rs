use dom_adapter::{Document, NodeId};

use crate::policy::SerializerConfig;
use crate::text::{clean_text, truncate_chars};

const EXCLUDED_TAGS: [&str; 6] = ["SCRIPT", "STYLE", "NOSCRIPT", "IFRAME", "SVG", "PATH"];

const EMITTED_TAGS: [&str; 17] = [
    "H1", "H2", "H3", "H4", "H5", "H6", "P", "BUTTON", "A", "INPUT", "TEXTAREA", "LABEL",
    "SECTION", "DIV", "IMG", "UL", "LI",
];

/// How the walker treats an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Drop the element and its whole subtree.
    Reject,
    /// Do not emit the element but keep walking its children.
    Skip,
    /// Candidate for a line; children are walked as well.
    Accept,
}

pub fn classify(document: &dyn Document, node: NodeId, tag: &str) -> Disposition {
    if !document.is_rendered(node) || EXCLUDED_TAGS.contains(&tag) {
        return Disposition::Reject;
    }
    if EMITTED_TAGS.contains(&tag) {
        Disposition::Accept
    } else {
        Disposition::Skip
    }
}

/// `H1`..`H6` -> 1..6.
pub fn heading_level(tag: &str) -> Option<usize> {
    let mut chars = tag.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('H'), Some(digit), None) => digit
            .to_digit(10)
            .map(|level| level as usize)
            .filter(|level| (1..=6).contains(level)),
        _ => None,
    }
}

/// Visible text, falling back to the form value then the placeholder.
pub fn element_text(document: &dyn Document, node: NodeId, config: &SerializerConfig) -> String {
    let mut text = clean_text(&document.inner_text(node));
    if text.is_empty() {
        text = document
            .value(node)
            .map(|value| clean_text(&value))
            .unwrap_or_default();
    }
    if text.is_empty() {
        text = attribute_text(document, node, "placeholder").unwrap_or_default();
    }
    truncate_chars(text, config.max_text_chars)
}

fn attribute_text(document: &dyn Document, node: NodeId, name: &str) -> Option<String> {
    document
        .attribute(node, name)
        .map(|value| clean_text(&value))
        .filter(|value| !value.is_empty())
}

/// Render the single line for an accepted element, first matching rule wins.
///
/// Subtree text is only collected for the tags whose line carries it.
pub fn render_line(
    document: &dyn Document,
    node: NodeId,
    tag: &str,
    config: &SerializerConfig,
) -> Option<String> {
    let id = document
        .element_id(node)
        .map(|id| format!(" #{id}"))
        .unwrap_or_default();
    let text = || element_text(document, node, config);

    if let Some(level) = heading_level(tag) {
        let text = text();
        return (!text.is_empty()).then(|| format!("{} {}{}", "#".repeat(level), text, id));
    }

    match tag {
        "P" => Some(text()).filter(|text| text.chars().count() > 5),
        "BUTTON" => Some(format!("[{tag}]: {}{id}", link_label(document, node, text(), config))),
        "A" if document
            .attribute(node, "href")
            .map_or(false, |href| !href.trim().is_empty()) =>
        {
            Some(format!("[{tag}]: {}{id}", link_label(document, node, text(), config)))
        }
        "IMG" => capped_attribute(document, node, "alt", config)
            .map(|alt| format!("[IMG]: {alt}{id}")),
        "LI" => {
            let text = text();
            (!text.is_empty()).then(|| format!("- {text}"))
        }
        "INPUT" | "TEXTAREA" => {
            let kind = capped_attribute(document, node, "type", config)
                .unwrap_or_else(|| "text".into());
            let placeholder = capped_attribute(document, node, "placeholder", config)
                .unwrap_or_else(|| "field".into());
            Some(format!("[INPUT {kind}]: {placeholder}{id}"))
        }
        "SECTION" if !id.is_empty() => Some(format!("\n--- SECTION: {} ---", id.trim())),
        "DIV" if !id.is_empty() => Some(format!("\n[CONTAINER]: {}", id.trim())),
        _ => None,
    }
}

fn capped_attribute(
    document: &dyn Document,
    node: NodeId,
    name: &str,
    config: &SerializerConfig,
) -> Option<String> {
    attribute_text(document, node, name).map(|value| truncate_chars(value, config.max_text_chars))
}

fn link_label(
    document: &dyn Document,
    node: NodeId,
    text: String,
    config: &SerializerConfig,
) -> String {
    if !text.is_empty() {
        return text;
    }
    capped_attribute(document, node, "aria-label", config).unwrap_or_else(|| "Link".to_string())
}
