use dom_adapter::{Document, NodeId};
use tracing::debug;

use crate::api::StructuralPerceiver;
use crate::judges::{self, Disposition};
use crate::model::SerializedContext;
use crate::policy::{SerializerConfig, TRUNCATION_MARKER};

/// Depth-first document serializer.
///
/// Output never exceeds `max_output_chars` plus the truncation marker: a line
/// that would cross the cap is dropped, the marker appended and the walk stops.
#[derive(Clone, Debug, Default)]
pub struct DocumentSerializer {
    config: SerializerConfig,
}

impl DocumentSerializer {
    pub fn new(config: SerializerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    pub fn serialize(&self, document: &dyn Document) -> SerializedContext {
        let mut output = String::new();
        let mut output_chars = 0usize;
        let mut lines = 0usize;
        let mut truncated = false;

        // the root itself is never emitted
        let mut stack: Vec<NodeId> = document.children(document.body());
        stack.reverse();

        while let Some(node) = stack.pop() {
            let Some(tag) = document.tag_name(node) else {
                continue;
            };
            match judges::classify(document, node, &tag) {
                Disposition::Reject => continue,
                Disposition::Skip => {}
                Disposition::Accept => {
                    if let Some(line) = judges::render_line(document, node, &tag, &self.config) {
                        let line_chars = line.chars().count() + 1;
                        if output_chars + line_chars > self.config.max_output_chars {
                            output.push_str(TRUNCATION_MARKER);
                            truncated = true;
                            break;
                        }
                        output.push_str(&line);
                        output.push('\n');
                        output_chars += line_chars;
                        lines += 1;
                    }
                }
            }
            let mut children = document.children(node);
            children.reverse();
            stack.extend(children);
        }

        debug!(lines, chars = output_chars, truncated, "Serialized document");
        SerializedContext::new(output, truncated)
    }
}

impl StructuralPerceiver for DocumentSerializer {
    fn serialize(&self, document: &dyn Document) -> SerializedContext {
        DocumentSerializer::serialize(self, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_adapter::VirtualDocument;

    fn doc(yaml: &str) -> VirtualDocument {
        VirtualDocument::from_yaml_str(yaml).expect("fixture")
    }

    #[test]
    fn emits_lines_in_document_order() {
        let page = doc(r#"
body:
  tag: body
  children:
    - tag: header
      children:
        - tag: h1
          id: title
          text: "Jane   Doe"
        - tag: p
          text: Short
        - tag: p
          text: Full-stack engineer.
    - tag: section
      id: projects
      children:
        - tag: h2
          text: Projects
        - tag: ul
          children:
            - tag: li
              text: Compiler
            - tag: li
              text: ""
        - tag: a
          id: repo
          attrs: { href: "https://git.example/jane" }
        - tag: a
          text: No target
        - tag: button
          attrs: { aria-label: Open menu }
        - tag: img
          attrs: { alt: Team photo }
        - tag: img
        - tag: textarea
          id: msg
        - tag: input
          id: email
          attrs: { type: email, placeholder: Your email }
        - tag: div
          id: footer-box
"#);
        let context = DocumentSerializer::default().serialize(&page);
        let expected = "\
# Jane Doe #title
Full-stack engineer.

--- SECTION: #projects ---
## Projects
- Compiler
[A]: Link #repo
[BUTTON]: Open menu
[IMG]: Team photo
[INPUT text]: field #msg
[INPUT email]: Your email #email

[CONTAINER]: #footer-box
";
        assert_eq!(context.as_str(), expected);
        assert!(!context.is_truncated());
    }

    #[test]
    fn excluded_and_hidden_subtrees_are_rejected() {
        let page = doc(r#"
body:
  tag: body
  children:
    - tag: script
      text: var secret = 1;
    - tag: div
      style: { display: none }
      children:
        - tag: button
          text: Invisible
    - tag: div
      style: { opacity: "0" }
      children:
        - tag: button
          text: Faded
    - tag: span
      children:
        - tag: button
          id: visible
          text: Go
"#);
        let context = DocumentSerializer::default().serialize(&page);
        assert_eq!(context.as_str(), "[BUTTON]: Go #visible\n");
    }

    #[test]
    fn hidden_descendants_do_not_leak_into_parent_text() {
        let page = doc(r#"
body:
  tag: body
  children:
    - tag: p
      text: Visible intro text
      children:
        - tag: span
          style: { visibility: hidden }
          text: SECRET_HIDDEN
        - tag: span
          style: { opacity: "0" }
          text: SECRET_FADED
        - tag: span
          box: { x: -400, y: 0, width: 100, height: 20 }
          text: SECRET_OFFSCREEN
        - tag: span
          style: { display: none }
          text: SECRET_NONE
"#);
        let context = DocumentSerializer::default().serialize(&page);
        assert_eq!(context.as_str(), "Visible intro text\n");
    }

    #[test]
    fn attribute_labels_respect_text_cap() {
        let label = "a".repeat(400);
        let placeholder = "p".repeat(400);
        let page = doc(&format!(
            r#"
body:
  tag: body
  children:
    - tag: button
      id: menu
      attrs: {{ aria-label: "{label}" }}
    - tag: a
      attrs: {{ href: /docs, aria-label: "{label}" }}
    - tag: input
      id: search
      attrs: {{ placeholder: "{placeholder}" }}
"#
        ));
        let context = DocumentSerializer::default().serialize(&page);
        let capped_label = format!("{}...", "a".repeat(300));
        let capped_placeholder = format!("{}...", "p".repeat(300));
        let lines: Vec<&str> = context.as_str().lines().collect();
        assert_eq!(
            lines,
            vec![
                format!("[BUTTON]: {capped_label} #menu"),
                format!("[A]: {capped_label}"),
                format!("[INPUT text]: {capped_placeholder} #search"),
            ]
        );
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let long = "word ".repeat(100);
        let page = doc(&format!(
            "body:\n  tag: body\n  children:\n    - tag: p\n      text: \"{long}\"\n"
        ));
        let context = DocumentSerializer::new(SerializerConfig {
            max_output_chars: 50_000,
            max_text_chars: 20,
        })
        .serialize(&page);
        assert_eq!(context.as_str(), "word word word word ...\n");
    }

    #[test]
    fn output_stops_at_cap_without_splitting_lines() {
        let items: String = (0..50)
            .map(|i| format!("    - tag: li\n      text: item number {i}\n"))
            .collect();
        let page = doc(&format!("body:\n  tag: body\n  children:\n{items}"));
        let config = SerializerConfig {
            max_output_chars: 100,
            max_text_chars: 300,
        };
        let context = DocumentSerializer::new(config).serialize(&page);
        assert!(context.is_truncated());
        assert!(context.as_str().ends_with(TRUNCATION_MARKER));
        assert!(context.len_chars() <= 100 + TRUNCATION_MARKER.chars().count());
        let body = context.as_str().trim_end_matches(TRUNCATION_MARKER);
        assert!(body.lines().all(|line| line.starts_with("- item number ")));
    }
}
