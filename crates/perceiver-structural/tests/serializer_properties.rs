use dom_adapter::{Document, NodeFixture, VirtualDocument};
use perceiver_structural::{
    DocumentSerializer, SerializerConfig, StructuralPerceiver, TRUNCATION_MARKER,
};

const PORTFOLIO: &str = r##"
location: https://jane.dev/
viewport: { width: 1280, height: 720 }
body:
  tag: body
  children:
    - tag: nav
      children:
        - tag: a
          attrs: { href: "#about" }
          text: About
        - tag: a
          attrs: { href: "#contact" }
          text: Contact
    - tag: section
      id: hero
      children:
        - tag: h1
          text: Jane Doe
        - tag: p
          text: Systems engineer who likes compilers.
        - tag: button
          id: cta
          text: Hire me
    - tag: section
      id: about
      box: { x: 0, y: 2000, width: 1280, height: 500 }
      children:
        - tag: h2
          text: About
        - tag: p
          text: Ten years of shipping.
    - tag: section
      id: contact
      box: { x: 0, y: 3000, width: 1280, height: 500 }
      children:
        - tag: input
          id: email
          attrs: { type: email, placeholder: you@example.com }
        - tag: textarea
          id: message
          attrs: { placeholder: Say hello }
"##;

fn portfolio() -> VirtualDocument {
    VirtualDocument::from_yaml_str(PORTFOLIO).expect("portfolio fixture")
}

#[test]
fn serialization_is_idempotent() {
    let doc = portfolio();
    let serializer = DocumentSerializer::default();
    let first = serializer.serialize(&doc);
    let second = serializer.serialize(&doc);
    assert_eq!(first, second);
    assert!(!first.is_truncated());
}

#[test]
fn sections_below_the_fold_are_included() {
    let context = DocumentSerializer::default().serialize(&portfolio());
    assert!(context.as_str().contains("--- SECTION: #contact ---"));
    assert!(context.as_str().contains("[INPUT email]: you@example.com #email"));
    assert!(context.as_str().contains("[INPUT text]: Say hello #message"));
}

#[test]
fn serialization_does_not_mutate_the_document() {
    let doc = portfolio();
    let before = doc.mutation_count();
    let perceiver: &dyn StructuralPerceiver = &DocumentSerializer::default();
    perceiver.serialize(&doc);
    assert_eq!(doc.mutation_count(), before);
    assert_eq!(doc.viewport().scroll_y, 0.0);
}

#[test]
fn removed_elements_disappear_from_the_next_digest() {
    let doc = portfolio();
    let serializer = DocumentSerializer::default();
    let cta = doc.get_element_by_id("cta").expect("cta");
    doc.remove(cta).expect("remove");
    let context = serializer.serialize(&doc);
    assert!(!context.as_str().contains("#cta"));
}

#[test]
fn output_is_bounded_for_any_cap() {
    let doc = portfolio();
    let hero = doc.get_element_by_id("hero").expect("hero");
    for i in 0..200 {
        doc.insert_fixture(
            hero,
            &NodeFixture::element("p").with_text(format!("Paragraph number {i} with text")),
        )
        .expect("insert");
    }

    for cap in [0usize, 1, 17, 64, 500, 4_000] {
        let context = DocumentSerializer::new(SerializerConfig {
            max_output_chars: cap,
            ..SerializerConfig::default()
        })
        .serialize(&doc);
        assert!(context.len_chars() <= cap + TRUNCATION_MARKER.chars().count());
        assert!(context.is_truncated());
    }
}
