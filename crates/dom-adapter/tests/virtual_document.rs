use std::io::Write;

use dom_adapter::{
    Document, DocumentError, LayoutBox, NodeFixture, ScrollBehavior, ScrollBlock, VirtualDocument,
};

fn json_page(detached: bool) -> String {
    serde_json::json!({
        "location": "https://portfolio.test/work/",
        "detached": detached,
        "viewport": { "width": 800, "height": 400 },
        "body": {
            "tag": "body",
            "children": [
                { "tag": "h1", "text": "Portfolio" },
                { "tag": "div", "id": "ghost", "style": { "opacity": "0" }, "text": "boo" },
                { "tag": "div", "id": "hidden", "style": { "display": "none" }, "text": "nope" },
                {
                    "tag": "div",
                    "id": "offscreen",
                    "box": { "x": -500, "y": 0, "width": 200, "height": 50 },
                    "text": "left"
                },
                {
                    "tag": "section",
                    "id": "contact",
                    "box": { "x": 0, "y": 1000, "width": 800, "height": 300 }
                }
            ]
        }
    })
    .to_string()
}

#[test]
fn loads_json_fixture_from_disk() {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("temp file");
    file.write_all(json_page(false).as_bytes()).expect("write");

    let doc = VirtualDocument::load(file.path()).expect("load fixture");
    assert!(doc.get_element_by_id("contact").is_some());
    assert_eq!(doc.viewport().document_height, 1300.0);
}

#[test]
fn visibility_rules() {
    let doc = VirtualDocument::from_json_str(&json_page(false)).unwrap();
    let ghost = doc.get_element_by_id("ghost").unwrap();
    let hidden = doc.get_element_by_id("hidden").unwrap();
    let offscreen = doc.get_element_by_id("offscreen").unwrap();
    let contact = doc.get_element_by_id("contact").unwrap();

    assert!(!doc.is_rendered(ghost));
    assert!(!doc.is_rendered(hidden));
    assert!(!doc.is_rendered(offscreen));
    // below the fold but still actionable
    assert!(doc.is_rendered(contact));
}

#[test]
fn scroll_into_view_centers_and_clamps() {
    let doc = VirtualDocument::from_json_str(&json_page(false)).unwrap();
    let contact = doc.get_element_by_id("contact").unwrap();

    doc.scroll_into_view(contact, ScrollBehavior::Smooth, ScrollBlock::Center)
        .unwrap();
    let viewport = doc.viewport();
    assert_eq!(viewport.scroll_y, 900.0);
    assert_eq!(
        doc.scroll_history().last().map(|record| record.behavior),
        Some(ScrollBehavior::Smooth)
    );

    doc.scroll_by(0.0, 10_000.0, ScrollBehavior::Smooth);
    assert_eq!(doc.viewport().scroll_y, viewport.max_scroll_y());
    doc.scroll_to(0.0, -50.0, ScrollBehavior::Auto);
    assert_eq!(doc.viewport().scroll_y, 0.0);
}

#[test]
fn navigation_resolves_relative_paths() {
    let doc = VirtualDocument::from_json_str(&json_page(false)).unwrap();
    let url = doc.navigate("../about").unwrap();
    assert_eq!(url.as_str(), "https://portfolio.test/about");
    assert_eq!(doc.history().len(), 1);
}

#[test]
fn detached_document_cannot_navigate() {
    let doc = VirtualDocument::from_json_str(&json_page(true)).unwrap();
    let before = doc.mutation_count();
    let err = doc.navigate("/about").unwrap_err();
    assert!(matches!(err, DocumentError::NavigationUnavailable(_)));
    assert_eq!(doc.mutation_count(), before);
    assert!(doc.location().is_none());
}

#[test]
fn inserted_fixtures_land_below_existing_content() {
    let doc = VirtualDocument::from_json_str(&json_page(false)).unwrap();
    let contact = doc.get_element_by_id("contact").unwrap();
    let node = doc
        .insert_fixture(
            contact,
            &NodeFixture::element("button")
                .with_id("send")
                .with_text("Send"),
        )
        .unwrap();
    assert_eq!(doc.layout_box(node), LayoutBox::new(0.0, 1000.0, 800.0, 24.0));
    assert_eq!(doc.tag_name(node).as_deref(), Some("BUTTON"));
}

#[test]
fn malformed_fixture_is_reported() {
    let err = VirtualDocument::from_yaml_str("body: [not, a, node]").unwrap_err();
    assert!(matches!(err, DocumentError::Fixture(_)));
}
