use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};
use url::Url;

use crate::document::Document;
use crate::errors::DocumentError;
use crate::fixture::{ChildFixture, NodeFixture, PageFixture, DEFAULT_LINE_HEIGHT};
use crate::model::{
    DomEvent, EventKind, LayoutBox, Listener, NodeId, ScrollBehavior, ScrollBlock, ScrollRecord,
    Viewport,
};

#[derive(Debug)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    layout: LayoutBox,
    value: Option<String>,
}

impl ElementData {
    fn style_is(&self, property: &str, value: &str) -> bool {
        self.style
            .get(property)
            .map_or(false, |current| current.trim().eq_ignore_ascii_case(value))
    }

    /// Same judgement as `Document::is_rendered`, from inline styles and layout.
    fn is_visible(&self) -> bool {
        if self.layout.is_empty() || self.layout.is_off_canvas() {
            return false;
        }
        if self.style_is("display", "none") || self.style_is("visibility", "hidden") {
            return false;
        }
        self.style
            .get("opacity")
            .and_then(|opacity| opacity.trim().parse::<f64>().ok())
            .map_or(true, |opacity| opacity > 0.0)
    }
}

#[derive(Debug)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
    kind: NodeKind,
}

impl NodeData {
    fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }
}

#[derive(Debug)]
struct DocumentState {
    nodes: Vec<NodeData>,
    body: NodeId,
    viewport_width: f64,
    viewport_height: f64,
    scroll_x: f64,
    scroll_y: f64,
    location: Option<Url>,
    history: Vec<Url>,
    scrolls: Vec<ScrollRecord>,
    mutations: u64,
}

impl DocumentState {
    fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0)
    }

    fn attached_element(&self, node: NodeId) -> Result<&ElementData, DocumentError> {
        let data = self
            .node(node)
            .filter(|data| data.attached)
            .ok_or(DocumentError::UnknownNode(node))?;
        data.element().ok_or(DocumentError::NotAnElement(node))
    }

    fn push(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent,
            children: Vec::new(),
            attached: true,
            kind,
        });
        if let Some(parent) = parent {
            if let Some(parent) = self.nodes.get_mut(parent.0) {
                parent.children.push(id);
            }
        }
        id
    }

    /// Insert a fixture subtree; returns the new element and the height it occupies.
    fn insert(
        &mut self,
        parent: Option<NodeId>,
        fixture: &NodeFixture,
        origin_x: f64,
        origin_y: f64,
        width: f64,
    ) -> (NodeId, f64) {
        let mut attributes = fixture.attrs.clone();
        if let Some(id) = &fixture.id {
            attributes.insert("id".to_string(), id.clone());
        }
        let hidden = fixture.style.get("display").map(String::as_str) == Some("none");
        let element = self.push(
            parent,
            NodeKind::Element(ElementData {
                tag: fixture.tag.to_ascii_uppercase(),
                attributes,
                style: fixture.style.clone(),
                layout: LayoutBox::default(),
                value: fixture.value.clone(),
            }),
        );

        let (x, y, inner_width) = match fixture.layout {
            Some(layout) => (layout.x, layout.y, layout.width),
            None => (origin_x, origin_y, width),
        };

        let mut cursor = y;
        if let Some(text) = &fixture.text {
            self.push(Some(element), NodeKind::Text(text.clone()));
            cursor += DEFAULT_LINE_HEIGHT;
        }
        let mut has_elements = false;
        let mut has_text = fixture.text.is_some();
        for child in &fixture.children {
            match child {
                ChildFixture::Text(text) => {
                    has_text = true;
                    self.push(Some(element), NodeKind::Text(text.clone()));
                }
                ChildFixture::Element(child) => {
                    has_elements = true;
                    let (_, height) = self.insert(Some(element), child, x, cursor, inner_width);
                    cursor += height;
                }
            }
        }

        let layout = match fixture.layout {
            Some(layout) => layout,
            None => {
                let height = if hidden {
                    0.0
                } else if has_elements && !has_text {
                    cursor - y
                } else {
                    (cursor - y).max(DEFAULT_LINE_HEIGHT)
                };
                LayoutBox::new(x, y, if hidden { 0.0 } else { inner_width }, height)
            }
        };
        if let Some(data) = self.nodes.get_mut(element.0).and_then(NodeData::element_mut) {
            data.layout = layout;
        }
        (element, layout.height)
    }

    fn document_height(&self) -> f64 {
        self.nodes
            .iter()
            .filter(|node| node.attached)
            .filter_map(NodeData::element)
            .map(|element| element.layout.bottom())
            .fold(self.viewport_height, f64::max)
    }

    fn document_width(&self) -> f64 {
        self.nodes
            .iter()
            .filter(|node| node.attached)
            .filter_map(NodeData::element)
            .map(|element| element.layout.right())
            .fold(self.viewport_width, f64::max)
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
            scroll_x: self.scroll_x,
            scroll_y: self.scroll_y,
            document_height: self.document_height(),
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut Vec<String>) {
        let Some(data) = self.node(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            }
            NodeKind::Element(element) => {
                if element.style_is("display", "none")
                    || matches!(element.tag.as_str(), "SCRIPT" | "STYLE" | "NOSCRIPT")
                {
                    return;
                }
                for child in &data.children {
                    let hidden = self
                        .node(*child)
                        .and_then(NodeData::element)
                        .map_or(false, |child| !child.is_visible());
                    if !hidden {
                        self.collect_text(*child, out);
                    }
                }
            }
        }
    }

    fn find_by_id(&self, node: NodeId, id: &str) -> Option<NodeId> {
        let data = self.node(node)?;
        let element = data.element()?;
        if element.attributes.get("id").map(String::as_str) == Some(id) {
            return Some(node);
        }
        data.children
            .iter()
            .find_map(|child| self.find_by_id(*child, id))
    }

    fn detach(&mut self, node: NodeId) {
        let children = match self.nodes.get_mut(node.0) {
            Some(data) => {
                data.attached = false;
                data.children.clone()
            }
            None => return,
        };
        for child in children {
            self.detach(child);
        }
    }
}

/// In-memory document with layout boxes, inline styles, listeners and a location.
///
/// Navigation updates the location and history but keeps the loaded content,
/// which is enough for a single fixture page.
pub struct VirtualDocument {
    state: RwLock<DocumentState>,
    listeners: RwLock<HashMap<NodeId, Vec<(EventKind, Listener)>>>,
}

impl std::fmt::Debug for VirtualDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("VirtualDocument")
            .field("nodes", &state.nodes.len())
            .field("location", &state.location.as_ref().map(Url::as_str))
            .finish()
    }
}

impl VirtualDocument {
    pub fn from_fixture(fixture: PageFixture) -> Result<Self, DocumentError> {
        let location = if fixture.detached {
            None
        } else {
            Some(
                Url::parse(&fixture.location).map_err(|err| DocumentError::InvalidUrl {
                    url: fixture.location.clone(),
                    reason: err.to_string(),
                })?,
            )
        };

        let mut state = DocumentState {
            nodes: Vec::new(),
            body: NodeId(0),
            viewport_width: fixture.viewport.width,
            viewport_height: fixture.viewport.height,
            scroll_x: 0.0,
            scroll_y: 0.0,
            location,
            history: Vec::new(),
            scrolls: Vec::new(),
            mutations: 0,
        };
        let (body, _) = state.insert(None, &fixture.body, 0.0, 0.0, fixture.viewport.width);
        state.body = body;
        debug!(nodes = state.nodes.len(), "Loaded virtual document");

        Ok(Self {
            state: RwLock::new(state),
            listeners: RwLock::new(HashMap::new()),
        })
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, DocumentError> {
        let fixture: PageFixture =
            serde_yaml::from_str(source).map_err(|err| DocumentError::fixture(err.to_string()))?;
        Self::from_fixture(fixture)
    }

    pub fn from_json_str(source: &str) -> Result<Self, DocumentError> {
        let fixture: PageFixture =
            serde_json::from_str(source).map_err(|err| DocumentError::fixture(err.to_string()))?;
        Self::from_fixture(fixture)
    }

    /// Load a fixture file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| DocumentError::fixture(format!("{}: {}", path.display(), err)))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            _ => Self::from_yaml_str(&source),
        }
    }

    /// Append a fixture subtree below the existing children of `parent`.
    pub fn insert_fixture(
        &self,
        parent: NodeId,
        fixture: &NodeFixture,
    ) -> Result<NodeId, DocumentError> {
        let mut state = self.state.write();
        let parent_layout = state.attached_element(parent)?.layout;
        let origin_y = state
            .node(parent)
            .map(|data| {
                data.children
                    .iter()
                    .filter_map(|child| state.node(*child).and_then(NodeData::element))
                    .map(|element| element.layout.bottom())
                    .fold(parent_layout.y, f64::max)
            })
            .unwrap_or(parent_layout.y);
        let (node, _) = state.insert(
            Some(parent),
            fixture,
            parent_layout.x,
            origin_y,
            parent_layout.width,
        );
        state.mutations += 1;
        Ok(node)
    }

    pub fn add_event_listener<F>(&self, node: NodeId, kind: EventKind, listener: F)
    where
        F: Fn(&DomEvent) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        self.listeners
            .write()
            .entry(node)
            .or_default()
            .push((kind, listener));
    }

    /// Every location reached through `navigate`, oldest first.
    pub fn history(&self) -> Vec<Url> {
        self.state.read().history.clone()
    }

    pub fn scroll_history(&self) -> Vec<ScrollRecord> {
        self.state.read().scrolls.clone()
    }

    /// Number of mutations applied since the document was loaded.
    pub fn mutation_count(&self) -> u64 {
        self.state.read().mutations
    }

    fn scroll_target_y(&self, node: NodeId, block: ScrollBlock) -> Result<f64, DocumentError> {
        let state = self.state.read();
        let layout = state.attached_element(node)?.layout;
        let viewport_height = state.viewport_height;
        let current = state.scroll_y;
        let target = match block {
            ScrollBlock::Start => layout.y,
            ScrollBlock::Center => layout.y + layout.height / 2.0 - viewport_height / 2.0,
            ScrollBlock::End => layout.bottom() - viewport_height,
            ScrollBlock::Nearest => {
                if layout.y < current {
                    layout.y
                } else if layout.bottom() > current + viewport_height {
                    layout.bottom() - viewport_height
                } else {
                    current
                }
            }
        };
        Ok(target)
    }
}

impl Document for VirtualDocument {
    fn body(&self) -> NodeId {
        self.state.read().body
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let state = self.state.read();
        state
            .node(node)
            .map(|data| {
                data.children
                    .iter()
                    .copied()
                    .filter(|child| state.node(*child).and_then(NodeData::element).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        let state = self.state.read();
        state
            .node(node)
            .and_then(NodeData::element)
            .map(|element| element.tag.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let state = self.state.read();
        state
            .node(node)
            .and_then(NodeData::element)
            .and_then(|element| element.attributes.get(name).cloned())
    }

    fn inner_text(&self, node: NodeId) -> String {
        let state = self.state.read();
        let mut parts = Vec::new();
        state.collect_text(node, &mut parts);
        parts.join(" ")
    }

    fn value(&self, node: NodeId) -> Option<String> {
        let state = self.state.read();
        state
            .node(node)
            .and_then(NodeData::element)
            .and_then(|element| element.value.clone())
    }

    fn layout_box(&self, node: NodeId) -> LayoutBox {
        let state = self.state.read();
        state
            .node(node)
            .and_then(NodeData::element)
            .map(|element| element.layout)
            .unwrap_or_default()
    }

    fn computed_style(&self, node: NodeId, property: &str) -> String {
        if let Some(value) = self.style_property(node, property) {
            return value;
        }
        match property {
            "display" => "block",
            "visibility" => "visible",
            "opacity" => "1",
            _ => "",
        }
        .to_string()
    }

    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        let state = self.state.read();
        state.find_by_id(state.body, id)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.state
            .read()
            .node(node)
            .map(|data| data.attached)
            .unwrap_or(false)
    }

    fn viewport(&self) -> Viewport {
        self.state.read().viewport()
    }

    fn scroll_to(&self, x: f64, y: f64, behavior: ScrollBehavior) {
        let mut state = self.state.write();
        let max_x = (state.document_width() - state.viewport_width).max(0.0);
        let max_y = (state.document_height() - state.viewport_height).max(0.0);
        state.scroll_x = x.clamp(0.0, max_x);
        state.scroll_y = y.clamp(0.0, max_y);
        let record = ScrollRecord {
            x: state.scroll_x,
            y: state.scroll_y,
            behavior,
        };
        state.scrolls.push(record);
        state.mutations += 1;
    }

    fn scroll_into_view(
        &self,
        node: NodeId,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    ) -> Result<(), DocumentError> {
        let target_y = self.scroll_target_y(node, block)?;
        let current_x = self.state.read().scroll_x;
        self.scroll_to(current_x, target_y, behavior);
        Ok(())
    }

    fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let state = self.state.read();
        state
            .node(node)
            .and_then(NodeData::element)
            .and_then(|element| element.style.get(property).cloned())
    }

    fn set_style_property(
        &self,
        node: NodeId,
        property: &str,
        value: Option<&str>,
    ) -> Result<(), DocumentError> {
        let mut state = self.state.write();
        let data = state
            .nodes
            .get_mut(node.0)
            .ok_or(DocumentError::UnknownNode(node))?;
        if !data.attached {
            debug!(%node, property, "Skipping style write on removed node");
            return Ok(());
        }
        let element = data.element_mut().ok_or(DocumentError::NotAnElement(node))?;
        match value.filter(|value| !value.is_empty()) {
            Some(value) => {
                element.style.insert(property.to_string(), value.to_string());
            }
            None => {
                element.style.remove(property);
            }
        }
        state.mutations += 1;
        Ok(())
    }

    fn click(&self, node: NodeId) -> Result<(), DocumentError> {
        let (tag, href) = {
            let state = self.state.read();
            let element = state.attached_element(node)?;
            (element.tag.clone(), element.attributes.get("href").cloned())
        };

        self.dispatch_event(&DomEvent::bubbling(EventKind::Click, node))?;

        if tag != "A" {
            return Ok(());
        }
        match href.as_deref().map(str::trim) {
            Some(href) if href.starts_with('#') => {
                if let Some(target) = self.get_element_by_id(&href[1..]) {
                    self.scroll_into_view(target, ScrollBehavior::Smooth, ScrollBlock::Start)?;
                }
                Ok(())
            }
            Some(href) if !href.is_empty() => self.navigate(href).map(|_| ()),
            _ => Ok(()),
        }
    }

    fn set_native_value(&self, node: NodeId, value: &str) -> Result<(), DocumentError> {
        let mut state = self.state.write();
        let data = state
            .nodes
            .get_mut(node.0)
            .filter(|data| data.attached)
            .ok_or(DocumentError::UnknownNode(node))?;
        let element = data.element_mut().ok_or(DocumentError::NotAnElement(node))?;
        element.value = Some(value.to_string());
        state.mutations += 1;
        Ok(())
    }

    fn dispatch_event(&self, event: &DomEvent) -> Result<(), DocumentError> {
        let path = {
            let state = self.state.read();
            if state.node(event.target).is_none() {
                return Err(DocumentError::UnknownNode(event.target));
            }
            let mut path = vec![event.target];
            if event.bubbles {
                let mut current = state.node(event.target).and_then(|data| data.parent);
                while let Some(node) = current {
                    path.push(node);
                    current = state.node(node).and_then(|data| data.parent);
                }
            }
            path
        };

        let matching: Vec<Listener> = {
            let listeners = self.listeners.read();
            path.iter()
                .filter_map(|node| listeners.get(node))
                .flat_map(|registered| registered.iter())
                .filter(|(kind, _)| *kind == event.kind)
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        for listener in matching {
            listener(event);
        }
        Ok(())
    }

    fn navigate(&self, path: &str) -> Result<Url, DocumentError> {
        let mut state = self.state.write();
        let base = state.location.clone().ok_or_else(DocumentError::detached)?;
        let next = base.join(path).map_err(|err| DocumentError::InvalidUrl {
            url: path.to_string(),
            reason: err.to_string(),
        })?;
        info!(from = %base, to = %next, "Navigating document");
        state.location = Some(next.clone());
        state.history.push(next.clone());
        state.scroll_x = 0.0;
        state.scroll_y = 0.0;
        state.mutations += 1;
        Ok(next)
    }

    fn location(&self) -> Option<Url> {
        self.state.read().location.clone()
    }

    fn remove(&self, node: NodeId) -> Result<(), DocumentError> {
        let mut state = self.state.write();
        let parent = state
            .node(node)
            .filter(|data| data.attached)
            .ok_or(DocumentError::UnknownNode(node))?
            .parent;
        if let Some(parent) = parent {
            if let Some(parent) = state.nodes.get_mut(parent.0) {
                parent.children.retain(|child| *child != node);
            }
        }
        state.detach(node);
        state.mutations += 1;
        debug!(%node, "Removed node from document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PAGE: &str = r##"
location: https://portfolio.test/
viewport: { width: 1000, height: 600 }
body:
  tag: body
  children:
    - tag: nav
      children:
        - tag: a
          id: about-link
          attrs: { href: "#about" }
          text: About
        - tag: a
          id: blog-link
          attrs: { href: /blog }
          text: Blog
    - tag: section
      id: about
      box: { x: 0, y: 1200, width: 1000, height: 400 }
      children:
        - tag: p
          text: "  Hello   there  "
        - tag: input
          id: email
          attrs: { type: email, placeholder: Your email }
"##;

    fn page() -> VirtualDocument {
        VirtualDocument::from_yaml_str(PAGE).expect("fixture parses")
    }

    #[test]
    fn auto_layout_stacks_children() {
        let doc = page();
        let about_link = doc.get_element_by_id("about-link").unwrap();
        let blog_link = doc.get_element_by_id("blog-link").unwrap();
        assert_eq!(doc.layout_box(about_link).y, 0.0);
        assert_eq!(doc.layout_box(blog_link).y, DEFAULT_LINE_HEIGHT);
        assert_eq!(doc.viewport().document_height, 1600.0);
    }

    #[test]
    fn anchor_with_fragment_scrolls_to_target() {
        let doc = page();
        let link = doc.get_element_by_id("about-link").unwrap();
        doc.click(link).unwrap();
        assert_eq!(doc.viewport().scroll_y, 1000.0);
        assert!(doc.history().is_empty());
    }

    #[test]
    fn anchor_with_path_navigates() {
        let doc = page();
        let link = doc.get_element_by_id("blog-link").unwrap();
        doc.click(link).unwrap();
        assert_eq!(
            doc.location().map(|url| url.to_string()),
            Some("https://portfolio.test/blog".to_string())
        );
    }

    #[test]
    fn events_bubble_to_ancestors() {
        let doc = page();
        let email = doc.get_element_by_id("email").unwrap();
        let about = doc.get_element_by_id("about").unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        doc.add_event_listener(about, EventKind::Input, move |event| {
            assert_eq!(event.kind, EventKind::Input);
            counter.fetch_add(1, Ordering::SeqCst);
        });
        doc.dispatch_event(&DomEvent::bubbling(EventKind::Input, email))
            .unwrap();
        doc.dispatch_event(&DomEvent::bubbling(EventKind::Change, email))
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_nodes_ignore_style_writes() {
        let doc = page();
        let about = doc.get_element_by_id("about").unwrap();
        doc.remove(about).unwrap();
        assert!(!doc.contains(about));
        assert!(doc.get_element_by_id("email").is_none());
        doc.set_style_property(about, "border", Some("1px solid red"))
            .unwrap();
        assert_eq!(doc.style_property(about, "border"), None);
    }

    #[test]
    fn inner_text_collapses_to_trimmed_parts() {
        let doc = page();
        let about = doc.get_element_by_id("about").unwrap();
        assert_eq!(doc.inner_text(about), "Hello   there");
    }

    #[test]
    fn inner_text_skips_descendants_that_are_not_rendered() {
        let doc = VirtualDocument::from_yaml_str(
            r#"
body:
  tag: body
  children:
    - tag: p
      id: intro
      children:
        - Shown
        - tag: span
          style: { visibility: hidden }
          text: hidden
        - tag: span
          style: { opacity: "0" }
          text: faded
        - tag: em
          text: also shown
"#,
        )
        .expect("fixture parses");
        let intro = doc.get_element_by_id("intro").unwrap();
        assert_eq!(doc.inner_text(intro), "Shown also shown");
        assert!(doc.is_rendered(intro));
    }
}
