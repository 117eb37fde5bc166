//! Serialized page descriptions.
//!
//! ```yaml
//! location: https://example.test/
//! viewport: { width: 1280, height: 720 }
//! body:
//!   tag: main
//!   children:
//!     - tag: h1
//!       text: Jane Doe
//!     - tag: section
//!       id: about
//!       box: { x: 0, y: 900, width: 1280, height: 600 }
//!       children:
//!         - tag: p
//!           text: Building tools for the web.
//! ```
//!
//! Elements without an explicit `box` are stacked vertically inside their
//! parent, leaves taking [`DEFAULT_LINE_HEIGHT`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::LayoutBox;

pub const DEFAULT_LINE_HEIGHT: f64 = 24.0;
pub const DEFAULT_LOCATION: &str = "http://localhost/";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageFixture {
    #[serde(default = "default_location")]
    pub location: String,
    /// A detached page has no browsing context; navigation fails.
    #[serde(default)]
    pub detached: bool,
    #[serde(default)]
    pub viewport: ViewportFixture,
    pub body: NodeFixture,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ViewportFixture {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportFixture {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeFixture {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(default, rename = "box", skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Shorthand for a leading text child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildFixture>,
}

impl NodeFixture {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn with_box(mut self, layout: LayoutBox) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_child(mut self, child: NodeFixture) -> Self {
        self.children.push(ChildFixture::Element(child));
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChildFixture {
    Text(String),
    Element(NodeFixture),
}
