//! Tool catalog shared by the agent session and the action executor.
//!
//! The provider-facing function declarations are generated from the argument
//! structs below and the executor matches exhaustively on [`ToolInvocation`],
//! so adding a tool means adding a variant here and both sides follow.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Raw arguments as returned by the model: string keys, primitive values.
pub type ToolArgs = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    ScrollToSection,
    HighlightElement,
    ClickElement,
    FillForm,
    ScrollWindow,
    NavigateToPage,
    ZoomElement,
}

impl ToolName {
    pub const ALL: [ToolName; 7] = [
        ToolName::ScrollToSection,
        ToolName::HighlightElement,
        ToolName::ClickElement,
        ToolName::FillForm,
        ToolName::ScrollWindow,
        ToolName::NavigateToPage,
        ToolName::ZoomElement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ScrollToSection => "scroll_to_section",
            ToolName::HighlightElement => "highlight_element",
            ToolName::ClickElement => "click_element",
            ToolName::FillForm => "fill_form",
            ToolName::ScrollWindow => "scroll_window",
            ToolName::NavigateToPage => "navigate_to_page",
            ToolName::ZoomElement => "zoom_element",
        }
    }

    /// Human readable description sent to the provider with the schema.
    pub fn description(&self) -> &'static str {
        match self {
            ToolName::ScrollToSection => "Scrolls the window to the specified section ID.",
            ToolName::HighlightElement => "Highlights a specific DOM element visually.",
            ToolName::ClickElement => "Simulates a click on a button or link.",
            ToolName::FillForm => "Fills a form input field with a value.",
            ToolName::ScrollWindow => "Scrolls the window in a direction (up, down, top, bottom).",
            ToolName::NavigateToPage => "Navigates to a specific page path (e.g., '/about').",
            ToolName::ZoomElement => "Zooms in on a specific element to focus attention.",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .iter()
            .copied()
            .find(|tool| tool.as_str() == value)
            .ok_or_else(|| ToolParseError::UnknownTool(value.to_string()))
    }
}

/// Arguments for tools that act on a single element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ElementTarget {
    /// The ID of the target element (e.g., 'about', 'contact'). A leading '#' is accepted.
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HighlightArgs {
    /// The ID of the element to highlight.
    pub id: String,
    /// Optional hex color code or name (e.g. 'yellow', '#ff0000').
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FillFormArgs {
    /// The ID of the input field.
    pub field_id: String,
    /// The value to enter.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScrollWindowArgs {
    /// Direction to scroll: 'up', 'down', 'top', 'bottom'.
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NavigateArgs {
    /// The relative path to navigate to.
    pub path: String,
}

/// A validated tool call, one variant per tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    ScrollToSection(ElementTarget),
    HighlightElement(HighlightArgs),
    ClickElement(ElementTarget),
    FillForm(FillFormArgs),
    ScrollWindow(ScrollWindowArgs),
    NavigateToPage(NavigateArgs),
    ZoomElement(ElementTarget),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolParseError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: ToolName, reason: String },
}

impl ToolInvocation {
    /// Validate an externally supplied call against the catalog.
    pub fn parse(name: &str, args: &ToolArgs) -> Result<Self, ToolParseError> {
        let tool: ToolName = name.parse()?;
        let invocation = match tool {
            ToolName::ScrollToSection => ToolInvocation::ScrollToSection(decode(tool, args)?),
            ToolName::HighlightElement => ToolInvocation::HighlightElement(decode(tool, args)?),
            ToolName::ClickElement => ToolInvocation::ClickElement(decode(tool, args)?),
            ToolName::FillForm => ToolInvocation::FillForm(decode(tool, args)?),
            ToolName::ScrollWindow => ToolInvocation::ScrollWindow(decode(tool, args)?),
            ToolName::NavigateToPage => ToolInvocation::NavigateToPage(decode(tool, args)?),
            ToolName::ZoomElement => ToolInvocation::ZoomElement(decode(tool, args)?),
        };
        Ok(invocation)
    }

    pub fn name(&self) -> ToolName {
        match self {
            ToolInvocation::ScrollToSection(_) => ToolName::ScrollToSection,
            ToolInvocation::HighlightElement(_) => ToolName::HighlightElement,
            ToolInvocation::ClickElement(_) => ToolName::ClickElement,
            ToolInvocation::FillForm(_) => ToolName::FillForm,
            ToolInvocation::ScrollWindow(_) => ToolName::ScrollWindow,
            ToolInvocation::NavigateToPage(_) => ToolName::NavigateToPage,
            ToolInvocation::ZoomElement(_) => ToolName::ZoomElement,
        }
    }

    /// The identifier, direction or path the call acts on, as the model wrote it.
    pub fn target(&self) -> &str {
        match self {
            ToolInvocation::ScrollToSection(args)
            | ToolInvocation::ClickElement(args)
            | ToolInvocation::ZoomElement(args) => &args.id,
            ToolInvocation::HighlightElement(args) => &args.id,
            ToolInvocation::FillForm(args) => &args.field_id,
            ToolInvocation::ScrollWindow(args) => &args.direction,
            ToolInvocation::NavigateToPage(args) => &args.path,
        }
    }
}

fn decode<T>(tool: ToolName, args: &ToolArgs) -> Result<T, ToolParseError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(Value::Object(args.clone())).map_err(|err| {
        ToolParseError::InvalidArguments {
            tool,
            reason: err.to_string(),
        }
    })
}
