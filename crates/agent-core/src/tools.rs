//! Provider-facing function declarations, generated from the tool catalog.

use schemars::{schema_for, JsonSchema};
use serde::Serialize;
use serde_json::{Map, Value};
use sitepilot_core_types::{
    ElementTarget, FillFormArgs, HighlightArgs, NavigateArgs, ScrollWindowArgs, ToolName,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// One declaration per tool, in catalog order.
pub fn function_declarations() -> Vec<FunctionDeclaration> {
    ToolName::ALL
        .iter()
        .map(|tool| FunctionDeclaration {
            name: tool.as_str().to_string(),
            description: tool.description().to_string(),
            parameters: parameters_for(*tool),
        })
        .collect()
}

fn parameters_for(tool: ToolName) -> Value {
    let mut schema = match tool {
        ToolName::ScrollToSection | ToolName::ClickElement | ToolName::ZoomElement => {
            schema_of::<ElementTarget>()
        }
        ToolName::HighlightElement => schema_of::<HighlightArgs>(),
        ToolName::FillForm => schema_of::<FillFormArgs>(),
        ToolName::ScrollWindow => schema_of::<ScrollWindowArgs>(),
        ToolName::NavigateToPage => schema_of::<NavigateArgs>(),
    };
    if let Some(description) = id_description(tool) {
        if let Some(id) = schema.pointer_mut("/properties/id") {
            id["description"] = Value::String(description.to_string());
        }
    }
    schema
}

fn id_description(tool: ToolName) -> Option<&'static str> {
    match tool {
        ToolName::ScrollToSection => {
            Some("The ID of the section to scroll to (e.g., 'about', 'contact').")
        }
        ToolName::ClickElement => Some("The ID of the element to click."),
        ToolName::ZoomElement => Some("The ID of the element to zoom in on."),
        _ => None,
    }
}

fn schema_of<T: JsonSchema>() -> Value {
    let root = schema_for!(T);
    let value = serde_json::to_value(&root.schema).unwrap_or(Value::Null);
    simplify(&value)
}

/// Reduce a JSON schema to the OpenAPI subset function declarations accept.
fn simplify(schema: &Value) -> Value {
    let Some(object) = schema.as_object() else {
        return schema.clone();
    };
    let mut out = Map::new();
    if let Some(kind) = object.get("type") {
        let kind = match kind {
            Value::Array(kinds) => kinds
                .iter()
                .find(|kind| kind.as_str() != Some("null"))
                .cloned()
                .unwrap_or(Value::Null),
            other => other.clone(),
        };
        out.insert("type".into(), kind);
    }
    for key in ["description", "required", "enum"] {
        if let Some(value) = object.get(key) {
            out.insert(key.into(), value.clone());
        }
    }
    if let Some(Value::Object(properties)) = object.get("properties") {
        let properties = properties
            .iter()
            .map(|(name, property)| (name.clone(), simplify(property)))
            .collect();
        out.insert("properties".into(), Value::Object(properties));
    }
    if let Some(items) = object.get("items") {
        out.insert("items".into(), simplify(items));
    }
    Value::Object(out)
}
