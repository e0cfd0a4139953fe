//! Plugin traits

use metron_core::ErrorReport;
use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};
use crate::ToolContext;

/// Metadata about a tool argument
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    /// JSON schema type: "string", "number", ...
    pub typ: &'static str,
    pub description: &'static str,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl ArgMeta {
    pub const fn required(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: false, default: None }
    }

    pub const fn optional(name: &'static str, typ: &'static str, description: &'static str, default: &'static str) -> Self {
        Self { name, typ, description, optional: true, default: Some(default) }
    }
}

/// Metadata for a tool plugin
#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub args: &'static [ArgMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    pub category: &'static str,
    pub related: &'static [&'static str],
}

impl ToolMeta {
    /// JSON schema describing the tool's arguments
    pub fn input_schema(&self) -> JsonValue {
        let mut properties = Map::new();
        for arg in self.args {
            let mut prop = json!({
                "type": arg.typ,
                "description": arg.description,
            });
            if let Some(default) = arg.default {
                prop["default"] = JsonValue::String(default.to_string());
            }
            properties.insert(arg.name.to_string(), prop);
        }

        let required: Vec<&str> = self.args.iter()
            .filter(|a| !a.optional)
            .map(|a| a.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// What a successful tool call hands back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    /// One-line human summary
    pub text: String,
    /// Structured payload
    pub data: JsonValue,
}

impl ToolOutput {
    pub fn new(text: impl Into<String>, data: JsonValue) -> Self {
        Self { text: text.into(), data }
    }
}

/// Pure tool plugin
pub trait ToolPlugin: Send + Sync {
    fn meta(&self) -> ToolMeta;

    fn call(&self, args: &JsonValue, ctx: &ToolContext) -> Result<ToolOutput, ErrorReport>;

    /// Base currency whose rate table must be in the context before `call`.
    /// Most tools never need one.
    fn required_rates(&self, _args: &JsonValue) -> Option<String> {
        None
    }
}
