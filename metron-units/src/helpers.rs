//! Tool argument extraction

use serde_json::Value as JsonValue;
use metron_core::{Category, ErrorReport};

fn arg<'a>(args: &'a JsonValue, tool: &str, name: &str) -> Result<&'a JsonValue, ErrorReport> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Err(ErrorReport::missing_arg(tool, name)),
        Some(v) => Ok(v),
    }
}

/// Extract a string argument
pub fn extract_text<'a>(args: &'a JsonValue, tool: &str, name: &str) -> Result<&'a str, ErrorReport> {
    arg(args, tool, name)?
        .as_str()
        .ok_or_else(|| ErrorReport::arg_type(tool, name, "a string"))
}

/// Extract a numeric argument. Numeric strings ("2.5") are accepted too.
pub fn extract_number(args: &JsonValue, tool: &str, name: &str) -> Result<f64, ErrorReport> {
    match arg(args, tool, name)? {
        JsonValue::Number(n) => n.as_f64()
            .ok_or_else(|| ErrorReport::arg_type(tool, name, "a number")),
        JsonValue::String(s) => s.trim().parse::<f64>()
            .map_err(|_| ErrorReport::arg_type(tool, name, "a number")
                .with_note(format!("got '{}'", s))),
        _ => Err(ErrorReport::arg_type(tool, name, "a number")),
    }
}

/// Extract and parse a category argument
pub fn extract_category(args: &JsonValue, tool: &str, name: &str) -> Result<Category, ErrorReport> {
    let text = extract_text(args, tool, name)?;
    text.parse::<Category>().map_err(ErrorReport::from)
}
