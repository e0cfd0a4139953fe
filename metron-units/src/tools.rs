//! Conversion tools exposed through the plugin registry

use metron_core::{normalize_code, Category, ErrorReport};
use metron_plugin::prelude::*;
use serde_json::{json, Value as JsonValue};
use crate::helpers::{extract_category, extract_number, extract_text};
use crate::{ConversionResult, UNITS};

fn result_output(result: &ConversionResult, ctx: &ToolContext) -> ToolOutput {
    let data = json!({
        "category": result.category,
        "input": result.input,
        "value": result.value,
        "display": result.display_value(ctx.precision),
        "from": { "name": result.from_name, "symbol": result.from_symbol },
        "to": { "name": result.to_name, "symbol": result.to_symbol },
    });
    ToolOutput::new(result.summary(ctx.precision), data)
}

// ============ list_categories ============

pub struct ListCategories;

static LIST_CATEGORIES_EXAMPLES: [&str; 1] = [
    "list_categories() → Length, Weight, Temperature, ...",
];

impl ToolPlugin for ListCategories {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "list_categories",
            description: "List the conversion categories and how each converts",
            usage: "list_categories()",
            args: &[],
            returns: "List of {name, slug, strategy}",
            examples: &LIST_CATEGORIES_EXAMPLES,
            category: "units",
            related: &["list_units"],
        }
    }

    fn call(&self, _args: &JsonValue, _ctx: &ToolContext) -> Result<ToolOutput, ErrorReport> {
        let categories: Vec<JsonValue> = UNITS.categories()
            .iter()
            .map(|c| json!({
                "name": c.name(),
                "slug": c.slug(),
                "strategy": c.strategy().to_string(),
            }))
            .collect();

        let names: Vec<&str> = UNITS.categories().iter().map(|c| c.name()).collect();
        Ok(ToolOutput::new(names.join(", "), JsonValue::Array(categories)))
    }
}

// ============ list_units ============

pub struct ListUnits;

static LIST_UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("category", "string", "Category name (e.g. \"Length\", \"digital storage\")"),
];

static LIST_UNITS_EXAMPLES: [&str; 2] = [
    "list_units(\"Length\") → Millimeter (mm), Centimeter (cm), ...",
    "list_units(\"Currency\") → USD, EUR, GBP, INR, JPY",
];

impl ToolPlugin for ListUnits {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "list_units",
            description: "List the units of a category in display order",
            usage: "list_units(category)",
            args: &LIST_UNITS_ARGS,
            returns: "List of {name, symbol}",
            examples: &LIST_UNITS_EXAMPLES,
            category: "units",
            related: &["list_categories", "convert"],
        }
    }

    fn call(&self, args: &JsonValue, _ctx: &ToolContext) -> Result<ToolOutput, ErrorReport> {
        let category = extract_category(args, "list_units", "category")?;
        let units = UNITS.list_units(category)?;

        let text = units.iter()
            .map(|(name, symbol)| if name == symbol { name.clone() } else { format!("{} ({})", name, symbol) })
            .collect::<Vec<_>>()
            .join(", ");
        let data: Vec<JsonValue> = units.iter()
            .map(|(name, symbol)| json!({ "name": name, "symbol": symbol }))
            .collect();

        Ok(ToolOutput::new(format!("{}: {}", category, text), JsonValue::Array(data)))
    }
}

// ============ convert ============

pub struct Convert;

static CONVERT_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("category", "string", "Category of both units"),
    ArgMeta::required("from_unit", "string", "Source unit name or symbol (e.g. \"km\")"),
    ArgMeta::required("to_unit", "string", "Target unit name or symbol (e.g. \"Mile\")"),
    ArgMeta::required("value", "number", "Value to convert"),
];

static CONVERT_EXAMPLES: [&str; 3] = [
    "convert(\"Length\", \"km\", \"mi\", 100) → 62.137119",
    "convert(\"Temperature\", \"Celsius\", \"Fahrenheit\", 100) → 212",
    "convert(\"Currency\", \"USD\", \"EUR\", 10) → rate-dependent",
];

impl ToolPlugin for Convert {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "convert",
            description: "Convert a value between two units of the same category",
            usage: "convert(category, from_unit, to_unit, value)",
            args: &CONVERT_ARGS,
            returns: "Converted value with both units resolved",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &["convert_expression", "list_units"],
        }
    }

    fn call(&self, args: &JsonValue, ctx: &ToolContext) -> Result<ToolOutput, ErrorReport> {
        let category = extract_category(args, "convert", "category")?;
        let from = extract_text(args, "convert", "from_unit")?;
        let to = extract_text(args, "convert", "to_unit")?;
        let value = extract_number(args, "convert", "value")?;

        let request = crate::ConversionRequest::new(category, from, to, value);
        let result = UNITS.convert(&request, ctx.rates.as_ref())?;
        Ok(result_output(&result, ctx))
    }

    fn required_rates(&self, args: &JsonValue) -> Option<String> {
        let category = extract_category(args, "convert", "category").ok()?;
        if category != Category::Currency {
            return None;
        }
        let from = extract_text(args, "convert", "from_unit").ok()?;
        Some(normalize_code(from))
    }
}

// ============ convert_expression ============

pub struct ConvertExpression;

static CONVERT_EXPRESSION_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("expression", "string", "Conversion such as \"100 km to mi\" or \"32 °F -> °C\""),
];

static CONVERT_EXPRESSION_EXAMPLES: [&str; 3] = [
    "convert_expression(\"100 km to mi\") → 62.137119",
    "convert_expression(\"2 GB in MB\") → 2048",
    "convert_expression(\"0 °C → K\") → 273.15",
];

impl ToolPlugin for ConvertExpression {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "convert_expression",
            description: "Convert a written expression; the category is inferred from the source unit",
            usage: "convert_expression(expression)",
            args: &CONVERT_EXPRESSION_ARGS,
            returns: "Converted value with both units resolved",
            examples: &CONVERT_EXPRESSION_EXAMPLES,
            category: "units",
            related: &["convert"],
        }
    }

    fn call(&self, args: &JsonValue, ctx: &ToolContext) -> Result<ToolOutput, ErrorReport> {
        let expression = extract_text(args, "convert_expression", "expression")?;
        let request = UNITS.parse_expression_with_rates(expression, ctx.rates.as_ref())?;
        let result = UNITS.convert(&request, ctx.rates.as_ref())?;
        Ok(result_output(&result, ctx))
    }

    fn required_rates(&self, args: &JsonValue) -> Option<String> {
        let expression = extract_text(args, "convert_expression", "expression").ok()?;
        let (category, from) = UNITS.parse_source_unit(expression).ok()?;
        (category == Category::Currency).then_some(from.symbol)
    }
}
