//! Expression parsing - "100 km to mi", "32 °F -> °C"

use metron_core::{Category, ConversionError, RateTable};
use crate::{ConversionRequest, UnitDefinition, UnitRegistry, UNITS};

/// Separators between the quantity and the target unit
const SEPARATORS: [&str; 4] = ["->", "→", " to ", " in "];

/// Split "12.5 km" into its number and unit text.
///
/// Thousands separators are ignored ("1,500 m").
pub fn parse_quantity(text: &str) -> Result<(f64, String), ConversionError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(ConversionError::InvalidExpression("empty quantity".to_string()));
    }

    // Longest leading run that parses as a number
    let mut ends: Vec<usize> = cleaned.char_indices().map(|(i, _)| i).skip(1).collect();
    ends.push(cleaned.len());
    let split = ends.into_iter()
        .rev()
        .find_map(|end| cleaned[..end].trim().parse::<f64>().ok().map(|value| (value, end)));

    let (value, idx) = split.ok_or_else(|| {
        ConversionError::InvalidExpression(format!("no number in '{}'", text.trim()))
    })?;

    let unit = cleaned[idx..].trim();
    if unit.is_empty() {
        return Err(ConversionError::InvalidExpression(format!("no unit in '{}'", text.trim())));
    }
    Ok((value, unit.to_string()))
}

/// Find the rightmost separator, so a unit like "in" can still be a source
fn split_expression(text: &str) -> Option<(&str, &str)> {
    let lower = text.to_ascii_lowercase();
    SEPARATORS.iter()
        .filter_map(|sep| lower.rfind(sep).map(|pos| (pos, sep.len())))
        .max_by_key(|(pos, _)| *pos)
        .map(|(pos, len)| (&text[..pos], &text[pos + len..]))
}

impl UnitRegistry {
    /// Parse "<number> <unit> <sep> <unit>" into a request.
    ///
    /// The category comes from the source unit. A target unit from a
    /// different category is reported as a mismatch.
    pub fn parse_expression(&self, text: &str) -> Result<ConversionRequest, ConversionError> {
        self.parse_expression_with_rates(text, None)
    }

    /// Like `parse_expression`, but currency codes quoted by `rates` resolve
    /// as currencies even when the registry lists them elsewhere or not at all.
    pub fn parse_expression_with_rates(
        &self,
        text: &str,
        rates: Option<&RateTable>,
    ) -> Result<ConversionRequest, ConversionError> {
        let text = text.trim();
        let (value, source, target) = split_request(text)?;
        let category = self.source_category(&source, rates)?;

        let from = self.resolve_unit(category, &source, rates)?;
        let to = self.resolve_unit(category, target, rates)?;
        Ok(ConversionRequest::new(category, from.symbol, to.symbol, value))
    }

    /// Category and resolved source unit of an expression, ignoring the target
    pub fn parse_source_unit(&self, text: &str) -> Result<(Category, UnitDefinition), ConversionError> {
        let (_, source, _) = split_request(text.trim())?;
        let category = self.source_category(&source, None)?;
        Ok((category, self.resolve_unit(category, &source, None)?))
    }

    fn source_category(&self, source: &str, rates: Option<&RateTable>) -> Result<Category, ConversionError> {
        self.find_category(source)
            .or_else(|| {
                rates.filter(|table| table.contains(source))
                    .map(|_| Category::Currency)
            })
            .ok_or_else(|| ConversionError::InvalidExpression(format!("unknown unit '{}'", source)))
    }
}

fn split_request(text: &str) -> Result<(f64, String, &str), ConversionError> {
    let (quantity, target) = split_expression(text).ok_or_else(|| {
        ConversionError::InvalidExpression(format!("expected '<value> <unit> to <unit>', got '{}'", text))
    })?;

    let target = target.trim();
    if target.is_empty() {
        return Err(ConversionError::InvalidExpression(format!("no target unit in '{}'", text)));
    }

    let (value, source) = parse_quantity(quantity)?;
    Ok((value, source, target))
}

/// Parse an expression against the global registry
pub fn parse_expression(text: &str) -> Result<ConversionRequest, ConversionError> {
    UNITS.parse_expression(text)
}

/// Parse an expression against the global registry and a rate table
pub fn parse_expression_with_rates(
    text: &str,
    rates: Option<&RateTable>,
) -> Result<ConversionRequest, ConversionError> {
    UNITS.parse_expression_with_rates(text, rates)
}

/// Category a unit belongs to in the global registry
pub fn infer_category(unit: &str) -> Option<Category> {
    UNITS.find_category(unit)
}
