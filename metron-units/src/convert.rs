//! Conversion resolver
//!
//! Dispatches on the category's strategy: factor math for linear
//! categories, a Celsius pivot for temperature, and a supplied rate table
//! for currency. Nothing here fetches or caches rates.

use metron_core::{ensure_finite, normalize_code, Category, ConversionError, RateTable, Strategy};
use crate::{ConversionRequest, ConversionResult, UnitDefinition, UnitRegistry, UNITS};

impl UnitRegistry {
    /// Resolve a conversion request.
    ///
    /// Validation order: category, source unit, target unit, value.
    pub fn convert(
        &self,
        request: &ConversionRequest,
        rates: Option<&RateTable>,
    ) -> Result<ConversionResult, ConversionError> {
        let category = request.category;
        let from = self.resolve_unit(category, &request.from_unit, rates)?;
        let to = self.resolve_unit(category, &request.to_unit, rates)?;
        let value = ensure_finite(request.value)?;

        let converted = match category.strategy() {
            Strategy::Linear => convert_linear(&from, &to, value)?,
            Strategy::Temperature => convert_temperature(&from, &to, value)?,
            Strategy::RateBased => convert_currency(&from.symbol, &to.symbol, value, rates)?,
        };

        if !converted.is_finite() {
            return Err(ConversionError::non_finite_result(converted));
        }

        Ok(ConversionResult {
            category,
            input: value,
            value: converted,
            from_name: from.name,
            from_symbol: from.symbol,
            to_name: to.name,
            to_symbol: to.symbol,
        })
    }

    /// (name, symbol) pairs for a category, in display order
    pub fn list_units(&self, category: Category) -> Result<Vec<(String, String)>, ConversionError> {
        Ok(self.units_for(category)?
            .iter()
            .map(|u| (u.name.clone(), u.symbol.clone()))
            .collect())
    }

    /// Currency codes are checked against the rate table, not the listed
    /// currencies. Text naming a unit of another category is refused unless
    /// the table quotes it as a code ("CUP" is also a volume symbol).
    pub(crate) fn resolve_unit(
        &self,
        category: Category,
        text: &str,
        rates: Option<&RateTable>,
    ) -> Result<UnitDefinition, ConversionError> {
        if category != Category::Currency {
            return self.lookup(category, text);
        }
        match self.lookup(category, text) {
            Ok(unit) => Ok(unit),
            Err(e @ (ConversionError::UnknownUnit { .. } | ConversionError::UnitCategoryMismatch { .. })) => {
                let code = normalize_code(text);
                let quoted = rates.is_some_and(|table| table.contains(&code));
                let unknown = matches!(e, ConversionError::UnknownUnit { .. });
                if code.is_empty() || !(quoted || unknown) {
                    return Err(e);
                }
                Ok(UnitDefinition::currency(&code))
            }
            Err(e) => Err(e),
        }
    }
}

fn convert_linear(from: &UnitDefinition, to: &UnitDefinition, value: f64) -> Result<f64, ConversionError> {
    if from.symbol == to.symbol {
        return Ok(value);
    }
    let base = from.to_base(value).ok_or(ConversionError::UnsupportedOperation {
        category: from.category,
        operation: "to_base",
    })?;
    to.from_base(base).ok_or(ConversionError::UnsupportedOperation {
        category: to.category,
        operation: "from_base",
    })
}

fn convert_temperature(from: &UnitDefinition, to: &UnitDefinition, value: f64) -> Result<f64, ConversionError> {
    match (from.temperature_scale(), to.temperature_scale()) {
        (Some(from), Some(to)) => Ok(from.convert(value, to)),
        _ => Err(ConversionError::UnsupportedOperation {
            category: Category::Temperature,
            operation: "convert",
        }),
    }
}

fn convert_currency(from: &str, to: &str, value: f64, rates: Option<&RateTable>) -> Result<f64, ConversionError> {
    let table = rates.ok_or_else(|| ConversionError::rate_unavailable(from, to))?;

    if from == to {
        return Ok(value);
    }

    let to_rate = table.rate(to)
        .ok_or_else(|| ConversionError::rate_unavailable(table.base(), to))?;
    if table.base() == from {
        return Ok(value * to_rate);
    }

    // Cross rate through the table's base
    let from_rate = table.rate(from)
        .ok_or_else(|| ConversionError::rate_unavailable(table.base(), from))?;
    Ok(value * to_rate / from_rate)
}

/// Convert using the global registry
pub fn convert(
    category: Category,
    from_unit: &str,
    to_unit: &str,
    value: f64,
    rates: Option<&RateTable>,
) -> Result<ConversionResult, ConversionError> {
    UNITS.convert(&ConversionRequest::new(category, from_unit, to_unit, value), rates)
}

/// List a category's units from the global registry
pub fn list_units(category: Category) -> Result<Vec<(String, String)>, ConversionError> {
    UNITS.list_units(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use metron_core::{approx_eq, ROUND_TRIP_TOLERANCE};

    fn usd_table() -> RateTable {
        RateTable::new("USD", [("EUR", 0.92), ("GBP", 0.79), ("JPY", 149.5)]).unwrap()
    }

    #[test]
    fn test_known_values() {
        assert_eq!(convert(Category::Length, "Kilometer", "Meter", 1.0, None).unwrap().value, 1000.0);
        assert_eq!(convert(Category::Weight, "Kilogram", "Gram", 2.5, None).unwrap().value, 2500.0);
        assert_eq!(convert(Category::Time, "hr", "min", 1.5, None).unwrap().value, 90.0);
        assert_eq!(convert(Category::DigitalStorage, "GB", "MB", 2.0, None).unwrap().value, 2048.0);
    }

    #[test]
    fn test_linear_identity_is_exact() {
        for category in Category::ALL.iter().filter(|c| c.is_linear()) {
            for (name, _) in list_units(*category).unwrap() {
                for v in [0.0, -3.7, 0.1, 123456.789] {
                    let result = convert(*category, &name, &name, v, None).unwrap();
                    assert_eq!(result.value, v, "{category} {name}");
                }
            }
        }
    }

    #[test]
    fn test_linear_round_trip() {
        for category in Category::ALL.iter().filter(|c| c.is_linear()) {
            let units = list_units(*category).unwrap();
            for (a, _) in &units {
                for (b, _) in &units {
                    let there = convert(*category, a, b, 42.125, None).unwrap().value;
                    let back = convert(*category, b, a, there, None).unwrap().value;
                    assert!(approx_eq(back, 42.125, ROUND_TRIP_TOLERANCE), "{a} -> {b} -> {a}: {back}");
                }
            }
        }
    }

    #[test]
    fn test_temperature() {
        assert_eq!(convert(Category::Temperature, "Celsius", "Kelvin", 0.0, None).unwrap().value, 273.15);
        assert_eq!(convert(Category::Temperature, "Celsius", "Fahrenheit", 100.0, None).unwrap().value, 212.0);
        assert_eq!(convert(Category::Temperature, "Fahrenheit", "Celsius", 32.0, None).unwrap().value, 0.0);
        assert_eq!(convert(Category::Temperature, "K", "K", 12.5, None).unwrap().value, 12.5);
    }

    #[test]
    fn test_below_absolute_zero_is_allowed() {
        let result = convert(Category::Temperature, "Kelvin", "Celsius", -10.0, None).unwrap();
        assert!(approx_eq(result.value, -283.15, 1e-12));
    }

    #[test]
    fn test_category_mismatch() {
        let err = convert(Category::Length, "Meter", "Kilogram", 1.0, None).unwrap_err();
        assert!(matches!(err, ConversionError::UnitCategoryMismatch { actual: Category::Weight, .. }));
    }

    #[test]
    fn test_unknown_unit() {
        let err = convert(Category::Length, "Meter", "Furlong", 1.0, None).unwrap_err();
        assert!(matches!(err, ConversionError::UnknownUnit { .. }));
    }

    #[test]
    fn test_non_finite_input() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = convert(Category::Length, "m", "km", v, None).unwrap_err();
            assert!(matches!(err, ConversionError::NonFiniteValue { stage: "input", .. }));
        }
    }

    #[test]
    fn test_non_finite_result() {
        let err = convert(Category::DigitalStorage, "TB", "B", f64::MAX, None).unwrap_err();
        assert!(matches!(err, ConversionError::NonFiniteValue { stage: "result", .. }));
    }

    #[test]
    fn test_unit_errors_come_before_value_errors() {
        let err = convert(Category::Length, "Furlong", "m", f64::NAN, None).unwrap_err();
        assert!(matches!(err, ConversionError::UnknownUnit { .. }));
    }

    #[test]
    fn test_currency_direct() {
        let table = usd_table();
        let result = convert(Category::Currency, "USD", "EUR", 10.0, Some(&table)).unwrap();
        assert!(approx_eq(result.value, 9.2, 1e-12));
        assert_eq!(result.to_symbol, "EUR");
    }

    #[test]
    fn test_currency_cross_rate() {
        let table = usd_table();
        let result = convert(Category::Currency, "eur", "gbp", 92.0, Some(&table)).unwrap();
        assert!(approx_eq(result.value, 79.0, 1e-12));
    }

    #[test]
    fn test_currency_identity() {
        let table = usd_table();
        let result = convert(Category::Currency, "GBP", "GBP", 5.0, Some(&table)).unwrap();
        assert_eq!(result.value, 5.0);
    }

    #[test]
    fn test_currency_missing_code() {
        let table = usd_table();
        let err = convert(Category::Currency, "USD", "ZZZ", 10.0, Some(&table)).unwrap_err();
        assert_eq!(err, ConversionError::rate_unavailable("USD", "ZZZ"));

        let err = convert(Category::Currency, "CHF", "EUR", 10.0, Some(&table)).unwrap_err();
        assert_eq!(err, ConversionError::rate_unavailable("USD", "CHF"));
    }

    #[test]
    fn test_currency_without_table() {
        let err = convert(Category::Currency, "USD", "EUR", 10.0, None).unwrap_err();
        assert!(matches!(err, ConversionError::RateUnavailable { .. }));
    }

    #[test]
    fn test_currency_rejects_other_category_units() {
        let table = usd_table();
        let err = convert(Category::Currency, "USD", "Meter", 1.0, Some(&table)).unwrap_err();
        assert!(matches!(err, ConversionError::UnitCategoryMismatch { actual: Category::Length, .. }));
    }

    #[test]
    fn test_currency_code_shared_with_unit_symbol() {
        let table = RateTable::new("USD", [("CUP", 24.0), ("EUR", 0.9)]).unwrap();
        let result = convert(Category::Currency, "USD", "CUP", 10.0, Some(&table)).unwrap();
        assert!(approx_eq(result.value, 240.0, 1e-12));
        assert_eq!(result.to_symbol, "CUP");

        let result = convert(Category::Currency, "cup", "EUR", 24.0, Some(&table)).unwrap();
        assert!(approx_eq(result.value, 0.9, 1e-12));
        assert_eq!(result.from_symbol, "CUP");

        // Not quoted by the table, so it is still the volume unit
        let err = convert(Category::Currency, "USD", "cup", 1.0, Some(&usd_table())).unwrap_err();
        assert!(matches!(err, ConversionError::UnitCategoryMismatch { actual: Category::Volume, .. }));
    }

    #[test]
    fn test_result_names() {
        let result = convert(Category::Length, "km", "miles", 100.0, None).unwrap();
        assert_eq!(result.from_name, "Kilometer");
        assert_eq!(result.to_name, "Mile");
        assert_eq!(result.to_string(), "100 km = 62.137119 mi");
    }

    #[test]
    fn test_list_units() {
        let units = list_units(Category::Speed).unwrap();
        assert_eq!(units[0], ("Meters/second".to_string(), "m/s".to_string()));
        assert_eq!(units.len(), 3);
    }
}
