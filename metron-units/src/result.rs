//! Conversion requests and results

use std::fmt;
use serde::{Serialize, Deserialize};
use metron_core::{format_value, round_to, Category, DISPLAY_PRECISION};

/// A single conversion to perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub category: Category,
    pub from_unit: String,
    pub to_unit: String,
    pub value: f64,
}

impl ConversionRequest {
    pub fn new(category: Category, from_unit: impl Into<String>, to_unit: impl Into<String>, value: f64) -> Self {
        ConversionRequest {
            category,
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            value,
        }
    }
}

/// Outcome of a successful conversion.
///
/// `value` is canonical and never rounded; rounding happens only when the
/// result is presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub category: Category,
    /// Value as given in the request
    pub input: f64,
    /// Converted value
    pub value: f64,
    pub from_name: String,
    pub from_symbol: String,
    pub to_name: String,
    pub to_symbol: String,
}

impl ConversionResult {
    /// Value rounded to the default display precision
    pub fn rounded(&self) -> f64 {
        round_to(self.value, DISPLAY_PRECISION)
    }

    /// Value formatted for display with `places` decimals
    pub fn display_value(&self, places: u32) -> String {
        format_value(self.value, places)
    }

    /// "1 km = 1000 m" at the given precision
    pub fn summary(&self, places: u32) -> String {
        format!(
            "{} {} = {} {}",
            format_value(self.input, places),
            self.from_symbol,
            self.display_value(places),
            self.to_symbol,
        )
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary(DISPLAY_PRECISION))
    }
}
