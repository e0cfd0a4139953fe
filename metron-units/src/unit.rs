//! Unit representation with conversion metadata

use std::fmt;
use serde::{Serialize, Deserialize};
use metron_core::Category;
use crate::TemperatureScale;

/// How a unit relates to the rest of its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    /// Multiplier into the category's base unit
    Factor(f64),
    /// One of the fixed temperature scales
    Temperature(TemperatureScale),
    /// Currency code, converted through a rate table
    Rate,
}

/// A unit belonging to exactly one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// Display name (e.g. "Kilometer")
    pub name: String,
    /// Symbol (e.g. "km")
    pub symbol: String,
    pub category: Category,
    pub scale: Scale,
    /// Extra spellings accepted on lookup ("meters", "metre")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl UnitDefinition {
    /// Create a fixed-factor unit
    pub fn linear(name: &str, symbol: &str, category: Category, factor: f64) -> Self {
        UnitDefinition {
            name: name.to_string(),
            symbol: symbol.to_string(),
            category,
            scale: Scale::Factor(factor),
            aliases: Vec::new(),
        }
    }

    /// Create a temperature unit
    pub fn temperature(scale: TemperatureScale) -> Self {
        UnitDefinition {
            name: scale.name().to_string(),
            symbol: scale.symbol().to_string(),
            category: Category::Temperature,
            scale: Scale::Temperature(scale),
            aliases: Vec::new(),
        }
    }

    /// Create a currency unit from its code
    pub fn currency(code: &str) -> Self {
        UnitDefinition {
            name: code.to_string(),
            symbol: code.to_string(),
            category: Category::Currency,
            scale: Scale::Rate,
            aliases: Vec::new(),
        }
    }

    /// Builder: add lookup aliases
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(|a| a.to_string()));
        self
    }

    /// Scale factor, for fixed-factor units only
    pub fn factor(&self) -> Option<f64> {
        match self.scale {
            Scale::Factor(f) => Some(f),
            _ => None,
        }
    }

    pub fn temperature_scale(&self) -> Option<TemperatureScale> {
        match self.scale {
            Scale::Temperature(s) => Some(s),
            _ => None,
        }
    }

    /// Is this the base unit of a linear category?
    pub fn is_base(&self) -> bool {
        self.factor() == Some(1.0)
    }

    /// Exact symbol match
    pub fn has_symbol(&self, text: &str) -> bool {
        self.symbol == text
    }

    /// Loose match: name, symbol or any alias, ignoring case
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        self.symbol.eq_ignore_ascii_case(text)
            || self.name.eq_ignore_ascii_case(text)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(text))
    }

    /// Convert a value in this unit to the category base unit
    pub fn to_base(&self, value: f64) -> Option<f64> {
        self.factor().map(|f| value * f)
    }

    /// Convert a value in the category base unit to this unit
    pub fn from_base(&self, value: f64) -> Option<f64> {
        self.factor().map(|f| value / f)
    }
}

impl fmt::Display for UnitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}
