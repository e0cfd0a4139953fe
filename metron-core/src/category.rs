//! Conversion categories
//!
//! Every unit belongs to exactly one category. The category decides which
//! conversion strategy the resolver dispatches to.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::ConversionError;

/// How values move between two units of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Multiply into the base unit, divide out of it
    Linear,
    /// Affine formulas pivoting on Celsius
    Temperature,
    /// Multiply by an externally supplied exchange rate
    RateBased,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Linear => "linear",
            Strategy::Temperature => "temperature",
            Strategy::RateBased => "rate_based",
        };
        write!(f, "{}", name)
    }
}

/// A family of commensurable units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Volume,
    Time,
    Area,
    Speed,
    DigitalStorage,
    Currency,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 9] = [
        Category::Length,
        Category::Weight,
        Category::Temperature,
        Category::Volume,
        Category::Time,
        Category::Area,
        Category::Speed,
        Category::DigitalStorage,
        Category::Currency,
    ];

    /// The conversion strategy used for this category
    pub fn strategy(&self) -> Strategy {
        match self {
            Category::Temperature => Strategy::Temperature,
            Category::Currency => Strategy::RateBased,
            _ => Strategy::Linear,
        }
    }

    /// Is this a fixed-factor category?
    pub fn is_linear(&self) -> bool {
        self.strategy() == Strategy::Linear
    }

    /// Human-readable name ("Digital Storage")
    pub fn name(&self) -> &'static str {
        match self {
            Category::Length => "Length",
            Category::Weight => "Weight",
            Category::Temperature => "Temperature",
            Category::Volume => "Volume",
            Category::Time => "Time",
            Category::Area => "Area",
            Category::Speed => "Speed",
            Category::DigitalStorage => "Digital Storage",
            Category::Currency => "Currency",
        }
    }

    /// Machine-friendly identifier ("digital_storage")
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Weight => "weight",
            Category::Temperature => "temperature",
            Category::Volume => "volume",
            Category::Time => "time",
            Category::Area => "area",
            Category::Speed => "speed",
            Category::DigitalStorage => "digital_storage",
            Category::Currency => "currency",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Category {
    type Err = ConversionError;

    /// Case-insensitive; spaces, '-' and '_' are interchangeable
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s.trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();

        let category = match key.as_str() {
            "length" | "distance" => Category::Length,
            "weight" | "mass" => Category::Weight,
            "temperature" | "temp" => Category::Temperature,
            "volume" => Category::Volume,
            "time" | "duration" => Category::Time,
            "area" => Category::Area,
            "speed" | "velocity" => Category::Speed,
            "digital_storage" | "data" | "storage" => Category::DigitalStorage,
            "currency" | "money" => Category::Currency,
            _ => return Err(ConversionError::UnknownCategory(s.trim().to_string())),
        };
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy() {
        assert_eq!(Category::Length.strategy(), Strategy::Linear);
        assert_eq!(Category::DigitalStorage.strategy(), Strategy::Linear);
        assert_eq!(Category::Temperature.strategy(), Strategy::Temperature);
        assert_eq!(Category::Currency.strategy(), Strategy::RateBased);
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("Length".parse::<Category>().unwrap(), Category::Length);
        assert_eq!("digital storage".parse::<Category>().unwrap(), Category::DigitalStorage);
        assert_eq!("Digital_Storage".parse::<Category>().unwrap(), Category::DigitalStorage);
        assert_eq!(" SPEED ".parse::<Category>().unwrap(), Category::Speed);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "Luminosity".parse::<Category>().unwrap_err();
        assert!(matches!(err, ConversionError::UnknownCategory(ref c) if c == "Luminosity"));
    }

    #[test]
    fn test_display_round_trip() {
        for category in Category::ALL {
            let parsed: Category = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
            let parsed: Category = category.slug().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }
}
