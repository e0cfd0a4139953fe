//! Temperature scales
//!
//! Temperature is the one non-linear category: scales differ by an offset
//! as well as a factor, so conversions pivot through Celsius instead of a
//! shared base factor.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Offset between the Kelvin and Celsius zero points
pub const KELVIN_OFFSET: f64 = 273.15;

/// The three supported temperature scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    pub const ALL: [TemperatureScale; 3] = [
        TemperatureScale::Celsius,
        TemperatureScale::Fahrenheit,
        TemperatureScale::Kelvin,
    ];

    /// Convert a reading on this scale to Celsius
    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - KELVIN_OFFSET,
        }
    }

    /// Convert a Celsius reading to this scale
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => celsius + KELVIN_OFFSET,
        }
    }

    /// Convert a reading to another scale, pivoting on Celsius
    pub fn convert(&self, value: f64, target: TemperatureScale) -> f64 {
        if *self == target {
            return value;
        }
        target.from_celsius(self.to_celsius(value))
    }

    /// Absolute zero expressed on this scale
    pub fn absolute_zero(&self) -> f64 {
        self.from_celsius(-KELVIN_OFFSET)
    }

    /// Caller-side policy check; the resolver itself never enforces it
    pub fn is_below_absolute_zero(&self, value: f64) -> bool {
        match self {
            TemperatureScale::Kelvin => value < 0.0,
            _ => self.to_celsius(value) < -KELVIN_OFFSET,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "Celsius",
            TemperatureScale::Fahrenheit => "Fahrenheit",
            TemperatureScale::Kelvin => "Kelvin",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "°C",
            TemperatureScale::Fahrenheit => "°F",
            TemperatureScale::Kelvin => "K",
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
