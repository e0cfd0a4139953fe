//! Unit definitions and the registry that holds them
//!
//! Fixed-factor and temperature tables are built once and never change.
//! The currency list is the exception: it is replaced wholesale whenever a
//! rate provider reports a fresh set of codes, so readers always see either
//! the old list or the new one.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use arc_swap::ArcSwap;
use metron_core::{normalize_code, Category, ConversionError, RateTable};
use crate::{TemperatureScale, UnitDefinition};

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Currencies offered before any rate table has been seen
pub const FALLBACK_CURRENCIES: [&str; 5] = ["USD", "EUR", "GBP", "INR", "JPY"];

/// Ordered unit lists, shared without copying
pub type UnitList = Arc<Vec<UnitDefinition>>;

/// Registry of all known units, per category
pub struct UnitRegistry {
    /// Registered categories in display order
    order: Vec<Category>,
    tables: HashMap<Category, UnitList>,
    currencies: ArcSwap<Vec<UnitDefinition>>,
}

impl UnitRegistry {
    /// Registry with every built-in category
    pub fn new() -> Self {
        let mut registry = UnitRegistry::empty();
        registry.register_all_units();
        registry
    }

    /// Registry with no categories at all
    pub fn empty() -> Self {
        UnitRegistry {
            order: Vec::new(),
            tables: HashMap::new(),
            currencies: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Register (or replace) a fixed category's table.
    ///
    /// # Panics
    ///
    /// Panics when a linear table breaks the factor invariants: exactly one
    /// base unit with factor 1, every factor finite and strictly positive.
    /// Tables are static configuration, so this is a programming error.
    pub fn with_category(mut self, category: Category, units: Vec<UnitDefinition>) -> Self {
        self.insert_category(category, units);
        self
    }

    fn insert_category(&mut self, category: Category, units: Vec<UnitDefinition>) {
        assert!(units.iter().all(|u| u.category == category),
            "{} table contains a unit from another category", category);

        if category.is_linear() {
            for unit in &units {
                let factor = unit.factor();
                assert!(matches!(factor, Some(f) if f.is_finite() && f > 0.0),
                    "{} unit {} needs a finite positive factor", category, unit.name);
            }
            let bases = units.iter().filter(|u| u.is_base()).count();
            assert_eq!(bases, 1, "{} needs exactly one base unit", category);
        }

        if category == Category::Currency {
            self.currencies.store(Arc::new(units));
        } else {
            self.tables.insert(category, Arc::new(units));
        }
        if !self.order.contains(&category) {
            self.order.push(category);
        }
    }

    /// Registered categories in display order
    pub fn categories(&self) -> &[Category] {
        &self.order
    }

    pub fn is_registered(&self, category: Category) -> bool {
        self.order.contains(&category)
    }

    /// Every unit of a category, in display order
    pub fn units_for(&self, category: Category) -> Result<UnitList, ConversionError> {
        if !self.is_registered(category) {
            return Err(ConversionError::UnknownCategory(category.name().to_string()));
        }
        if category == Category::Currency {
            return Ok(self.currencies.load_full());
        }
        self.tables.get(&category)
            .cloned()
            .ok_or_else(|| ConversionError::UnknownCategory(category.name().to_string()))
    }

    /// Resolve unit text within a category.
    ///
    /// Exact symbols win over case-insensitive names and aliases. Text that
    /// names a unit of another category is reported as a mismatch.
    pub fn lookup(&self, category: Category, text: &str) -> Result<UnitDefinition, ConversionError> {
        let units = self.units_for(category)?;
        if let Some(unit) = Self::find_in(&units, text) {
            return Ok(unit.clone());
        }

        match self.find_category_excluding(text, Some(category)) {
            Some(actual) => Err(ConversionError::UnitCategoryMismatch {
                category,
                unit: text.trim().to_string(),
                actual,
            }),
            None => Err(ConversionError::UnknownUnit {
                category,
                unit: text.trim().to_string(),
            }),
        }
    }

    fn find_in<'a>(units: &'a [UnitDefinition], text: &str) -> Option<&'a UnitDefinition> {
        let text = text.trim();
        units.iter()
            .find(|u| u.has_symbol(text))
            .or_else(|| units.iter().find(|u| u.matches(text)))
    }

    /// First registered category that knows this unit text
    pub fn find_category(&self, text: &str) -> Option<Category> {
        self.find_category_excluding(text, None)
    }

    fn find_category_excluding(&self, text: &str, skip: Option<Category>) -> Option<Category> {
        self.order.iter()
            .copied()
            .filter(|c| Some(*c) != skip)
            .find(|c| match self.units_for(*c) {
                Ok(units) => Self::find_in(&units, text).is_some(),
                Err(_) => false,
            })
    }

    /// Scale factor of a fixed-factor unit
    pub fn factor_of(&self, category: Category, unit: &str) -> Result<f64, ConversionError> {
        if !category.is_linear() {
            return Err(ConversionError::UnsupportedOperation {
                category,
                operation: "factor_of",
            });
        }
        let unit = self.lookup(category, unit)?;
        unit.factor().ok_or(ConversionError::UnsupportedOperation {
            category,
            operation: "factor_of",
        })
    }

    /// The unit whose factor is 1
    pub fn base_unit(&self, category: Category) -> Result<UnitDefinition, ConversionError> {
        if !category.is_linear() {
            return Err(ConversionError::UnsupportedOperation {
                category,
                operation: "base_unit",
            });
        }
        let units = self.units_for(category)?;
        units.iter()
            .find(|u| u.is_base())
            .cloned()
            .ok_or(ConversionError::UnsupportedOperation { category, operation: "base_unit" })
    }

    /// Current currency codes
    pub fn currency_codes(&self) -> Vec<String> {
        self.currencies.load().iter().map(|u| u.symbol.clone()).collect()
    }

    /// Atomically replace the currency list.
    ///
    /// Codes are trimmed, upper-cased, sorted and deduplicated. An empty
    /// set keeps the current list and returns false.
    pub fn refresh_currencies<I, S>(&self, codes: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes: Vec<String> = codes.into_iter()
            .map(|c| normalize_code(c.as_ref()))
            .filter(|c| !c.is_empty())
            .collect();
        if codes.is_empty() {
            return false;
        }
        codes.sort();
        codes.dedup();

        let units: Vec<UnitDefinition> = codes.iter()
            .map(|c| UnitDefinition::currency(c))
            .collect();
        self.currencies.store(Arc::new(units));
        true
    }

    /// Replace the currency list with the codes a rate table covers
    pub fn refresh_from_rates(&self, table: &RateTable) -> bool {
        self.refresh_currencies(table.codes())
    }

    fn register_all_units(&mut self) {
        self.register_length_units();
        self.register_weight_units();
        self.register_temperature_units();
        self.register_volume_units();
        self.register_time_units();
        self.register_area_units();
        self.register_speed_units();
        self.register_digital_storage_units();
        self.register_currency_units();
    }

    fn register_length_units(&mut self) {
        let c = Category::Length;
        self.insert_category(c, vec![
            UnitDefinition::linear("Millimeter", "mm", c, 0.001).with_aliases(&["millimeters", "millimetre", "millimetres"]),
            UnitDefinition::linear("Centimeter", "cm", c, 0.01).with_aliases(&["centimeters", "centimetre", "centimetres"]),
            UnitDefinition::linear("Meter", "m", c, 1.0).with_aliases(&["meters", "metre", "metres"]),
            UnitDefinition::linear("Kilometer", "km", c, 1000.0).with_aliases(&["kilometers", "kilometre", "kilometres"]),
            UnitDefinition::linear("Inch", "in", c, 0.0254).with_aliases(&["inches"]),
            UnitDefinition::linear("Foot", "ft", c, 0.3048).with_aliases(&["feet"]),
            UnitDefinition::linear("Yard", "yd", c, 0.9144).with_aliases(&["yards"]),
            UnitDefinition::linear("Mile", "mi", c, 1609.344).with_aliases(&["miles"]),
        ]);
    }

    fn register_weight_units(&mut self) {
        // Gram is the base, so kilogram <-> gram stays exact
        let c = Category::Weight;
        self.insert_category(c, vec![
            UnitDefinition::linear("Milligram", "mg", c, 0.001).with_aliases(&["milligrams"]),
            UnitDefinition::linear("Gram", "g", c, 1.0).with_aliases(&["grams"]),
            UnitDefinition::linear("Kilogram", "kg", c, 1000.0).with_aliases(&["kilograms", "kilo", "kilos"]),
            UnitDefinition::linear("Metric Ton", "t", c, 1_000_000.0).with_aliases(&["tonne", "tonnes", "ton", "tons"]),
            UnitDefinition::linear("Pound", "lb", c, 453.59237).with_aliases(&["pounds", "lbs"]),
            UnitDefinition::linear("Ounce", "oz", c, 28.349523125).with_aliases(&["ounces"]),
        ]);
    }

    fn register_temperature_units(&mut self) {
        self.insert_category(Category::Temperature, vec![
            UnitDefinition::temperature(TemperatureScale::Celsius).with_aliases(&["C", "degC", "celsius"]),
            UnitDefinition::temperature(TemperatureScale::Fahrenheit).with_aliases(&["F", "degF", "fahrenheit"]),
            UnitDefinition::temperature(TemperatureScale::Kelvin).with_aliases(&["kelvins"]),
        ]);
    }

    fn register_volume_units(&mut self) {
        let c = Category::Volume;
        self.insert_category(c, vec![
            UnitDefinition::linear("Milliliter", "mL", c, 0.001).with_aliases(&["milliliters", "millilitre", "millilitres"]),
            UnitDefinition::linear("Liter", "L", c, 1.0).with_aliases(&["liters", "litre", "litres"]),
            UnitDefinition::linear("Cubic Meter", "m³", c, 1000.0).with_aliases(&["m3", "cubic meters"]),
            UnitDefinition::linear("Gallon (US)", "gal", c, 3.785411784).with_aliases(&["gallon", "gallons"]),
            UnitDefinition::linear("Cup (US)", "cup", c, 0.2365882365).with_aliases(&["cups"]),
        ]);
    }

    fn register_time_units(&mut self) {
        let c = Category::Time;
        self.insert_category(c, vec![
            UnitDefinition::linear("Second", "s", c, 1.0).with_aliases(&["seconds", "sec"]),
            UnitDefinition::linear("Minute", "min", c, 60.0).with_aliases(&["minutes"]),
            UnitDefinition::linear("Hour", "hr", c, 3600.0).with_aliases(&["hours", "h"]),
            UnitDefinition::linear("Day", "day", c, 86_400.0).with_aliases(&["days", "d"]),
            UnitDefinition::linear("Week", "wk", c, 604_800.0).with_aliases(&["weeks"]),
        ]);
    }

    fn register_area_units(&mut self) {
        let c = Category::Area;
        self.insert_category(c, vec![
            UnitDefinition::linear("Square Meter", "m²", c, 1.0).with_aliases(&["m2", "sq m", "square meters"]),
            UnitDefinition::linear("Square Kilometer", "km²", c, 1_000_000.0).with_aliases(&["km2", "sq km", "square kilometers"]),
            UnitDefinition::linear("Square Foot", "ft²", c, 0.09290304).with_aliases(&["ft2", "sq ft", "square feet"]),
            UnitDefinition::linear("Acre", "ac", c, 4046.8564224).with_aliases(&["acres"]),
        ]);
    }

    fn register_speed_units(&mut self) {
        let c = Category::Speed;
        self.insert_category(c, vec![
            UnitDefinition::linear("Meters/second", "m/s", c, 1.0).with_aliases(&["mps", "meters per second"]),
            UnitDefinition::linear("Kilometers/hour", "km/h", c, 1.0 / 3.6).with_aliases(&["kph", "kmh", "kilometers per hour"]),
            UnitDefinition::linear("Miles/hour", "mph", c, 0.44704).with_aliases(&["miles per hour"]),
        ]);
    }

    fn register_digital_storage_units(&mut self) {
        // Binary multiples, as the storage converters used them
        let c = Category::DigitalStorage;
        self.insert_category(c, vec![
            UnitDefinition::linear("Byte", "B", c, 1.0).with_aliases(&["bytes"]),
            UnitDefinition::linear("Kilobyte", "KB", c, 1024.0).with_aliases(&["kilobytes"]),
            UnitDefinition::linear("Megabyte", "MB", c, 1_048_576.0).with_aliases(&["megabytes"]),
            UnitDefinition::linear("Gigabyte", "GB", c, 1_073_741_824.0).with_aliases(&["gigabytes"]),
            UnitDefinition::linear("Terabyte", "TB", c, 1_099_511_627_776.0).with_aliases(&["terabytes"]),
        ]);
    }

    fn register_currency_units(&mut self) {
        self.insert_category(Category::Currency, FALLBACK_CURRENCIES.iter()
            .map(|code| UnitDefinition::currency(code))
            .collect());
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
