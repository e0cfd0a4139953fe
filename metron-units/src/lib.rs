//! Metron Units - Unit registry and conversion resolver
//!
//! Categories and their strategies:
//! - Length (mm, cm, m, km, in, ft, yd, mi)
//! - Weight (mg, g, kg, t, lb, oz)
//! - Temperature (°C, °F, K), pivoting on Celsius
//! - Volume (mL, L, m³, gal, cup)
//! - Time (s, min, hr, day, wk)
//! - Area (m², km², ft², ac)
//! - Speed (m/s, km/h, mph)
//! - Digital Storage (B, KB, MB, GB, TB)
//! - Currency (runtime list, converted with a supplied rate table)

mod temperature;
mod unit;
mod units;
mod result;
mod convert;
mod parse;
mod helpers;
mod tools;

pub use temperature::{TemperatureScale, KELVIN_OFFSET};
pub use unit::{Scale, UnitDefinition};
pub use units::{UnitRegistry, UnitList, UNITS, FALLBACK_CURRENCIES};
pub use result::{ConversionRequest, ConversionResult};
pub use convert::{convert, list_units};
pub use parse::{parse_expression, parse_expression_with_rates, parse_quantity, infer_category};

use metron_plugin::ToolRegistry;

/// Load conversion tools into a registry
pub fn load_units_tools(registry: ToolRegistry) -> ToolRegistry {
    registry
        // Inspection
        .with_tool(tools::ListCategories)
        .with_tool(tools::ListUnits)

        // Conversion
        .with_tool(tools::Convert)
        .with_tool(tools::ConvertExpression)
}
