//! Numeric helpers shared by the engine and its callers

use crate::ConversionError;

/// Decimal places used when presenting a converted value
pub const DISPLAY_PRECISION: u32 = 6;

/// Relative tolerance for round-trip comparisons
pub const ROUND_TRIP_TOLERANCE: f64 = 1e-9;

/// Reject NaN and infinities on the way in
pub fn ensure_finite(value: f64) -> Result<f64, ConversionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::non_finite_input(value))
    }
}

/// Round to a fixed number of decimal places.
///
/// Values whose scaled magnitude exceeds 2^53 carry no fractional digits
/// at this precision and are returned untouched.
pub fn round_to(value: f64, places: u32) -> f64 {
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

    let scale = 10f64.powi(places as i32);
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() >= EXACT_LIMIT {
        return value;
    }
    let rounded = scaled.round() / scale;
    // avoid printing "-0"
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Relative comparison, falling back to absolute near zero
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    if scale < 1.0 {
        diff <= tolerance
    } else {
        diff <= tolerance * scale
    }
}

/// Render a value with at most `places` decimals and no trailing zeros
pub fn format_value(value: f64, places: u32) -> String {
    let rounded = round_to(value, places);
    let text = format!("{:.*}", places as usize, rounded);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
