//! Unit Conversion Functions
//!
//! Conversions applied to raw logger channels:
//! - Temperature: Kelvin → °C
//! - Battery voltage: deci-volts → volts
//! - Lambda: milli-lambda → lambda
//! - Closed-loop correction: milli-units → signed percentage
//!
//! Rounding is round-half-to-even at the requested decimal.

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// Convert Kelvin to Celsius
pub fn kelvin_to_celsius(k: f64) -> f64 {
    k - KELVIN_OFFSET
}

/// Convert deci-volts (logger raw battery channel) to volts
pub fn decivolts_to_volts(dv: f64) -> f64 {
    dv / 10.0
}

/// Convert a milli-scaled raw value (lambda, lambda correction) to units
pub fn milli_to_unit(raw: f64) -> f64 {
    raw / 1000.0
}

/// Convert a raw lambda correction (1000 = no correction) to a percentage
///
/// `1050` → `5.0`, `950` → `-5.0`
pub fn correction_percent(raw: f64) -> f64 {
    (milli_to_unit(raw) - 1.0) * 100.0
}

/// Round to `decimals` places, ties to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if decimals == 0 {
        return value.round_ties_even();
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Format with a fixed number of decimals (`1.0` → `"1.00"`)
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Format a percentage with an explicit sign (`5.0` → `"+5.00%"`)
///
/// The sign follows the value as printed, so `-0.0001` reads `"+0.00%"`.
pub fn format_signed_percent(pct: f64) -> String {
    let rounded = round_to(pct, 2);
    let sign = if rounded >= 0.0 { '+' } else { '-' };
    format!("{}{:.2}%", sign, rounded.abs())
}
