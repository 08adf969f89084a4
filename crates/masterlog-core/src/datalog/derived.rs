//! Derived channels
//!
//! Engineering-unit conversions and computed columns applied to every
//! session right after parsing. Each transform runs only when its source
//! channels exist; a missing source is never an error.

use super::table::{ColumnData, LogTable};
use crate::config::ChannelNames;
use crate::unit_conversion::{
    correction_percent, decivolts_to_volts, format_fixed, format_signed_percent,
    kelvin_to_celsius, milli_to_unit, round_to,
};

/// Apply all transforms in their fixed order:
/// battery → temperatures → lambdas → corrected VE → correction percentage
pub fn apply_all(table: &mut LogTable, names: &ChannelNames, extra_fuel_factor: f64) {
    convert_battery(table, names);
    convert_temperatures(table, names);
    format_lambdas(table, names);
    compute_corrected_ve(table, names, extra_fuel_factor);
    compute_correction_percent(table, names);
}

fn map_numeric(table: &mut LogTable, name: &str, f: impl Fn(f64) -> f64) {
    let Some(values) = table.numeric(name) else {
        return;
    };
    let converted = values.iter().map(|v| v.map(&f)).collect();
    table.put_column(name, ColumnData::Numeric(converted));
}

/// Deci-volts → volts, 1 decimal
pub fn convert_battery(table: &mut LogTable, names: &ChannelNames) {
    map_numeric(table, &names.battery, |v| round_to(decivolts_to_volts(v), 1));
}

/// Kelvin → whole degrees Celsius
pub fn convert_temperatures(table: &mut LogTable, names: &ChannelNames) {
    for name in &names.temperatures {
        map_numeric(table, name, |v| round_to(kelvin_to_celsius(v), 0));
    }
}

/// Milli-lambda → fixed two-decimal text; missing samples become `""`
pub fn format_lambdas(table: &mut LogTable, names: &ChannelNames) {
    for name in &names.lambdas {
        let Some(values) = table.numeric(name) else {
            continue;
        };
        let formatted = values
            .iter()
            .map(|v| {
                Some(match v {
                    Some(raw) => format_fixed(round_to(milli_to_unit(*raw), 2), 2),
                    None => String::new(),
                })
            })
            .collect();
        table.put_column(name, ColumnData::Text(formatted));
    }
}

/// Whether a row is in closed loop. A missing indicator sample counts as
/// "not zero"; an absent indicator column puts every row in.
fn in_closed_loop(closed_loop: Option<&[Option<f64>]>, row: usize) -> bool {
    match closed_loop {
        Some(values) => values.get(row).copied().flatten() != Some(0.0),
        None => true,
    }
}

/// `lambda_corr / 1000 * ve_value * extra_fuel_factor`, rounded to an
/// integer, only for closed-loop rows
pub fn compute_corrected_ve(table: &mut LogTable, names: &ChannelNames, extra_fuel_factor: f64) {
    let (Some(corr), Some(ve)) = (
        table.numeric(&names.lambda_correction),
        table.numeric(&names.ve_value),
    ) else {
        return;
    };
    let closed_loop = table.numeric(&names.closed_loop);

    let corrected = corr
        .iter()
        .zip(ve)
        .enumerate()
        .map(|(row, (corr, ve))| {
            if !in_closed_loop(closed_loop, row) {
                return None;
            }
            let value = milli_to_unit((*corr)?) * (*ve)? * extra_fuel_factor;
            Some(round_to(value, 0) as i64).filter(|_| value.is_finite())
        })
        .collect();

    table.put_column(&names.ve_corrected, ColumnData::Integer(corrected));
}

/// Signed correction percentage text (`"+5.00%"`), only for closed-loop rows
pub fn compute_correction_percent(table: &mut LogTable, names: &ChannelNames) {
    let Some(corr) = table.numeric(&names.lambda_correction) else {
        return;
    };
    let closed_loop = table.numeric(&names.closed_loop);

    let formatted = corr
        .iter()
        .enumerate()
        .map(|(row, corr)| {
            if !in_closed_loop(closed_loop, row) {
                return None;
            }
            corr.map(|raw| format_signed_percent(correction_percent(raw)))
        })
        .collect();

    table.put_column(&names.correction_percent, ColumnData::Text(formatted));
}
