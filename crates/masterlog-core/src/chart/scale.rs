//! Display scaling for shared-axis plotting
//!
//! Channels with very different physical ranges share one primary axis, so
//! each series gets a display-only multiplier. Stored values are never
//! touched.

use regex::Regex;

use crate::config::{ConfigError, ScaleRule};

/// Compiled channel-name → multiplier lookup
#[derive(Debug, Clone)]
pub struct ScaleTable {
    rules: Vec<(Regex, f64)>,
}

impl ScaleTable {
    /// Compile the rules in order
    pub fn compile(rules: &[ScaleRule]) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.multiplier))
                    .map_err(|source| ConfigError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Multiplier for a channel; first matching rule wins, default 1.0
    pub fn multiplier(&self, channel: &str) -> f64 {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(channel))
            .map(|(_, m)| *m)
            .unwrap_or(1.0)
    }
}

/// Multiplier that stretches a series so its largest magnitude hits `target`
pub fn normalizing_multiplier(values: &[Option<f64>], target: f64) -> f64 {
    let peak = values
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    if peak > 0.0 {
        target / peak
    } else {
        1.0
    }
}

/// Round an axis ceiling up to the next multiple of its order of magnitude
///
/// `83` → `90`, `100` → `100`, `0.42` → `0.5`. Non-positive or non-finite
/// input yields `None` (leave the axis on auto range).
pub fn nice_max(max: f64) -> Option<f64> {
    if !max.is_finite() || max <= 0.0 {
        return None;
    }
    let magnitude = 10f64.powi(max.log10().floor() as i32);
    let steps = max / magnitude;
    // Absorb float noise so 100.00000000000001 stays 100
    let steps = if (steps - steps.round()).abs() < 1e-9 {
        steps.round()
    } else {
        steps.ceil()
    };
    Some(steps * magnitude)
}

/// Axis floor for the lowest plotted value
///
/// `0` unless something dips below zero, in which case the floor mirrors
/// [`nice_max`] on the magnitude: `-20` → `-20`, `-10.5` → `-20`.
pub fn nice_min(min: f64) -> f64 {
    if min.is_finite() && min < 0.0 {
        nice_max(-min).map_or(0.0, |m| -m)
    } else {
        0.0
    }
}
