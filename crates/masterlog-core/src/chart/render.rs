//! Chart specification builder
//!
//! Turns a session table and a column selection into a dual-axis line
//! chart description. Rendering is a pure function of its inputs.

use serde::Serialize;
use std::collections::HashSet;

use super::scale::{nice_max, nice_min, normalizing_multiplier, ScaleTable};
use crate::config::{ChartConfig, ChartLayout, ConfigError, ScaleMode};
use crate::datalog::{Column, LogTable};

/// Which y-axis a series is drawn against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    /// Left axis shared by all non-speed series
    Primary,
    /// Right axis for the speed series
    Secondary,
}

/// Axis range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AxisRange {
    /// Left to the plotting layer
    Auto,
    /// Explicit bounds
    Fixed {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
}

/// Axis metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    /// Axis title
    pub title: String,
    /// Visible value range
    pub range: AxisRange,
    /// Left or right
    pub side: AxisSide,
}

/// One plotted line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Column name
    pub name: String,
    /// Axis the series is drawn against
    pub axis: AxisSide,
    /// Row indices (implicit time axis)
    pub x: Vec<usize>,
    /// Plotted values, after the display multiplier
    pub y: Vec<Option<f64>>,
    /// Physical values, before the display multiplier
    pub values: Vec<Option<f64>>,
    /// Per-point hover text built from the physical value
    pub hover: Vec<String>,
    /// Display multiplier applied to `values`
    pub scale: f64,
    /// Fixed line color, `None` leaves it to the plotting layer
    pub color: Option<String>,
    /// Draw across missing samples
    pub connect_gaps: bool,
}

impl Series {
    /// The polyline pieces a plotting layer draws, as `(x, y)` points
    ///
    /// Missing samples split the line unless `connect_gaps` is set.
    pub fn segments(&self) -> Vec<Vec<(usize, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (x, y) in self.x.iter().zip(&self.y) {
            match y {
                Some(y) => current.push((*x, *y)),
                None if !self.connect_gaps => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Largest plotted value
    pub fn max_displayed(&self) -> Option<f64> {
        self.displayed().reduce(f64::max)
    }

    /// Smallest plotted value
    pub fn min_displayed(&self) -> Option<f64> {
        self.displayed().reduce(f64::min)
    }

    fn displayed(&self) -> impl Iterator<Item = f64> + '_ {
        self.y.iter().flatten().copied().filter(|v| v.is_finite())
    }
}

/// Complete chart description for a presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Primary series in selection order, then the speed series
    pub series: Vec<Series>,
    /// Left axis
    pub primary_axis: Axis,
    /// Present only when the speed column is plotted
    pub secondary_axis: Option<Axis>,
    /// Figure metadata
    pub layout: ChartLayout,
}

impl ChartSpec {
    /// Find a series by column name
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Serialize for a JavaScript plotting front end
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Builds [`ChartSpec`]s from session tables
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    config: ChartConfig,
    scales: ScaleTable,
}

impl ChartRenderer {
    /// Create a renderer, compiling the scale rules
    pub fn new(config: ChartConfig) -> Result<Self, ConfigError> {
        let scales = ScaleTable::compile(&config.scale_rules)?;
        Ok(Self { config, scales })
    }

    /// The active configuration
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Render the selected columns of `table`
    ///
    /// `speed_column`, when selected, goes to the auto-scaled secondary axis.
    /// Unknown or repeated selections are skipped.
    pub fn render<S: AsRef<str>>(
        &self,
        table: &LogTable,
        selected: &[S],
        speed_column: Option<&str>,
    ) -> ChartSpec {
        let columns = self.resolve_selection(table, selected);

        let mut series = Vec::with_capacity(columns.len());
        let mut speed_series = None;
        for column in columns {
            if Some(column.name()) == speed_column {
                speed_series = Some(self.build_series(table, column, 1.0, AxisSide::Secondary));
                continue;
            }
            let scale = match self.config.scale_mode {
                ScaleMode::FixedMultiplier => self.scales.multiplier(column.name()),
                ScaleMode::NormalizeToMax => {
                    normalizing_multiplier(&column.values(), self.config.normalize_to)
                }
            };
            series.push(self.build_series(table, column, scale, AxisSide::Primary));
        }

        let primary_max = series
            .iter()
            .filter_map(Series::max_displayed)
            .reduce(f64::max);
        let primary_min = series
            .iter()
            .filter_map(Series::min_displayed)
            .reduce(f64::min);
        // Only the ceiling is rounded; the floor stays at 0 unless a value
        // dips below it
        let primary_range = match primary_max.and_then(nice_max) {
            Some(max) => AxisRange::Fixed {
                min: primary_min.map_or(0.0, nice_min),
                max,
            },
            None => AxisRange::Auto,
        };

        let secondary_axis = speed_series.as_ref().map(|s: &Series| Axis {
            title: s.name.clone(),
            range: AxisRange::Auto,
            side: AxisSide::Secondary,
        });
        series.extend(speed_series);

        ChartSpec {
            series,
            primary_axis: Axis {
                title: self.config.layout.y_title.clone(),
                range: primary_range,
                side: AxisSide::Primary,
            },
            secondary_axis,
            layout: self.config.layout.clone(),
        }
    }

    fn resolve_selection<'t, S: AsRef<str>>(
        &self,
        table: &'t LogTable,
        selected: &[S],
    ) -> Vec<&'t Column> {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for name in selected {
            let name = name.as_ref();
            if !seen.insert(name) {
                continue;
            }
            match table.column(name) {
                Some(column) => columns.push(column),
                None => tracing::warn!("Chart column '{}' not in table, skipping", name),
            }
        }

        if let Some(limit) = self.config.max_columns {
            if columns.len() > limit {
                tracing::warn!(
                    "{} columns selected, plotting the first {}",
                    columns.len(),
                    limit
                );
                columns.truncate(limit);
            }
        }
        columns
    }

    /// Rows to plot for a column. The VE base trace follows the corrected
    /// VE mask so both lines cover the same samples.
    fn plotted_rows(&self, table: &LogTable, column: &Column) -> Vec<usize> {
        if column.name() == self.config.ve_base_column {
            if let Some(corrected) = table.column(&self.config.ve_corrected_column) {
                return (0..table.row_count())
                    .filter(|&row| corrected.is_present(row))
                    .collect();
            }
        }
        (0..table.row_count()).collect()
    }

    fn build_series(
        &self,
        table: &LogTable,
        column: &Column,
        scale: f64,
        axis: AxisSide,
    ) -> Series {
        let x = self.plotted_rows(table, column);
        let values: Vec<Option<f64>> = x.iter().map(|&row| column.value_at(row)).collect();
        let y = values.iter().map(|v| v.map(|v| v * scale)).collect();
        let hover = x
            .iter()
            .map(|&row| {
                format!(
                    "<b>{}</b><br>{}: {}",
                    column.name(),
                    self.config.layout.hover_label,
                    column.display_at(row).unwrap_or_default()
                )
            })
            .collect();
        let color = match axis {
            AxisSide::Secondary => Some(self.config.speed_color.clone()),
            AxisSide::Primary => None,
        };

        Series {
            name: column.name().to_string(),
            axis,
            x,
            y,
            values,
            hover,
            scale,
            color,
            connect_gaps: self.config.connect_gaps,
        }
    }
}
