//! Charting
//!
//! Builds dual-axis line chart specifications from session tables. The
//! output is plain data; drawing it is left to the presentation layer.

mod render;
mod scale;

pub use render::{Axis, AxisRange, AxisSide, ChartRenderer, ChartSpec, Series};
pub use scale::{nice_max, nice_min, normalizing_multiplier, ScaleTable};
