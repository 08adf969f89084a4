//! # Master Log Viewer Core Library
//!
//! Core functionality for viewing ECU/dyno datalogger exports.

#![warn(missing_docs)]

//!
//! This library provides:
//! - Segmentation of files holding several concatenated logging sessions
//! - Unit normalization and derived channels (temperatures, lambda, corrected VE)
//! - Dual-axis chart specifications with per-channel display scaling
//!
//! ## Supported formats
//!
//! - Inline-header sessions (`Mess 1;RPM;CLT;...` marker lines)
//! - Timestamped sessions (`NEW_LOG;<timestamp>` followed by a header line)
//!
//! ## Example
//!
//! ```rust,ignore
//! use masterlog_core::{chart::ChartRenderer, datalog::LogSegmenter};
//!
//! let sessions = LogSegmenter::default().segment(&bytes, 1.0)?;
//! let renderer = ChartRenderer::new(Default::default())?;
//! for session in &sessions {
//!     let spec = renderer.render(session.full_table(), &["RPM", "Lambda 1"], Some("RPM"));
//!     println!("{}: {} series", session.name(), spec.series.len());
//! }
//! ```

pub mod chart;
pub mod config;
pub mod datalog;
pub mod unit_conversion;

use chart::{ChartRenderer, ChartSpec};
use config::{ChartConfig, ConfigError};
use datalog::{LogSegmenter, LogTable, SegmentError, Session};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chart::{Axis, AxisRange, AxisSide, ChartRenderer, ChartSpec, Series};
    pub use crate::config::{
        ChannelNames, ChartConfig, ChartLayout, ScaleMode, ScaleRule, SegmenterConfig,
        ViewerConfig,
    };
    pub use crate::datalog::{
        Column, ColumnData, LogSegmenter, LogTable, MarkerKind, SegmentError, Session,
    };
}

/// Segment a raw file with the default logger configuration
pub fn segment(raw: &[u8], extra_fuel_factor: f64) -> Result<Vec<Session>, SegmentError> {
    LogSegmenter::default().segment(raw, extra_fuel_factor)
}

/// Render a chart with the default chart configuration
pub fn render<S: AsRef<str>>(
    table: &LogTable,
    selected: &[S],
    speed_column: Option<&str>,
) -> Result<ChartSpec, ConfigError> {
    Ok(ChartRenderer::new(ChartConfig::default())?.render(table, selected, speed_column))
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
