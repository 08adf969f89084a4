//! Data Logging
//!
//! Reads multi-session datalogger exports into typed, immutable sessions.

pub mod derived;
mod error;
mod header;
mod segmenter;
mod table;

pub use error::SegmentError;
pub use header::{dedup_names, parse_cell, MarkerKind};
pub use segmenter::{LogSegmenter, DEFAULT_EXTRA_FUEL_FACTOR};
pub use table::{Column, ColumnData, LogTable};

use chrono::NaiveDateTime;
use serde::Serialize;

/// One logging session from a file
///
/// Built once by [`LogSegmenter`] and never modified afterwards. A new
/// upload produces a fresh set of sessions. Sessions serialize for export
/// but cannot be deserialized, so every instance comes from a segmenter pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    name: String,
    key: String,
    format: MarkerKind,
    started_at: Option<NaiveDateTime>,
    source_line: usize,
    full_table: LogTable,
    display_table: LogTable,
}

impl Session {
    /// Session label (`Mess 1`, or the marker's timestamp)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unique key: name with spaces replaced, plus the 1-based ordinal
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Marker variant the session was read from
    pub fn format(&self) -> MarkerKind {
        self.format
    }

    /// Start time from a timestamped marker, when it could be parsed
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.started_at
    }

    /// 1-based input line of the session marker
    pub fn source_line(&self) -> usize {
        self.source_line
    }

    /// All channels, converted and with derived columns
    pub fn full_table(&self) -> &LogTable {
        &self.full_table
    }

    /// Channels meant for the user (ignore-list removed)
    pub fn display_table(&self) -> &LogTable {
        &self.display_table
    }

    /// Number of samples
    pub fn row_count(&self) -> usize {
        self.full_table.row_count()
    }

    /// First `rows` samples of the display table
    pub fn preview(&self, rows: usize) -> LogTable {
        self.display_table.head(rows)
    }
}
