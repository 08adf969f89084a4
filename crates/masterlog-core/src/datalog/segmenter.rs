//! Log segmentation
//!
//! Splits a datalogger export holding several concatenated sessions into
//! [`Session`]s. The scan is a two-state machine over the non-empty lines:
//! seeking a marker, or collecting the data block of the open session.

use chrono::NaiveDateTime;

use super::derived;
use super::error::SegmentError;
use super::header::{
    classify_marker, dedup_names, parse_cell, parse_timestamp, split_header, timestamp_token,
    MarkerKind,
};
use super::table::{ColumnData, LogTable};
use super::Session;
use crate::config::SegmenterConfig;

/// Fuel factor that leaves the corrected VE unscaled
pub const DEFAULT_EXTRA_FUEL_FACTOR: f64 = 1.0;

/// A line with its 1-based position in the input
type NumberedLine<'a> = (usize, &'a str);

/// A session block while it is being collected
struct RawRecord<'a> {
    name: String,
    format: MarkerKind,
    started_at: Option<NaiveDateTime>,
    source_line: usize,
    headers: Vec<String>,
    rows: Vec<&'a str>,
}

enum ScanState<'a> {
    SeekingMarker,
    CollectingBlock(RawRecord<'a>),
}

/// Splits raw log files into sessions
#[derive(Debug, Clone, Default)]
pub struct LogSegmenter {
    config: SegmenterConfig,
}

impl LogSegmenter {
    /// Create a segmenter for the given logger layout
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segment a raw file into sessions
    ///
    /// An empty result means no session marker was found. Decode failures
    /// and a timestamped marker without a header line fail the whole call.
    pub fn segment(
        &self,
        raw: &[u8],
        extra_fuel_factor: f64,
    ) -> Result<Vec<Session>, SegmentError> {
        if !extra_fuel_factor.is_finite() || extra_fuel_factor < 0.0 {
            return Err(SegmentError::InvalidFuelFactor(extra_fuel_factor));
        }

        let text = std::str::from_utf8(raw)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lines: Vec<NumberedLine> = text
            .lines()
            .flat_map(|line| line.split('\r'))
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| (idx + 1, line))
            .collect();

        let mut sessions = Vec::new();
        let mut state = ScanState::SeekingMarker;
        let mut cursor = 0;

        while cursor < lines.len() {
            let (line_no, line) = lines[cursor];
            match classify_marker(line, &self.config) {
                Some(kind) => {
                    if let ScanState::CollectingBlock(record) =
                        std::mem::replace(&mut state, ScanState::SeekingMarker)
                    {
                        let ordinal = sessions.len() + 1;
                        sessions.push(self.build_session(record, ordinal, extra_fuel_factor));
                    }
                    let (record, consumed) = self.open_record(kind, &lines, cursor)?;
                    state = ScanState::CollectingBlock(record);
                    cursor += consumed;
                }
                None => {
                    match &mut state {
                        ScanState::CollectingBlock(record) => record.rows.push(line),
                        ScanState::SeekingMarker => {
                            tracing::trace!("Skipping line {} before first marker", line_no)
                        }
                    }
                    cursor += 1;
                }
            }
        }

        if let ScanState::CollectingBlock(record) = state {
            let ordinal = sessions.len() + 1;
            sessions.push(self.build_session(record, ordinal, extra_fuel_factor));
        }

        tracing::info!(
            "Segmented {} session(s) from {} lines",
            sessions.len(),
            lines.len()
        );
        Ok(sessions)
    }

    /// Start a record at a marker line. Returns the record and how many
    /// lines the marker (and header) occupied.
    fn open_record<'a>(
        &self,
        kind: MarkerKind,
        lines: &[NumberedLine<'a>],
        cursor: usize,
    ) -> Result<(RawRecord<'a>, usize), SegmentError> {
        let (line_no, line) = lines[cursor];
        match kind {
            MarkerKind::Inline => {
                let headers = dedup_names(&split_header(line, self.config.delimiter));
                let name = headers.first().cloned().unwrap_or_default();
                Ok((
                    RawRecord {
                        name,
                        format: kind,
                        started_at: None,
                        source_line: line_no,
                        headers,
                        rows: Vec::new(),
                    },
                    1,
                ))
            }
            MarkerKind::Timestamped => {
                let header_line = match lines.get(cursor + 1) {
                    Some((_, next))
                        if classify_marker(next, &self.config)
                            != Some(MarkerKind::Timestamped) =>
                    {
                        *next
                    }
                    _ => return Err(SegmentError::MissingHeader { line: line_no }),
                };
                let token = timestamp_token(line, &self.config);
                let name = token
                    .map(str::to_string)
                    .unwrap_or_else(|| self.config.timestamped_marker.clone());
                Ok((
                    RawRecord {
                        name,
                        format: kind,
                        started_at: token.and_then(parse_timestamp),
                        source_line: line_no,
                        headers: dedup_names(&split_header(header_line, self.config.delimiter)),
                        rows: Vec::new(),
                    },
                    2,
                ))
            }
        }
    }

    fn build_session(
        &self,
        record: RawRecord<'_>,
        ordinal: usize,
        extra_fuel_factor: f64,
    ) -> Session {
        let mut full_table = parse_block(&record.headers, &record.rows, self.config.delimiter);
        let name = record.name;

        derived::apply_all(&mut full_table, &self.config.channels, extra_fuel_factor);
        let display_table = full_table.without_columns(&self.config.ignored_columns);

        tracing::debug!(
            "Session '{}' at line {}: {} rows, {} columns",
            name,
            record.source_line,
            full_table.row_count(),
            full_table.column_count()
        );

        Session {
            key: format!("{}_{}", name.replace(' ', "_"), ordinal),
            name,
            format: record.format,
            started_at: record.started_at,
            source_line: record.source_line,
            full_table,
            display_table,
        }
    }
}

/// Parse data rows against a header into a numeric table
///
/// Rows longer than the header are truncated, shorter rows are padded with
/// missing values.
fn parse_block(headers: &[String], rows: &[&str], delimiter: char) -> LogTable {
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(rows.len()); headers.len()];
    let mut ragged = 0usize;

    for row in rows {
        let mut fields = row.split(delimiter);
        for column in columns.iter_mut() {
            column.push(fields.next().and_then(parse_cell));
        }
        // A trailing delimiter adds one empty field that is not data
        let width =
            row.split(delimiter).count() - usize::from(row.trim_end().ends_with(delimiter));
        if width != headers.len() {
            ragged += 1;
        }
    }

    if ragged > 0 {
        tracing::debug!("{} row(s) did not match the header width", ragged);
    }

    let mut table = LogTable::new(rows.len());
    for (name, values) in headers.iter().zip(columns) {
        table.put_column(name, ColumnData::Numeric(values));
    }
    table
}
