//! Marker lines and header handling

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::config::SegmenterConfig;

/// Layouts tried when reading a timestamped marker
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d_%H-%M-%S",
    "%Y%m%d_%H%M%S",
    "%d/%m/%Y %H:%M:%S",
];

/// How a session is introduced in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// The marker line is the header; its first token is the session label
    Inline,
    /// The marker carries a timestamp; the header is the next line
    Timestamped,
}

/// Classify a (trimmed) line as a session marker
pub fn classify_marker(line: &str, config: &SegmenterConfig) -> Option<MarkerKind> {
    let line = line.trim();
    if !config.timestamped_marker.is_empty() && line.starts_with(&config.timestamped_marker) {
        Some(MarkerKind::Timestamped)
    } else if !config.inline_marker.is_empty() && line.starts_with(&config.inline_marker) {
        Some(MarkerKind::Inline)
    } else {
        None
    }
}

/// Extract the timestamp token from a timestamped marker line
///
/// `NEW_LOG;2024-03-10 14:22:05` → `Some("2024-03-10 14:22:05")`
pub fn timestamp_token<'a>(line: &'a str, config: &SegmenterConfig) -> Option<&'a str> {
    let rest = line.trim().strip_prefix(config.timestamped_marker.as_str())?;
    if rest.contains(config.delimiter) {
        rest.split(config.delimiter)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .last()
    } else {
        // Whitespace-separated: the timestamp may itself contain a space,
        // so keep everything after the marker.
        Some(rest.trim()).filter(|t| !t.is_empty())
    }
}

/// Parse a timestamp token using the known logger layouts
pub fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(token, fmt).ok())
}

/// Split a header line into column names
pub fn split_header(line: &str, delimiter: char) -> Vec<&str> {
    line.trim().split(delimiter).collect()
}

/// Make column names unique
///
/// The first occurrence keeps its name, later ones get `_1`, `_2`, ... in
/// order of appearance. A generated name never collides with one already
/// emitted: `["A", "A", "A_1"]` → `["A", "A_1", "A_1_1"]`.
pub fn dedup_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut emitted: HashSet<String> = HashSet::with_capacity(names.len());
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        let count = counts.entry(name).or_insert(0);
        let mut unique = name.to_string();
        while emitted.contains(&unique) {
            *count += 1;
            unique = format!("{}_{}", name, count);
        }
        emitted.insert(unique.clone());
        result.push(unique);
    }

    result
}

/// Coerce a raw cell to a number: comma decimals accepted, anything
/// unparseable is missing
pub fn parse_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_names() {
        assert_eq!(dedup_names(&["A", "B", "A", "A"]), vec!["A", "B", "A_1", "A_2"]);
        assert_eq!(dedup_names(&["0", "0", "x"]), vec!["0", "0_1", "x"]);
        assert_eq!(dedup_names(&["A", "A", "A_1"]), vec!["A", "A_1", "A_1_1"]);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("12,5"), Some(12.5));
        assert_eq!(parse_cell("12.5"), Some(12.5));
        assert_eq!(parse_cell(" 300 "), Some(300.0));
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("abc"), None);
        assert_eq!(parse_cell("nan"), None);
    }

    #[test]
    fn test_classify_marker() {
        let config = SegmenterConfig::default();
        assert_eq!(
            classify_marker("Mess 1;RPM;CLT", &config),
            Some(MarkerKind::Inline)
        );
        assert_eq!(
            classify_marker("  NEW_LOG;2024-03-10 14:22:05", &config),
            Some(MarkerKind::Timestamped)
        );
        assert_eq!(classify_marker("1;900;350", &config), None);
    }

    #[test]
    fn test_timestamp_token() {
        let config = SegmenterConfig::default();
        assert_eq!(
            timestamp_token("NEW_LOG;2024-03-10 14:22:05", &config),
            Some("2024-03-10 14:22:05")
        );
        assert_eq!(
            timestamp_token("NEW_LOG 2024-03-10 14:22:05", &config),
            Some("2024-03-10 14:22:05")
        );
        assert_eq!(timestamp_token("NEW_LOG", &config), None);
        assert_eq!(timestamp_token("NEW_LOG;;", &config), None);

        let ts = parse_timestamp("2024-03-10 14:22:05").unwrap();
        assert_eq!(ts.to_string(), "2024-03-10 14:22:05");
        assert!(parse_timestamp("yesterday").is_none());
    }
}
