//! Segmentation errors

use thiserror::Error;

/// Errors that abort a whole segmentation pass
///
/// Cells that fail numeric conversion and missing source channels are not
/// errors; they become missing values or skipped transforms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// The input bytes are not UTF-8
    #[error("File is not valid UTF-8 text: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("Session marker at line {line} is not followed by a header line")]
    /// A timestamped marker has no header line after it
    MissingHeader {
        /// 1-based line of the marker
        line: usize,
    },

    /// Negative or non-finite fuel factor
    #[error("Invalid extra fuel factor: {0}")]
    InvalidFuelFactor(f64),
}
