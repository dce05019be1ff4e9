//! Error types for recording import/export.

use thiserror::Error;

use crate::model::ChannelId;

/// Errors that can occur while importing or exporting a session.
///
/// Every import is all-or-nothing: when one of these is returned the
/// previously loaded data is left untouched.
#[derive(Error, Debug)]
pub enum DataError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File lacks a required structural marker or has a malformed row
    #[error("Invalid format: {message}")]
    Format {
        /// Description of the format error
        message: String,
    },

    /// A channel has no samples after parsing
    #[error("Channel {channel} has no samples")]
    EmptyData {
        /// The empty channel
        channel: ChannelId,
    },

    /// Stored label interval text could not be parsed
    #[error("Cannot parse label interval '{text}'")]
    LabelParse {
        /// The offending cell content
        text: String,
    },

    /// Version mismatch between expected and found
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version string
        expected: String,
        /// Found version string
        found: String,
    },

    /// Operation not supported by this format
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl DataError {
    /// Create a format error with a message.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a format error pointing at a 1-based line number.
    pub fn at_line(line: usize, message: impl std::fmt::Display) -> Self {
        Self::format(format!("line {}: {}", line, message))
    }

    /// Create a label parse error.
    pub fn label_parse(text: impl Into<String>) -> Self {
        Self::LabelParse { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DataError::at_line(12, "expected 7 columns").to_string(),
            "Invalid format: line 12: expected 7 columns"
        );
        assert_eq!(
            DataError::EmptyData {
                channel: ChannelId::Ph
            }
            .to_string(),
            "Channel pH has no samples"
        );
        assert_eq!(
            DataError::label_parse("[1, x]").to_string(),
            "Cannot parse label interval '[1, x]'"
        );
    }
}
