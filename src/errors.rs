//! Errors
//!
//! Custom error types used throughout the `treexport` crate.
use crate::export::ExportFormat;
use thiserror::Error;

/// Errors that can occur while loading or exporting a classification tree.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination could not be opened or written.
    #[error("Unable to write {format} export to the sink: {reason}")]
    SinkUnavailable { format: ExportFormat, reason: String },
    /// The tree violates the rooted-tree invariant.
    #[error("Malformed tree input during {format} export (last emitted node N{node}): {reason}")]
    MalformedTreeInput {
        format: ExportFormat,
        node: usize,
        reason: String,
    },
    /// The quote escaping convention could not be determined.
    #[error("Unsupported platform escaping {0}, expected one of none, windows, posix.")]
    UnsupportedPlatformEscaping(String),
    /// A CSV row already contains the placeholder token.
    #[error("Placeholder character already found during replacement at line {line}")]
    PlaceholderConflict { line: usize },
    /// Unable to serialize to json or write to file.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
    /// Unable to read or deserialize from file.
    #[error("Unable to read from file {0}")]
    UnableToRead(String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
}
