//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Individual malformed rows never produce one of these: they are dropped by
/// the parser that consumes them.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A source table was expected but not supplied at all.
    #[display("missing source table: {_0}")]
    MissingTable(#[error(not(source))] &'static str),
    /// The table has no header line, or lacks a column every row depends on.
    #[display("table '{table}' is missing required column '{column}'")]
    MissingColumn {
        /// File name of the table.
        table: &'static str,
        /// Column that could not be found in the header.
        column: &'static str,
    },
    /// The changelog contained no recognisable release line.
    #[display("no release found for '{_0}' in changelog")]
    NoRelease(#[error(not(source))] String),
    /// A field was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// Details about the parsing failure.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The data is either usable or it isn't; parsing it again changes nothing.
        false
    }
}
