//! Config Error Types

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A provider could not be read or the merged values don't deserialize.
    #[display("could not load configuration")]
    Load,
    /// The configuration loaded but describes something unusable.
    #[display("invalid configuration value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
    #[display("no configuration file found at {_0}")]
    NotFound(#[error(not(source))] String),
}

impl ErrorKind {
    /// Configuration errors need a human to fix a file or a variable.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
