//! Source Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Every variant names the resource that failed so the message can be shown
/// to a user as-is.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Resource does not exist on the backend.
    #[display("resource not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The server answered with a non-success status.
    #[display("fetching '{resource}' failed with HTTP status {status}")]
    Status {
        resource: String,
        status: u16,
    },
    /// The request did not complete in time.
    #[display("timed out fetching '{_0}'")]
    Timeout(#[error(not(source))] String),
    /// Connection, DNS or TLS failure.
    #[display("network error fetching '{resource}': {reason}")]
    Transport {
        resource: String,
        reason: String,
    },
    /// The resource was fetched but had no content.
    #[display("resource '{_0}' is empty")]
    Empty(#[error(not(source))] String),
    /// The mirror root is not a usable directory.
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// A resource name that can't be mapped onto a file or URL.
    #[display("invalid resource name: {_0:?}")]
    InvalidResource(#[error(not(source))] String),
    /// The configured base URL can't be used.
    #[display("invalid URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Timeout(_) | Self::Transport { .. } | Self::Io(_) => true,
            Self::NotFound(_)
            | Self::Empty(_)
            | Self::InvalidPath(_)
            | Self::InvalidResource(_)
            | Self::InvalidUrl(_) => false,
        }
    }
}
