//! Sync Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A sync error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a round failed. Each kind maps to the stage that failed, and every
/// kind aborts the round before anything is written, except
/// [`Persistence`](Self::Persistence) which *is* the write (and rolls back).
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A resource could not be fetched.
    #[display("could not fetch {resource}: {reason}")]
    Transport { resource: String, reason: String },
    /// A resource was fetched but its content is structurally unusable.
    #[display("could not read {resource}: {reason}")]
    Parse { resource: String, reason: String },
    /// The local database rejected a read or the final write.
    #[display("local database error: {_0}")]
    Persistence(#[error(not(source))] String),
    /// The round was cancelled while fetching.
    #[display("sync cancelled")]
    Cancelled,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            // Networks recover; publishers fix their files eventually, but
            // not within a retry.
            Self::Transport { .. } | Self::Persistence(_) | Self::Cancelled => true,
            Self::Parse { .. } => false,
        }
    }

    /// Convert a store error into a sync error, keeping the store's error
    /// tree as a child. The message follows the first-child chain down to the
    /// driver's own message, which is what names the failing constraint.
    #[track_caller]
    pub fn persistence(err: horadric_cache::error::Error) -> Error {
        let mut reason = (*err).to_string();
        let mut frame = err.frame();
        while let Some(child) = frame.children().first() {
            reason = format!("{reason}: {}", child.error());
            frame = child;
        }
        err.raise(ErrorKind::Persistence(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_resource() {
        let kind = ErrorKind::Transport {
            resource: "gems.txt".to_string(),
            reason: "fetching 'gems.txt' failed with HTTP status 502".to_string(),
        };
        assert!(kind.to_string().starts_with("could not fetch gems.txt"));
        assert!(kind.is_retryable());
        let kind = ErrorKind::Parse {
            resource: "changelog".to_string(),
            reason: "no release".to_string(),
        };
        assert!(!kind.is_retryable());
    }

    #[test]
    fn test_persistence_keeps_driver_message() {
        use horadric_cache::error::ErrorKind as CacheErrorKind;
        let driver = std::io::Error::other("UNIQUE constraint failed: monsters.idx");
        let err = ErrorKind::persistence(exn::Exn::new(driver).raise(CacheErrorKind::Database));
        assert_eq!(
            *err,
            ErrorKind::Persistence("database error: UNIQUE constraint failed: monsters.idx".to_string())
        );
        assert_eq!(
            err.to_string(),
            "local database error: database error: UNIQUE constraint failed: monsters.idx"
        );
        assert!(err.is_retryable());

        let err = ErrorKind::persistence(exn::Exn::from(CacheErrorKind::Migration));
        assert_eq!(*err, ErrorKind::Persistence("database migration error".to_string()));
    }
}
