//! Observable lifecycle of the synchronizer.

use derive_more::Display;
use horadric_extract::ContentVersion;

/// What asked for a round.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SyncReason {
    /// Startup or background refresh: skip the download when the published
    /// version is already stored.
    #[display("routine")]
    Routine,
    /// A user asked for it: always download and compare content.
    #[display("explicit")]
    Explicit,
}

/// How a successful round ended.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Tables were replaced with freshly fetched data.
    #[display("updated to {_0}")]
    Updated(ContentVersion),
    /// The stored version is current, nothing was downloaded.
    #[display("already at {_0}")]
    UpToDate(ContentVersion),
    /// Everything was downloaded but matched what is stored; only the sync
    /// timestamp changed.
    #[display("no changes in {_0}")]
    Unchanged(ContentVersion),
}
impl SyncOutcome {
    pub fn version(&self) -> &ContentVersion {
        match self {
            Self::Updated(version) | Self::UpToDate(version) | Self::Unchanged(version) => version,
        }
    }
}

/// How a failed round should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPresentation {
    /// Nothing was ever synced: there is nothing to show but the error.
    Blocking,
    /// Earlier data is still readable; show it with a retry banner.
    Banner,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    Loading,
    Success(SyncOutcome),
    Error {
        message: String,
        /// Data from an earlier round is still in the store.
        stale_data: bool,
    },
}
impl SyncState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// `true` once a round has ended, either way.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error { .. })
    }

    pub fn error_presentation(&self) -> Option<ErrorPresentation> {
        match self {
            Self::Error { stale_data: true, .. } => Some(ErrorPresentation::Banner),
            Self::Error { stale_data: false, .. } => Some(ErrorPresentation::Blocking),
            _ => None,
        }
    }
}
