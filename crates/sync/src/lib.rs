//! Keeps the local store in step with the publisher.
//!
//! A round asks the [`VersionOracle`] for the newest release, fetches every
//! source concurrently, parses them into a
//! [`Catalog`](horadric_extract::Catalog) and replaces the store's contents
//! in one transaction. Any failure before the final commit leaves the store
//! untouched.

pub mod error;
mod fetch;
mod oracle;
mod orchestrator;
mod state;

pub use crate::fetch::{Fetched, Pages, Sources, fetch_all};
pub use crate::oracle::{VersionCheck, VersionOracle};
pub use crate::orchestrator::{SyncHandle, Synchronizer};
pub use crate::state::{ErrorPresentation, SyncOutcome, SyncReason, SyncState};
