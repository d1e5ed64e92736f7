//! SQLite store for the synchronized game data.
//!
//! The database is a cache of the publisher's files, not the source of
//! truth: deleting it only means the next sync has to fetch everything
//! again. Each successful sync replaces every table in one transaction
//! together with the [`SyncMetadata`] describing what was stored.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::SyncMetadata;
pub use crate::repo::{Counts, Repository};
