//! Parsing of the published game data into typed records.
//!
//! Tab-separated tables go through [`Table`] and then one domain parser per
//! table (see [`parse`]); scraped reference pages go through [`html`]. The
//! [`Catalog`] ties every parser together for one sync round. The changelog
//! release line and version comparison live here too, since they are pure
//! text processing as well.

mod catalog;
pub mod changelog;
mod compare;
mod consts;
pub mod error;
pub mod html;
pub mod models;
pub mod parse;
pub mod tabular;

pub use crate::catalog::{Catalog, CatalogInputs, SourceTable};
pub use crate::changelog::latest_release;
pub use crate::compare::{compare, needs_update};
pub use crate::models::{ContentVersion, Release};
pub use crate::tabular::{Row, Table};
