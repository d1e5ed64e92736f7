//! The network half of a round: every resource fetched concurrently, all or
//! nothing.

use crate::error::{Error, ErrorKind, Result};
use futures::future::{try_join, try_join_all};
use horadric_extract::{CatalogInputs, SourceTable};
use horadric_source::BackendHandle;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::instrument;

/// Where every resource of a round comes from.
#[derive(Clone)]
pub struct Sources {
    /// The publisher's site: changelog and reference pages.
    pub site: BackendHandle,
    /// TXT tables, usually a local mirror.
    pub tables: BackendHandle,
    pub pages: Pages,
}

/// Resource names of the pages served by [`Sources::site`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pages {
    pub changelog: String,
    pub gems: String,
    pub runewords: String,
}
impl Default for Pages {
    fn default() -> Self {
        Self {
            changelog: "changelog.html".to_string(),
            gems: "gems.html".to_string(),
            runewords: "runewords.html".to_string(),
        }
    }
}

/// Raw text of every resource of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub tables: BTreeMap<SourceTable, String>,
    pub gems_page: String,
    pub runewords_page: String,
}
impl Fetched {
    /// BLAKE3 over every resource, tables in [`SourceTable::ALL`] order then
    /// the two pages. Each part is prefixed with its name and length so that
    /// moving bytes between resources changes the hash.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        let tables = self.tables.iter().map(|(table, text)| (table.file_name(), text));
        let pages = [("gems", &self.gems_page), ("runewords", &self.runewords_page)];
        for (name, text) in tables.chain(pages) {
            hasher.update(name.as_bytes());
            hasher.update(&u64::try_from(text.len()).unwrap_or(u64::MAX).to_le_bytes());
            hasher.update(text.as_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    pub fn into_inputs(self) -> CatalogInputs {
        CatalogInputs {
            tables: self.tables.into_iter().collect(),
            gems_page: Some(self.gems_page),
            runewords_page: Some(self.runewords_page),
        }
    }
}

/// Fetch every table and both reference pages.
///
/// All requests are in flight at once. The first failure resolves the whole
/// future; the other requests are dropped and their results never looked at.
#[instrument(level = "debug", skip_all, fields(site = sources.site.name(), tables = sources.tables.name()))]
pub async fn fetch_all(sources: &Sources, timeout: Duration) -> Result<Fetched> {
    let tables = try_join_all(SourceTable::ALL.into_iter().map(move |table| async move {
        let text = fetch_one(&sources.tables, table.file_name(), timeout).await?;
        Ok::<_, Error>((table, text))
    }));
    let pages = try_join(
        fetch_one(&sources.site, &sources.pages.gems, timeout),
        fetch_one(&sources.site, &sources.pages.runewords, timeout),
    );
    let (tables, (gems_page, runewords_page)) = try_join(tables, pages).await?;
    Ok(Fetched {
        tables: tables.into_iter().collect(),
        gems_page,
        runewords_page,
    })
}

/// Fetch a single resource within `timeout`.
pub(crate) async fn fetch_one(backend: &BackendHandle, resource: &str, timeout: Duration) -> Result<String> {
    tracing::debug!(backend = backend.name(), resource, "Fetching");
    match tokio::time::timeout(timeout, backend.fetch(resource)).await {
        Ok(Ok(text)) => {
            tracing::debug!(resource, size = text.len(), "Fetched");
            Ok(text)
        },
        Ok(Err(err)) => {
            let reason = (*err).to_string();
            Err(err.raise(ErrorKind::Transport {
                resource: resource.to_string(),
                reason,
            }))
        },
        Err(_elapsed) => Err(Error::from(ErrorKind::Transport {
            resource: resource.to_string(),
            reason: format!("no response within {}s", timeout.as_secs_f32()),
        })),
    }
}
