use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use horadric_extract::models::{ContentVersion, Release};
use time::{Date, UtcDateTime};

/// What the stored tables were built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncMetadata {
    pub version: ContentVersion,
    pub released_on: Date,
    pub synced_at: UtcDateTime,
    /// BLAKE3 of every fetched source, in fetch order. `None` for data
    /// written before fingerprints were recorded.
    pub fingerprint: Option<String>,
}
impl SyncMetadata {
    pub fn new(release: &Release, synced_at: UtcDateTime, fingerprint: impl Into<String>) -> Self {
        Self {
            version: release.version.clone(),
            released_on: release.date,
            synced_at,
            fingerprint: Some(fingerprint.into()),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct SyncMetadataRow {
    pub(crate) version: String,
    pub(crate) released_on: i64,
    pub(crate) synced_at: i64,
    #[sqlx(default)]
    pub(crate) fingerprint: Option<String>,
}
impl From<&SyncMetadata> for SyncMetadataRow {
    fn from(metadata: &SyncMetadata) -> Self {
        Self {
            version: metadata.version.to_string(),
            released_on: metadata.released_on.midnight().as_utc().unix_timestamp(),
            synced_at: metadata.synced_at.unix_timestamp(),
            fingerprint: metadata.fingerprint.clone(),
        }
    }
}
impl TryFrom<SyncMetadataRow> for SyncMetadata {
    type Error = Error;
    fn try_from(row: SyncMetadataRow) -> Result<Self, Self::Error> {
        Ok(Self {
            version: ContentVersion::from(row.version.as_str()),
            released_on: UtcDateTime::from_unix_timestamp(row.released_on)
                .or_raise(|| ErrorKind::InvalidData("release date"))?
                .date(),
            synced_at: UtcDateTime::from_unix_timestamp(row.synced_at)
                .or_raise(|| ErrorKind::InvalidData("sync timestamp"))?,
            fingerprint: row.fingerprint,
        })
    }
}
