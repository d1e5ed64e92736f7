//! Opening the store and keeping its schema current.

use exn::ResultExt;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{
    SqliteAutoVacuum, SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
/// Readers (queries from the UI) plus the one connection a sync round writes
/// through.
const POOL_SIZE: u32 = 4;
/// A full replacement holds the write lock for the whole bulk insert.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the SQLite store.
///
/// Cheap to clone. Queries go through a [`Repository`](crate::Repository)
/// built from it.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the store at `path` and bring its schema up to date.
    ///
    /// Missing parent directories are created. A file written by an older
    /// build is upgraded in place; one written by a newer build is refused
    /// with [`NewerSchema`](ErrorKind::NewerSchema).
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Database)?;
        }
        let options = Self::options().filename(path).create_if_missing(true);
        Self::open(options, POOL_SIZE).await
    }

    /// A private in-memory store, for tests here and in dependent crates.
    pub async fn connect_in_memory() -> Result<Self> {
        // Every connection to ":memory:" is its own database.
        Self::open(Self::options().filename(":memory:"), 1).await
    }

    fn options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT)
            .auto_vacuum(SqliteAutoVacuum::None)
            // Replacing every table leaves a lot of dirty pages behind.
            .pragma("wal_autocheckpoint", "800")
            .pragma("cache_size", "-8192")
            .pragma("temp_store", "MEMORY")
    }

    async fn open(options: SqliteConnectOptions, pool_size: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    #[instrument("performing database migrations", skip_all)]
    async fn migrate(&self) -> Result<()> {
        match MIGRATOR.run(&self.pool).await {
            Ok(()) => Ok(()),
            // Applied by a build that knows more migrations than this one.
            Err(MigrateError::VersionMissing(version)) => exn::bail!(ErrorKind::NewerSchema(version)),
            Err(err) => Err(err).or_raise(|| ErrorKind::Migration),
        }
    }

    /// Highest migration applied to this store.
    pub async fn schema_version(&self) -> Result<Option<i64>> {
        let (version,): (Option<i64>,) = sqlx::query_as("SELECT MAX(version) FROM _sqlx_migrations WHERE success")
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(version)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection. The handle must not be used afterwards.
    pub async fn close(&self) {
        _ = sqlx::query("PRAGMA optimize").execute(&self.pool).await;
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LATEST_MIGRATION: i64 = 3;

    #[tokio::test]
    async fn test_connect_in_memory() {
        let db = Database::connect_in_memory().await.unwrap();
        assert!(!db.pool().is_closed());
        assert_eq!(db.schema_version().await.unwrap(), Some(LATEST_MIGRATION));
        db.close().await;
        assert!(db.pool().is_closed());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        assert_eq!(db.schema_version().await.unwrap(), Some(LATEST_MIGRATION));
        db.close().await;
    }

    #[tokio::test]
    async fn test_connection_settings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Database::connect(temp_dir.path().join("horadric.db")).await.unwrap();
        let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode").fetch_one(db.pool()).await.unwrap();
        assert_eq!(mode, "wal");
        let (checkpoint,): (i64,) = sqlx::query_as("PRAGMA wal_autocheckpoint").fetch_one(db.pool()).await.unwrap();
        assert_eq!(checkpoint, 800);
        let (timeout,): (i64,) = sqlx::query_as("PRAGMA busy_timeout").fetch_one(db.pool()).await.unwrap();
        assert_eq!(timeout, 5000);
        db.close().await;
    }

    #[tokio::test]
    async fn test_connect_creates_file_and_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("horadric.db");
        let db = Database::connect(&path).await.unwrap();
        db.close().await;
        assert!(path.exists());
        let db = Database::connect(&path).await.unwrap();
        db.close().await;
    }

    #[tokio::test]
    async fn test_older_schema_is_upgraded_in_place() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("old.db");
        // Only the first migration, as shipped by an older release.
        let old_migrations = temp_dir.path().join("migrations");
        std::fs::create_dir(&old_migrations).unwrap();
        std::fs::write(old_migrations.join("0001_tables.sql"), include_str!("../migrations/0001_tables.sql")).unwrap();
        let options = Database::options().filename(&path).create_if_missing(true);
        let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await.unwrap();
        Migrator::new(old_migrations.as_path()).await.unwrap().run(&pool).await.unwrap();
        sqlx::query("INSERT INTO sync_metadata (scope, version, released_on, synced_at) VALUES ('content', '3.8.0', 0, 0)")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let db = Database::connect(&path).await.unwrap();
        assert_eq!(db.schema_version().await.unwrap(), Some(LATEST_MIGRATION));
        let row: (String, Option<String>) = sqlx::query_as("SELECT version, fingerprint FROM sync_metadata")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row, ("3.8.0".to_string(), None));
        let coupons: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM coupon_uniques").fetch_one(db.pool()).await.unwrap();
        assert_eq!(coupons.0, 0);
        db.close().await;
    }

    #[tokio::test]
    async fn test_newer_schema_is_refused() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("newer.db");
        let db = Database::connect(&path).await.unwrap();
        sqlx::query(
            "INSERT INTO _sqlx_migrations (version, description, success, checksum, execution_time) \
             VALUES (9001, 'from the future', TRUE, x'00', 0)",
        )
        .execute(db.pool())
        .await
        .unwrap();
        db.close().await;

        let err = Database::connect(&path).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NewerSchema(9001));
        assert!(!err.is_retryable());
    }
}
