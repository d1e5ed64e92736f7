//! Layered configuration.
//!
//! Values are merged in this order, later layers winning:
//!
//! 1. Built-in defaults.
//! 2. `config.toml` then `config.yaml` in the platform configuration
//!    directory, or the single file given explicitly.
//! 3. Environment variables prefixed with `HORADRIC_`, nested keys joined
//!    with `__` (`HORADRIC_FETCH__TIMEOUT_SECS=10`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "HORADRIC_";
const DATABASE_FILE: &str = "horadric.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file.
    pub database: PathBuf,
    /// Product name as it appears in changelog release lines.
    pub product: String,
    pub remote: RemoteConfig,
    pub tables: TableSource,
    pub fetch: FetchConfig,
}

/// The publisher's site: changelog and reference pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub changelog: String,
    pub gems: String,
    pub runewords: String,
}

/// Where the TXT tables are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum TableSource {
    /// Bundled mirror on disk.
    Local { path: PathBuf },
    /// Straight from a web server.
    Remote { base_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout, network fetches only.
    pub timeout_secs: u64,
}
impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        let dirs = project_dirs();
        let database = dirs
            .as_ref()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE));
        let tables = dirs
            .as_ref()
            .map(|dirs| dirs.data_dir().join("tables"))
            .unwrap_or_else(|| PathBuf::from("tables"));
        Self {
            database,
            product: "Reimagined".to_string(),
            remote: RemoteConfig {
                base_url: "https://www.d2r-reimagined.com".to_string(),
                changelog: "changelog.html".to_string(),
                gems: "gems.html".to_string(),
                runewords: "runewords.html".to_string(),
            },
            tables: TableSource::Local { path: tables },
            fetch: FetchConfig { timeout_secs: 30 },
        }
    }
}

impl Config {
    /// Load from the default locations.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(dirs) = project_dirs() {
            let dir = dirs.config_dir();
            tracing::debug!(dir = %dir.display(), "Looking for configuration files");
            figment = figment.merge(Toml::file(dir.join("config.toml"))).merge(Yaml::file(dir.join("config.yaml")));
        }
        Self::extract(figment)
    }

    /// Load with `path` as the only file layer. Unlike the default
    /// locations, an explicit file has to exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(path.display().to_string()));
        }
        let figment = Figment::from(Serialized::defaults(Config::default()));
        let figment = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
            _ => figment.merge(Toml::file_exact(path)),
        };
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, mid-round.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field, reason| ErrorKind::Invalid { field, reason };
        if self.product.trim().is_empty() {
            exn::bail!(invalid("product", "must not be empty"));
        }
        if !is_http_url(&self.remote.base_url) {
            exn::bail!(invalid("remote.base_url", "must be an http(s) URL"));
        }
        for (field, value) in [
            ("remote.changelog", &self.remote.changelog),
            ("remote.gems", &self.remote.gems),
            ("remote.runewords", &self.remote.runewords),
        ] {
            if value.trim().is_empty() {
                exn::bail!(invalid(field, "must not be empty"));
            }
        }
        match &self.tables {
            TableSource::Local { path } if path.as_os_str().is_empty() => {
                exn::bail!(invalid("tables.path", "must not be empty"));
            },
            TableSource::Remote { base_url } if !is_http_url(base_url) => {
                exn::bail!(invalid("tables.base_url", "must be an http(s) URL"));
            },
            _ => {},
        }
        if self.fetch.timeout_secs == 0 {
            exn::bail!(invalid("fetch.timeout_secs", "must be greater than zero"));
        }
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "horadric")
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme))
}
