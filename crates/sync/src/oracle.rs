//! Decide whether the published content moved on since the last sync.

use crate::error::{ErrorKind, Result};
use crate::fetch::fetch_one;
use horadric_extract::changelog::latest_release;
use horadric_extract::{ContentVersion, Release};
use horadric_source::BackendHandle;
use std::time::Duration;
use tracing::instrument;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of comparing the published release with the stored version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCheck {
    /// Newest release announced in the changelog.
    pub release: Release,
    pub stored: Option<ContentVersion>,
    /// `true` when the stored version differs from the published one, or
    /// nothing was ever stored.
    pub changed: bool,
}

/// Reads the changelog and compares its newest release with what is stored.
#[derive(Clone)]
pub struct VersionOracle {
    backend: BackendHandle,
    changelog: String,
    product: String,
    timeout: Duration,
}
impl VersionOracle {
    pub fn new(backend: BackendHandle, changelog: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            backend,
            changelog: changelog.into(),
            product: product.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Newest release in the changelog.
    ///
    /// A changelog that can't be fetched is a
    /// [`Transport`](ErrorKind::Transport) failure; one that was fetched but
    /// has no release line is a [`Parse`](ErrorKind::Parse) failure.
    #[instrument(level = "debug", skip(self), fields(changelog = %self.changelog))]
    pub async fn latest(&self) -> Result<Release> {
        let text = fetch_one(&self.backend, &self.changelog, self.timeout).await?;
        latest_release(&text, &self.product).map_err(|err| {
            let reason = (*err).to_string();
            err.raise(ErrorKind::Parse {
                resource: self.changelog.clone(),
                reason,
            })
        })
    }

    pub async fn check(&self, stored: Option<&ContentVersion>) -> Result<VersionCheck> {
        let release = self.latest().await?;
        let changed = stored.is_none_or(|stored| *stored != release.version);
        tracing::debug!(
            remote = %release.version,
            stored = stored.map(ToString::to_string).unwrap_or_default(),
            changed,
            "Checked published version"
        );
        Ok(VersionCheck {
            release,
            stored: stored.cloned(),
            changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horadric_source::backend::MockBackend;
    use rstest::rstest;
    use std::sync::Arc;

    const CHANGELOG: &str = "<h2>Reimagined 3.10.2 - 14/03/2025</h2><h2>Reimagined 3.10.1 - 01/02/2025</h2>";

    fn oracle(changelog: &str) -> VersionOracle {
        let backend = MockBackend::with_resources([("changelog.html", changelog)]);
        VersionOracle::new(Arc::new(backend), "changelog.html", "Reimagined")
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("3.10.1"), true)]
    #[case(Some("3.10.2"), false)]
    #[case(Some("3.10.2.0"), false)]
    #[case(Some("3.11"), true)]
    #[tokio::test]
    async fn test_check(#[case] stored: Option<&str>, #[case] changed: bool) {
        let stored = stored.map(ContentVersion::from);
        let check = oracle(CHANGELOG).check(stored.as_ref()).await.unwrap();
        assert_eq!(check.release.version, ContentVersion::from("3.10.2"));
        assert_eq!(check.stored, stored);
        assert_eq!(check.changed, changed);
    }

    #[tokio::test]
    async fn test_no_release_is_a_parse_failure() {
        let err = oracle("<p>Nothing to see</p>").latest().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Parse { resource, .. } if resource == "changelog.html"));
    }

    #[tokio::test]
    async fn test_unreachable_changelog_is_a_transport_failure() {
        let backend = MockBackend::default();
        backend.fail_status("changelog.html", 502).await;
        let oracle = VersionOracle::new(Arc::new(backend), "changelog.html", "Reimagined");
        let err = oracle.check(None).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Transport { .. }));
        assert!(err.is_retryable());
    }
}
