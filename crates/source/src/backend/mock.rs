//! In-memory source backend for testing.

use crate::SourceBackend;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy)]
enum Failure {
    Status(u16),
    Timeout,
}

#[derive(Default)]
struct State {
    resources: HashMap<String, String>,
    failures: HashMap<String, Failure>,
    fetches: HashMap<String, usize>,
}

/// In-memory source backend for testing.
///
/// Resources live in a `HashMap` behind a [`RwLock`], so they can be
/// changed between sync rounds. Failures can be injected per resource and
/// every fetch is counted.
///
/// # Examples
///
/// ```
/// use horadric_source::backend::{MockBackend, SourceBackend};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::with_resources([("skills.txt", "skill\nTeleport\n")]);
/// assert_eq!(backend.fetch("skills.txt").await?, "skill\nTeleport\n");
/// assert_eq!(backend.fetch_count("skills.txt").await, 1);
///
/// backend.fail_status("skills.txt", 503).await;
/// assert!(backend.fetch("skills.txt").await.is_err());
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    delay: Option<Duration>,
    state: RwLock<State>,
}

impl MockBackend {
    pub fn with_resources(resources: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        let resources = resources.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self {
            name: "mock".to_string(),
            delay: None,
            state: RwLock::new(State {
                resources,
                ..State::default()
            }),
        }
    }

    /// Change the name of the mock backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Hold every fetch for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Insert or replace a resource and clear any injected failure for it.
    pub async fn set(&self, resource: impl Into<String>, content: impl Into<String>) {
        let resource = resource.into();
        let mut state = self.state.write().await;
        state.failures.remove(&resource);
        state.resources.insert(resource, content.into());
    }

    /// Make every fetch of `resource` fail with an HTTP status.
    pub async fn fail_status(&self, resource: impl Into<String>, status: u16) {
        self.state.write().await.failures.insert(resource.into(), Failure::Status(status));
    }

    /// Make every fetch of `resource` time out.
    pub async fn fail_timeout(&self, resource: impl Into<String>) {
        self.state.write().await.failures.insert(resource.into(), Failure::Timeout);
    }

    /// Remove an injected failure.
    pub async fn recover(&self, resource: &str) {
        self.state.write().await.failures.remove(resource);
    }

    pub async fn fetch_count(&self, resource: &str) -> usize {
        self.state.read().await.fetches.get(resource).copied().unwrap_or(0)
    }

    pub async fn total_fetches(&self) -> usize {
        self.state.read().await.fetches.values().sum()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let resources: [(&str, &str); 0] = [];
        Self::with_resources(resources)
    }
}

#[async_trait]
impl SourceBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, resource: &str) -> Result<String> {
        *self.state.write().await.fetches.entry(resource.to_string()).or_default() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.read().await;
        match state.failures.get(resource) {
            Some(Failure::Status(status)) => exn::bail!(ErrorKind::Status {
                resource: resource.to_string(),
                status: *status,
            }),
            Some(Failure::Timeout) => exn::bail!(ErrorKind::Timeout(resource.to_string())),
            None => {},
        }
        let text = state
            .resources
            .get(resource)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(resource.to_string())))?;
        super::non_empty(resource, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_and_count() {
        let backend = MockBackend::with_resources([("a.txt", "one")]);
        assert_eq!(backend.fetch("a.txt").await.unwrap(), "one");
        assert_eq!(backend.fetch("a.txt").await.unwrap(), "one");
        assert_eq!(backend.fetch_count("a.txt").await, 2);
        assert_eq!(backend.fetch_count("b.txt").await, 0);
    }

    #[tokio::test]
    async fn test_not_found_is_counted() {
        let backend = MockBackend::default();
        let err = backend.fetch("missing.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        assert_eq!(backend.total_fetches().await, 1);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let backend = MockBackend::with_resources([("a.txt", "one")]);
        backend.fail_status("a.txt", 500).await;
        let err = backend.fetch("a.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Status { status: 500, .. }));
        backend.fail_timeout("a.txt").await;
        let err = backend.fetch("a.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Timeout(_)));
        backend.recover("a.txt").await;
        assert!(backend.fetch("a.txt").await.is_ok());
    }

    #[tokio::test]
    async fn test_set_replaces_content() {
        let backend = MockBackend::with_resources([("a.txt", "one")]);
        backend.fail_status("a.txt", 500).await;
        backend.set("a.txt", "two").await;
        assert_eq!(backend.fetch("a.txt").await.unwrap(), "two");
    }
}
