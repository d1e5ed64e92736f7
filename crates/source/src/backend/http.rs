//! HTTP(S) backend for the publisher's website and table mirror.

use super::non_empty;
use crate::{SourceBackend, resource_segments};
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

/// Fetches resources relative to a base URL.
///
/// Resources that are already absolute `http(s)://` URLs are fetched as-is.
///
/// # Examples
///
/// ```no_run
/// use horadric_source::backend::HttpBackend;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("site", "https://example.com/mod/", Duration::from_secs(30))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpBackend {
    name: String,
    base_url: String,
    client: Client,
}
impl HttpBackend {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if !is_absolute_url(&base_url) {
            exn::bail!(ErrorKind::InvalidUrl(base_url));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::InvalidUrl(base_url.clone()))?;
        Ok(Self {
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `resource`.
    pub fn url(&self, resource: &str) -> Result<String> {
        if is_absolute_url(resource) {
            return Ok(resource.to_string());
        }
        Ok(format!("{}/{}", self.base_url, resource_segments(resource)?.join("/")))
    }

    fn request_error(resource: &str, err: &reqwest::Error) -> ErrorKind {
        if err.is_timeout() {
            ErrorKind::Timeout(resource.to_string())
        } else {
            ErrorKind::Transport {
                resource: resource.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

fn is_absolute_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[async_trait]
impl SourceBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(backend = %self.name))]
    async fn fetch(&self, resource: &str) -> Result<String> {
        let url = self.url(resource)?;
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::request_error(resource, &e))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            exn::bail!(ErrorKind::NotFound(resource.to_string()));
        }
        if !status.is_success() {
            exn::bail!(ErrorKind::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }
        // A body that fails mid-way is a failed fetch, never partial content.
        let text = response.text().await.map_err(|e| Self::request_error(resource, &e))?;
        tracing::debug!(%url, bytes = text.len(), "Fetched resource");
        non_empty(resource, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend(server: &MockServer, timeout: Duration) -> HttpBackend {
        HttpBackend::new("test", format!("{}/mod/", server.uri()), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mod/changelog"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Reimagined 3.9.1 - 01/02/2025"))
            .expect(1)
            .mount(&server)
            .await;
        let backend = backend(&server, Duration::from_secs(5)).await;
        let text = backend.fetch("changelog").await.unwrap();
        assert_eq!(text, "Reimagined 3.9.1 - 01/02/2025");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mod/runes.txt"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let backend = backend(&server, Duration::from_secs(5)).await;
        let err = backend.fetch("runes.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Status { status: 503, resource } if resource == "runes.txt"));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start().await;
        let backend = backend(&server, Duration::from_secs(5)).await;
        let err = backend.fetch("missing.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mod/gems.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
            .mount(&server)
            .await;
        let backend = backend(&server, Duration::from_secs(5)).await;
        let err = backend.fetch("gems.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Empty(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mod/slow"))
            .respond_with(ResponseTemplate::new(200).set_body_string("late").set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;
        let backend = backend(&server, Duration::from_millis(100)).await;
        let err = backend.fetch("slow").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Timeout(_)));
    }

    #[test]
    fn test_url_joining() {
        let backend = HttpBackend::new("test", "https://example.com/mod///", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.url("/gems").unwrap(), "https://example.com/mod/gems");
        assert_eq!(backend.url("data//gems.html").unwrap(), "https://example.com/mod/data/gems.html");
        assert_eq!(backend.url("https://other.example/x").unwrap(), "https://other.example/x");
        assert!(matches!(&*backend.url("../admin").unwrap_err(), ErrorKind::InvalidResource(_)));
        assert!(HttpBackend::new("test", "example.com", Duration::from_secs(1)).is_err());
    }
}
