//! Source backend trait and implementations.
//!
//! A backend turns a resource name (a table file name, a page path) into its
//! text content. Content is only ever returned whole: a backend that can't
//! produce the complete resource returns an error instead.

mod http;
mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::http::HttpBackend;
pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;

/// Unified interface for fetching published resources.
///
/// # Examples
///
/// ```
/// use horadric_source::{backend::SourceBackend, error::Result};
///
/// async fn line_count(backend: &dyn SourceBackend) -> Result<usize> {
///     let text = backend.fetch("skills.txt").await?;
///     Ok(text.lines().count())
/// }
/// ```
#[async_trait]
pub trait SourceBackend: Send + Sync {
    /// Name of the configured backend, used for logging only.
    fn name(&self) -> &str;

    /// Fetch the full text of `resource`.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the
    /// resource does not exist and [`Empty`](crate::error::ErrorKind::Empty)
    /// if it exists but has no content.
    async fn fetch(&self, resource: &str) -> Result<String>;
}

/// Reject blank content, which every source treats as a failed fetch.
pub(crate) fn non_empty(resource: &str, text: String) -> Result<String> {
    if text.trim().is_empty() {
        exn::bail!(ErrorKind::Empty(resource.to_string()));
    }
    Ok(text)
}
