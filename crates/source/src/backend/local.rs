//! Local mirror of the TXT tables.
//!
//! Files are read from a configured directory via `tokio::fs`. Bundled
//! tables shipped alongside the application are served this way.

use super::non_empty;
use crate::error::{ErrorKind, Result};
use crate::{SourceBackend, mirror_path};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// Local filesystem backend rooted at a mirror directory.
///
/// # Examples
///
/// ```no_run
/// use horadric_source::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("bundled", "/usr/share/horadric/txt")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalBackend {
    name: String,
    /// Root directory of the mirror
    root: PathBuf,
}
impl LocalBackend {
    /// Create a backend for an existing mirror directory.
    ///
    /// Relative roots are resolved against the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`](ErrorKind::InvalidPath) if the root is not an
    /// existing directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = std::path::absolute(root.as_ref()).map_err(|e| Self::map_io_error(e, root.as_ref()))?;
        if !root.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { name: name.into(), root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `resource` lives below the root.
    fn absolute_path(&self, resource: &str) -> Result<PathBuf> {
        Ok(self.root.join(mirror_path(resource)?))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.display().to_string()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl SourceBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(backend = %self.name))]
    async fn fetch(&self, resource: &str) -> Result<String> {
        let abs_path = self.absolute_path(resource)?;
        let bytes = fs::read(&abs_path).await.map_err(|e| Self::map_io_error(e, Path::new(resource)))?;
        tracing::debug!(path = %abs_path.display(), bytes = bytes.len(), "Read mirrored resource");
        // Tables occasionally carry stray Latin-1 bytes.
        let text = String::from_utf8_lossy(&bytes).into_owned();
        non_empty(resource, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("skills.txt"), "skill\tcharclass\nTeleport\tsor\n").unwrap();
        let backend = LocalBackend::new("bundled", temp_dir.path()).unwrap();
        let text = backend.fetch("skills.txt").await.unwrap();
        assert!(text.starts_with("skill\tcharclass"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("monstats.txt"), b"NameStr\nCaf\xe9\n").unwrap();
        let backend = LocalBackend::new("bundled", temp_dir.path()).unwrap();
        let text = backend.fetch("monstats.txt").await.unwrap();
        assert_eq!(text, "NameStr\nCaf\u{fffd}\n");
    }

    #[tokio::test]
    async fn test_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("bundled", temp_dir.path()).unwrap();
        let err = backend.fetch("nonexistent.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("misc.txt"), "").unwrap();
        let backend = LocalBackend::new("bundled", temp_dir.path()).unwrap();
        let err = backend.fetch("misc.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Empty(_)));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("bundled", temp_dir.path()).unwrap();
        let err = backend.fetch("../etc/passwd").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidResource(_)));
    }

    #[tokio::test]
    async fn test_nested_resource() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("global/excel")).unwrap();
        std::fs::write(temp_dir.path().join("global/excel/runes.txt"), "Name\nRuneword1\n").unwrap();
        let backend = LocalBackend::new("bundled", temp_dir.path()).unwrap();
        let text = backend.fetch("/global//excel/runes.txt").await.unwrap();
        assert_eq!(text, "Name\nRuneword1\n");
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(LocalBackend::new("bundled", &file).is_err());
        assert!(LocalBackend::new("bundled", temp_dir.path().join("missing")).is_err());
    }
}
