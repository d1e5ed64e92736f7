//! Resource names shared by every backend.
//!
//! A resource is a `/`-separated relative name such as `skills.txt` or
//! `data/global/excel/skills.txt`. The same name is joined onto a mirror
//! directory or onto a base URL, so only plain segments are accepted.

use crate::error::{ErrorKind, Result};
use std::path::PathBuf;

/// Split a resource name into its segments.
///
/// Leading, trailing and repeated slashes are ignored. Dot segments,
/// backslashes, colons and control characters are rejected rather than
/// resolved: none of the published file names contain them.
///
/// # Examples
///
/// ```
/// use horadric_source::resource_segments;
///
/// assert_eq!(resource_segments("/global//excel/gems.txt").unwrap(), ["global", "excel", "gems.txt"]);
/// assert!(resource_segments("excel/../gems.txt").is_err());
/// assert!(resource_segments("C:\\gems.txt").is_err());
/// assert!(resource_segments("//").is_err());
/// ```
pub fn segments(resource: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = resource.split('/').filter(|segment| !segment.is_empty()).collect();
    exn::ensure!(!segments.is_empty(), ErrorKind::InvalidResource(resource.to_string()));
    for segment in &segments {
        let forbidden = matches!(*segment, "." | "..")
            || segment.chars().any(|c| c == '\\' || c == ':' || c.is_control());
        exn::ensure!(!forbidden, ErrorKind::InvalidResource(resource.to_string()));
    }
    Ok(segments)
}

/// Relative filesystem path of a resource inside a mirror directory.
pub fn mirror_path(resource: &str) -> Result<PathBuf> {
    Ok(segments(resource)?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[rstest]
    #[case("skills.txt", &["skills.txt"])]
    #[case("global/excel/gems.txt", &["global", "excel", "gems.txt"])]
    #[case("/changelog.html", &["changelog.html"])]
    #[case("excel//runes.txt/", &["excel", "runes.txt"])]
    #[case("Reimagined Notes.html", &["Reimagined Notes.html"])]
    fn test_accepted(#[case] resource: &str, #[case] expected: &[&str]) {
        assert_eq!(segments(resource).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case(".")]
    #[case("../etc/passwd")]
    #[case("excel/../runes.txt")]
    #[case("excel/./runes.txt")]
    #[case("excel\\runes.txt")]
    #[case("C:/runes.txt")]
    #[case("runes\0.txt")]
    #[case("runes\n.txt")]
    fn test_rejected(#[case] resource: &str) {
        let err = segments(resource).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidResource(name) if name == resource));
    }

    #[test]
    fn test_mirror_path() {
        assert_eq!(mirror_path("global/excel/gems.txt").unwrap(), Path::new("global/excel/gems.txt"));
        assert!(mirror_path("../gems.txt").is_err());
    }
}
