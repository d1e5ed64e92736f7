//! Structured version comparison.

use crate::models::ContentVersion;
use std::cmp::Ordering;

impl Ord for ContentVersion {
    /// Component-wise integer comparison, padding the shorter version with
    /// zeroes. Never lexicographic: `3.10.0 > 3.9.99`.
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.components().len().max(other.components().len());
        for position in 0..width {
            let ordering = self.component(position).cmp(&other.component(position));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
impl PartialOrd for ContentVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
// Equality must agree with the padded ordering, so it can't be derived.
impl PartialEq for ContentVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for ContentVersion {}

/// Compare two version strings structurally.
pub fn compare(a: &str, b: &str) -> Ordering {
    ContentVersion::from(a).cmp(&ContentVersion::from(b))
}

/// Whether the stored version differs from the remote one.
///
/// A missing stored version always counts as different, which is what forces
/// the very first sync.
pub fn needs_update(stored: Option<&str>, remote: &str) -> bool {
    match stored {
        None => true,
        Some(stored) => compare(stored, remote) != Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3.9.9", "3.9.10", Ordering::Less)]
    #[case("3.9", "3.9.0", Ordering::Equal)]
    #[case("3.9.0", "3.9", Ordering::Equal)]
    #[case("3.10.0", "3.9.99", Ordering::Greater)]
    #[case("4", "3.99.99", Ordering::Greater)]
    #[case("3.9.1", "3.9.1", Ordering::Equal)]
    #[case("3.9.x", "3.9.0", Ordering::Equal)]
    #[case(" 3.9.2 ", "3.9.2", Ordering::Equal)]
    fn test_compare(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare(a, b), expected);
        assert_eq!(compare(b, a), expected.reverse());
    }

    #[rstest]
    #[case(None, "3.9.0", true)]
    #[case(None, "", true)]
    #[case(Some("3.9"), "3.9.0", false)]
    #[case(Some("3.9.1"), "3.9.2", true)]
    #[case(Some("3.9.3"), "3.9.2", true)]
    fn test_needs_update(#[case] stored: Option<&str>, #[case] remote: &str, #[case] expected: bool) {
        assert_eq!(needs_update(stored, remote), expected);
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(ContentVersion::from("3.9.12").to_string(), "3.9.12");
    }
}
