use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use time::Date;

/// A dotted content version such as `3.9.12`.
///
/// Components are compared as integers, with missing trailing components
/// treated as zero, so `3.9` and `3.9.0` are the same version and `3.10.0`
/// is newer than `3.9.99`. See the [`Ord`] implementation.
#[derive(Debug, Clone)]
pub struct ContentVersion {
    components: Vec<u64>,
}
impl ContentVersion {
    pub fn new(components: impl Into<Vec<u64>>) -> Self {
        Self {
            components: components.into(),
        }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Component at `position`, padding with zero past the end.
    pub fn component(&self, position: usize) -> u64 {
        self.components.get(position).copied().unwrap_or(0)
    }
}
impl FromStr for ContentVersion {
    type Err = Infallible;
    /// Never fails: components that are not numbers count as zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.trim().split('.').map(crate::tabular::number::<u64>).collect::<Vec<_>>()))
    }
}
impl From<&str> for ContentVersion {
    fn from(value: &str) -> Self {
        let Ok(version) = value.parse();
        version
    }
}
impl Display for ContentVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let parts: Vec<String> = self.components.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// A published release, as announced in the changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: ContentVersion,
    pub date: Date,
}
