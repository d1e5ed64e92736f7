use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::{Modifier, sanitize};
use crate::error::{Error, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketableKind {
    Gem,
    Rune,
    Jewel,
}
impl SocketableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gem => "gem",
            Self::Rune => "rune",
            Self::Jewel => "jewel",
        }
    }
}
impl FromStr for SocketableKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "gem" => Self::Gem,
            "rune" => Self::Rune,
            "jewel" => Self::Jewel,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "socketable kind",
                value: s.to_string(),
            }),
        })
    }
}
impl Display for SocketableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Human-readable effect text for a socketable, scraped from the gems
/// reference page. Every field is empty when the page had no matching row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocketEffects {
    pub weapon: Vec<String>,
    pub helm: Vec<String>,
    pub shield: Vec<String>,
}
impl SocketEffects {
    pub fn is_empty(&self) -> bool {
        self.weapon.is_empty() && self.helm.is_empty() && self.shield.is_empty()
    }
}

/// A gem, rune or jewel that can be placed in a socket (`gems.txt`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Socketable {
    pub code: String,
    pub name: String,
    /// Rune letter(s); empty for gems.
    pub letter: String,
    pub kind: SocketableKind,
    pub weapon: Vec<Modifier>,
    pub helm: Vec<Modifier>,
    pub shield: Vec<Modifier>,
    pub effects: SocketEffects,
}
