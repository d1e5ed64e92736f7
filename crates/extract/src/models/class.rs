use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::sanitize;
use crate::error::{Error, ErrorKind};
use exn::OptionExt;

/// Playable character class a skill belongs to.
///
/// Anything outside the seven playable classes (monster skills, item-only
/// skills, typos in the source table) collapses to [`None`](Self::None).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CharClass {
    #[default]
    None,
    Amazon,
    Sorceress,
    Necromancer,
    Paladin,
    Barbarian,
    Druid,
    Assassin,
}
impl CharClass {
    pub const ALL: [CharClass; 8] = [
        CharClass::None,
        CharClass::Amazon,
        CharClass::Sorceress,
        CharClass::Necromancer,
        CharClass::Paladin,
        CharClass::Barbarian,
        CharClass::Druid,
        CharClass::Assassin,
    ];

    /// Map a `charclass` code through the whitelist; unknown codes are
    /// [`None`](Self::None).
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "ama" => Self::Amazon,
            "sor" => Self::Sorceress,
            "nec" => Self::Necromancer,
            "pal" => Self::Paladin,
            "bar" => Self::Barbarian,
            "dru" => Self::Druid,
            "ass" => Self::Assassin,
            _ => Self::None,
        }
    }

    /// Three-letter code used by the source tables (empty for no class).
    pub fn code(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Amazon => "ama",
            Self::Sorceress => "sor",
            Self::Necromancer => "nec",
            Self::Paladin => "pal",
            Self::Barbarian => "bar",
            Self::Druid => "dru",
            Self::Assassin => "ass",
        }
    }

    /// Display name (empty for no class).
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Amazon => "Amazon",
            Self::Sorceress => "Sorceress",
            Self::Necromancer => "Necromancer",
            Self::Paladin => "Paladin",
            Self::Barbarian => "Barbarian",
            Self::Druid => "Druid",
            Self::Assassin => "Assassin",
        }
    }

    pub fn is_playable(&self) -> bool {
        !matches!(self, Self::None)
    }
}
impl FromStr for CharClass {
    type Err = Error;
    /// Accepts either the table code or the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = sanitize(s);
        if sanitized.is_empty() || sanitized == "none" {
            return Ok(Self::None);
        }
        Self::ALL
            .into_iter()
            .find(|class| class.is_playable() && (class.code() == sanitized || sanitize(class.name()) == sanitized))
            .ok_or_raise(|| ErrorKind::ParseError {
                field: "class",
                value: s.to_string(),
            })
    }
}
impl Display for CharClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}
