use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Which item table a [`BaseItem`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Misc,
}
impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Misc => "misc",
        }
    }
}
impl FromStr for ItemCategory {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "weapon" | "weapons" => Self::Weapon,
            "armor" | "armour" => Self::Armor,
            "misc" => Self::Misc,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "item category",
                value: s.to_string(),
            }),
        })
    }
}
impl Display for ItemCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A base item from `weapons.txt`, `armor.txt` or `misc.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseItem {
    pub code: String,
    pub name: String,
    pub category: ItemCategory,
    /// Primary item type code.
    pub item_type: String,
    /// Secondary item type code, often empty.
    pub item_type2: String,
    pub level: u32,
    pub level_req: u32,
}

/// An item type (`itemtypes.txt`); the hierarchy is expressed through
/// `equivalents` (parent type codes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemType {
    pub code: String,
    pub name: String,
    pub equivalents: Vec<String>,
    /// Class restriction code, empty when anyone can use it.
    pub class: String,
}
