//! Domain parsers: one per source table.
//!
//! Every parser is a pure function from a [`Table`](crate::Table) (or the
//! markup of a reference page) to typed records. Malformed rows are dropped,
//! never reported; structural problems are checked once by the catalog
//! builder before any parser runs.

mod cube;
mod items;
mod monsters;
mod properties;
mod reference;
mod runewords;
mod sets;
mod skills;
mod socketables;
mod uniques;

pub use self::cube::coupon_uniques;
pub(crate) use self::items::base_names;
pub use self::items::{base_items, item_types};
pub use self::monsters::{monster_names, monsters};
pub use self::properties::properties;
pub use self::reference::{gem_effects, runeword_effects};
pub use self::runewords::runewords;
pub use self::sets::{item_sets, set_items};
pub use self::skills::{class_names, skill_classes, skills};
pub(crate) use self::socketables::socketable_names;
pub use self::socketables::socketables;
pub use self::uniques::uniques;

use crate::consts;
use crate::models::{CharClass, Modifier};
use crate::tabular::Row;
use std::collections::{HashMap, HashSet};

/// Properties whose parameter is a monster index.
const MONSTER_PARAMS: &[&str] = &["reanimate"];
/// Properties whose parameter names a skill.
const SKILL_PARAMS: &[&str] = &[
    "skill",
    "oskill",
    "aura",
    "charged",
    "hit-skill",
    "gethit-skill",
    "att-skill",
    "kill-skill",
    "death-skill",
    "levelup-skill",
];

/// Key-based cross references between tables, rebuilt from scratch for every
/// catalog. A miss always resolves to an empty value.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub monster_names: HashMap<u32, String>,
    pub skill_classes: HashMap<String, CharClass>,
    pub base_names: HashMap<String, String>,
    pub socketable_names: HashMap<String, String>,
}
impl Lookups {
    pub fn monster_name(&self, index: u32) -> &str {
        self.monster_names.get(&index).map(String::as_str).unwrap_or_default()
    }

    pub fn skill_class(&self, skill: &str) -> CharClass {
        self.skill_classes.get(skill).copied().unwrap_or_default()
    }

    pub fn base_name(&self, code: &str) -> &str {
        self.base_names.get(code).map(String::as_str).unwrap_or_default()
    }

    pub fn socketable_name(&self, code: &str) -> &str {
        self.socketable_names.get(code).map(String::as_str).unwrap_or_default()
    }

    fn detail(&self, code: &str, param: &str) -> String {
        if MONSTER_PARAMS.contains(&code) {
            let index = crate::tabular::number::<u32>(param);
            return self.monster_name(index).to_string();
        }
        if SKILL_PARAMS.contains(&code) {
            return self.skill_class(param).name().to_string();
        }
        String::new()
    }
}

/// Column names of one modifier slot.
struct Slot {
    code: String,
    param: String,
    min: String,
    max: String,
}
impl Slot {
    fn new(code: String, param: String, min: String, max: String) -> Self {
        Self { code, param, min, max }
    }

    fn read(&self, row: &Row<'_>, lookups: &Lookups) -> Option<Modifier> {
        let code = row.text(&self.code)?;
        let param = row.get(&self.param).trim();
        Some(Modifier {
            code: code.to_string(),
            param: param.to_string(),
            min: row.number(&self.min),
            max: row.number(&self.max),
            detail: lookups.detail(code, param),
        })
    }
}

fn read_slots(row: &Row<'_>, slots: &[Slot], lookups: &Lookups) -> Vec<Modifier> {
    slots.iter().filter_map(|slot| slot.read(row, lookups)).collect()
}

/// Section marker rows carry no data.
fn is_marker(key: &str) -> bool {
    key == consts::SECTION_MARKER
}

/// Returns `true` the first time a key is seen; later rows with the same
/// natural key are dropped.
fn first_seen(seen: &mut HashSet<String>, key: &str) -> bool {
    seen.insert(key.to_string())
}

/// Normalised name used to join reference pages onto table records.
pub(crate) fn reference_key(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}

/// Columns that are present and non-blank, in order.
fn present(row: &Row<'_>, columns: impl IntoIterator<Item = String>) -> Vec<String> {
    columns.into_iter().filter_map(|column| row.text(&column).map(str::to_string)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::Table;

    #[test]
    fn test_slot_reads_modifier_with_detail() {
        let table = Table::parse("prop1\tpar1\tmin1\tmax1\nreanimate\t4\t10\t10\n");
        let row = table.rows().next().unwrap();
        let mut lookups = Lookups::default();
        lookups.monster_names.insert(4, "Zombie".to_string());
        let slot = Slot::new("prop1".into(), "par1".into(), "min1".into(), "max1".into());
        let modifier = slot.read(&row, &lookups).unwrap();
        assert_eq!(modifier.code, "reanimate");
        assert_eq!(modifier.min, 10);
        assert_eq!(modifier.detail, "Zombie");
    }

    #[test]
    fn test_unresolved_detail_is_empty() {
        let lookups = Lookups::default();
        assert_eq!(lookups.detail("reanimate", "999"), "");
        assert_eq!(lookups.detail("oskill", "Nope"), "");
        assert_eq!(lookups.detail("str", "anything"), "");
    }

    #[test]
    fn test_reference_key() {
        assert_eq!(reference_key("Heart of the Oak"), reference_key("heart-of-the-oak"));
        assert_eq!(reference_key("Tal Rasha's"), "talrashas");
    }
}
