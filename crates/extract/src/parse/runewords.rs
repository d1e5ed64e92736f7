use super::{Lookups, Slot, first_seen, is_marker, present, read_slots, reference_key};
use crate::models::Runeword;
use crate::tabular::Table;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

const NAME_COLUMNS: &[&str] = &["*Rune Name", "Rune Name"];

/// Complete runewords with at least one rune.
#[instrument(level = "debug", skip_all)]
pub fn runewords(table: &Table<'_>, lookups: &Lookups, effects: &HashMap<String, Vec<String>>) -> Vec<Runeword> {
    let slots: Vec<Slot> = (1..=7)
        .map(|n| Slot::new(format!("T1Code{n}"), format!("T1Param{n}"), format!("T1Min{n}"), format!("T1Max{n}")))
        .collect();
    let mut seen = HashSet::new();
    table
        .rows()
        .filter_map(|row| {
            let key = row.text("Name")?;
            let name = row.first_of(NAME_COLUMNS)?;
            if is_marker(key) || !row.flag("complete") {
                return None;
            }
            let runes = present(&row, (1..=6).map(|n| format!("Rune{n}")));
            if runes.is_empty() || !first_seen(&mut seen, key) {
                return None;
            }
            Some(Runeword {
                key: key.to_string(),
                name: name.to_string(),
                item_types: present(&row, (1..=6).map(|n| format!("itype{n}"))),
                excluded_types: present(&row, (1..=3).map(|n| format!("etype{n}"))),
                rune_names: runes.iter().map(|code| lookups.socketable_name(code).to_string()).collect(),
                runes,
                modifiers: read_slots(&row, &slots, lookups),
                effects: effects.get(&reference_key(name)).cloned().unwrap_or_default(),
            })
        })
        .collect()
}
