use super::{Lookups, Slot, first_seen, is_marker, read_slots};
use crate::models::{ItemSet, SetItem};
use crate::tabular::Table;
use std::collections::HashSet;
use tracing::instrument;

fn partial_slots() -> Vec<Slot> {
    (2..=5)
        .flat_map(|n| ['a', 'b'].map(|half| format!("{n}{half}")))
        .map(|s| Slot::new(format!("PCode{s}"), format!("PParam{s}"), format!("PMin{s}"), format!("PMax{s}")))
        .collect()
}

fn full_slots() -> Vec<Slot> {
    (1..=8)
        .map(|n| Slot::new(format!("FCode{n}"), format!("FParam{n}"), format!("FMin{n}"), format!("FMax{n}")))
        .collect()
}

#[instrument(level = "debug", skip_all)]
pub fn item_sets(table: &Table<'_>, lookups: &Lookups) -> Vec<ItemSet> {
    let (partial, full) = (partial_slots(), full_slots());
    let mut seen = HashSet::new();
    table
        .rows()
        .filter_map(|row| {
            let key = row.text("index")?;
            if is_marker(key) || !first_seen(&mut seen, key) {
                return None;
            }
            Some(ItemSet {
                key: key.to_string(),
                name: row.text("name").unwrap_or(key).to_string(),
                partial: read_slots(&row, &partial, lookups),
                full: read_slots(&row, &full, lookups),
            })
        })
        .collect()
}

#[instrument(level = "debug", skip_all)]
pub fn set_items(table: &Table<'_>, lookups: &Lookups) -> Vec<SetItem> {
    let modifiers: Vec<Slot> = (1..=9)
        .map(|n| Slot::new(format!("prop{n}"), format!("par{n}"), format!("min{n}"), format!("max{n}")))
        .collect();
    let bonuses: Vec<Slot> = (1..=5)
        .flat_map(|n| ['a', 'b'].map(|half| format!("{n}{half}")))
        .map(|s| Slot::new(format!("aprop{s}"), format!("apar{s}"), format!("amin{s}"), format!("amax{s}")))
        .collect();
    let mut seen = HashSet::new();
    table
        .rows()
        .filter_map(|row| {
            let name = row.text("index")?;
            let set = row.text("set")?;
            if is_marker(name) || !first_seen(&mut seen, name) {
                return None;
            }
            let code = row.get("item").trim();
            Some(SetItem {
                name: name.to_string(),
                set: set.to_string(),
                code: code.to_string(),
                base_name: lookups.base_name(code).to_string(),
                level: row.number("lvl"),
                level_req: row.number("lvl req"),
                modifiers: read_slots(&row, &modifiers, lookups),
                set_bonuses: read_slots(&row, &bonuses, lookups),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_sets() {
        let table = Table::parse(
            "index\tname\tPCode2a\tPMin2a\tPMax2a\tPCode3b\tPMin3b\tPMax3b\tFCode1\tFMin1\tFMax1\n\
             Tal Rasha's Wrappings\tTal Rasha's Wrappings\tmana\t10\t10\tres-all\t15\t15\tall-stats\t15\t15\n\
             Expansion\n\
             Empty Set\n",
        );
        let sets = item_sets(&table, &Lookups::default());
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].partial.len(), 2);
        assert_eq!(sets[0].partial[1].code, "res-all");
        assert_eq!(sets[0].full[0].min, 15);
        assert_eq!(sets[1].name, "Empty Set");
        assert!(sets[1].full.is_empty());
    }

    #[test]
    fn test_set_items() {
        let table = Table::parse(
            "index\tset\titem\tlvl\tlvl req\tprop1\tpar1\tmin1\tmax1\taprop1a\tamin1a\tamax1a\n\
             Tal Rasha's Horadric Crest\tTal Rasha's Wrappings\txsk\t66\t66\tmana\t\t60\t60\tres-all\t15\t15\n\
             Orphan\t\txsk\n",
        );
        let mut lookups = Lookups::default();
        lookups.base_names.insert("xsk".to_string(), "Death Mask".to_string());
        let items = set_items(&table, &lookups);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].base_name, "Death Mask");
        assert_eq!(items[0].set_bonuses[0].code, "res-all");
        assert_eq!(items[0].modifiers[0].max, 60);
    }
}
