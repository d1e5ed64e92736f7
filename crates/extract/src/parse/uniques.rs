use super::{Lookups, Slot, is_marker, read_slots};
use crate::models::UniqueItem;
use crate::tabular::Table;
use std::collections::BTreeSet;
use tracing::instrument;

/// Unique items, flagged when a cube coupon can produce them.
///
/// The id is the ordinal among real rows (those with an `index`), counted
/// before disabled rows are dropped so that it stays stable.
#[instrument(level = "debug", skip_all)]
pub fn uniques(table: &Table<'_>, lookups: &Lookups, coupons: &BTreeSet<String>) -> Vec<UniqueItem> {
    let slots: Vec<Slot> = (1..=12)
        .map(|n| Slot::new(format!("prop{n}"), format!("par{n}"), format!("min{n}"), format!("max{n}")))
        .collect();
    let has_enabled = table.has_column("enabled");
    let mut ordinal = 0;
    let mut items = Vec::new();
    for row in table.rows() {
        let Some(name) = row.text("index") else {
            continue;
        };
        if is_marker(name) {
            continue;
        }
        let id = ordinal;
        ordinal += 1;
        let Some(code) = row.text("code") else {
            continue;
        };
        if has_enabled && !row.flag("enabled") {
            continue;
        }
        items.push(UniqueItem {
            id,
            name: name.to_string(),
            code: code.to_string(),
            base_name: lookups.base_name(code).to_string(),
            level: row.number("lvl"),
            level_req: row.number("lvl req"),
            modifiers: read_slots(&row, &slots, lookups),
            coupon: coupons.contains(name),
        });
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "index\tenabled\tcode\tlvl\tlvl req\tprop1\tpar1\tmin1\tmax1\tprop2\tpar2\tmin2\tmax2\n\
        The Gnasher\t1\thax\t7\t5\tdmg%\t\t60\t70\tcrush\t\t20\t20\n\
        Expansion\n\
        Disabled\t0\taxe\t1\t1\n\
        The Grandfather\t1\t7gd\t90\t81\tstr\t\t20\t20\n\
        \t1\tnocode\n";

    #[test]
    fn test_uniques() {
        let table = Table::parse(TABLE);
        let mut lookups = Lookups::default();
        lookups.base_names.insert("hax".to_string(), "Hand Axe".to_string());
        let coupons = BTreeSet::from(["The Grandfather".to_string()]);
        let items = uniques(&table, &lookups, &coupons);
        assert_eq!(items.len(), 2);
        let gnasher = &items[0];
        assert_eq!(gnasher.id, 0);
        assert_eq!(gnasher.base_name, "Hand Axe");
        assert_eq!(gnasher.modifiers.len(), 2);
        assert!(gnasher.modifiers[0].is_ranged());
        assert!(!gnasher.coupon);
        let grandfather = &items[1];
        assert_eq!(grandfather.id, 2);
        assert_eq!(grandfather.base_name, "");
        assert_eq!(grandfather.level_req, 81);
        assert!(grandfather.coupon);
    }

    #[test]
    fn test_without_enabled_column() {
        let table = Table::parse("index\tcode\nShako\tuap\n");
        let items = uniques(&table, &Lookups::default(), &BTreeSet::new());
        assert_eq!(items.len(), 1);
    }
}
