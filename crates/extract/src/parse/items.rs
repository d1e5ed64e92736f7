use super::{first_seen, is_marker, present};
use crate::models::{BaseItem, ItemCategory, ItemType};
use crate::tabular::Table;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

/// Base items of one category (`weapons.txt`, `armor.txt` or `misc.txt`).
#[instrument(level = "debug", skip(table))]
pub fn base_items(table: &Table<'_>, category: ItemCategory) -> Vec<BaseItem> {
    let mut seen = HashSet::new();
    table
        .rows()
        .filter_map(|row| {
            let name = row.text("name")?;
            let code = row.text("code")?;
            if is_marker(name) || !first_seen(&mut seen, code) {
                return None;
            }
            Some(BaseItem {
                code: code.to_string(),
                name: name.to_string(),
                category,
                item_type: row.get("type").trim().to_string(),
                item_type2: row.get("type2").trim().to_string(),
                level: row.number("level"),
                level_req: row.number("levelreq"),
            })
        })
        .collect()
}

/// Item code -> base item name, over every category.
pub(crate) fn base_names<'a>(items: impl IntoIterator<Item = &'a BaseItem>) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for item in items {
        names.entry(item.code.clone()).or_insert_with(|| item.name.clone());
    }
    names
}

#[instrument(level = "debug", skip_all)]
pub fn item_types(table: &Table<'_>) -> Vec<ItemType> {
    let mut seen = HashSet::new();
    table
        .rows()
        .filter_map(|row| {
            let code = row.text("Code")?;
            let name = row.get("ItemType").trim();
            if is_marker(name) || is_marker(code) || !first_seen(&mut seen, code) {
                return None;
            }
            Some(ItemType {
                code: code.to_string(),
                name: name.to_string(),
                equivalents: present(&row, ["Equiv1".to_string(), "Equiv2".to_string()]),
                class: row.get("Class").trim().to_string(),
            })
        })
        .collect()
}
