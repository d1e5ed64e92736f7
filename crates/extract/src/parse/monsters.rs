use super::is_marker;
use crate::models::Monster;
use crate::tabular::Table;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

/// Monsters that have both a numeric index and a name.
///
/// The index is coerced with the usual "parse or zero" rule; anything that
/// doesn't end up positive is unusable as a key and the row is dropped.
/// Uniqueness is on the coerced index, so `1` and `01` collide.
#[instrument(level = "debug", skip_all)]
pub fn monsters(table: &Table<'_>) -> Vec<Monster> {
    let mut seen = HashSet::new();
    table
        .rows()
        .filter_map(|row| {
            let name = row.text("NameStr")?;
            let index = u32::try_from(row.number::<i64>("hcIdx")).ok().filter(|index| *index > 0)?;
            if is_marker(name) || !seen.insert(index) {
                return None;
            }
            Some(Monster {
                index,
                id: row.get("Id").trim().to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

/// Index -> name lookup for resolving monster parameters.
pub fn monster_names(monsters: &[Monster]) -> HashMap<u32, String> {
    let mut names = HashMap::with_capacity(monsters.len());
    for monster in monsters {
        names.entry(monster.index).or_insert_with(|| monster.name.clone());
    }
    names
}
