use super::{first_seen, is_marker, present};
use crate::models::PropertyDefinition;
use crate::tabular::Table;
use std::collections::HashSet;
use tracing::instrument;

#[instrument(level = "debug", skip_all)]
pub fn properties(table: &Table<'_>) -> Vec<PropertyDefinition> {
    let mut seen = HashSet::new();
    table
        .rows()
        .filter_map(|row| {
            let code = row.text("code")?;
            if is_marker(code) || !first_seen(&mut seen, code) {
                return None;
            }
            Some(PropertyDefinition {
                code: code.to_string(),
                stats: present(&row, (1..=7).map(|n| format!("stat{n}"))),
                description: row.first_of(&["*Tooltip", "*desc"]).unwrap_or_default().to_string(),
            })
        })
        .collect()
}
