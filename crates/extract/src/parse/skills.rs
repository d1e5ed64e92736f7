use super::{first_seen, is_marker};
use crate::models::{CharClass, Skill};
use crate::tabular::Table;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::instrument;

/// Skills and their owning class. Class codes outside the playable
/// whitelist leave the skill without a class.
#[instrument(level = "debug", skip_all)]
pub fn skills(table: &Table<'_>) -> Vec<Skill> {
    let mut seen = HashSet::new();
    table
        .rows()
        .filter_map(|row| {
            let name = row.text("skill")?;
            if is_marker(name) || !first_seen(&mut seen, name) {
                return None;
            }
            Some(Skill {
                name: name.to_string(),
                class: CharClass::from_code(row.get("charclass")),
            })
        })
        .collect()
}

/// Skill name -> class lookup.
pub fn skill_classes(skills: &[Skill]) -> HashMap<String, CharClass> {
    skills.iter().map(|skill| (skill.name.clone(), skill.class)).collect()
}

/// Class code -> display name, including the empty "no class" entry.
pub fn class_names() -> BTreeMap<&'static str, &'static str> {
    CharClass::ALL.iter().map(|class| (class.code(), class.name())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_and_classes() {
        let table = Table::parse(
            "skill\t*Id\tcharclass\n\
             Attack\t0\t\n\
             Expansion\t\t\n\
             Magic Arrow\t6\tama\n\
             Teleport\t54\tsor\n\
             Monster Thing\t300\tmon\n\
             \t301\tnec\n",
        );
        let parsed = skills(&table);
        let names: Vec<_> = parsed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Attack", "Magic Arrow", "Teleport", "Monster Thing"]);
        let classes = skill_classes(&parsed);
        assert_eq!(classes["Teleport"], CharClass::Sorceress);
        assert_eq!(classes["Monster Thing"], CharClass::None);
        assert_eq!(classes["Attack"], CharClass::None);
    }

    #[test]
    fn test_class_names() {
        let names = class_names();
        assert_eq!(names.len(), 8);
        assert_eq!(names["ass"], "Assassin");
        assert_eq!(names[""], "");
    }
}
