use super::{Lookups, Slot, first_seen, is_marker, read_slots, reference_key};
use crate::models::{SocketEffects, Socketable, SocketableKind};
use crate::tabular::Table;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

const JEWEL_CODE: &str = "jew";

fn slots(prefix: &str) -> Vec<Slot> {
    (1..=3)
        .map(|n| {
            Slot::new(
                format!("{prefix}Mod{n}Code"),
                format!("{prefix}Mod{n}Param"),
                format!("{prefix}Mod{n}Min"),
                format!("{prefix}Mod{n}Max"),
            )
        })
        .collect()
}

/// Gems, runes and jewels, joined with their reference page effects by name.
#[instrument(level = "debug", skip_all)]
pub fn socketables(
    table: &Table<'_>,
    lookups: &Lookups,
    effects: &HashMap<String, SocketEffects>,
) -> Vec<Socketable> {
    let (weapon, helm, shield) = (slots("weapon"), slots("helm"), slots("shield"));
    let mut seen = HashSet::new();
    table
        .rows()
        .filter_map(|row| {
            let name = row.text("name")?;
            let code = row.text("code")?;
            if is_marker(name) || !first_seen(&mut seen, code) {
                return None;
            }
            let letter = row.get("letter").trim();
            let kind = match (letter.is_empty(), code == JEWEL_CODE) {
                (_, true) => SocketableKind::Jewel,
                (false, false) => SocketableKind::Rune,
                (true, false) => SocketableKind::Gem,
            };
            Some(Socketable {
                code: code.to_string(),
                name: name.to_string(),
                letter: letter.to_string(),
                kind,
                weapon: read_slots(&row, &weapon, lookups),
                helm: read_slots(&row, &helm, lookups),
                shield: read_slots(&row, &shield, lookups),
                effects: effects.get(&reference_key(name)).cloned().unwrap_or_default(),
            })
        })
        .collect()
}

/// Item code -> display name lookup, used to spell out runeword recipes.
pub(crate) fn socketable_names(socketables: &[Socketable]) -> HashMap<String, String> {
    socketables.iter().map(|s| (s.code.clone(), s.name.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "name\tletter\tcode\tweaponMod1Code\tweaponMod1Param\tweaponMod1Min\tweaponMod1Max\thelmMod1Code\thelmMod1Min\thelmMod1Max\n\
        Chipped Ruby\t\tgcr\tdmg-fire\t\t3\t4\thp\t10\t10\n\
        El Rune\tEl\tr01\tlight\t\t1\t1\tac\t15\t15\n\
        Jewel\t\tjew\n\
        Expansion\n\
        Nameless\t\t\n";

    #[test]
    fn test_socketables() {
        let table = Table::parse(TABLE);
        let mut effects = HashMap::new();
        effects.insert(
            reference_key("El Rune"),
            SocketEffects {
                weapon: vec!["+1 Light Radius".to_string()],
                ..Default::default()
            },
        );
        let parsed = socketables(&table, &Lookups::default(), &effects);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].kind, SocketableKind::Gem);
        assert_eq!(parsed[0].weapon[0].min, 3);
        assert_eq!(parsed[0].helm[0].code, "hp");
        assert!(parsed[0].effects.is_empty());
        assert_eq!(parsed[1].kind, SocketableKind::Rune);
        assert_eq!(parsed[1].effects.weapon, vec!["+1 Light Radius"]);
        assert_eq!(parsed[2].kind, SocketableKind::Jewel);
        assert!(parsed[2].shield.is_empty());
        assert_eq!(socketable_names(&parsed)["r01"], "El Rune");
    }
}
