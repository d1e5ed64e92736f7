use crate::error::{Error, ErrorKind};
use crate::models::facet::{
    effects_from_json, effects_to_json, modifiers_from_json, modifiers_to_json, strings_from_json, strings_to_json,
};
use exn::ResultExt;
use horadric_extract::models::{Runeword, Socketable, SocketableKind};

#[derive(sqlx::FromRow)]
pub(crate) struct SocketableRow {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) letter: String,
    pub(crate) kind: String,
    pub(crate) weapon: String,
    pub(crate) helm: String,
    pub(crate) shield: String,
    pub(crate) effects: String,
}
impl TryFrom<&Socketable> for SocketableRow {
    type Error = Error;
    fn try_from(socketable: &Socketable) -> Result<Self, Self::Error> {
        Ok(Self {
            code: socketable.code.clone(),
            name: socketable.name.clone(),
            letter: socketable.letter.clone(),
            kind: socketable.kind.as_str().to_string(),
            weapon: modifiers_to_json(&socketable.weapon, "weapon modifiers")?,
            helm: modifiers_to_json(&socketable.helm, "helm modifiers")?,
            shield: modifiers_to_json(&socketable.shield, "shield modifiers")?,
            effects: effects_to_json(&socketable.effects)?,
        })
    }
}
impl TryFrom<SocketableRow> for Socketable {
    type Error = Error;
    fn try_from(row: SocketableRow) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: row
                .kind
                .parse::<SocketableKind>()
                .or_raise(|| ErrorKind::InvalidData("socketable kind"))?,
            weapon: modifiers_from_json(&row.weapon, "weapon modifiers")?,
            helm: modifiers_from_json(&row.helm, "helm modifiers")?,
            shield: modifiers_from_json(&row.shield, "shield modifiers")?,
            effects: effects_from_json(&row.effects)?,
            code: row.code,
            name: row.name,
            letter: row.letter,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RunewordRow {
    pub(crate) internal_name: String,
    pub(crate) name: String,
    pub(crate) item_types: String,
    pub(crate) excluded_types: String,
    pub(crate) runes: String,
    pub(crate) rune_names: String,
    pub(crate) modifiers: String,
    pub(crate) effects: String,
}
impl TryFrom<&Runeword> for RunewordRow {
    type Error = Error;
    fn try_from(runeword: &Runeword) -> Result<Self, Self::Error> {
        Ok(Self {
            internal_name: runeword.key.clone(),
            name: runeword.name.clone(),
            item_types: strings_to_json(&runeword.item_types, "item types")?,
            excluded_types: strings_to_json(&runeword.excluded_types, "excluded types")?,
            runes: strings_to_json(&runeword.runes, "runes")?,
            rune_names: strings_to_json(&runeword.rune_names, "rune names")?,
            modifiers: modifiers_to_json(&runeword.modifiers, "runeword modifiers")?,
            effects: strings_to_json(&runeword.effects, "runeword effects")?,
        })
    }
}
impl TryFrom<RunewordRow> for Runeword {
    type Error = Error;
    fn try_from(row: RunewordRow) -> Result<Self, Self::Error> {
        Ok(Self {
            item_types: strings_from_json(&row.item_types, "item types")?,
            excluded_types: strings_from_json(&row.excluded_types, "excluded types")?,
            runes: strings_from_json(&row.runes, "runes")?,
            rune_names: strings_from_json(&row.rune_names, "rune names")?,
            modifiers: modifiers_from_json(&row.modifiers, "runeword modifiers")?,
            effects: strings_from_json(&row.effects, "runeword effects")?,
            key: row.internal_name,
            name: row.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horadric_extract::models::{Modifier, SocketEffects};

    #[test]
    fn test_socketable_row_round_trip() {
        let socketable = Socketable {
            code: "r01".to_string(),
            name: "El Rune".to_string(),
            letter: "El".to_string(),
            kind: SocketableKind::Rune,
            weapon: vec![Modifier {
                code: "light".to_string(),
                param: String::new(),
                min: 1,
                max: 1,
                detail: String::new(),
            }],
            helm: vec![],
            shield: vec![],
            effects: SocketEffects {
                weapon: vec!["+1 Light Radius".to_string()],
                ..Default::default()
            },
        };
        let row = SocketableRow::try_from(&socketable).unwrap();
        assert_eq!(row.kind, "rune");
        assert_eq!(row.helm, "[]");
        assert_eq!(Socketable::try_from(row).unwrap(), socketable);
    }

    #[test]
    fn test_runeword_row_keeps_order() {
        let row = RunewordRow {
            internal_name: "Runeword1".to_string(),
            name: "Spirit".to_string(),
            item_types: r#"["swor","shld"]"#.to_string(),
            excluded_types: "[]".to_string(),
            runes: r#"["r07","r10","r09","r11"]"#.to_string(),
            rune_names: r#"["Tal Rune","Thul Rune","Ort Rune","Amn Rune"]"#.to_string(),
            modifiers: "[]".to_string(),
            effects: "[]".to_string(),
        };
        let runeword = Runeword::try_from(row).unwrap();
        assert_eq!(runeword.runes, vec!["r07", "r10", "r09", "r11"]);
        assert_eq!(runeword.sockets(), 4);
    }
}
