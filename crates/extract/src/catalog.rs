//! One complete, cross-referenced set of records built from a single round
//! of fetched sources.

use crate::error::{ErrorKind, Result};
use crate::models::{
    BaseItem, ItemCategory, ItemSet, ItemType, Monster, PropertyDefinition, Runeword, SetItem, Skill, Socketable,
    UniqueItem,
};
use crate::parse::{self, Lookups};
use crate::tabular::Table;
use exn::OptionExt;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::instrument;

/// The TXT tables a catalog is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceTable {
    Properties,
    Gems,
    Runes,
    UniqueItems,
    Sets,
    SetItems,
    Weapons,
    Armor,
    Misc,
    ItemTypes,
    CubeMain,
    MonStats,
    Skills,
}
impl SourceTable {
    /// Every table, in the fixed order used for fetching and fingerprinting.
    pub const ALL: [SourceTable; 13] = [
        SourceTable::Properties,
        SourceTable::Gems,
        SourceTable::Runes,
        SourceTable::UniqueItems,
        SourceTable::Sets,
        SourceTable::SetItems,
        SourceTable::Weapons,
        SourceTable::Armor,
        SourceTable::Misc,
        SourceTable::ItemTypes,
        SourceTable::CubeMain,
        SourceTable::MonStats,
        SourceTable::Skills,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Properties => "properties.txt",
            Self::Gems => "gems.txt",
            Self::Runes => "runes.txt",
            Self::UniqueItems => "uniqueitems.txt",
            Self::Sets => "sets.txt",
            Self::SetItems => "setitems.txt",
            Self::Weapons => "weapons.txt",
            Self::Armor => "armor.txt",
            Self::Misc => "misc.txt",
            Self::ItemTypes => "itemtypes.txt",
            Self::CubeMain => "cubemain.txt",
            Self::MonStats => "monstats.txt",
            Self::Skills => "skills.txt",
        }
    }

    /// Columns without which no row of the table is usable.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Properties => &["code"],
            Self::Gems => &["name", "code"],
            Self::Runes => &["Name", "complete"],
            Self::UniqueItems => &["index", "code"],
            Self::Sets => &["index"],
            Self::SetItems => &["index", "set"],
            Self::Weapons | Self::Armor | Self::Misc => &["name", "code"],
            Self::ItemTypes => &["Code"],
            Self::CubeMain => &["description", "output"],
            Self::MonStats => &["hcIdx", "NameStr"],
            Self::Skills => &["skill"],
        }
    }
}
impl Display for SourceTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.file_name())
    }
}

/// Raw text of every fetched source.
///
/// A sync round always fetches both reference pages and fails without them.
/// Building from inputs that lack a page is still allowed: the affected
/// records then carry no effect text.
#[derive(Debug, Clone, Default)]
pub struct CatalogInputs {
    pub tables: HashMap<SourceTable, String>,
    pub gems_page: Option<String>,
    pub runewords_page: Option<String>,
}
impl CatalogInputs {
    pub fn with_table(mut self, table: SourceTable, text: impl Into<String>) -> Self {
        self.tables.insert(table, text.into());
        self
    }

    fn table(&self, table: SourceTable) -> Result<Table<'_>> {
        let text = self
            .tables
            .get(&table)
            .ok_or_raise(|| ErrorKind::MissingTable(table.file_name()))?;
        let parsed = Table::parse(text);
        parsed.require(table.file_name(), table.required_columns())?;
        Ok(parsed)
    }
}

/// Every domain record of one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub properties: Vec<PropertyDefinition>,
    pub socketables: Vec<Socketable>,
    pub runewords: Vec<Runeword>,
    pub uniques: Vec<UniqueItem>,
    pub sets: Vec<ItemSet>,
    pub set_items: Vec<SetItem>,
    pub base_items: Vec<BaseItem>,
    pub item_types: Vec<ItemType>,
    pub monsters: Vec<Monster>,
    pub skills: Vec<Skill>,
    pub coupon_uniques: BTreeSet<String>,
}
impl Catalog {
    /// Parse every source and resolve cross references.
    ///
    /// All tables are checked structurally before any parser runs, so a
    /// broken source fails the whole build instead of producing a partial
    /// catalog. Lookups are rebuilt from this round's rows only.
    #[instrument(skip_all, fields(tables = inputs.tables.len()))]
    pub fn build(inputs: &CatalogInputs) -> Result<Self> {
        let mut tables = BTreeMap::new();
        for source in SourceTable::ALL {
            tables.insert(source, inputs.table(source)?);
        }
        let tables = &tables;
        let table = move |source: SourceTable| &tables[&source];

        let gem_effects = inputs.gems_page.as_deref().map(parse::gem_effects).unwrap_or_default();
        let runeword_effects = inputs.runewords_page.as_deref().map(parse::runeword_effects).unwrap_or_default();

        let mut lookups = Lookups::default();
        let monsters = parse::monsters(table(SourceTable::MonStats));
        lookups.monster_names = parse::monster_names(&monsters);
        let skills = parse::skills(table(SourceTable::Skills));
        lookups.skill_classes = parse::skill_classes(&skills);

        let mut base_items = parse::base_items(table(SourceTable::Weapons), ItemCategory::Weapon);
        base_items.extend(parse::base_items(table(SourceTable::Armor), ItemCategory::Armor));
        base_items.extend(parse::base_items(table(SourceTable::Misc), ItemCategory::Misc));
        // Codes are unique across categories; the earliest file wins.
        let mut codes = HashSet::new();
        base_items.retain(|item| codes.insert(item.code.clone()));
        lookups.base_names = parse::base_names(&base_items);

        let socketables = parse::socketables(table(SourceTable::Gems), &lookups, &gem_effects);
        lookups.socketable_names = parse::socketable_names(&socketables);

        let coupon_uniques = parse::coupon_uniques(table(SourceTable::CubeMain));
        let catalog = Self {
            properties: parse::properties(table(SourceTable::Properties)),
            runewords: parse::runewords(table(SourceTable::Runes), &lookups, &runeword_effects),
            uniques: parse::uniques(table(SourceTable::UniqueItems), &lookups, &coupon_uniques),
            sets: parse::item_sets(table(SourceTable::Sets), &lookups),
            set_items: parse::set_items(table(SourceTable::SetItems), &lookups),
            item_types: parse::item_types(table(SourceTable::ItemTypes)),
            socketables,
            base_items,
            monsters,
            skills,
            coupon_uniques,
        };
        tracing::debug!(counts = ?catalog.counts(), "Catalog built");
        Ok(catalog)
    }

    /// Record count per persisted table.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("properties", self.properties.len()),
            ("socketables", self.socketables.len()),
            ("runewords", self.runewords.len()),
            ("uniques", self.uniques.len()),
            ("sets", self.sets.len()),
            ("set_items", self.set_items.len()),
            ("base_items", self.base_items.len()),
            ("item_types", self.item_types.len()),
            ("monsters", self.monsters.len()),
            ("skills", self.skills.len()),
            ("coupon_uniques", self.coupon_uniques.len()),
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.counts().values().all(|count| *count == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CharClass, SocketableKind};

    fn minimal() -> CatalogInputs {
        CatalogInputs::default()
            .with_table(SourceTable::Properties, "code\t*Tooltip\tstat1\nstr\tStrength\tstrength\n")
            .with_table(SourceTable::Gems, "name\tletter\tcode\nTal Rune\tTal\tr07\n")
            .with_table(SourceTable::Runes, "Name\t*Rune Name\tcomplete\tRune1\nRuneword1\tStealth\t1\tr07\n")
            .with_table(
                SourceTable::UniqueItems,
                "index\tcode\tlvl\tprop1\tpar1\tmin1\tmax1\nThe Gnasher\thax\t7\treanimate\t1\t1\t1\n",
            )
            .with_table(SourceTable::Sets, "index\tname\nCiverb's Vestments\tCiverb's Vestments\n")
            .with_table(SourceTable::SetItems, "index\tset\titem\nCiverb's Ward\tCiverb's Vestments\tlrg\n")
            .with_table(SourceTable::Weapons, "name\tcode\ttype\nHand Axe\thax\taxe\n")
            .with_table(SourceTable::Armor, "name\tcode\ttype\nLarge Shield\tlrg\tshie\n")
            .with_table(SourceTable::Misc, "name\tcode\ttype\n")
            .with_table(SourceTable::ItemTypes, "ItemType\tCode\nAxe\taxe\n")
            .with_table(SourceTable::CubeMain, "description\toutput\nCoupon\tThe Gnasher\n")
            .with_table(SourceTable::MonStats, "Id\thcIdx\tNameStr\nzombie1\t1\tZombie\n")
            .with_table(SourceTable::Skills, "skill\tcharclass\nTeleport\tsor\n")
    }

    #[test]
    fn test_build_resolves_cross_references() {
        let catalog = Catalog::build(&minimal()).unwrap();
        assert_eq!(catalog.runewords[0].rune_names, vec!["Tal Rune"]);
        assert_eq!(catalog.socketables[0].kind, SocketableKind::Rune);
        let gnasher = &catalog.uniques[0];
        assert_eq!(gnasher.base_name, "Hand Axe");
        assert_eq!(gnasher.modifiers[0].detail, "Zombie");
        assert!(gnasher.coupon);
        assert_eq!(catalog.set_items[0].base_name, "Large Shield");
        assert_eq!(catalog.skills[0].class, CharClass::Sorceress);
        assert_eq!(catalog.counts()["base_items"], 2);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let mut inputs = minimal();
        inputs.tables.remove(&SourceTable::Skills);
        let err = Catalog::build(&inputs).unwrap_err();
        assert_eq!(*err, ErrorKind::MissingTable("skills.txt"));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let inputs = minimal().with_table(SourceTable::MonStats, "Id\tNameStr\nzombie1\tZombie\n");
        let err = Catalog::build(&inputs).unwrap_err();
        assert_eq!(
            *err,
            ErrorKind::MissingColumn {
                table: "monstats.txt",
                column: "hcIdx"
            }
        );
        let inputs = minimal().with_table(SourceTable::CubeMain, "");
        assert!(Catalog::build(&inputs).is_err());
    }

    #[test]
    fn test_effect_text_comes_from_reference_pages() {
        let mut inputs = minimal();
        inputs.runewords_page = Some("<table><tr><th>Runeword</th><th>Stats</th></tr><tr><td>Stealth</td><td>+25% Faster Run/Walk</td></tr></table>".to_string());
        let catalog = Catalog::build(&inputs).unwrap();
        assert_eq!(catalog.runewords[0].effects, vec!["+25% Faster Run/Walk"]);
        assert!(catalog.socketables[0].effects.is_empty());
    }

    #[test]
    fn test_base_item_code_repeated_across_categories() {
        let inputs = minimal()
            .with_table(SourceTable::Misc, "name\tcode\ttype\nHand Axe Token\thax\tmisc\nKey\tkey\tkey\n")
            .with_table(SourceTable::Armor, "name\tcode\ttype\nLarge Shield\tlrg\tshie\nHand Axe Helm\thax\thelm\n");
        let catalog = Catalog::build(&inputs).unwrap();
        let codes: Vec<_> = catalog.base_items.iter().map(|item| item.code.as_str()).collect();
        assert_eq!(codes, vec!["hax", "lrg", "key"]);
        assert_eq!(catalog.base_items[0].name, "Hand Axe");
        assert_eq!(catalog.base_items[0].category, ItemCategory::Weapon);
        assert_eq!(catalog.uniques[0].base_name, "Hand Axe");
    }
}
