use crate::error::{Error, ErrorKind};
use crate::models::facet::{modifiers_from_json, modifiers_to_json, strings_from_json, strings_to_json};
use exn::ResultExt;
use horadric_extract::models::{BaseItem, ItemCategory, ItemSet, ItemType, SetItem, UniqueItem};

fn level(value: i64, field: &'static str) -> Result<u32, Error> {
    u32::try_from(value).or_raise(|| ErrorKind::InvalidData(field))
}

#[derive(sqlx::FromRow)]
pub(crate) struct BaseItemRow {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) category: String,
    pub(crate) item_type: String,
    pub(crate) item_type2: String,
    pub(crate) level: i64,
    pub(crate) level_req: i64,
}
impl From<&BaseItem> for BaseItemRow {
    fn from(item: &BaseItem) -> Self {
        Self {
            code: item.code.clone(),
            name: item.name.clone(),
            category: item.category.as_str().to_string(),
            item_type: item.item_type.clone(),
            item_type2: item.item_type2.clone(),
            level: i64::from(item.level),
            level_req: i64::from(item.level_req),
        }
    }
}
impl TryFrom<BaseItemRow> for BaseItem {
    type Error = Error;
    fn try_from(row: BaseItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            category: row
                .category
                .parse::<ItemCategory>()
                .or_raise(|| ErrorKind::InvalidData("item category"))?,
            code: row.code,
            name: row.name,
            item_type: row.item_type,
            item_type2: row.item_type2,
            level: level(row.level, "level")?,
            level_req: level(row.level_req, "level requirement")?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ItemTypeRow {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) equivalents: String,
    pub(crate) class: String,
}
impl TryFrom<&ItemType> for ItemTypeRow {
    type Error = Error;
    fn try_from(item_type: &ItemType) -> Result<Self, Self::Error> {
        Ok(Self {
            code: item_type.code.clone(),
            name: item_type.name.clone(),
            equivalents: strings_to_json(&item_type.equivalents, "equivalents")?,
            class: item_type.class.clone(),
        })
    }
}
impl TryFrom<ItemTypeRow> for ItemType {
    type Error = Error;
    fn try_from(row: ItemTypeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            equivalents: strings_from_json(&row.equivalents, "equivalents")?,
            code: row.code,
            name: row.name,
            class: row.class,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UniqueRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) code: String,
    pub(crate) base_name: String,
    pub(crate) level: i64,
    pub(crate) level_req: i64,
    pub(crate) modifiers: String,
    pub(crate) coupon: bool,
}
impl TryFrom<&UniqueItem> for UniqueRow {
    type Error = Error;
    fn try_from(item: &UniqueItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: i64::from(item.id),
            name: item.name.clone(),
            code: item.code.clone(),
            base_name: item.base_name.clone(),
            level: i64::from(item.level),
            level_req: i64::from(item.level_req),
            modifiers: modifiers_to_json(&item.modifiers, "unique modifiers")?,
            coupon: item.coupon,
        })
    }
}
impl TryFrom<UniqueRow> for UniqueItem {
    type Error = Error;
    fn try_from(row: UniqueRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: level(row.id, "unique id")?,
            modifiers: modifiers_from_json(&row.modifiers, "unique modifiers")?,
            name: row.name,
            code: row.code,
            base_name: row.base_name,
            level: level(row.level, "level")?,
            level_req: level(row.level_req, "level requirement")?,
            coupon: row.coupon,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct SetRow {
    pub(crate) set_key: String,
    pub(crate) name: String,
    pub(crate) partial_bonuses: String,
    pub(crate) full_bonuses: String,
}
impl TryFrom<&ItemSet> for SetRow {
    type Error = Error;
    fn try_from(set: &ItemSet) -> Result<Self, Self::Error> {
        Ok(Self {
            set_key: set.key.clone(),
            name: set.name.clone(),
            partial_bonuses: modifiers_to_json(&set.partial, "partial set bonuses")?,
            full_bonuses: modifiers_to_json(&set.full, "full set bonuses")?,
        })
    }
}
impl TryFrom<SetRow> for ItemSet {
    type Error = Error;
    fn try_from(row: SetRow) -> Result<Self, Self::Error> {
        Ok(Self {
            partial: modifiers_from_json(&row.partial_bonuses, "partial set bonuses")?,
            full: modifiers_from_json(&row.full_bonuses, "full set bonuses")?,
            key: row.set_key,
            name: row.name,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct SetItemRow {
    pub(crate) name: String,
    pub(crate) set_key: String,
    pub(crate) code: String,
    pub(crate) base_name: String,
    pub(crate) level: i64,
    pub(crate) level_req: i64,
    pub(crate) modifiers: String,
    pub(crate) set_bonuses: String,
}
impl TryFrom<&SetItem> for SetItemRow {
    type Error = Error;
    fn try_from(item: &SetItem) -> Result<Self, Self::Error> {
        Ok(Self {
            name: item.name.clone(),
            set_key: item.set.clone(),
            code: item.code.clone(),
            base_name: item.base_name.clone(),
            level: i64::from(item.level),
            level_req: i64::from(item.level_req),
            modifiers: modifiers_to_json(&item.modifiers, "set item modifiers")?,
            set_bonuses: modifiers_to_json(&item.set_bonuses, "set item bonuses")?,
        })
    }
}
impl TryFrom<SetItemRow> for SetItem {
    type Error = Error;
    fn try_from(row: SetItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            modifiers: modifiers_from_json(&row.modifiers, "set item modifiers")?,
            set_bonuses: modifiers_from_json(&row.set_bonuses, "set item bonuses")?,
            name: row.name,
            set: row.set_key,
            code: row.code,
            base_name: row.base_name,
            level: level(row.level, "level")?,
            level_req: level(row.level_req, "level requirement")?,
        })
    }
}
