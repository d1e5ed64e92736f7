use crate::error::{Error, ErrorKind};
use crate::models::facet::{strings_from_json, strings_to_json};
use exn::ResultExt;
use horadric_extract::models::{CharClass, Monster, PropertyDefinition, Skill};

#[derive(sqlx::FromRow)]
pub(crate) struct PropertyRow {
    pub(crate) code: String,
    pub(crate) stats: String,
    pub(crate) description: String,
}
impl TryFrom<&PropertyDefinition> for PropertyRow {
    type Error = Error;
    fn try_from(property: &PropertyDefinition) -> Result<Self, Self::Error> {
        Ok(Self {
            code: property.code.clone(),
            stats: strings_to_json(&property.stats, "property stats")?,
            description: property.description.clone(),
        })
    }
}
impl TryFrom<PropertyRow> for PropertyDefinition {
    type Error = Error;
    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            stats: strings_from_json(&row.stats, "property stats")?,
            code: row.code,
            description: row.description,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct MonsterRow {
    pub(crate) idx: i64,
    pub(crate) id: String,
    pub(crate) name: String,
}
impl From<&Monster> for MonsterRow {
    fn from(monster: &Monster) -> Self {
        Self {
            idx: i64::from(monster.index),
            id: monster.id.clone(),
            name: monster.name.clone(),
        }
    }
}
impl TryFrom<MonsterRow> for Monster {
    type Error = Error;
    fn try_from(row: MonsterRow) -> Result<Self, Self::Error> {
        Ok(Self {
            index: u32::try_from(row.idx).or_raise(|| ErrorKind::InvalidData("monster index"))?,
            id: row.id,
            name: row.name,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct SkillRow {
    pub(crate) name: String,
    /// Class code, empty for no class.
    pub(crate) class: String,
}
impl From<&Skill> for SkillRow {
    fn from(skill: &Skill) -> Self {
        Self {
            name: skill.name.clone(),
            class: skill.class.code().to_string(),
        }
    }
}
impl From<SkillRow> for Skill {
    fn from(row: SkillRow) -> Self {
        Self {
            class: CharClass::from_code(&row.class),
            name: row.name,
        }
    }
}
