//! Repository over every persisted table.
//!
//! Writes happen in exactly one place, [`Repository::replace_all`], which
//! swaps the whole data set in a single transaction. Everything else is a
//! read, and reads are allowed to see the previous round's data while a
//! sync is in flight.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{
    BaseItemRow, ItemTypeRow, MonsterRow, PropertyRow, RunewordRow, SetItemRow, SetRow, SkillRow, SocketableRow,
    SyncMetadata, SyncMetadataRow, UniqueRow,
};
use exn::ResultExt;
use horadric_extract::Catalog;
use horadric_extract::models::{
    BaseItem, CharClass, ItemSet, ItemType, Monster, PropertyDefinition, Runeword, SetItem, Skill, Socketable,
    UniqueItem,
};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::{BTreeMap, BTreeSet};
use time::UtcDateTime;
use tracing::instrument;

/// Record count per table, as reported by [`Repository::counts`].
pub type Counts = BTreeMap<&'static str, u64>;

#[derive(sqlx::FromRow)]
struct CountsRow {
    properties: i64,
    socketables: i64,
    runewords: i64,
    uniques: i64,
    sets: i64,
    set_items: i64,
    base_items: i64,
    item_types: i64,
    monsters: i64,
    skills: i64,
    coupon_uniques: i64,
}
impl From<CountsRow> for Counts {
    fn from(row: CountsRow) -> Self {
        let count = |n: i64| u64::try_from(n).unwrap_or_default();
        BTreeMap::from([
            ("properties", count(row.properties)),
            ("socketables", count(row.socketables)),
            ("runewords", count(row.runewords)),
            ("uniques", count(row.uniques)),
            ("sets", count(row.sets)),
            ("set_items", count(row.set_items)),
            ("base_items", count(row.base_items)),
            ("item_types", count(row.item_types)),
            ("monsters", count(row.monsters)),
            ("skills", count(row.skills)),
            ("coupon_uniques", count(row.coupon_uniques)),
        ])
    }
}

/// Repository for the synchronized game data.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Write
    // =========================================================================

    /// Replace every domain table with the contents of `catalog` and record
    /// `metadata`, all in one transaction.
    ///
    /// The metadata row is written last, so the stored version can never be
    /// ahead of the stored data. On any failure the transaction is rolled
    /// back (by dropping it) and the previous contents remain.
    #[instrument(skip_all, fields(version = %metadata.version))]
    pub async fn replace_all(&self, catalog: &Catalog, metadata: &SyncMetadata) -> Result<()> {
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        sqlx::query(include_str!("../queries/clear_catalog.sql"))
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Self::insert_catalog(&mut tx, catalog).await?;
        let row = SyncMetadataRow::from(metadata);
        sqlx::query(include_str!("../queries/upsert_sync_metadata.sql"))
            .bind(row.version)
            .bind(row.released_on)
            .bind(row.synced_at)
            .bind(row.fingerprint)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        tracing::debug!(counts = ?catalog.counts(), "Replaced stored catalog");
        Ok(())
    }

    async fn insert_catalog(conn: &mut SqliteConnection, catalog: &Catalog) -> Result<()> {
        for property in &catalog.properties {
            let row = PropertyRow::try_from(property)?;
            sqlx::query(include_str!("../queries/insert_property.sql"))
                .bind(row.code)
                .bind(row.stats)
                .bind(row.description)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for socketable in &catalog.socketables {
            let row = SocketableRow::try_from(socketable)?;
            sqlx::query(include_str!("../queries/insert_socketable.sql"))
                .bind(row.code)
                .bind(row.name)
                .bind(row.letter)
                .bind(row.kind)
                .bind(row.weapon)
                .bind(row.helm)
                .bind(row.shield)
                .bind(row.effects)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for runeword in &catalog.runewords {
            let row = RunewordRow::try_from(runeword)?;
            sqlx::query(include_str!("../queries/insert_runeword.sql"))
                .bind(row.internal_name)
                .bind(row.name)
                .bind(row.item_types)
                .bind(row.excluded_types)
                .bind(row.runes)
                .bind(row.rune_names)
                .bind(row.modifiers)
                .bind(row.effects)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for unique in &catalog.uniques {
            let row = UniqueRow::try_from(unique)?;
            sqlx::query(include_str!("../queries/insert_unique.sql"))
                .bind(row.id)
                .bind(row.name)
                .bind(row.code)
                .bind(row.base_name)
                .bind(row.level)
                .bind(row.level_req)
                .bind(row.modifiers)
                .bind(row.coupon)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for set in &catalog.sets {
            let row = SetRow::try_from(set)?;
            sqlx::query(include_str!("../queries/insert_set.sql"))
                .bind(row.set_key)
                .bind(row.name)
                .bind(row.partial_bonuses)
                .bind(row.full_bonuses)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for item in &catalog.set_items {
            let row = SetItemRow::try_from(item)?;
            sqlx::query(include_str!("../queries/insert_set_item.sql"))
                .bind(row.name)
                .bind(row.set_key)
                .bind(row.code)
                .bind(row.base_name)
                .bind(row.level)
                .bind(row.level_req)
                .bind(row.modifiers)
                .bind(row.set_bonuses)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for item in &catalog.base_items {
            let row = BaseItemRow::from(item);
            sqlx::query(include_str!("../queries/insert_base_item.sql"))
                .bind(row.code)
                .bind(row.name)
                .bind(row.category)
                .bind(row.item_type)
                .bind(row.item_type2)
                .bind(row.level)
                .bind(row.level_req)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for item_type in &catalog.item_types {
            let row = ItemTypeRow::try_from(item_type)?;
            sqlx::query(include_str!("../queries/insert_item_type.sql"))
                .bind(row.code)
                .bind(row.name)
                .bind(row.equivalents)
                .bind(row.class)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for monster in &catalog.monsters {
            let row = MonsterRow::from(monster);
            sqlx::query(include_str!("../queries/insert_monster.sql"))
                .bind(row.idx)
                .bind(row.id)
                .bind(row.name)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for skill in &catalog.skills {
            let row = SkillRow::from(skill);
            sqlx::query(include_str!("../queries/insert_skill.sql"))
                .bind(row.name)
                .bind(row.class)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for name in &catalog.coupon_uniques {
            sqlx::query(include_str!("../queries/insert_coupon_unique.sql"))
                .bind(name)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        Ok(())
    }

    /// Record a round that found nothing new. Returns `false` when there is
    /// no metadata row to update yet.
    pub async fn touch_synced_at(&self, synced_at: UtcDateTime) -> Result<bool> {
        let result = sqlx::query(include_str!("../queries/touch_synced_at.sql"))
            .bind(synced_at.unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Sync state
    // =========================================================================

    pub async fn sync_metadata(&self) -> Result<Option<SyncMetadata>> {
        let row: Option<SyncMetadataRow> = sqlx::query_as(include_str!("../queries/get_sync_metadata.sql"))
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(SyncMetadata::try_from).transpose()
    }

    /// Whether a previous round left usable data behind.
    pub async fn has_data(&self) -> Result<bool> {
        let row: (bool,) = sqlx::query_as(include_str!("../queries/has_data.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.0)
    }

    pub async fn counts(&self) -> Result<Counts> {
        let row: CountsRow = sqlx::query_as(include_str!("../queries/count_records.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.into())
    }

    // =========================================================================
    // Lists
    // =========================================================================

    pub async fn properties(&self) -> Result<Vec<PropertyDefinition>> {
        let rows: Vec<PropertyRow> = sqlx::query_as(include_str!("../queries/list_properties.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(PropertyDefinition::try_from).collect()
    }

    pub async fn socketables(&self) -> Result<Vec<Socketable>> {
        let rows: Vec<SocketableRow> = sqlx::query_as(include_str!("../queries/list_socketables.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Socketable::try_from).collect()
    }

    pub async fn runewords(&self) -> Result<Vec<Runeword>> {
        let rows: Vec<RunewordRow> = sqlx::query_as(include_str!("../queries/list_runewords.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Runeword::try_from).collect()
    }

    pub async fn uniques(&self) -> Result<Vec<UniqueItem>> {
        let rows: Vec<UniqueRow> = sqlx::query_as(include_str!("../queries/list_uniques.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(UniqueItem::try_from).collect()
    }

    pub async fn sets(&self) -> Result<Vec<ItemSet>> {
        let rows: Vec<SetRow> = sqlx::query_as(include_str!("../queries/list_sets.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(ItemSet::try_from).collect()
    }

    pub async fn set_items(&self) -> Result<Vec<SetItem>> {
        let rows: Vec<SetItemRow> = sqlx::query_as(include_str!("../queries/list_set_items.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(SetItem::try_from).collect()
    }

    pub async fn base_items(&self) -> Result<Vec<BaseItem>> {
        let rows: Vec<BaseItemRow> = sqlx::query_as(include_str!("../queries/list_base_items.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(BaseItem::try_from).collect()
    }

    pub async fn item_types(&self) -> Result<Vec<ItemType>> {
        let rows: Vec<ItemTypeRow> = sqlx::query_as(include_str!("../queries/list_item_types.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(ItemType::try_from).collect()
    }

    pub async fn monsters(&self) -> Result<Vec<Monster>> {
        let rows: Vec<MonsterRow> = sqlx::query_as(include_str!("../queries/list_monsters.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Monster::try_from).collect()
    }

    pub async fn skills(&self) -> Result<Vec<Skill>> {
        let rows: Vec<SkillRow> = sqlx::query_as(include_str!("../queries/list_skills.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Skill::from).collect())
    }

    pub async fn coupon_uniques(&self) -> Result<BTreeSet<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(include_str!("../queries/list_coupon_uniques.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Runeword by display name, case-insensitively.
    pub async fn runeword_by_name(&self, name: impl AsRef<str>) -> Result<Option<Runeword>> {
        let row: Option<RunewordRow> = sqlx::query_as(include_str!("../queries/get_runeword_by_name.sql"))
            .bind(name.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Runeword::try_from).transpose()
    }

    /// Unique items by name, case-insensitively. Names are not unique in the
    /// source data, hence the list.
    pub async fn uniques_by_name(&self, name: impl AsRef<str>) -> Result<Vec<UniqueItem>> {
        let rows: Vec<UniqueRow> = sqlx::query_as(include_str!("../queries/get_uniques_by_name.sql"))
            .bind(name.as_ref())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(UniqueItem::try_from).collect()
    }

    /// A set, looked up by key or display name, together with its items.
    pub async fn set_with_items(&self, name: impl AsRef<str>) -> Result<Option<(ItemSet, Vec<SetItem>)>> {
        let name = name.as_ref();
        let row: Option<SetRow> = sqlx::query_as(include_str!("../queries/get_set.sql"))
            .bind(name)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let Some(set) = row.map(ItemSet::try_from).transpose()? else {
            return Ok(None);
        };
        let rows: Vec<SetItemRow> = sqlx::query_as(include_str!("../queries/list_set_items_by_set.sql"))
            .bind(set.key.as_str())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let items = rows.into_iter().map(SetItem::try_from).collect::<Result<Vec<_>>>()?;
        Ok(Some((set, items)))
    }

    pub async fn base_item(&self, code: impl AsRef<str>) -> Result<Option<BaseItem>> {
        let row: Option<BaseItemRow> = sqlx::query_as(include_str!("../queries/get_base_item.sql"))
            .bind(code.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(BaseItem::try_from).transpose()
    }

    pub async fn monster_name(&self, index: u32) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as(include_str!("../queries/get_monster_name.sql"))
            .bind(i64::from(index))
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(|(name,)| name))
    }

    pub async fn skills_by_class(&self, class: CharClass) -> Result<Vec<Skill>> {
        let rows: Vec<SkillRow> = sqlx::query_as(include_str!("../queries/list_skills_by_class.sql"))
            .bind(class.code())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Skill::from).collect())
    }
}
