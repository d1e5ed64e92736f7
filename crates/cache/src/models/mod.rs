mod facet;
mod item;
mod metadata;
mod reference;
mod socket;

pub(crate) use self::item::{BaseItemRow, ItemTypeRow, SetItemRow, SetRow, UniqueRow};
pub use self::metadata::SyncMetadata;
pub(crate) use self::metadata::SyncMetadataRow;
pub(crate) use self::reference::{MonsterRow, PropertyRow, SkillRow};
pub(crate) use self::socket::{RunewordRow, SocketableRow};
