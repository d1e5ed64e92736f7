mod class;
mod item;
mod modifier;
mod monster;
mod property;
mod runeword;
mod set;
mod skill;
mod socketable;
mod unique;
mod version;

pub use self::class::CharClass;
pub use self::item::{BaseItem, ItemCategory, ItemType};
pub use self::modifier::Modifier;
pub use self::monster::Monster;
pub use self::property::PropertyDefinition;
pub use self::runeword::Runeword;
pub use self::set::{ItemSet, SetItem};
pub use self::skill::Skill;
pub use self::socketable::{SocketEffects, Socketable, SocketableKind};
pub use self::unique::UniqueItem;
pub use self::version::{ContentVersion, Release};

fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace('/', "").replace('-', "").replace('_', "").replace(' ', "")
}
