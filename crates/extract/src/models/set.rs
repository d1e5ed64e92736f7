use super::Modifier;

/// A full item set (`sets.txt`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSet {
    /// Set key referenced by [`SetItem::set`].
    pub key: String,
    pub name: String,
    /// Bonuses granted while a partial set is worn, in table order.
    pub partial: Vec<Modifier>,
    /// Bonuses granted for the complete set.
    pub full: Vec<Modifier>,
}

/// A single member of an [`ItemSet`] (`setitems.txt`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetItem {
    pub name: String,
    /// Key of the owning set; the set itself may be absent from `sets.txt`.
    pub set: String,
    pub code: String,
    pub base_name: String,
    pub level: u32,
    pub level_req: u32,
    pub modifiers: Vec<Modifier>,
    /// Extra bonuses unlocked by wearing more pieces of the set.
    pub set_bonuses: Vec<Modifier>,
}
