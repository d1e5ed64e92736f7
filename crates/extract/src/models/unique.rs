use super::Modifier;

/// A unique item (`uniqueitems.txt`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueItem {
    /// Ordinal among real (non-marker) rows, matching the game's own id.
    pub id: u32,
    pub name: String,
    /// Base item code.
    pub code: String,
    /// Base item name resolved through the item tables; empty when unknown.
    pub base_name: String,
    pub level: u32,
    pub level_req: u32,
    pub modifiers: Vec<Modifier>,
    /// Obtainable through a cube coupon recipe.
    pub coupon: bool,
}
