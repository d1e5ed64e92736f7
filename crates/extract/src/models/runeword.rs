use super::Modifier;

/// A runeword recipe (`runes.txt`), optionally enriched with the effect
/// text of the runewords reference page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runeword {
    /// Internal row name, e.g. `Runeword12`.
    pub key: String,
    pub name: String,
    /// Item type codes the runeword can be made in.
    pub item_types: Vec<String>,
    /// Item type codes excluded from the above.
    pub excluded_types: Vec<String>,
    /// Rune item codes, in socket order.
    pub runes: Vec<String>,
    /// Rune display names resolved from the gems table; unknown codes stay empty.
    pub rune_names: Vec<String>,
    pub modifiers: Vec<Modifier>,
    pub effects: Vec<String>,
}
impl Runeword {
    pub fn sockets(&self) -> usize {
        self.runes.len()
    }
}
