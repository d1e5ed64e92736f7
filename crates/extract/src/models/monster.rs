/// A monster with a usable numeric index (`monstats.txt`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    /// Always positive.
    pub index: u32,
    pub id: String,
    pub name: String,
}
