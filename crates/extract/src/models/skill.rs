use super::CharClass;

/// A skill and the class it belongs to (`skills.txt`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub name: String,
    pub class: CharClass,
}
