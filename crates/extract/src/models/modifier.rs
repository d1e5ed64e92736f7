use std::fmt::{Display, Formatter, Result as FmtResult};

/// A single property roll attached to an item, set bonus or socket filler.
///
/// `code` refers to a [`PropertyDefinition`](super::PropertyDefinition) by
/// key; whether that definition exists is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Modifier {
    pub code: String,
    /// Free-form parameter (skill name, monster index, charges, ...).
    pub param: String,
    pub min: i64,
    pub max: i64,
    /// What `param` resolves to through the lookup maps (a monster name, the
    /// class owning a skill); empty when it doesn't resolve.
    pub detail: String,
}
impl Modifier {
    pub fn is_ranged(&self) -> bool {
        self.min != self.max
    }
}
impl Display for Modifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.code)?;
        if !self.param.is_empty() {
            write!(f, "({})", self.param)?;
        }
        match self.is_ranged() {
            true => write!(f, " {}-{}", self.min, self.max),
            false => write!(f, " {}", self.min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let fixed = Modifier {
            code: "str".to_string(),
            param: String::new(),
            min: 10,
            max: 10,
            detail: String::new(),
        };
        assert_eq!(fixed.to_string(), "str 10");
        let ranged = Modifier {
            code: "skill".to_string(),
            param: "Teleport".to_string(),
            min: 1,
            max: 3,
            detail: "Sorceress".to_string(),
        };
        assert_eq!(ranged.to_string(), "skill(Teleport) 1-3");
    }
}
