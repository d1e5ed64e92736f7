/// Definition of a property code (`properties.txt`): which stats it sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub code: String,
    pub stats: Vec<String>,
    pub description: String,
}
