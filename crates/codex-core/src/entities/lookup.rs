//! Lookup entries - rows of the closed enumerations

use crate::value_objects::Snowflake;

/// One `{id, name}` row of a lookup (lore type, gallery category)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub id: Snowflake,
    pub name: String,
}

impl LookupEntry {
    pub fn new(id: impl Into<Snowflake>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
