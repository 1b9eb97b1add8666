//! Character entity - a catalogued fictional character

use crate::value_objects::Snowflake;

/// Character entity
///
/// Attires are owned through `Attire::character_id`; the lowest attire id is the
/// character's default look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: Snowflake,
    pub name: String,
    pub alias: Option<String>,
    pub age: Option<i32>,
    pub origin: Option<String>,
    pub physical_description: Option<String>,
    pub power_description: Option<String>,
    pub bio: Option<String>,
    pub greatest_feat_lore_id: Option<Snowflake>,
}

impl Character {
    /// Create a new Character with an empty profile
    pub fn new(id: Snowflake, name: String) -> Self {
        Self {
            id,
            name,
            alias: None,
            age: None,
            origin: None,
            physical_description: None,
            power_description: None,
            bio: None,
            greatest_feat_lore_id: None,
        }
    }

    /// Name shown in summaries: the alias when set, otherwise the name
    pub fn display_name(&self) -> &str {
        self.alias
            .as_deref()
            .filter(|alias| !alias.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Point the greatest feat at a lore entry, or clear it.
    /// The zero sentinel is treated as clearing.
    pub fn set_greatest_feat(&mut self, lore_entry_id: Option<Snowflake>) {
        self.greatest_feat_lore_id = Snowflake::non_zero(lore_entry_id);
    }

    /// Clear the greatest feat if it points at `lore_entry_id`.
    /// Returns true when the reference was cleared.
    pub fn forget_feat(&mut self, lore_entry_id: Snowflake) -> bool {
        if self.greatest_feat_lore_id == Some(lore_entry_id) {
            self.greatest_feat_lore_id = None;
            true
        } else {
            false
        }
    }
}
