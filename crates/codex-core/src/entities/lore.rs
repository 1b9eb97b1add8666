//! Lore entities - narrative entries and their character links

use crate::value_objects::Snowflake;

/// A piece of lore: a quest, an origin story, an event...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoreEntry {
    pub id: Snowflake,
    pub title: String,
    pub lore_type_id: Snowflake,
    pub narrative: String,
}

impl LoreEntry {
    /// Create a new LoreEntry
    pub fn new(id: Snowflake, title: String, lore_type_id: Snowflake, narrative: String) -> Self {
        Self {
            id,
            title,
            lore_type_id,
            narrative,
        }
    }
}

/// Row of the Character <-> LoreEntry join relation
///
/// Ordered by character first so a character's links are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacterLoreLink {
    pub character_id: Snowflake,
    pub lore_entry_id: Snowflake,
}

impl CharacterLoreLink {
    pub fn new(character_id: Snowflake, lore_entry_id: Snowflake) -> Self {
        Self {
            character_id,
            lore_entry_id,
        }
    }
}
