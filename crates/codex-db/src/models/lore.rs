//! Lore database models

use sqlx::FromRow;

/// Database model for lore_entries table
#[derive(Debug, Clone, FromRow)]
pub struct LoreEntryModel {
    pub id: i64,
    pub title: String,
    pub lore_type_id: i64,
    pub narrative: String,
}

/// Database model for character_lore_links table
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CharacterLoreLinkModel {
    pub character_id: i64,
    pub lore_entry_id: i64,
}
