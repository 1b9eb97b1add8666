//! Lore and lookup model -> entity mappers

use codex_core::{CharacterLoreLink, LookupEntry, LoreEntry, Snowflake};

use crate::models::{CharacterLoreLinkModel, LookupModel, LoreEntryModel};

/// Convert LoreEntryModel to LoreEntry entity
impl From<LoreEntryModel> for LoreEntry {
    fn from(model: LoreEntryModel) -> Self {
        LoreEntry {
            id: Snowflake::new(model.id),
            title: model.title,
            lore_type_id: Snowflake::new(model.lore_type_id),
            narrative: model.narrative,
        }
    }
}

/// Convert CharacterLoreLinkModel to CharacterLoreLink
impl From<CharacterLoreLinkModel> for CharacterLoreLink {
    fn from(model: CharacterLoreLinkModel) -> Self {
        CharacterLoreLink::new(
            Snowflake::new(model.character_id),
            Snowflake::new(model.lore_entry_id),
        )
    }
}

/// Convert LookupModel to LookupEntry
impl From<LookupModel> for LookupEntry {
    fn from(model: LookupModel) -> Self {
        LookupEntry::new(Snowflake::new(model.id), model.name)
    }
}
