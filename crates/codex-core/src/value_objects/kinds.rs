//! Entity and lookup kinds
//!
//! Every error and every generic store operation names the kind of record it
//! concerns, so callers can render "Lore entry 42 not found" instead of a bare id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a catalog record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Character,
    Attire,
    Accessory,
    LoreEntry,
    CharacterLoreLink,
    GalleryImage,
    LoreType,
    GalleryImageCategory,
}

impl EntityKind {
    /// Machine-readable name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Attire => "attire",
            Self::Accessory => "accessory",
            Self::LoreEntry => "lore_entry",
            Self::CharacterLoreLink => "character_lore_link",
            Self::GalleryImage => "gallery_image",
            Self::LoreType => "lore_type",
            Self::GalleryImageCategory => "gallery_image_category",
        }
    }

    /// Human-readable name for error messages
    pub const fn label(self) -> &'static str {
        match self {
            Self::Character => "Character",
            Self::Attire => "Attire",
            Self::Accessory => "Accessory",
            Self::LoreEntry => "Lore entry",
            Self::CharacterLoreLink => "Character lore link",
            Self::GalleryImage => "Gallery image",
            Self::LoreType => "Lore type",
            Self::GalleryImageCategory => "Gallery image category",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed enumerations seeded at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    LoreType,
    GalleryImageCategory,
}

impl LookupKind {
    pub const ALL: [LookupKind; 2] = [Self::LoreType, Self::GalleryImageCategory];

    /// The entity kind reported in errors about this lookup
    pub const fn entity_kind(self) -> EntityKind {
        match self {
            Self::LoreType => EntityKind::LoreType,
            Self::GalleryImageCategory => EntityKind::GalleryImageCategory,
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_kind().label())
    }
}

impl From<LookupKind> for EntityKind {
    fn from(kind: LookupKind) -> Self {
        kind.entity_kind()
    }
}
