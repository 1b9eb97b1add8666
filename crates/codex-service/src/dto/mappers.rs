//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs. Views
//! that need a joined lookup name or child rows go through small helper structs.

use codex_core::{Accessory, Attire, Character, GalleryImage, LookupEntry, LoreEntry};

use super::responses::{
    AccessoryView, AttireView, CharacterProfileView, CharacterSummary, GalleryImageView,
    LookupView, LoreEntrySummary, LoreEntryView,
};

// ============================================================================
// Lookup Mappers
// ============================================================================

impl From<&LookupEntry> for LookupView {
    fn from(entry: &LookupEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
        }
    }
}

impl From<LookupEntry> for LookupView {
    fn from(entry: LookupEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
        }
    }
}

// ============================================================================
// Character Mappers
// ============================================================================

impl From<&Character> for CharacterSummary {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id,
            name: character.name.clone(),
            display_name: character.display_name().to_string(),
        }
    }
}

/// Character with everything its profile page joins in
pub struct CharacterWithDetails<'a> {
    pub character: &'a Character,
    pub default_attire: AttireView,
    pub wardrobe: Vec<AttireView>,
    pub greatest_feat: Option<LoreEntrySummary>,
}

impl From<CharacterWithDetails<'_>> for CharacterProfileView {
    fn from(details: CharacterWithDetails<'_>) -> Self {
        let character = details.character;
        Self {
            id: character.id,
            name: character.name.clone(),
            display_name: character.display_name().to_string(),
            alias: character.alias.clone(),
            age: character.age,
            origin: character.origin.clone(),
            physical_description: character.physical_description.clone(),
            power_description: character.power_description.clone(),
            bio: character.bio.clone(),
            default_attire: details.default_attire,
            wardrobe: details.wardrobe,
            greatest_feat: details.greatest_feat,
        }
    }
}

// ============================================================================
// Attire Mappers
// ============================================================================

impl From<&Accessory> for AccessoryView {
    fn from(accessory: &Accessory) -> Self {
        Self {
            id: accessory.id,
            description: accessory.description.clone(),
            is_weapon: accessory.is_weapon,
            unique_effect: accessory.unique_effect.clone(),
        }
    }
}

/// Attire with its accessories and its position in the wardrobe
pub struct AttireWithAccessories<'a> {
    pub attire: &'a Attire,
    pub accessories: &'a [Accessory],
    pub is_default: bool,
}

impl From<AttireWithAccessories<'_>> for AttireView {
    fn from(details: AttireWithAccessories<'_>) -> Self {
        let (weapons, accessories): (Vec<_>, Vec<_>) = details
            .accessories
            .iter()
            .filter(|a| a.attire_id == details.attire.id)
            .map(AccessoryView::from)
            .partition(|a| a.is_weapon);

        let attire = details.attire;
        Self {
            id: attire.id,
            name: attire.name.clone(),
            attire_type: attire.attire_type.clone(),
            description: attire.description.clone(),
            hairstyle_description: attire.hairstyle_description.clone(),
            is_default: details.is_default,
            weapons,
            accessories,
        }
    }
}

// ============================================================================
// Lore Mappers
// ============================================================================

/// Lore entry with its type name joined in
pub struct LoreEntryWithType<'a> {
    pub entry: &'a LoreEntry,
    pub lore_type: &'a str,
}

impl From<LoreEntryWithType<'_>> for LoreEntrySummary {
    fn from(details: LoreEntryWithType<'_>) -> Self {
        Self {
            id: details.entry.id,
            title: details.entry.title.clone(),
            lore_type_id: details.entry.lore_type_id,
            lore_type: details.lore_type.to_string(),
        }
    }
}

impl LoreEntryView {
    pub(crate) fn new(details: LoreEntryWithType<'_>, characters: Vec<CharacterSummary>) -> Self {
        Self {
            id: details.entry.id,
            title: details.entry.title.clone(),
            narrative: details.entry.narrative.clone(),
            lore_type_id: details.entry.lore_type_id,
            lore_type: details.lore_type.to_string(),
            characters,
        }
    }
}

// ============================================================================
// Gallery Mappers
// ============================================================================

/// Gallery image with its category name joined in
pub struct ImageWithCategory<'a> {
    pub image: &'a GalleryImage,
    pub category: &'a str,
}

impl From<ImageWithCategory<'_>> for GalleryImageView {
    fn from(details: ImageWithCategory<'_>) -> Self {
        let image = details.image;
        Self {
            id: image.id,
            image_url: image.image_url.clone(),
            alt_text: image.alt_text.clone(),
            is_featured: image.is_featured,
            is_mature: image.is_mature,
            category_id: image.category_id,
            category: details.category.to_string(),
        }
    }
}
