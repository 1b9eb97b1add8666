//! Response DTOs (read projections)
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.
//! Lookup names are joined in at read time; records never store them.

use codex_core::Snowflake;
use serde::Serialize;

// ============================================================================
// Lookups
// ============================================================================

/// Lookup row (lore type or gallery category)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupView {
    pub id: Snowflake,
    pub name: String,
}

// ============================================================================
// Characters
// ============================================================================

/// Short character reference used in lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSummary {
    pub id: Snowflake,
    pub name: String,
    /// Alias when set, name otherwise
    pub display_name: String,
}

/// Full character page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterProfileView {
    pub id: Snowflake,
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// First attire of the wardrobe
    pub default_attire: AttireView,
    pub wardrobe: Vec<AttireView>,
    pub greatest_feat: Option<LoreEntrySummary>,
}

// ============================================================================
// Attire
// ============================================================================

/// Accessory as shown inside an attire
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessoryView {
    pub id: Snowflake,
    pub description: String,
    pub is_weapon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_effect: Option<String>,
}

/// Attire with its accessories split by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttireView {
    pub id: Snowflake,
    pub name: String,
    pub attire_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hairstyle_description: Option<String>,
    pub is_default: bool,
    pub weapons: Vec<AccessoryView>,
    pub accessories: Vec<AccessoryView>,
}

// ============================================================================
// Lore
// ============================================================================

/// Short lore entry reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoreEntrySummary {
    pub id: Snowflake,
    pub title: String,
    pub lore_type_id: Snowflake,
    pub lore_type: String,
}

/// Lore entry page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoreEntryView {
    pub id: Snowflake,
    pub title: String,
    pub narrative: String,
    pub lore_type_id: Snowflake,
    pub lore_type: String,
    pub characters: Vec<CharacterSummary>,
}

// ============================================================================
// Gallery
// ============================================================================

/// Gallery image with its category name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImageView {
    pub id: Snowflake,
    pub image_url: String,
    pub alt_text: String,
    pub is_featured: bool,
    pub is_mature: bool,
    pub category_id: Snowflake,
    pub category: String,
}

/// One category and its images
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGalleryView {
    pub id: Snowflake,
    pub name: String,
    pub images: Vec<GalleryImageView>,
}
