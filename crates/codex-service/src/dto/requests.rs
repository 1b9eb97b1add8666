//! Request DTOs for catalog operations
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Optional text fields on update requests follow one rule: `None` leaves the
//! field alone, an empty string clears it.

use std::borrow::Cow;

use codex_core::Snowflake;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Reject strings that are empty after trimming
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

// ============================================================================
// Character Requests
// ============================================================================

/// Create character request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCharacterRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    #[validate(length(max = 100, message = "Alias must be at most 100 characters"))]
    pub alias: Option<String>,

    #[validate(range(min = 0, message = "Age cannot be negative"))]
    pub age: Option<i32>,

    pub origin: Option<String>,
    pub physical_description: Option<String>,
    pub power_description: Option<String>,
    pub bio: Option<String>,

    /// `0` is accepted and means "no feat"
    pub greatest_feat_lore_id: Option<Snowflake>,

    /// Initial wardrobe, created in the same transaction
    #[serde(default)]
    #[validate(nested)]
    pub attires: Vec<CreateAttireRequest>,
}

/// Update character request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCharacterRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Alias must be at most 100 characters"))]
    pub alias: Option<String>,

    #[validate(range(min = 0, message = "Age cannot be negative"))]
    pub age: Option<i32>,

    pub origin: Option<String>,
    pub physical_description: Option<String>,
    pub power_description: Option<String>,
    pub bio: Option<String>,
}

// ============================================================================
// Attire Requests
// ============================================================================

/// Attire fields shared by every way of creating one
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateAttireRequest {
    #[validate(
        length(min = 1, max = 100, message = "Attire name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    #[validate(
        length(min = 1, max = 100, message = "Attire type must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub attire_type: String,

    pub description: Option<String>,
    pub hairstyle_description: Option<String>,
}

/// Attire for a given character
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAttire {
    pub character_id: Snowflake,

    #[serde(flatten)]
    #[validate(nested)]
    pub attire: CreateAttireRequest,
}

/// Update attire request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAttireRequest {
    #[validate(
        length(min = 1, max = 100, message = "Attire name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    #[validate(
        length(min = 1, max = 100, message = "Attire type must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub attire_type: Option<String>,

    pub description: Option<String>,
    pub hairstyle_description: Option<String>,
}

// ============================================================================
// Accessory Requests
// ============================================================================

/// Accessory fields
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateAccessoryRequest {
    #[validate(
        length(min = 1, max = 500, message = "Description must be 1-500 characters"),
        custom(function = "not_blank")
    )]
    pub description: String,

    #[serde(default)]
    pub is_weapon: bool,

    pub unique_effect: Option<String>,
}

/// Accessory for a given attire
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAccessory {
    pub attire_id: Snowflake,

    #[serde(flatten)]
    #[validate(nested)]
    pub accessory: CreateAccessoryRequest,
}

/// Update accessory request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAccessoryRequest {
    #[validate(
        length(min = 1, max = 500, message = "Description must be 1-500 characters"),
        custom(function = "not_blank")
    )]
    pub description: Option<String>,

    pub is_weapon: Option<bool>,
    pub unique_effect: Option<String>,
}

// ============================================================================
// Lore Requests
// ============================================================================

/// Create lore entry request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateLoreEntryRequest {
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,

    pub lore_type_id: Snowflake,

    #[validate(
        length(min = 1, message = "Narrative is required"),
        custom(function = "not_blank")
    )]
    pub narrative: String,
}

/// Update lore entry request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLoreEntryRequest {
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,

    pub lore_type_id: Option<Snowflake>,

    #[validate(
        length(min = 1, message = "Narrative is required"),
        custom(function = "not_blank")
    )]
    pub narrative: Option<String>,
}

// ============================================================================
// Gallery Requests
// ============================================================================

/// Create gallery image request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateGalleryImageRequest {
    #[validate(
        length(min = 1, max = 2048, message = "Image URL must be 1-2048 characters"),
        custom(function = "not_blank")
    )]
    pub image_url: String,

    #[validate(
        length(min = 1, max = 300, message = "Alt text must be 1-300 characters"),
        custom(function = "not_blank")
    )]
    pub alt_text: String,

    pub category_id: Snowflake,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub is_mature: bool,
}

/// Update gallery image request
///
/// Category and flags have their own operations.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGalleryImageRequest {
    #[validate(
        length(min = 1, max = 2048, message = "Image URL must be 1-2048 characters"),
        custom(function = "not_blank")
    )]
    pub image_url: Option<String>,

    #[validate(
        length(min = 1, max = 300, message = "Alt text must be 1-300 characters"),
        custom(function = "not_blank")
    )]
    pub alt_text: Option<String>,
}
