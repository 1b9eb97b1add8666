//! Test fixtures and data generators
//!
//! Provides reusable request payloads for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use codex_core::Snowflake;
use codex_service::dto::{
    CreateAccessoryRequest, CreateAttireRequest, CreateCharacterRequest,
    CreateGalleryImageRequest, CreateLoreEntryRequest,
};

/// Seeded lore type ids
pub const QUEST: Snowflake = Snowflake::new(1);
pub const ORIGIN: Snowflake = Snowflake::new(2);

/// Seeded gallery category ids
pub const OFFICIAL_ART: Snowflake = Snowflake::new(1);
pub const FAN_ART: Snowflake = Snowflake::new(2);

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Character with a unique name and the given outfits
pub fn character(attires: &[&str]) -> CreateCharacterRequest {
    CreateCharacterRequest {
        name: format!("Character {}", unique_suffix()),
        attires: attires.iter().map(|name| attire(name)).collect(),
        ..Default::default()
    }
}

/// Outfit with the given name
pub fn attire(name: &str) -> CreateAttireRequest {
    CreateAttireRequest {
        name: name.to_string(),
        attire_type: "Outfit".to_string(),
        description: Some(format!("{name}, as worn in the field")),
        hairstyle_description: None,
    }
}

/// Weapon or trinket
pub fn accessory(description: &str, is_weapon: bool) -> CreateAccessoryRequest {
    CreateAccessoryRequest {
        description: description.to_string(),
        is_weapon,
        unique_effect: None,
    }
}

/// Quest entry with the given title
pub fn lore_entry(title: &str) -> CreateLoreEntryRequest {
    CreateLoreEntryRequest {
        title: title.to_string(),
        lore_type_id: QUEST,
        narrative: format!("The tale of {title}."),
    }
}

/// Image in the given category with a unique url
pub fn image(category_id: Snowflake) -> CreateGalleryImageRequest {
    let suffix = unique_suffix();
    CreateGalleryImageRequest {
        image_url: format!("https://img.example/{suffix}.png"),
        alt_text: format!("Image {suffix}"),
        category_id,
        ..Default::default()
    }
}
