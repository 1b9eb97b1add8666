//! Data transfer objects for catalog requests and projections
//!
//! This module provides:
//! - Request DTOs with validation for operation inputs
//! - Response DTOs for read projections
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    CreateAccessoryRequest, CreateAttireRequest, CreateCharacterRequest,
    CreateGalleryImageRequest, CreateLoreEntryRequest, NewAccessory, NewAttire,
    UpdateAccessoryRequest, UpdateAttireRequest, UpdateCharacterRequest,
    UpdateGalleryImageRequest, UpdateLoreEntryRequest,
};

// Re-export commonly used response types
pub use responses::{
    AccessoryView, AttireView, CategoryGalleryView, CharacterProfileView, CharacterSummary,
    GalleryImageView, LookupView, LoreEntrySummary, LoreEntryView,
};

// Re-export mapper helper structs
pub use mappers::{AttireWithAccessories, CharacterWithDetails, ImageWithCategory, LoreEntryWithType};
