//! Lookup database model
//!
//! Shared by every lookup table (`lore_types`, `gallery_image_categories`).

use codex_core::LookupKind;
use sqlx::FromRow;

/// Database model for a lookup table row
#[derive(Debug, Clone, FromRow)]
pub struct LookupModel {
    pub id: i64,
    pub name: String,
}

impl LookupModel {
    /// Table holding the rows of a lookup kind
    pub const fn table(kind: LookupKind) -> &'static str {
        match kind {
            LookupKind::LoreType => "lore_types",
            LookupKind::GalleryImageCategory => "gallery_image_categories",
        }
    }
}
