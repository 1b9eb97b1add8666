//! Gallery image model -> entity mapper

use codex_core::{GalleryImage, Snowflake};

use crate::models::GalleryImageModel;

/// Convert GalleryImageModel to GalleryImage entity
impl From<GalleryImageModel> for GalleryImage {
    fn from(model: GalleryImageModel) -> Self {
        GalleryImage {
            id: Snowflake::new(model.id),
            image_url: model.image_url,
            alt_text: model.alt_text,
            is_featured: model.is_featured,
            is_mature: model.is_mature,
            category_id: Snowflake::new(model.category_id),
        }
    }
}
