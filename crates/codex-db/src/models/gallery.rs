//! Gallery image database model

use sqlx::FromRow;

/// Database model for gallery_images table
#[derive(Debug, Clone, FromRow)]
pub struct GalleryImageModel {
    pub id: i64,
    pub image_url: String,
    pub alt_text: String,
    pub is_featured: bool,
    pub is_mature: bool,
    pub category_id: i64,
}
