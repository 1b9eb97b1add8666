//! Gallery image entity

use crate::value_objects::Snowflake;

/// A curated image; always in exactly one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub id: Snowflake,
    pub image_url: String,
    pub alt_text: String,
    pub is_featured: bool,
    pub is_mature: bool,
    pub category_id: Snowflake,
}

impl GalleryImage {
    /// Create a new, unflagged GalleryImage
    pub fn new(id: Snowflake, image_url: String, alt_text: String, category_id: Snowflake) -> Self {
        Self {
            id,
            image_url,
            alt_text,
            is_featured: false,
            is_mature: false,
            category_id,
        }
    }

    /// Whether the image may be shown to an audience with the given mature setting
    #[inline]
    pub fn visible_to(&self, include_mature: bool) -> bool {
        include_mature || !self.is_mature
    }

    /// Apply a partial flag update. Returns true if anything changed.
    pub fn set_flags(&mut self, is_featured: Option<bool>, is_mature: Option<bool>) -> bool {
        let before = (self.is_featured, self.is_mature);
        if let Some(featured) = is_featured {
            self.is_featured = featured;
        }
        if let Some(mature) = is_mature {
            self.is_mature = mature;
        }
        before != (self.is_featured, self.is_mature)
    }
}
