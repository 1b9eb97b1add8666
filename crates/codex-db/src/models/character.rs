//! Character database model

use sqlx::FromRow;

/// Database model for characters table
#[derive(Debug, Clone, FromRow)]
pub struct CharacterModel {
    pub id: i64,
    pub name: String,
    pub alias: Option<String>,
    pub age: Option<i32>,
    pub origin: Option<String>,
    pub physical_description: Option<String>,
    pub power_description: Option<String>,
    pub bio: Option<String>,
    pub greatest_feat_lore_id: Option<i64>,
}
