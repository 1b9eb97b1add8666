//! Attire and accessory database models

use sqlx::FromRow;

/// Database model for attires table
#[derive(Debug, Clone, FromRow)]
pub struct AttireModel {
    pub id: i64,
    pub character_id: i64,
    pub name: String,
    pub attire_type: String,
    pub description: Option<String>,
    pub hairstyle_description: Option<String>,
}

/// Database model for accessories table
#[derive(Debug, Clone, FromRow)]
pub struct AccessoryModel {
    pub id: i64,
    pub attire_id: i64,
    pub description: String,
    pub is_weapon: bool,
    pub unique_effect: Option<String>,
}
