//! Attire and accessory model -> entity mappers

use codex_core::{Accessory, Attire, Snowflake};

use crate::models::{AccessoryModel, AttireModel};

/// Convert AttireModel to Attire entity
impl From<AttireModel> for Attire {
    fn from(model: AttireModel) -> Self {
        Attire {
            id: Snowflake::new(model.id),
            character_id: Snowflake::new(model.character_id),
            name: model.name,
            attire_type: model.attire_type,
            description: model.description,
            hairstyle_description: model.hairstyle_description,
        }
    }
}

/// Convert AccessoryModel to Accessory entity
impl From<AccessoryModel> for Accessory {
    fn from(model: AccessoryModel) -> Self {
        Accessory {
            id: Snowflake::new(model.id),
            attire_id: Snowflake::new(model.attire_id),
            description: model.description,
            is_weapon: model.is_weapon,
            unique_effect: model.unique_effect,
        }
    }
}
