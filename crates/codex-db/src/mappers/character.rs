//! Character model -> entity mapper

use codex_core::{Character, Snowflake};

use crate::models::CharacterModel;

/// Convert CharacterModel to Character entity
impl From<CharacterModel> for Character {
    fn from(model: CharacterModel) -> Self {
        Character {
            id: Snowflake::new(model.id),
            name: model.name,
            alias: model.alias,
            age: model.age,
            origin: model.origin,
            physical_description: model.physical_description,
            power_description: model.power_description,
            bio: model.bio,
            // Rows written before the nullable column used 0 for "no feat"
            greatest_feat_lore_id: Snowflake::non_zero(model.greatest_feat_lore_id.map(Snowflake::new)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(feat: Option<i64>) -> CharacterModel {
        CharacterModel {
            id: 1,
            name: "Aria".to_string(),
            alias: None,
            age: Some(19),
            origin: None,
            physical_description: None,
            power_description: None,
            bio: None,
            greatest_feat_lore_id: feat,
        }
    }

    #[test]
    fn test_feat_sentinel_maps_to_none() {
        assert_eq!(Character::from(model(Some(0))).greatest_feat_lore_id, None);
        assert_eq!(Character::from(model(None)).greatest_feat_lore_id, None);
        assert_eq!(
            Character::from(model(Some(5))).greatest_feat_lore_id,
            Some(Snowflake::new(5))
        );
    }
}
