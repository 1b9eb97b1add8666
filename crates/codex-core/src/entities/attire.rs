//! Attire and Accessory entities - a character's looks and what they carry

use crate::value_objects::Snowflake;

/// One of a character's outfits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attire {
    pub id: Snowflake,
    pub character_id: Snowflake,
    pub name: String,
    pub attire_type: String,
    pub description: Option<String>,
    pub hairstyle_description: Option<String>,
}

impl Attire {
    /// Create a new Attire
    pub fn new(id: Snowflake, character_id: Snowflake, name: String, attire_type: String) -> Self {
        Self {
            id,
            character_id,
            name,
            attire_type,
            description: None,
            hairstyle_description: None,
        }
    }

    /// Attire names are unique per character, compared exactly
    #[inline]
    pub fn has_name(&self, name: &str) -> bool {
        self.name == name
    }
}

/// An item worn or carried with an attire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessory {
    pub id: Snowflake,
    pub attire_id: Snowflake,
    pub description: String,
    pub is_weapon: bool,
    pub unique_effect: Option<String>,
}

impl Accessory {
    /// Create a new Accessory
    pub fn new(id: Snowflake, attire_id: Snowflake, description: String, is_weapon: bool) -> Self {
        Self {
            id,
            attire_id,
            description,
            is_weapon,
            unique_effect: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attire_name_is_case_sensitive() {
        let attire = Attire::new(
            Snowflake::new(1),
            Snowflake::new(10),
            "Battle Form".to_string(),
            "Combat".to_string(),
        );
        assert!(attire.has_name("Battle Form"));
        assert!(!attire.has_name("battle form"));
    }

    #[test]
    fn test_accessory_creation() {
        let blade = Accessory::new(Snowflake::new(2), Snowflake::new(1), "Moon blade".to_string(), true);
        assert!(blade.is_weapon);
        assert!(blade.unique_effect.is_none());
    }
}
