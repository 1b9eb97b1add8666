//! # codex-core
//!
//! Domain layer for the character codex: catalog entities, value objects, the error
//! taxonomy, and the transactional store traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Accessory, Attire, Character, CharacterLoreLink, GalleryImage, LookupEntry, LoreEntry,
};
pub use error::DomainError;
pub use traits::{CatalogStore, CatalogTransaction, LinkFilter, RepoResult, TxMode};
pub use value_objects::{
    EntityKind, LookupKind, Snowflake, SnowflakeGenerator, SnowflakeParseError,
};
