//! Catalog store traits (ports) - define the interface for transactional data access
//!
//! The domain layer defines what it needs, and the infrastructure layer provides
//! the implementation. Unlike a per-entity repository, every read and write goes
//! through one [`CatalogTransaction`] so that a validate-then-commit sequence sees
//! a single consistent snapshot and lands atomically.
//!
//! Dropping a transaction without calling [`CatalogTransaction::commit`] discards
//! all of its writes. Callers rely on this: any `?` between `begin` and `commit`
//! aborts the whole operation.

use async_trait::async_trait;

use crate::entities::{
    Accessory, Attire, Character, CharacterLoreLink, GalleryImage, LookupEntry, LoreEntry,
};
use crate::error::DomainError;
use crate::value_objects::{LookupKind, Snowflake};

/// Result type for store operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Transaction access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// Snapshot reads; writes are rejected
    ReadOnly,
    /// Serialized against other writers
    ReadWrite,
}

/// Which side of the Character <-> LoreEntry relation to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFilter {
    All,
    Character(Snowflake),
    LoreEntry(Snowflake),
}

impl LinkFilter {
    /// Whether a link row passes this filter
    pub fn matches(&self, link: &CharacterLoreLink) -> bool {
        match *self {
            Self::All => true,
            Self::Character(id) => link.character_id == id,
            Self::LoreEntry(id) => link.lore_entry_id == id,
        }
    }
}

// ============================================================================
// Store
// ============================================================================

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Open a transaction
    async fn begin(&self, mode: TxMode) -> RepoResult<Box<dyn CatalogTransaction>>;
}

// ============================================================================
// Transaction
// ============================================================================

/// One unit of work against the catalog.
///
/// All `list_*` methods return rows in ascending id order. Single-row `update_*`
/// and `delete_*` fail with `DomainError::NotFound` when the row does not exist.
/// The store does not cascade; dependent rows are removed by the caller.
#[async_trait]
pub trait CatalogTransaction: Send {
    /// Mode this transaction was opened with
    fn mode(&self) -> TxMode;

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Find a lookup row
    async fn find_lookup(&mut self, kind: LookupKind, id: Snowflake)
        -> RepoResult<Option<LookupEntry>>;

    /// List a lookup's rows
    async fn list_lookups(&mut self, kind: LookupKind) -> RepoResult<Vec<LookupEntry>>;

    /// Insert a lookup row (seeding only)
    async fn insert_lookup(&mut self, kind: LookupKind, entry: &LookupEntry) -> RepoResult<()>;

    // ------------------------------------------------------------------------
    // Characters
    // ------------------------------------------------------------------------

    /// Find character by ID
    async fn find_character(&mut self, id: Snowflake) -> RepoResult<Option<Character>>;

    /// List all characters
    async fn list_characters(&mut self) -> RepoResult<Vec<Character>>;

    /// List characters whose greatest feat is the given lore entry
    async fn characters_with_feat(&mut self, lore_entry_id: Snowflake)
        -> RepoResult<Vec<Character>>;

    /// Create a new character
    async fn insert_character(&mut self, character: &Character) -> RepoResult<()>;

    /// Update an existing character
    async fn update_character(&mut self, character: &Character) -> RepoResult<()>;

    /// Delete a character row
    async fn delete_character(&mut self, id: Snowflake) -> RepoResult<()>;

    // ------------------------------------------------------------------------
    // Attires
    // ------------------------------------------------------------------------

    /// Find attire by ID
    async fn find_attire(&mut self, id: Snowflake) -> RepoResult<Option<Attire>>;

    /// List attires, optionally only those of one character
    async fn list_attires(&mut self, character_id: Option<Snowflake>) -> RepoResult<Vec<Attire>>;

    /// Create a new attire
    async fn insert_attire(&mut self, attire: &Attire) -> RepoResult<()>;

    /// Update an existing attire
    async fn update_attire(&mut self, attire: &Attire) -> RepoResult<()>;

    /// Delete an attire row
    async fn delete_attire(&mut self, id: Snowflake) -> RepoResult<()>;

    // ------------------------------------------------------------------------
    // Accessories
    // ------------------------------------------------------------------------

    /// Find accessory by ID
    async fn find_accessory(&mut self, id: Snowflake) -> RepoResult<Option<Accessory>>;

    /// List accessories, optionally only those of one attire
    async fn list_accessories(&mut self, attire_id: Option<Snowflake>)
        -> RepoResult<Vec<Accessory>>;

    /// Create a new accessory
    async fn insert_accessory(&mut self, accessory: &Accessory) -> RepoResult<()>;

    /// Update an existing accessory
    async fn update_accessory(&mut self, accessory: &Accessory) -> RepoResult<()>;

    /// Delete an accessory row
    async fn delete_accessory(&mut self, id: Snowflake) -> RepoResult<()>;

    // ------------------------------------------------------------------------
    // Lore entries
    // ------------------------------------------------------------------------

    /// Find lore entry by ID
    async fn find_lore_entry(&mut self, id: Snowflake) -> RepoResult<Option<LoreEntry>>;

    /// List all lore entries
    async fn list_lore_entries(&mut self) -> RepoResult<Vec<LoreEntry>>;

    /// Create a new lore entry
    async fn insert_lore_entry(&mut self, entry: &LoreEntry) -> RepoResult<()>;

    /// Update an existing lore entry
    async fn update_lore_entry(&mut self, entry: &LoreEntry) -> RepoResult<()>;

    /// Delete a lore entry row
    async fn delete_lore_entry(&mut self, id: Snowflake) -> RepoResult<()>;

    // ------------------------------------------------------------------------
    // Character <-> LoreEntry links
    // ------------------------------------------------------------------------

    /// List link rows, ordered by (character_id, lore_entry_id)
    async fn list_links(&mut self, filter: LinkFilter) -> RepoResult<Vec<CharacterLoreLink>>;

    /// Insert a link. Returns false if the pair already existed.
    async fn insert_link(&mut self, link: CharacterLoreLink) -> RepoResult<bool>;

    /// Delete a link. Returns false if the pair did not exist.
    async fn delete_link(&mut self, link: CharacterLoreLink) -> RepoResult<bool>;

    // ------------------------------------------------------------------------
    // Gallery images
    // ------------------------------------------------------------------------

    /// Find gallery image by ID
    async fn find_image(&mut self, id: Snowflake) -> RepoResult<Option<GalleryImage>>;

    /// List images, optionally only those of one category
    async fn list_images(&mut self, category_id: Option<Snowflake>)
        -> RepoResult<Vec<GalleryImage>>;

    /// Create a new gallery image
    async fn insert_image(&mut self, image: &GalleryImage) -> RepoResult<()>;

    /// Update an existing gallery image
    async fn update_image(&mut self, image: &GalleryImage) -> RepoResult<()>;

    /// Delete a gallery image row
    async fn delete_image(&mut self, id: Snowflake) -> RepoResult<()>;

    // ------------------------------------------------------------------------
    // Completion
    // ------------------------------------------------------------------------

    /// Make every write of this transaction visible, atomically
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}
