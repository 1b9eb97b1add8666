//! In-memory implementation of CatalogStore
//!
//! The committed state is an immutable `Arc<Tables>`. Readers clone the `Arc`
//! and work against that snapshot for as long as they like. A writer holds the
//! writer mutex for its whole lifetime, edits a private copy of the snapshot it
//! started from, and on commit swaps the copy in. Readers never observe half of
//! a transaction, never wait for an open writer, and writers are serialized.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, instrument};

use codex_core::{
    Accessory, Attire, CatalogStore, CatalogTransaction, Character, CharacterLoreLink,
    DomainError, EntityKind, GalleryImage, LinkFilter, LookupEntry, LookupKind, LoreEntry,
    RepoResult, Snowflake, TxMode,
};

use super::error::{read_only_write, row_not_found};

/// One committed version of every table, keyed by id
#[derive(Debug, Clone, Default)]
struct Tables {
    lore_types: BTreeMap<Snowflake, LookupEntry>,
    gallery_categories: BTreeMap<Snowflake, LookupEntry>,
    characters: BTreeMap<Snowflake, Character>,
    attires: BTreeMap<Snowflake, Attire>,
    accessories: BTreeMap<Snowflake, Accessory>,
    lore_entries: BTreeMap<Snowflake, LoreEntry>,
    links: BTreeSet<CharacterLoreLink>,
    images: BTreeMap<Snowflake, GalleryImage>,
}

impl Tables {
    fn lookups(&self, kind: LookupKind) -> &BTreeMap<Snowflake, LookupEntry> {
        match kind {
            LookupKind::LoreType => &self.lore_types,
            LookupKind::GalleryImageCategory => &self.gallery_categories,
        }
    }

    fn lookups_mut(&mut self, kind: LookupKind) -> &mut BTreeMap<Snowflake, LookupEntry> {
        match kind {
            LookupKind::LoreType => &mut self.lore_types,
            LookupKind::GalleryImageCategory => &mut self.gallery_categories,
        }
    }
}

/// Insert a row whose id must be new
fn insert_row<T: Clone>(table: &mut BTreeMap<Snowflake, T>, id: Snowflake, row: &T) -> RepoResult<()> {
    if table.contains_key(&id) {
        // Same outcome as a primary-key violation in PostgreSQL
        return Err(DomainError::TransactionConflict);
    }
    table.insert(id, row.clone());
    Ok(())
}

/// Replace an existing row
fn update_row<T: Clone>(
    table: &mut BTreeMap<Snowflake, T>,
    kind: EntityKind,
    id: Snowflake,
    row: &T,
) -> RepoResult<()> {
    match table.get_mut(&id) {
        Some(slot) => {
            *slot = row.clone();
            Ok(())
        }
        None => Err(row_not_found(kind, id)),
    }
}

/// Remove an existing row
fn delete_row<T>(table: &mut BTreeMap<Snowflake, T>, kind: EntityKind, id: Snowflake) -> RepoResult<()> {
    table
        .remove(&id)
        .map(|_| ())
        .ok_or_else(|| row_not_found(kind, id))
}

/// Process-local catalog store
///
/// Cloning is cheap and every clone shares the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    committed: Arc<RwLock<Arc<Tables>>>,
    writer: Arc<Mutex<()>>,
}

impl MemoryCatalogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    #[instrument(skip(self))]
    async fn begin(&self, mode: TxMode) -> RepoResult<Box<dyn CatalogTransaction>> {
        let access = match mode {
            TxMode::ReadOnly => Access::Snapshot(Arc::clone(&*self.committed.read().await)),
            TxMode::ReadWrite => {
                let permit = Arc::clone(&self.writer).lock_owned().await;
                let working = Tables::clone(&*self.committed.read().await);
                Access::Exclusive {
                    _permit: permit,
                    committed: Arc::clone(&self.committed),
                    working,
                }
            }
        };

        Ok(Box::new(MemoryTransaction { access }))
    }
}

enum Access {
    /// Committed state as of `begin`
    Snapshot(Arc<Tables>),
    /// Writer permit plus the private copy being edited
    Exclusive {
        _permit: OwnedMutexGuard<()>,
        committed: Arc<RwLock<Arc<Tables>>>,
        working: Tables,
    },
}

/// A unit of work against [`MemoryCatalogStore`]
///
/// Dropping it without `commit` releases the writer permit and discards `working`.
pub struct MemoryTransaction {
    access: Access,
}

impl MemoryTransaction {
    fn tables(&self) -> &Tables {
        match &self.access {
            Access::Snapshot(tables) => tables,
            Access::Exclusive { working, .. } => working,
        }
    }

    fn tables_mut(&mut self) -> RepoResult<&mut Tables> {
        match &mut self.access {
            Access::Exclusive { working, .. } => Ok(working),
            Access::Snapshot(_) => Err(read_only_write()),
        }
    }
}

#[async_trait]
impl CatalogTransaction for MemoryTransaction {
    fn mode(&self) -> TxMode {
        match self.access {
            Access::Snapshot(_) => TxMode::ReadOnly,
            Access::Exclusive { .. } => TxMode::ReadWrite,
        }
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    async fn find_lookup(&mut self, kind: LookupKind, id: Snowflake) -> RepoResult<Option<LookupEntry>> {
        Ok(self.tables().lookups(kind).get(&id).cloned())
    }

    async fn list_lookups(&mut self, kind: LookupKind) -> RepoResult<Vec<LookupEntry>> {
        Ok(self.tables().lookups(kind).values().cloned().collect())
    }

    async fn insert_lookup(&mut self, kind: LookupKind, entry: &LookupEntry) -> RepoResult<()> {
        insert_row(self.tables_mut()?.lookups_mut(kind), entry.id, entry)
    }

    // ------------------------------------------------------------------------
    // Characters
    // ------------------------------------------------------------------------

    async fn find_character(&mut self, id: Snowflake) -> RepoResult<Option<Character>> {
        Ok(self.tables().characters.get(&id).cloned())
    }

    async fn list_characters(&mut self) -> RepoResult<Vec<Character>> {
        Ok(self.tables().characters.values().cloned().collect())
    }

    async fn characters_with_feat(&mut self, lore_entry_id: Snowflake) -> RepoResult<Vec<Character>> {
        Ok(self
            .tables()
            .characters
            .values()
            .filter(|c| c.greatest_feat_lore_id == Some(lore_entry_id))
            .cloned()
            .collect())
    }

    async fn insert_character(&mut self, character: &Character) -> RepoResult<()> {
        insert_row(&mut self.tables_mut()?.characters, character.id, character)
    }

    async fn update_character(&mut self, character: &Character) -> RepoResult<()> {
        update_row(
            &mut self.tables_mut()?.characters,
            EntityKind::Character,
            character.id,
            character,
        )
    }

    async fn delete_character(&mut self, id: Snowflake) -> RepoResult<()> {
        delete_row(&mut self.tables_mut()?.characters, EntityKind::Character, id)
    }

    // ------------------------------------------------------------------------
    // Attires
    // ------------------------------------------------------------------------

    async fn find_attire(&mut self, id: Snowflake) -> RepoResult<Option<Attire>> {
        Ok(self.tables().attires.get(&id).cloned())
    }

    async fn list_attires(&mut self, character_id: Option<Snowflake>) -> RepoResult<Vec<Attire>> {
        Ok(self
            .tables()
            .attires
            .values()
            .filter(|a| character_id.map_or(true, |id| a.character_id == id))
            .cloned()
            .collect())
    }

    async fn insert_attire(&mut self, attire: &Attire) -> RepoResult<()> {
        insert_row(&mut self.tables_mut()?.attires, attire.id, attire)
    }

    async fn update_attire(&mut self, attire: &Attire) -> RepoResult<()> {
        update_row(&mut self.tables_mut()?.attires, EntityKind::Attire, attire.id, attire)
    }

    async fn delete_attire(&mut self, id: Snowflake) -> RepoResult<()> {
        delete_row(&mut self.tables_mut()?.attires, EntityKind::Attire, id)
    }

    // ------------------------------------------------------------------------
    // Accessories
    // ------------------------------------------------------------------------

    async fn find_accessory(&mut self, id: Snowflake) -> RepoResult<Option<Accessory>> {
        Ok(self.tables().accessories.get(&id).cloned())
    }

    async fn list_accessories(&mut self, attire_id: Option<Snowflake>) -> RepoResult<Vec<Accessory>> {
        Ok(self
            .tables()
            .accessories
            .values()
            .filter(|a| attire_id.map_or(true, |id| a.attire_id == id))
            .cloned()
            .collect())
    }

    async fn insert_accessory(&mut self, accessory: &Accessory) -> RepoResult<()> {
        insert_row(&mut self.tables_mut()?.accessories, accessory.id, accessory)
    }

    async fn update_accessory(&mut self, accessory: &Accessory) -> RepoResult<()> {
        update_row(
            &mut self.tables_mut()?.accessories,
            EntityKind::Accessory,
            accessory.id,
            accessory,
        )
    }

    async fn delete_accessory(&mut self, id: Snowflake) -> RepoResult<()> {
        delete_row(&mut self.tables_mut()?.accessories, EntityKind::Accessory, id)
    }

    // ------------------------------------------------------------------------
    // Lore entries
    // ------------------------------------------------------------------------

    async fn find_lore_entry(&mut self, id: Snowflake) -> RepoResult<Option<LoreEntry>> {
        Ok(self.tables().lore_entries.get(&id).cloned())
    }

    async fn list_lore_entries(&mut self) -> RepoResult<Vec<LoreEntry>> {
        Ok(self.tables().lore_entries.values().cloned().collect())
    }

    async fn insert_lore_entry(&mut self, entry: &LoreEntry) -> RepoResult<()> {
        insert_row(&mut self.tables_mut()?.lore_entries, entry.id, entry)
    }

    async fn update_lore_entry(&mut self, entry: &LoreEntry) -> RepoResult<()> {
        update_row(
            &mut self.tables_mut()?.lore_entries,
            EntityKind::LoreEntry,
            entry.id,
            entry,
        )
    }

    async fn delete_lore_entry(&mut self, id: Snowflake) -> RepoResult<()> {
        delete_row(&mut self.tables_mut()?.lore_entries, EntityKind::LoreEntry, id)
    }

    // ------------------------------------------------------------------------
    // Character <-> LoreEntry links
    // ------------------------------------------------------------------------

    async fn list_links(&mut self, filter: LinkFilter) -> RepoResult<Vec<CharacterLoreLink>> {
        Ok(self
            .tables()
            .links
            .iter()
            .filter(|link| filter.matches(link))
            .copied()
            .collect())
    }

    async fn insert_link(&mut self, link: CharacterLoreLink) -> RepoResult<bool> {
        Ok(self.tables_mut()?.links.insert(link))
    }

    async fn delete_link(&mut self, link: CharacterLoreLink) -> RepoResult<bool> {
        Ok(self.tables_mut()?.links.remove(&link))
    }

    // ------------------------------------------------------------------------
    // Gallery images
    // ------------------------------------------------------------------------

    async fn find_image(&mut self, id: Snowflake) -> RepoResult<Option<GalleryImage>> {
        Ok(self.tables().images.get(&id).cloned())
    }

    async fn list_images(&mut self, category_id: Option<Snowflake>) -> RepoResult<Vec<GalleryImage>> {
        Ok(self
            .tables()
            .images
            .values()
            .filter(|i| category_id.map_or(true, |id| i.category_id == id))
            .cloned()
            .collect())
    }

    async fn insert_image(&mut self, image: &GalleryImage) -> RepoResult<()> {
        insert_row(&mut self.tables_mut()?.images, image.id, image)
    }

    async fn update_image(&mut self, image: &GalleryImage) -> RepoResult<()> {
        update_row(&mut self.tables_mut()?.images, EntityKind::GalleryImage, image.id, image)
    }

    async fn delete_image(&mut self, id: Snowflake) -> RepoResult<()> {
        delete_row(&mut self.tables_mut()?.images, EntityKind::GalleryImage, id)
    }

    // ------------------------------------------------------------------------
    // Completion
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        match self.access {
            Access::Snapshot(_) => {}
            Access::Exclusive {
                _permit,
                committed,
                working,
            } => {
                *committed.write().await = Arc::new(working);
                debug!("Transaction committed");
            }
        }
        Ok(())
    }
}
