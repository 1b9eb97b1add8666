//! Entity store
//!
//! Generic create/update/get/list/delete for every catalog record kind, plus
//! the cascade rules run on delete. Each write opens one read-write
//! transaction: field validation, then reference resolution, then uniqueness,
//! then persistence, then commit. Any failure drops the transaction.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use codex_core::{
    CatalogTransaction, DomainError, EntityKind, LinkFilter, RepoResult, Snowflake,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use super::context::ServiceContext;
use super::error::{invalid_payload, ServiceResult};

/// A record kind the entity store can manage
///
/// Implemented for `Character`, `Attire`, `Accessory`, `LoreEntry` and
/// `GalleryImage`. Storage access is routed through the record so the generic
/// gate never needs to know which table it is touching.
#[async_trait]
pub trait CatalogRecord: Clone + fmt::Debug + Send + Sync + Sized + 'static {
    const KIND: EntityKind;

    /// Payload for a new record
    type Create: Validate + Send + Sync;
    /// Field-level changes to an existing record
    type Patch: Validate + Send + Sync;

    fn id(&self) -> Snowflake;

    /// Build the record a valid payload describes
    fn build(id: Snowflake, payload: &Self::Create) -> Self;

    /// Apply a valid patch
    fn apply(&mut self, patch: Self::Patch);

    /// Every foreign id must resolve
    async fn check_references(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()>;

    /// Uniqueness rules against the rows already stored
    async fn check_unique(&self, _tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        Ok(())
    }

    /// Rows created together with the record, after it was inserted
    async fn create_children(
        &self,
        _ctx: &ServiceContext,
        _tx: &mut dyn CatalogTransaction,
        _payload: Self::Create,
    ) -> RepoResult<()> {
        Ok(())
    }

    async fn load(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<Option<Self>>;
    async fn load_all(tx: &mut dyn CatalogTransaction) -> RepoResult<Vec<Self>>;
    async fn insert(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()>;
    async fn save(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()>;
}

// ============================================================================
// RecordSet
// ============================================================================

type Predicate<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// Snapshot of one record kind in ascending id order
///
/// Filters are applied lazily while iterating, and iterating again starts over
/// from the first row.
pub struct RecordSet<R> {
    rows: Arc<[R]>,
    filter: Option<Predicate<R>>,
}

impl<R: 'static> RecordSet<R> {
    fn new(rows: Vec<R>) -> Self {
        Self {
            rows: rows.into(),
            filter: None,
        }
    }

    /// Narrow the set; combines with any filter already present
    #[must_use]
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        let filter: Predicate<R> = match self.filter {
            Some(previous) => Arc::new(move |row| previous(row) && predicate(row)),
            None => Arc::new(predicate),
        };
        Self {
            rows: self.rows,
            filter: Some(filter),
        }
    }

    fn matches(&self, row: &R) -> bool {
        self.filter.as_ref().map_or(true, |f| f(row))
    }

    /// Iterate the matching rows
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.rows.iter().filter(move |row| self.matches(row))
    }

    /// Number of matching rows
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn first(&self) -> Option<&R> {
        self.iter().next()
    }

    /// Clone the matching rows out
    pub fn to_vec(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<R> Clone for RecordSet<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            filter: self.filter.clone(),
        }
    }
}

impl<R> fmt::Debug for RecordSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSet")
            .field("snapshot_rows", &self.rows.len())
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

impl<'a, R: 'static> IntoIterator for &'a RecordSet<R> {
    type Item = &'a R;
    type IntoIter = Box<dyn Iterator<Item = &'a R> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

// ============================================================================
// EntityStore
// ============================================================================

/// Entity store service
pub struct EntityStore<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EntityStore<'a> {
    /// Create a new EntityStore
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Validate and persist a new record
    #[instrument(skip(self, payload), fields(kind = %R::KIND))]
    pub async fn create<R: CatalogRecord>(&self, payload: R::Create) -> ServiceResult<R> {
        let mut tx = self.ctx.write().await?;
        let record = create_in::<R>(self.ctx, tx.as_mut(), payload).await?;
        tx.commit().await?;

        info!(kind = %R::KIND, id = %record.id(), "Record created");
        Ok(record)
    }

    /// Apply a patch and re-validate the whole record
    #[instrument(skip(self, patch), fields(kind = %R::KIND))]
    pub async fn update<R: CatalogRecord>(&self, id: Snowflake, patch: R::Patch) -> ServiceResult<R> {
        let mut tx = self.ctx.write().await?;
        let record = update_in::<R>(tx.as_mut(), id, patch).await?;
        tx.commit().await?;

        info!(kind = %R::KIND, id = %id, "Record updated");
        Ok(record)
    }

    /// Get one record
    #[instrument(skip(self), fields(kind = %R::KIND))]
    pub async fn get<R: CatalogRecord>(&self, id: Snowflake) -> ServiceResult<R> {
        let mut tx = self.ctx.read().await?;
        let record = R::load(tx.as_mut(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(R::KIND, id))?;
        Ok(record)
    }

    /// Snapshot of every record of a kind
    #[instrument(skip(self), fields(kind = %R::KIND))]
    pub async fn list<R: CatalogRecord>(&self) -> ServiceResult<RecordSet<R>> {
        let mut tx = self.ctx.read().await?;
        Ok(RecordSet::new(R::load_all(tx.as_mut()).await?))
    }

    /// Snapshot of the records of a kind matching `filter`
    pub async fn list_where<R, F>(&self, filter: F) -> ServiceResult<RecordSet<R>>
    where
        R: CatalogRecord,
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Ok(self.list::<R>().await?.filter(filter))
    }

    /// Delete a record and everything that depends on it
    ///
    /// - Character: its attires and their accessories, and its lore links
    /// - Attire: its accessories (never a character's last attire)
    /// - Lore entry: its links, and any greatest-feat reference to it
    #[instrument(skip(self))]
    pub async fn delete(&self, kind: EntityKind, id: Snowflake) -> ServiceResult<()> {
        let mut tx = self.ctx.write().await?;
        match kind {
            EntityKind::Character => delete_character_in(tx.as_mut(), id).await?,
            EntityKind::Attire => remove_attire_in(tx.as_mut(), id).await?,
            EntityKind::Accessory => tx.delete_accessory(id).await?,
            EntityKind::LoreEntry => delete_lore_entry_in(tx.as_mut(), id).await?,
            EntityKind::GalleryImage => tx.delete_image(id).await?,
            EntityKind::CharacterLoreLink
            | EntityKind::LoreType
            | EntityKind::GalleryImageCategory => {
                return Err(DomainError::IntegrityInvariant(format!(
                    "{kind} rows cannot be deleted individually"
                ))
                .into());
            }
        }
        tx.commit().await?;

        info!(%kind, %id, "Record deleted");
        Ok(())
    }
}

// ============================================================================
// Transaction-scoped gate and cascades, shared with the other components
// ============================================================================

/// Validate, resolve, check uniqueness, insert
pub(crate) async fn create_in<R: CatalogRecord>(
    ctx: &ServiceContext,
    tx: &mut dyn CatalogTransaction,
    payload: R::Create,
) -> RepoResult<R> {
    payload.validate().map_err(|e| invalid_payload(R::KIND, &e))?;

    let record = R::build(ctx.generate_id(), &payload);
    record.check_references(tx).await?;
    record.check_unique(tx).await?;
    record.insert(tx).await?;
    record.create_children(ctx, tx, payload).await?;
    Ok(record)
}

/// Load, apply, re-validate, save
pub(crate) async fn update_in<R: CatalogRecord>(
    tx: &mut dyn CatalogTransaction,
    id: Snowflake,
    patch: R::Patch,
) -> RepoResult<R> {
    let mut record = R::load(tx, id)
        .await?
        .ok_or_else(|| DomainError::not_found(R::KIND, id))?;

    patch.validate().map_err(|e| invalid_payload(R::KIND, &e))?;
    record.apply(patch);
    record.check_references(tx).await?;
    record.check_unique(tx).await?;
    record.save(tx).await?;
    Ok(record)
}

/// Remove an attire and its accessories, refusing to strip a character bare
pub(crate) async fn remove_attire_in(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<()> {
    let attire = tx
        .find_attire(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Attire, id))?;

    let siblings = tx.list_attires(Some(attire.character_id)).await?;
    if siblings.len() <= 1 {
        warn!(attire_id = %id, character_id = %attire.character_id, "Refusing to remove last attire");
        return Err(DomainError::IntegrityInvariant(format!(
            "attire {id} is the last attire of character {}; delete the character instead",
            attire.character_id
        )));
    }

    for accessory in tx.list_accessories(Some(id)).await? {
        tx.delete_accessory(accessory.id).await?;
    }
    tx.delete_attire(id).await
}

/// Remove a character with its wardrobe and lore links
pub(crate) async fn delete_character_in(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<()> {
    if tx.find_character(id).await?.is_none() {
        return Err(DomainError::not_found(EntityKind::Character, id));
    }

    for attire in tx.list_attires(Some(id)).await? {
        for accessory in tx.list_accessories(Some(attire.id)).await? {
            tx.delete_accessory(accessory.id).await?;
        }
        tx.delete_attire(attire.id).await?;
    }
    for link in tx.list_links(LinkFilter::Character(id)).await? {
        tx.delete_link(link).await?;
    }
    tx.delete_character(id).await
}

/// Remove a lore entry, its links, and any greatest-feat pointer to it
pub(crate) async fn delete_lore_entry_in(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<()> {
    if tx.find_lore_entry(id).await?.is_none() {
        return Err(DomainError::not_found(EntityKind::LoreEntry, id));
    }

    for link in tx.list_links(LinkFilter::LoreEntry(id)).await? {
        tx.delete_link(link).await?;
    }
    for mut character in tx.characters_with_feat(id).await? {
        if character.forget_feat(id) {
            tx.update_character(&character).await?;
        }
    }
    tx.delete_lore_entry(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{
        CreateAttireRequest, CreateCharacterRequest, CreateLoreEntryRequest, NewAccessory,
        CreateAccessoryRequest, NewAttire, UpdateAttireRequest, UpdateCharacterRequest,
    };
    use crate::services::testing::{seeded_context, QUEST};
    use codex_core::{Accessory, Attire, Character, LoreEntry};

    fn attire(name: &str) -> CreateAttireRequest {
        CreateAttireRequest {
            name: name.to_string(),
            attire_type: "Armor".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_character_with_wardrobe() {
        let ctx = seeded_context().await;
        let store = EntityStore::new(&ctx);

        let character: Character = store
            .create(CreateCharacterRequest {
                name: "Aria".to_string(),
                alias: Some("The Warden".to_string()),
                attires: vec![attire("Everyday"), attire("Battle Form")],
                ..Default::default()
            })
            .await
            .unwrap();

        let attires = store
            .list_where::<Attire, _>(move |a| a.character_id == character.id)
            .await
            .unwrap();
        let names: Vec<_> = attires.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Everyday", "Battle Form"]);
    }

    #[tokio::test]
    async fn test_duplicate_initial_attires_abort_the_create() {
        let ctx = seeded_context().await;
        let store = EntityStore::new(&ctx);

        let err = store
            .create::<Character>(CreateCharacterRequest {
                name: "Aria".to_string(),
                attires: vec![attire("Battle Form"), attire("Battle Form")],
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.domain(),
            Some(&DomainError::conflict(EntityKind::Attire, "name", "Battle Form"))
        );
        assert!(store.list::<Character>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lore_entry_field_validation_runs_first() {
        let ctx = seeded_context().await;
        let store = EntityStore::new(&ctx);

        // Blank title and unknown lore type: the field error wins
        let err = store
            .create::<LoreEntry>(CreateLoreEntryRequest {
                title: String::new(),
                lore_type_id: Snowflake::new(9999),
                narrative: "x".to_string(),
            })
            .await
            .unwrap_err();

        match err.domain() {
            Some(DomainError::Validation { kind, field, .. }) => {
                assert_eq!(*kind, EntityKind::LoreEntry);
                assert_eq!(field, "title");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.list::<LoreEntry>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_lore_type_is_referential() {
        let ctx = seeded_context().await;
        let store = EntityStore::new(&ctx);

        let err = store
            .create::<LoreEntry>(CreateLoreEntryRequest {
                title: "The Long Night".to_string(),
                lore_type_id: Snowflake::new(9999),
                narrative: "x".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.domain(),
            Some(&DomainError::dangling(
                EntityKind::LoreEntry,
                "lore_type_id",
                EntityKind::LoreType,
                Snowflake::new(9999),
            ))
        );
    }

    #[tokio::test]
    async fn test_update_revalidates_and_checks_uniqueness() {
        let ctx = seeded_context().await;
        let store = EntityStore::new(&ctx);
        let character: Character = store
            .create(CreateCharacterRequest {
                name: "Aria".to_string(),
                attires: vec![attire("Everyday"), attire("Battle Form")],
                ..Default::default()
            })
            .await
            .unwrap();
        let everyday = store
            .list_where::<Attire, _>(|a| a.name == "Everyday")
            .await
            .unwrap()
            .to_vec()
            .remove(0);

        let err = store
            .update::<Attire>(
                everyday.id,
                UpdateAttireRequest {
                    name: Some("Battle Form".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_conflict));

        // Renaming to its own name is fine
        let same = store
            .update::<Attire>(
                everyday.id,
                UpdateAttireRequest {
                    name: Some("Everyday".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.character_id, character.id);

        let err = store
            .update::<Character>(Snowflake::new(42), UpdateCharacterRequest::default())
            .await
            .unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_not_found));
    }

    #[tokio::test]
    async fn test_update_clears_optional_text() {
        let ctx = seeded_context().await;
        let store = EntityStore::new(&ctx);
        let character: Character = store
            .create(CreateCharacterRequest {
                name: "Aria".to_string(),
                alias: Some("The Warden".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = store
            .update::<Character>(
                character.id,
                UpdateCharacterRequest {
                    alias: Some(String::new()),
                    age: Some(31),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.alias, None);
        assert_eq!(updated.age, Some(31));
        assert_eq!(store.get::<Character>(character.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_delete_character_cascades() {
        let ctx = seeded_context().await;
        let store = EntityStore::new(&ctx);
        let character: Character = store
            .create(CreateCharacterRequest {
                name: "Aria".to_string(),
                attires: vec![attire("X"), attire("Y")],
                ..Default::default()
            })
            .await
            .unwrap();
        let y = store
            .list_where::<Attire, _>(|a| a.name == "Y")
            .await
            .unwrap()
            .to_vec()
            .remove(0);
        let z: Accessory = store
            .create(NewAccessory {
                attire_id: y.id,
                accessory: CreateAccessoryRequest {
                    description: "Longsword".to_string(),
                    is_weapon: true,
                    unique_effect: None,
                },
            })
            .await
            .unwrap();

        store.delete(EntityKind::Character, character.id).await.unwrap();

        assert!(store.list::<Attire>().await.unwrap().is_empty());
        let err = store.get::<Accessory>(z.id).await.unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_not_found));

        let err = store.delete(EntityKind::Character, character.id).await.unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_not_found));
    }

    #[tokio::test]
    async fn test_entity_store_keeps_last_attire() {
        let ctx = seeded_context().await;
        let store = EntityStore::new(&ctx);
        let character: Character = store
            .create(CreateCharacterRequest {
                name: "Aria".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let only: Attire = store
            .create(NewAttire {
                character_id: character.id,
                attire: attire("Everyday"),
            })
            .await
            .unwrap();

        let err = store.delete(EntityKind::Attire, only.id).await.unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_invariant));
        assert_eq!(store.get::<Attire>(only.id).await.unwrap(), only);
    }

    #[tokio::test]
    async fn test_lookups_are_not_deletable() {
        let ctx = seeded_context().await;
        let err = EntityStore::new(&ctx)
            .delete(EntityKind::LoreType, QUEST)
            .await
            .unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_invariant));
    }

    #[tokio::test]
    async fn test_record_set_is_restartable() {
        let ctx = seeded_context().await;
        let store = EntityStore::new(&ctx);
        for name in ["A", "B", "C"] {
            store
                .create::<Character>(CreateCharacterRequest {
                    name: name.to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let set = store.list::<Character>().await.unwrap().filter(|c| c.name != "B");
        let first: Vec<_> = set.iter().map(|c| c.name.clone()).collect();
        let second: Vec<_> = (&set).into_iter().map(|c| c.name.clone()).collect();
        assert_eq!(first, vec!["A", "C"]);
        assert_eq!(first, second);
        assert_eq!(set.len(), 2);
        assert_eq!(set.first().map(|c| c.name.as_str()), Some("A"));

        let narrowed = set.filter(|c| c.name == "C");
        assert_eq!(narrowed.len(), 1);
    }
}
