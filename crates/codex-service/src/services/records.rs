//! `CatalogRecord` implementations for the catalog entities

use async_trait::async_trait;
use codex_core::{
    Accessory, Attire, CatalogTransaction, Character, DomainError, EntityKind, GalleryImage,
    LookupKind, LoreEntry, RepoResult, Snowflake,
};

use crate::dto::{
    CreateCharacterRequest, CreateGalleryImageRequest, CreateLoreEntryRequest, NewAccessory,
    NewAttire, UpdateAccessoryRequest, UpdateAttireRequest, UpdateCharacterRequest,
    UpdateGalleryImageRequest, UpdateLoreEntryRequest,
};

use super::context::ServiceContext;
use super::entity::{create_in, CatalogRecord};
use super::lookup::LookupRegistry;

/// Optional text patch: `None` keeps, empty clears, anything else replaces
fn patch_text(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *slot = (!value.is_empty()).then_some(value);
    }
}

/// Optional text on create: empty means absent
fn text(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

// ============================================================================
// Character
// ============================================================================

#[async_trait]
impl CatalogRecord for Character {
    const KIND: EntityKind = EntityKind::Character;
    type Create = CreateCharacterRequest;
    type Patch = UpdateCharacterRequest;

    fn id(&self) -> Snowflake {
        self.id
    }

    fn build(id: Snowflake, payload: &CreateCharacterRequest) -> Self {
        let mut character = Character::new(id, payload.name.clone());
        character.alias = text(payload.alias.as_deref());
        character.age = payload.age;
        character.origin = text(payload.origin.as_deref());
        character.physical_description = text(payload.physical_description.as_deref());
        character.power_description = text(payload.power_description.as_deref());
        character.bio = text(payload.bio.as_deref());
        character.set_greatest_feat(payload.greatest_feat_lore_id);
        character
    }

    fn apply(&mut self, patch: UpdateCharacterRequest) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if patch.age.is_some() {
            self.age = patch.age;
        }
        patch_text(&mut self.alias, patch.alias);
        patch_text(&mut self.origin, patch.origin);
        patch_text(&mut self.physical_description, patch.physical_description);
        patch_text(&mut self.power_description, patch.power_description);
        patch_text(&mut self.bio, patch.bio);
    }

    async fn check_references(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        if let Some(lore_id) = self.greatest_feat_lore_id {
            if tx.find_lore_entry(lore_id).await?.is_none() {
                return Err(DomainError::dangling(
                    Self::KIND,
                    "greatest_feat_lore_id",
                    EntityKind::LoreEntry,
                    lore_id,
                ));
            }
        }
        Ok(())
    }

    async fn create_children(
        &self,
        ctx: &ServiceContext,
        tx: &mut dyn CatalogTransaction,
        payload: CreateCharacterRequest,
    ) -> RepoResult<()> {
        for attire in payload.attires {
            create_in::<Attire>(
                ctx,
                tx,
                NewAttire {
                    character_id: self.id,
                    attire,
                },
            )
            .await?;
        }
        Ok(())
    }

    async fn load(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<Option<Self>> {
        tx.find_character(id).await
    }

    async fn load_all(tx: &mut dyn CatalogTransaction) -> RepoResult<Vec<Self>> {
        tx.list_characters().await
    }

    async fn insert(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        tx.insert_character(self).await
    }

    async fn save(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        tx.update_character(self).await
    }
}

// ============================================================================
// Attire
// ============================================================================

#[async_trait]
impl CatalogRecord for Attire {
    const KIND: EntityKind = EntityKind::Attire;
    type Create = NewAttire;
    type Patch = UpdateAttireRequest;

    fn id(&self) -> Snowflake {
        self.id
    }

    fn build(id: Snowflake, payload: &NewAttire) -> Self {
        let fields = &payload.attire;
        let mut attire = Attire::new(
            id,
            payload.character_id,
            fields.name.clone(),
            fields.attire_type.clone(),
        );
        attire.description = text(fields.description.as_deref());
        attire.hairstyle_description = text(fields.hairstyle_description.as_deref());
        attire
    }

    fn apply(&mut self, patch: UpdateAttireRequest) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(attire_type) = patch.attire_type {
            self.attire_type = attire_type;
        }
        patch_text(&mut self.description, patch.description);
        patch_text(&mut self.hairstyle_description, patch.hairstyle_description);
    }

    async fn check_references(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        if tx.find_character(self.character_id).await?.is_none() {
            return Err(DomainError::dangling(
                Self::KIND,
                "character_id",
                EntityKind::Character,
                self.character_id,
            ));
        }
        Ok(())
    }

    async fn check_unique(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        let taken = tx
            .list_attires(Some(self.character_id))
            .await?
            .iter()
            .any(|other| other.id != self.id && other.has_name(&self.name));
        if taken {
            return Err(DomainError::conflict(Self::KIND, "name", self.name.clone()));
        }
        Ok(())
    }

    async fn load(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<Option<Self>> {
        tx.find_attire(id).await
    }

    async fn load_all(tx: &mut dyn CatalogTransaction) -> RepoResult<Vec<Self>> {
        tx.list_attires(None).await
    }

    async fn insert(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        tx.insert_attire(self).await
    }

    async fn save(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        tx.update_attire(self).await
    }
}

// ============================================================================
// Accessory
// ============================================================================

#[async_trait]
impl CatalogRecord for Accessory {
    const KIND: EntityKind = EntityKind::Accessory;
    type Create = NewAccessory;
    type Patch = UpdateAccessoryRequest;

    fn id(&self) -> Snowflake {
        self.id
    }

    fn build(id: Snowflake, payload: &NewAccessory) -> Self {
        let fields = &payload.accessory;
        let mut accessory = Accessory::new(
            id,
            payload.attire_id,
            fields.description.clone(),
            fields.is_weapon,
        );
        accessory.unique_effect = text(fields.unique_effect.as_deref());
        accessory
    }

    fn apply(&mut self, patch: UpdateAccessoryRequest) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(is_weapon) = patch.is_weapon {
            self.is_weapon = is_weapon;
        }
        patch_text(&mut self.unique_effect, patch.unique_effect);
    }

    async fn check_references(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        if tx.find_attire(self.attire_id).await?.is_none() {
            return Err(DomainError::dangling(
                Self::KIND,
                "attire_id",
                EntityKind::Attire,
                self.attire_id,
            ));
        }
        Ok(())
    }

    async fn load(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<Option<Self>> {
        tx.find_accessory(id).await
    }

    async fn load_all(tx: &mut dyn CatalogTransaction) -> RepoResult<Vec<Self>> {
        tx.list_accessories(None).await
    }

    async fn insert(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        tx.insert_accessory(self).await
    }

    async fn save(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        tx.update_accessory(self).await
    }
}

// ============================================================================
// LoreEntry
// ============================================================================

#[async_trait]
impl CatalogRecord for LoreEntry {
    const KIND: EntityKind = EntityKind::LoreEntry;
    type Create = CreateLoreEntryRequest;
    type Patch = UpdateLoreEntryRequest;

    fn id(&self) -> Snowflake {
        self.id
    }

    fn build(id: Snowflake, payload: &CreateLoreEntryRequest) -> Self {
        LoreEntry::new(
            id,
            payload.title.clone(),
            payload.lore_type_id,
            payload.narrative.clone(),
        )
    }

    fn apply(&mut self, patch: UpdateLoreEntryRequest) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(lore_type_id) = patch.lore_type_id {
            self.lore_type_id = lore_type_id;
        }
        if let Some(narrative) = patch.narrative {
            self.narrative = narrative;
        }
    }

    async fn check_references(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        LookupRegistry::require_in(tx, LookupKind::LoreType, self.lore_type_id, Self::KIND, "lore_type_id")
            .await
            .map(|_| ())
    }

    async fn load(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<Option<Self>> {
        tx.find_lore_entry(id).await
    }

    async fn load_all(tx: &mut dyn CatalogTransaction) -> RepoResult<Vec<Self>> {
        tx.list_lore_entries().await
    }

    async fn insert(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        tx.insert_lore_entry(self).await
    }

    async fn save(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        tx.update_lore_entry(self).await
    }
}

// ============================================================================
// GalleryImage
// ============================================================================

#[async_trait]
impl CatalogRecord for GalleryImage {
    const KIND: EntityKind = EntityKind::GalleryImage;
    type Create = CreateGalleryImageRequest;
    type Patch = UpdateGalleryImageRequest;

    fn id(&self) -> Snowflake {
        self.id
    }

    fn build(id: Snowflake, payload: &CreateGalleryImageRequest) -> Self {
        let mut image = GalleryImage::new(
            id,
            payload.image_url.clone(),
            payload.alt_text.clone(),
            payload.category_id,
        );
        image.set_flags(Some(payload.is_featured), Some(payload.is_mature));
        image
    }

    fn apply(&mut self, patch: UpdateGalleryImageRequest) {
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(alt_text) = patch.alt_text {
            self.alt_text = alt_text;
        }
    }

    async fn check_references(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        LookupRegistry::require_in(
            tx,
            LookupKind::GalleryImageCategory,
            self.category_id,
            Self::KIND,
            "category_id",
        )
        .await
        .map(|_| ())
    }

    async fn load(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<Option<Self>> {
        tx.find_image(id).await
    }

    async fn load_all(tx: &mut dyn CatalogTransaction) -> RepoResult<Vec<Self>> {
        tx.list_images(None).await
    }

    async fn insert(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        tx.insert_image(self).await
    }

    async fn save(&self, tx: &mut dyn CatalogTransaction) -> RepoResult<()> {
        tx.update_image(self).await
    }
}
