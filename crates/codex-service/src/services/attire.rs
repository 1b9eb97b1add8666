//! Attire composer
//!
//! Character -> Attire -> Accessory composition: adding and removing outfits,
//! picking the default one, and the wardrobe and profile projections.

use std::collections::BTreeMap;

use codex_core::{
    Accessory, Attire, CatalogTransaction, Character, DomainError, EntityKind, LookupKind,
    RepoResult, Snowflake,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    AttireView, AttireWithAccessories, CharacterProfileView, CharacterWithDetails,
    CreateAccessoryRequest, CreateAttireRequest, LoreEntrySummary, LoreEntryWithType,
    NewAccessory, NewAttire,
};

use super::context::ServiceContext;
use super::entity::{create_in, remove_attire_in};
use super::error::{invalid_payload, ServiceResult};
use super::lookup::LookupRegistry;

/// Attire composer service
pub struct AttireComposer<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AttireComposer<'a> {
    /// Create a new AttireComposer
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add an outfit to a character's wardrobe
    #[instrument(skip(self, payload))]
    pub async fn add_attire(
        &self,
        character_id: Snowflake,
        payload: CreateAttireRequest,
    ) -> ServiceResult<Attire> {
        payload
            .validate()
            .map_err(|e| invalid_payload(EntityKind::Attire, &e))?;

        let mut tx = self.ctx.write().await?;
        require_character(tx.as_mut(), character_id).await?;
        let attire = create_in::<Attire>(
            self.ctx,
            tx.as_mut(),
            NewAttire {
                character_id,
                attire: payload,
            },
        )
        .await?;
        tx.commit().await?;

        info!(attire_id = %attire.id, %character_id, name = %attire.name, "Attire added");
        Ok(attire)
    }

    /// First attire in persisted order
    #[instrument(skip(self))]
    pub async fn default_attire(&self, character_id: Snowflake) -> ServiceResult<Attire> {
        let mut tx = self.ctx.read().await?;
        require_character(tx.as_mut(), character_id).await?;

        let attire = tx
            .list_attires(Some(character_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found(EntityKind::Attire, character_id))?;
        Ok(attire)
    }

    /// Attach an accessory or weapon to an attire
    #[instrument(skip(self, payload))]
    pub async fn add_accessory(
        &self,
        attire_id: Snowflake,
        payload: CreateAccessoryRequest,
    ) -> ServiceResult<Accessory> {
        payload
            .validate()
            .map_err(|e| invalid_payload(EntityKind::Accessory, &e))?;

        let mut tx = self.ctx.write().await?;
        if tx.find_attire(attire_id).await?.is_none() {
            return Err(DomainError::not_found(EntityKind::Attire, attire_id).into());
        }
        let accessory = create_in::<Accessory>(
            self.ctx,
            tx.as_mut(),
            NewAccessory {
                attire_id,
                accessory: payload,
            },
        )
        .await?;
        tx.commit().await?;

        info!(
            accessory_id = %accessory.id,
            %attire_id,
            is_weapon = accessory.is_weapon,
            "Accessory added"
        );
        Ok(accessory)
    }

    /// Remove an attire together with its accessories
    #[instrument(skip(self))]
    pub async fn remove_attire(&self, attire_id: Snowflake) -> ServiceResult<()> {
        let mut tx = self.ctx.write().await?;
        remove_attire_in(tx.as_mut(), attire_id).await?;
        tx.commit().await?;

        info!(%attire_id, "Attire removed");
        Ok(())
    }

    /// Ordered attires with their accessories split by kind
    #[instrument(skip(self))]
    pub async fn wardrobe(&self, character_id: Snowflake) -> ServiceResult<Vec<AttireView>> {
        let mut tx = self.ctx.read().await?;
        require_character(tx.as_mut(), character_id).await?;
        Ok(wardrobe_in(tx.as_mut(), character_id).await?)
    }

    /// Character page: fields, default attire, wardrobe, greatest feat
    ///
    /// A character without any attire has no profile; like `default_attire`
    /// this reports `NotFound` for the missing attire.
    #[instrument(skip(self))]
    pub async fn character_profile(&self, character_id: Snowflake) -> ServiceResult<CharacterProfileView> {
        let mut tx = self.ctx.read().await?;
        let character = require_character(tx.as_mut(), character_id).await?;
        let wardrobe = wardrobe_in(tx.as_mut(), character_id).await?;
        let Some(default_attire) = wardrobe.first().cloned() else {
            warn!(%character_id, "Profile requested for a character without attire");
            return Err(DomainError::not_found(EntityKind::Attire, character_id).into());
        };
        let greatest_feat = greatest_feat_in(tx.as_mut(), &character).await?;

        Ok(CharacterProfileView::from(CharacterWithDetails {
            character: &character,
            default_attire,
            wardrobe,
            greatest_feat,
        }))
    }
}

async fn require_character(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<Character> {
    tx.find_character(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Character, id))
}

async fn wardrobe_in(tx: &mut dyn CatalogTransaction, character_id: Snowflake) -> RepoResult<Vec<AttireView>> {
    let attires = tx.list_attires(Some(character_id)).await?;

    let mut by_attire: BTreeMap<Snowflake, Vec<Accessory>> = BTreeMap::new();
    for attire in &attires {
        by_attire.insert(attire.id, tx.list_accessories(Some(attire.id)).await?);
    }

    Ok(attires
        .iter()
        .enumerate()
        .map(|(position, attire)| {
            AttireView::from(AttireWithAccessories {
                attire,
                accessories: by_attire
                    .get(&attire.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default(),
                is_default: position == 0,
            })
        })
        .collect())
}

async fn greatest_feat_in(
    tx: &mut dyn CatalogTransaction,
    character: &Character,
) -> RepoResult<Option<LoreEntrySummary>> {
    let Some(lore_id) = character.greatest_feat_lore_id else {
        return Ok(None);
    };
    let Some(entry) = tx.find_lore_entry(lore_id).await? else {
        return Ok(None);
    };
    let lore_types = LookupRegistry::names_in(tx, LookupKind::LoreType).await?;
    let lore_type = lore_types.get(&entry.lore_type_id).map_or("", String::as_str);

    Ok(Some(LoreEntrySummary::from(LoreEntryWithType {
        entry: &entry,
        lore_type,
    })))
}
