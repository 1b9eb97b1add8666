//! Lore association manager
//!
//! Owns the Character <-> LoreEntry link set and the character's
//! greatest-feat back-reference, plus the lore read projections.

use std::collections::BTreeSet;

use codex_core::{
    CatalogTransaction, Character, CharacterLoreLink, DomainError, EntityKind, LinkFilter,
    LookupKind, LoreEntry, RepoResult, Snowflake,
};
use tracing::{debug, info, instrument};

use crate::dto::{CharacterSummary, LoreEntrySummary, LoreEntryView, LoreEntryWithType};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::lookup::LookupRegistry;

/// Lore association manager service
pub struct LoreAssociationManager<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LoreAssociationManager<'a> {
    /// Create a new LoreAssociationManager
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Replace the set of characters involved in a lore entry
    ///
    /// Every id is resolved before anything is written; duplicate ids collapse.
    /// Returns the resulting involved characters ordered by id.
    #[instrument(skip(self, character_ids), fields(requested = character_ids.len()))]
    pub async fn link_characters(
        &self,
        lore_entry_id: Snowflake,
        character_ids: &[Snowflake],
    ) -> ServiceResult<Vec<CharacterSummary>> {
        let mut tx = self.ctx.write().await?;
        require_lore_entry(tx.as_mut(), lore_entry_id).await?;

        let wanted: BTreeSet<Snowflake> = character_ids.iter().copied().collect();
        let mut characters = Vec::with_capacity(wanted.len());
        for &character_id in &wanted {
            let character = tx.find_character(character_id).await?.ok_or_else(|| {
                DomainError::dangling(
                    EntityKind::CharacterLoreLink,
                    "character_id",
                    EntityKind::Character,
                    character_id,
                )
            })?;
            characters.push(character);
        }

        let current: BTreeSet<Snowflake> = tx
            .list_links(LinkFilter::LoreEntry(lore_entry_id))
            .await?
            .into_iter()
            .map(|link| link.character_id)
            .collect();

        let mut removed = 0usize;
        for &character_id in current.difference(&wanted) {
            tx.delete_link(CharacterLoreLink::new(character_id, lore_entry_id))
                .await?;
            removed += 1;
        }
        let mut added = 0usize;
        for &character_id in wanted.difference(&current) {
            tx.insert_link(CharacterLoreLink::new(character_id, lore_entry_id))
                .await?;
            added += 1;
        }

        if added == 0 && removed == 0 {
            debug!(%lore_entry_id, "Involved characters unchanged");
            return Ok(characters.iter().map(CharacterSummary::from).collect());
        }
        tx.commit().await?;

        info!(%lore_entry_id, added, removed, "Involved characters replaced");
        Ok(characters.iter().map(CharacterSummary::from).collect())
    }

    /// Characters linked to a lore entry, ordered by id
    #[instrument(skip(self))]
    pub async fn involved_characters(&self, lore_entry_id: Snowflake) -> ServiceResult<Vec<CharacterSummary>> {
        let mut tx = self.ctx.read().await?;
        require_lore_entry(tx.as_mut(), lore_entry_id).await?;
        Ok(involved_in(tx.as_mut(), lore_entry_id)
            .await?
            .iter()
            .map(CharacterSummary::from)
            .collect())
    }

    /// Set or clear a character's greatest feat
    ///
    /// Independent of the link set: the feat need not be a linked entry.
    #[instrument(skip(self))]
    pub async fn set_greatest_feat(
        &self,
        character_id: Snowflake,
        lore_entry_id: Option<Snowflake>,
    ) -> ServiceResult<Character> {
        let lore_entry_id = Snowflake::non_zero(lore_entry_id);

        let mut tx = self.ctx.write().await?;
        let mut character = tx
            .find_character(character_id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Character, character_id))?;

        if let Some(lore_id) = lore_entry_id {
            if tx.find_lore_entry(lore_id).await?.is_none() {
                return Err(DomainError::dangling(
                    EntityKind::Character,
                    "greatest_feat_lore_id",
                    EntityKind::LoreEntry,
                    lore_id,
                )
                .into());
            }
        }

        if character.greatest_feat_lore_id == lore_entry_id {
            debug!(%character_id, "Greatest feat unchanged");
            return Ok(character);
        }

        character.set_greatest_feat(lore_entry_id);
        tx.update_character(&character).await?;
        tx.commit().await?;

        info!(%character_id, lore_entry_id = ?lore_entry_id, "Greatest feat set");
        Ok(character)
    }

    /// Lore entries a character is linked to, ordered by id
    #[instrument(skip(self))]
    pub async fn lore_for_character(&self, character_id: Snowflake) -> ServiceResult<Vec<LoreEntrySummary>> {
        let mut tx = self.ctx.read().await?;
        if tx.find_character(character_id).await?.is_none() {
            return Err(DomainError::not_found(EntityKind::Character, character_id).into());
        }

        let lore_types = LookupRegistry::names_in(tx.as_mut(), LookupKind::LoreType).await?;
        let mut summaries = Vec::new();
        for link in tx.list_links(LinkFilter::Character(character_id)).await? {
            if let Some(entry) = tx.find_lore_entry(link.lore_entry_id).await? {
                let lore_type = lore_types.get(&entry.lore_type_id).map_or("", String::as_str);
                summaries.push(LoreEntrySummary::from(LoreEntryWithType {
                    entry: &entry,
                    lore_type,
                }));
            }
        }
        Ok(summaries)
    }

    /// Lore entry page: fields, lore type name, involved characters
    #[instrument(skip(self))]
    pub async fn lore_entry_view(&self, lore_entry_id: Snowflake) -> ServiceResult<LoreEntryView> {
        let mut tx = self.ctx.read().await?;
        let entry = require_lore_entry(tx.as_mut(), lore_entry_id).await?;
        let lore_type = tx
            .find_lookup(LookupKind::LoreType, entry.lore_type_id)
            .await?
            .map(|t| t.name)
            .unwrap_or_default();
        let characters = involved_in(tx.as_mut(), lore_entry_id)
            .await?
            .iter()
            .map(CharacterSummary::from)
            .collect();

        Ok(LoreEntryView::new(
            LoreEntryWithType {
                entry: &entry,
                lore_type: &lore_type,
            },
            characters,
        ))
    }
}

async fn require_lore_entry(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<LoreEntry> {
    tx.find_lore_entry(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::LoreEntry, id))
}

/// Linked characters in id order (links come back ordered by character id)
async fn involved_in(tx: &mut dyn CatalogTransaction, lore_entry_id: Snowflake) -> RepoResult<Vec<Character>> {
    let mut characters = Vec::new();
    for link in tx.list_links(LinkFilter::LoreEntry(lore_entry_id)).await? {
        if let Some(character) = tx.find_character(link.character_id).await? {
            characters.push(character);
        }
    }
    Ok(characters)
}
