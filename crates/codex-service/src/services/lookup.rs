//! Lookup registry
//!
//! Closed enumerations (lore types, gallery image categories) referenced by id.
//! Every component that accepts a lookup id validates it here.

use std::collections::BTreeMap;

use codex_core::{
    CatalogTransaction, DomainError, EntityKind, LookupEntry, LookupKind, RepoResult, Snowflake,
};
use tracing::{debug, info, instrument};

use crate::dto::LookupView;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Lookup registry service
pub struct LookupRegistry<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LookupRegistry<'a> {
    /// Create a new LookupRegistry
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Whether `id` names a row of `kind`
    #[instrument(skip(self))]
    pub async fn resolve(&self, kind: LookupKind, id: Snowflake) -> ServiceResult<bool> {
        let mut tx = self.ctx.read().await?;
        Ok(tx.find_lookup(kind, id).await?.is_some())
    }

    /// All rows of `kind` in ascending id order
    #[instrument(skip(self))]
    pub async fn list(&self, kind: LookupKind) -> ServiceResult<Vec<LookupView>> {
        let mut tx = self.ctx.read().await?;
        let entries = tx.list_lookups(kind).await?;
        Ok(entries.into_iter().map(LookupView::from).collect())
    }

    /// Fail with a referential-integrity error unless `id` resolves
    #[instrument(skip(self))]
    pub async fn require(&self, kind: LookupKind, id: Snowflake) -> ServiceResult<()> {
        let mut tx = self.ctx.read().await?;
        Self::require_in(tx.as_mut(), kind, id, kind.entity_kind(), "id").await?;
        Ok(())
    }

    /// Insert the configured rows that are not there yet
    ///
    /// Returns how many rows were inserted. Existing ids keep their names.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub async fn seed(&self, kind: LookupKind, entries: &[LookupEntry]) -> ServiceResult<usize> {
        for entry in entries {
            if entry.id.is_zero() {
                return Err(DomainError::validation(kind.entity_kind(), "id", "must not be zero").into());
            }
            if entry.name.trim().is_empty() {
                return Err(DomainError::validation(kind.entity_kind(), "name", "must not be blank").into());
            }
        }

        let mut tx = self.ctx.write().await?;
        let mut inserted = 0;
        for entry in entries {
            if tx.find_lookup(kind, entry.id).await?.is_some() {
                debug!(%kind, id = %entry.id, "Lookup already seeded");
                continue;
            }
            tx.insert_lookup(kind, entry).await?;
            inserted += 1;
        }
        tx.commit().await?;

        info!(%kind, inserted, "Lookups seeded");
        Ok(inserted)
    }

    // ------------------------------------------------------------------------
    // Transaction-scoped helpers shared by the other components
    // ------------------------------------------------------------------------

    /// Check a lookup reference held by a `referrer` record's `field`
    pub(crate) async fn require_in(
        tx: &mut dyn CatalogTransaction,
        kind: LookupKind,
        id: Snowflake,
        referrer: EntityKind,
        field: &'static str,
    ) -> RepoResult<LookupEntry> {
        tx.find_lookup(kind, id)
            .await?
            .ok_or_else(|| DomainError::dangling(referrer, field, kind.entity_kind(), id))
    }

    /// Id -> name map for joining names into projections
    pub(crate) async fn names_in(
        tx: &mut dyn CatalogTransaction,
        kind: LookupKind,
    ) -> RepoResult<BTreeMap<Snowflake, String>> {
        Ok(tx
            .list_lookups(kind)
            .await?
            .into_iter()
            .map(|entry| (entry.id, entry.name))
            .collect())
    }
}
