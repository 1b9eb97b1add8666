//! # codex-service
//!
//! Application layer: the catalog components as services, request DTOs and
//! read projections.
//!
//! | Service | Owns |
//! |---------|------|
//! | [`LookupRegistry`] | Lore types and gallery image categories |
//! | [`EntityStore`] | Validated create/update/get/list/delete with cascades |
//! | [`LoreAssociationManager`] | Character <-> lore links, greatest feats |
//! | [`AttireComposer`] | Wardrobes, accessories, the character profile |
//! | [`GalleryCurator`] | Image categories and flags |
//!
//! ```rust,ignore
//! let ctx = codex_service::bootstrap(&AppConfig::from_env()?).await?;
//! let aria: Character = EntityStore::new(&ctx).create(request).await?;
//! let profile = AttireComposer::new(&ctx).character_profile(aria.id).await?;
//! ```

pub mod bootstrap;
pub mod dto;
pub mod services;

pub use bootstrap::bootstrap;
pub use services::{
    AttireComposer, CatalogRecord, EntityStore, GalleryCurator, LookupRegistry,
    LoreAssociationManager, RecordSet, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult,
};
