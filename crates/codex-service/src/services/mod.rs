//! Catalog services
//!
//! One service per component. Each borrows the shared [`ServiceContext`] and
//! runs every operation inside a single store transaction.

pub mod attire;
pub mod context;
pub mod entity;
pub mod error;
pub mod gallery;
pub mod lookup;
pub mod lore;
mod records;

#[cfg(test)]
pub(crate) mod testing;

// Re-export all services for convenience
pub use attire::AttireComposer;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use entity::{CatalogRecord, EntityStore, RecordSet};
pub use error::{invalid_payload, ServiceError, ServiceResult};
pub use gallery::GalleryCurator;
pub use lookup::LookupRegistry;
pub use lore::LoreAssociationManager;
