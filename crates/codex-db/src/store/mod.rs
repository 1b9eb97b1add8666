//! Catalog store implementations
//!
//! Both stores implement [`codex_core::CatalogStore`] with the same contract:
//! ascending-id listings, NotFound on single-row update/delete misses, and no
//! implicit cascades.

mod error;
mod memory;
mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;
