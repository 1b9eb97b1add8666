//! # codex-db
//!
//! Storage layer implementing the catalog store traits.
//!
//! ## Overview
//!
//! Two implementations of [`codex_core::CatalogStore`] live here:
//!
//! - [`PgCatalogStore`]: PostgreSQL via SQLx, one database transaction per
//!   catalog transaction (SERIALIZABLE for writers)
//! - [`MemoryCatalogStore`]: process-local tables with copy-on-write snapshots
//!
//! plus connection pool management, the schema migration, database models with
//! SQLx `FromRow` derives, and model → entity mappers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use codex_common::DatabaseConfig;
//! use codex_core::{CatalogStore, TxMode};
//! use codex_db::{create_pool, run_migrations, PgCatalogStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::with_url("postgres://localhost/codex");
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool, &config.migrations_dir).await?;
//!
//!     let store = PgCatalogStore::new(pool);
//!     let mut tx = store.begin(TxMode::ReadOnly).await?;
//!     let characters = tx.list_characters().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod store;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool};
pub use store::{MemoryCatalogStore, PgCatalogStore};
