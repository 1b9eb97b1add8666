//! Service wiring from configuration
//!
//! Builds the configured catalog store, applies the schema when it is
//! PostgreSQL, and seeds both lookups before any operation runs.

use std::sync::Arc;

use codex_common::{AppConfig, AppError, AppResult, StoreBackend};
use codex_core::{CatalogStore, LookupKind, SnowflakeGenerator};
use codex_db::{create_pool, run_migrations, MemoryCatalogStore, PgCatalogStore};
use tracing::info;

use crate::services::{LookupRegistry, ServiceContext};

/// Build a ready-to-use service context
pub async fn bootstrap(config: &AppConfig) -> AppResult<ServiceContext> {
    let store: Arc<dyn CatalogStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryCatalogStore::new()),
        StoreBackend::Postgres => {
            let database = config
                .store
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("postgres backend without DATABASE_URL".to_string()))?;
            let pool = create_pool(database)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            run_migrations(&pool, &database.migrations_dir)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Arc::new(PgCatalogStore::new(pool))
        }
    };

    let ctx = ServiceContext::new(store, Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)));

    let registry = LookupRegistry::new(&ctx);
    let lore_types = registry
        .seed(LookupKind::LoreType, &config.lookups.lore_types)
        .await?;
    let categories = registry
        .seed(LookupKind::GalleryImageCategory, &config.lookups.gallery_categories)
        .await?;

    info!(
        app = %config.app.name,
        backend = ?config.store.backend,
        worker_id = config.snowflake.worker_id,
        lore_types,
        categories,
        "Catalog services ready"
    );
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_common::LookupSeedConfig;
    use codex_core::LookupEntry;

    #[tokio::test]
    async fn test_memory_bootstrap_seeds_lookups() {
        let ctx = bootstrap(&AppConfig::default()).await.unwrap();
        let registry = LookupRegistry::new(&ctx);

        let lore_types = registry.list(LookupKind::LoreType).await.unwrap();
        assert_eq!(lore_types.len(), 3);
        assert_eq!(lore_types[0].name, "Quest");
        assert_eq!(
            registry.list(LookupKind::GalleryImageCategory).await.unwrap().len(),
            3
        );
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_bad_seed() {
        let config = AppConfig {
            lookups: LookupSeedConfig {
                lore_types: vec![LookupEntry::new(0, "Nothing")],
                gallery_categories: Vec::new(),
            },
            ..AppConfig::default()
        };
        let err = bootstrap(&config).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
