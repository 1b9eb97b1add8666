//! Service context - dependency container for services
//!
//! Holds the catalog store and the id generator needed by services.

use std::sync::Arc;

use codex_core::{CatalogStore, CatalogTransaction, RepoResult, Snowflake, SnowflakeGenerator, TxMode};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the dependency container that gets passed to all services.
/// It provides access to:
/// - The catalog store every operation opens its transaction on
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn CatalogStore>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(store: Arc<dyn CatalogStore>, snowflake_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            store,
            snowflake_generator,
        }
    }

    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Store ===

    /// Get the catalog store
    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    /// Open a read-only snapshot transaction
    pub async fn read(&self) -> RepoResult<Box<dyn CatalogTransaction>> {
        self.store.begin(TxMode::ReadOnly).await
    }

    /// Open a read-write transaction
    pub async fn write(&self) -> RepoResult<Box<dyn CatalogTransaction>> {
        self.store.begin(TxMode::ReadWrite).await
    }

    // === Ids ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"dyn CatalogStore")
            .field("snowflake_generator", &self.snowflake_generator)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn CatalogStore>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            snowflake_generator: None,
        }
    }

    pub fn store(mut self, store: Arc<dyn CatalogStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
