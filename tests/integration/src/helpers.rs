//! Test helpers for integration tests
//!
//! Provides catalog setup for either store backend and assertions on the
//! error taxonomy.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU16, Ordering};

use anyhow::Result;
use codex_common::{AppConfig, DatabaseConfig, StoreBackend, StoreConfig};
use codex_service::{bootstrap, ServiceContext, ServiceError};
use tokio::sync::Mutex;

/// Worker ids handed to test catalogs, so concurrent Postgres runs never collide
static WORKER_COUNTER: AtomicU16 = AtomicU16::new(1);

/// Get a unique worker id for testing
pub fn next_worker_id() -> u16 {
    WORKER_COUNTER.fetch_add(1, Ordering::SeqCst) % 1024
}

/// Migrations and lookup seeding race when tests bootstrap the same database in parallel
static POSTGRES_BOOTSTRAP: Mutex<()> = Mutex::const_new(());

/// A bootstrapped catalog with the default lookups seeded
pub struct TestCatalog {
    pub ctx: ServiceContext,
}

impl TestCatalog {
    /// Start a catalog on the in-memory store
    pub async fn start() -> Result<Self> {
        let mut config = AppConfig::default();
        config.snowflake.worker_id = next_worker_id();
        Self::start_with_config(config).await
    }

    /// Start a catalog on the PostgreSQL database named by `DATABASE_URL`
    pub async fn start_postgres() -> Result<Self> {
        let config = postgres_config()?;
        let _guard = POSTGRES_BOOTSTRAP.lock().await;
        Self::start_with_config(config).await
    }

    /// Start a catalog with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let ctx = bootstrap(&config)
            .await
            .map_err(|e| anyhow::anyhow!("Bootstrap error: {e}"))?;
        Ok(Self { ctx })
    }
}

/// Create a PostgreSQL test configuration
pub fn postgres_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL")?;
    let mut database = DatabaseConfig::with_url(url);
    database.migrations_dir = format!("{}/../../crates/codex-db/migrations", env!("CARGO_MANIFEST_DIR"));

    let mut config = AppConfig::default();
    config.store = StoreConfig {
        backend: StoreBackend::Postgres,
        database: Some(database),
    };
    config.snowflake.worker_id = next_worker_id();
    Ok(config)
}

/// Helper to check if the PostgreSQL environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    true
}

/// Assert an operation failed with the given error code
pub fn assert_error<T: Debug>(result: Result<T, ServiceError>, expected_code: &str) -> Result<ServiceError> {
    match result {
        Ok(value) => anyhow::bail!("Expected {expected_code}, got Ok({value:?})"),
        Err(err) if err.error_code() == expected_code => Ok(err),
        Err(err) => anyhow::bail!(
            "Expected {}, got {} ({})",
            expected_code,
            err.error_code(),
            err
        ),
    }
}
