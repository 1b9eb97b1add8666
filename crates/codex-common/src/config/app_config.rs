//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use codex_core::{LookupEntry, Snowflake};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub store: StoreConfig,
    pub snowflake: SnowflakeConfig,
    pub lookups: LookupSeedConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Which catalog store backs the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local snapshot store
    #[default]
    Memory,
    /// PostgreSQL
    Postgres,
}

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Present whenever `backend` is `Postgres`
    pub database: Option<DatabaseConfig>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    /// Directory holding the SQL migrations
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
}

impl DatabaseConfig {
    /// Config for a URL with every other setting at its default
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            migrations_dir: default_migrations_dir(),
        }
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Seed rows for the closed lookups
#[derive(Debug, Clone)]
pub struct LookupSeedConfig {
    pub lore_types: Vec<LookupEntry>,
    pub gallery_categories: Vec<LookupEntry>,
}

impl Default for LookupSeedConfig {
    fn default() -> Self {
        Self {
            lore_types: default_lore_types(),
            gallery_categories: default_gallery_categories(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "character-codex".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_migrations_dir() -> String {
    "./crates/codex-db/migrations".to_string()
}

fn default_lore_types() -> Vec<LookupEntry> {
    vec![
        LookupEntry::new(1, "Quest"),
        LookupEntry::new(2, "Origin"),
        LookupEntry::new(3, "Event"),
    ]
}

fn default_gallery_categories() -> Vec<LookupEntry> {
    vec![
        LookupEntry::new(1, "Official Art"),
        LookupEntry::new(2, "Fan Art"),
        LookupEntry::new(3, "Screenshots"),
    ]
}

/// Parse a seed list in `id:name,id:name` form
fn parse_seed_list(var: &'static str, raw: &str) -> Result<Vec<LookupEntry>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (id, name) = item
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidValue(var, item.to_string()))?;
            let id = Snowflake::parse(id)
                .map_err(|_| ConfigError::InvalidValue(var, item.to_string()))?;
            let name = name.trim();
            if id.is_zero() || name.is_empty() {
                return Err(ConfigError::InvalidValue(var, item.to_string()));
            }
            Ok(LookupEntry::new(id, name))
        })
        .collect()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is malformed
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match var("STORE_BACKEND") {
            None => StoreBackend::default(),
            Some(raw) => match raw.to_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                "postgres" | "postgresql" => StoreBackend::Postgres,
                _ => return Err(ConfigError::InvalidValue("STORE_BACKEND", raw)),
            },
        };

        let database = match var("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: var("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: var("DATABASE_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
                acquire_timeout_secs: var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_acquire_timeout),
                migrations_dir: var("DATABASE_MIGRATIONS_DIR")
                    .unwrap_or_else(default_migrations_dir),
            }),
            None if backend == StoreBackend::Postgres => {
                return Err(ConfigError::MissingVar("DATABASE_URL"))
            }
            None => None,
        };

        let worker_id = match var("WORKER_ID") {
            None => 0,
            Some(raw) => raw
                .parse::<u16>()
                .ok()
                .filter(|id| *id < 1024)
                .ok_or(ConfigError::InvalidValue("WORKER_ID", raw))?,
        };

        let lore_types = match var("LORE_TYPES") {
            Some(raw) => parse_seed_list("LORE_TYPES", &raw)?,
            None => default_lore_types(),
        };
        let gallery_categories = match var("GALLERY_CATEGORIES") {
            Some(raw) => parse_seed_list("GALLERY_CATEGORIES", &raw)?,
            None => default_gallery_categories(),
        };

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env: var("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            store: StoreConfig { backend, database },
            snowflake: SnowflakeConfig { worker_id },
            lookups: LookupSeedConfig {
                lore_types,
                gallery_categories,
            },
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: default_env(),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                database: None,
            },
            snowflake: SnowflakeConfig { worker_id: 0 },
            lookups: LookupSeedConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
