//! Shared fixtures for service tests

use std::sync::Arc;

use codex_core::{LookupEntry, LookupKind, Snowflake, SnowflakeGenerator};
use codex_db::MemoryCatalogStore;

use super::context::ServiceContext;
use super::lookup::LookupRegistry;

pub const QUEST: Snowflake = Snowflake::new(1);
pub const ORIGIN: Snowflake = Snowflake::new(2);

pub const OFFICIAL_ART: Snowflake = Snowflake::new(1);
pub const FAN_ART: Snowflake = Snowflake::new(2);
pub const SCREENSHOTS: Snowflake = Snowflake::new(3);

/// Empty in-memory catalog
pub fn test_context() -> ServiceContext {
    ServiceContext::new(
        Arc::new(MemoryCatalogStore::new()),
        Arc::new(SnowflakeGenerator::new(0)),
    )
}

/// In-memory catalog with the default lore types and gallery categories
pub async fn seeded_context() -> ServiceContext {
    let ctx = test_context();
    let registry = LookupRegistry::new(&ctx);
    registry
        .seed(
            LookupKind::LoreType,
            &[
                LookupEntry::new(QUEST, "Quest"),
                LookupEntry::new(ORIGIN, "Origin"),
                LookupEntry::new(3, "Event"),
            ],
        )
        .await
        .expect("seed lore types");
    registry
        .seed(
            LookupKind::GalleryImageCategory,
            &[
                LookupEntry::new(OFFICIAL_ART, "Official Art"),
                LookupEntry::new(FAN_ART, "Fan Art"),
                LookupEntry::new(SCREENSHOTS, "Screenshots"),
            ],
        )
        .await
        .expect("seed gallery categories");
    ctx
}
