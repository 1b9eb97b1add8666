//! Catalog Integration Tests
//!
//! Scenarios run against the in-memory store. The `postgres_*` tests
//! additionally require a PostgreSQL instance named by DATABASE_URL and are
//! skipped without it.
//!
//! Run with: cargo test -p integration-tests --test catalog_tests

use codex_core::{Accessory, Attire, Character, EntityKind, GalleryImage, LoreEntry, Snowflake};
use codex_service::{
    AttireComposer, EntityStore, GalleryCurator, LoreAssociationManager, ServiceContext,
};
use integration_tests::{assert_error, check_test_env, fixtures::*, TestCatalog};

// ============================================================================
// Scenarios shared by both backends
// ============================================================================

async fn first_trial_scenario(ctx: &ServiceContext) {
    let store = EntityStore::new(ctx);
    let lore = LoreAssociationManager::new(ctx);

    let c1: Character = store.create(character(&["Everyday"])).await.unwrap();
    let l1: LoreEntry = store.create(lore_entry("First Trial")).await.unwrap();

    lore.link_characters(l1.id, &[c1.id]).await.unwrap();
    let involved = lore.involved_characters(l1.id).await.unwrap();
    assert_eq!(involved.len(), 1);
    assert_eq!(involved[0].id, c1.id);
    assert_eq!(involved[0].display_name, c1.name);

    lore.set_greatest_feat(c1.id, Some(l1.id)).await.unwrap();

    let profile = AttireComposer::new(ctx).character_profile(c1.id).await.unwrap();
    let feat = profile.greatest_feat.expect("greatest feat is set");
    assert_eq!(feat.id, l1.id);
    assert_eq!(feat.title, "First Trial");
    assert_eq!(feat.lore_type, "Quest");
    assert_eq!(profile.default_attire.name, "Everyday");
}

async fn character_cascade_scenario(ctx: &ServiceContext) {
    let store = EntityStore::new(ctx);
    let composer = AttireComposer::new(ctx);
    let lore = LoreAssociationManager::new(ctx);

    let c: Character = store.create(character(&["X", "Y"])).await.unwrap();
    let bystander: Character = store.create(character(&["Plain"])).await.unwrap();
    let wardrobe = composer.wardrobe(c.id).await.unwrap();
    let (x, y) = (wardrobe[0].id, wardrobe[1].id);
    let z = composer.add_accessory(y, accessory("Storm lance", true)).await.unwrap();
    let l: LoreEntry = store.create(lore_entry("The Crossing")).await.unwrap();
    lore.link_characters(l.id, &[c.id, bystander.id]).await.unwrap();

    store.delete(EntityKind::Character, c.id).await.unwrap();

    for id in [x, y] {
        assert_error(store.get::<Attire>(id).await, "NOT_FOUND").unwrap();
    }
    assert_error(store.get::<Accessory>(z.id).await, "NOT_FOUND").unwrap();

    let involved = lore.involved_characters(l.id).await.unwrap();
    assert_eq!(involved.iter().map(|s| s.id).collect::<Vec<_>>(), vec![bystander.id]);
}

// ============================================================================
// In-memory scenarios
// ============================================================================

#[tokio::test]
async fn test_first_trial_end_to_end() {
    let catalog = TestCatalog::start().await.expect("Failed to start catalog");
    first_trial_scenario(&catalog.ctx).await;
}

#[tokio::test]
async fn test_character_delete_cascades() {
    let catalog = TestCatalog::start().await.expect("Failed to start catalog");
    character_cascade_scenario(&catalog.ctx).await;
}

#[tokio::test]
async fn test_lore_delete_clears_greatest_feat() {
    let catalog = TestCatalog::start().await.expect("Failed to start catalog");
    let ctx = &catalog.ctx;
    let store = EntityStore::new(ctx);
    let lore = LoreAssociationManager::new(ctx);

    let c: Character = store.create(character(&["Everyday"])).await.unwrap();
    let l: LoreEntry = store.create(lore_entry("The Long Night")).await.unwrap();
    lore.set_greatest_feat(c.id, Some(l.id)).await.unwrap();

    store.delete(EntityKind::LoreEntry, l.id).await.unwrap();

    let c = store.get::<Character>(c.id).await.unwrap();
    assert_eq!(c.greatest_feat_lore_id, None);
    let profile = AttireComposer::new(ctx).character_profile(c.id).await.unwrap();
    assert!(profile.greatest_feat.is_none());
}

#[tokio::test]
async fn test_reassign_category_preserves_identity() {
    let catalog = TestCatalog::start().await.expect("Failed to start catalog");
    let curator = GalleryCurator::new(&catalog.ctx);

    let img7 = curator.add_image(image(OFFICIAL_ART)).await.unwrap();
    curator.reassign_category(img7.id, FAN_ART).await.unwrap();

    let fetched = EntityStore::new(&catalog.ctx)
        .get::<GalleryImage>(img7.id)
        .await
        .unwrap();
    assert_eq!(fetched.id, img7.id);
    assert_eq!(fetched.image_url, img7.image_url);
    assert_eq!(fetched.alt_text, img7.alt_text);
    assert_eq!(fetched.category_id, FAN_ART);
}

#[tokio::test]
async fn test_validation_runs_before_reference_checks() {
    let catalog = TestCatalog::start().await.expect("Failed to start catalog");
    let store = EntityStore::new(&catalog.ctx);

    let mut request = lore_entry("");
    request.lore_type_id = Snowflake::new(9999);
    request.narrative = "x".to_string();
    assert_error(store.create::<LoreEntry>(request).await, "VALIDATION_ERROR").unwrap();

    let mut request = lore_entry("Untyped");
    request.lore_type_id = Snowflake::new(9999);
    assert_error(store.create::<LoreEntry>(request).await, "REFERENTIAL_INTEGRITY").unwrap();

    assert!(store.list::<LoreEntry>().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_nested_attire_writes_nothing() {
    let catalog = TestCatalog::start().await.expect("Failed to start catalog");
    let store = EntityStore::new(&catalog.ctx);

    let mut request = character(&["Everyday", "Formal"]);
    request.attires[1].name = "   ".to_string();
    let err = assert_error(store.create::<Character>(request).await, "VALIDATION_ERROR").unwrap();
    assert!(err.to_string().contains("attires[1].name"), "{err}");

    assert!(store.list::<Character>().await.unwrap().is_empty());
    assert!(store.list::<Attire>().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_attire_name_conflicts() {
    let catalog = TestCatalog::start().await.expect("Failed to start catalog");
    let store = EntityStore::new(&catalog.ctx);
    let composer = AttireComposer::new(&catalog.ctx);

    let c: Character = store.create(character(&["Battle Form"])).await.unwrap();
    assert_error(composer.add_attire(c.id, attire("Battle Form")).await, "CONFLICT").unwrap();
    assert_eq!(composer.wardrobe(c.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_same_name_attires_serialize() {
    let catalog = TestCatalog::start().await.expect("Failed to start catalog");
    let c: Character = EntityStore::new(&catalog.ctx)
        .create(character(&["Everyday"]))
        .await
        .unwrap();
    let character_id = c.id;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ctx = catalog.ctx.clone();
            tokio::spawn(async move {
                AttireComposer::new(&ctx)
                    .add_attire(character_id, attire("Battle Form"))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            created += 1;
        }
    }
    assert_eq!(created, 1);

    let names: Vec<_> = AttireComposer::new(&catalog.ctx)
        .wardrobe(c.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, vec!["Everyday", "Battle Form"]);
}

#[tokio::test]
async fn test_concurrent_link_replacements_leave_one_full_set() {
    let catalog = TestCatalog::start().await.expect("Failed to start catalog");
    let store = EntityStore::new(&catalog.ctx);
    let a: Character = store.create(character(&[])).await.unwrap();
    let b: Character = store.create(character(&[])).await.unwrap();
    let l: LoreEntry = store.create(lore_entry("The Accord")).await.unwrap();
    let lore_id = l.id;

    let sets = [vec![a.id], vec![b.id], vec![a.id, b.id]];
    let handles: Vec<_> = sets
        .iter()
        .cloned()
        .map(|ids| {
            let ctx = catalog.ctx.clone();
            tokio::spawn(async move {
                LoreAssociationManager::new(&ctx)
                    .link_characters(lore_id, &ids)
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Whatever ran last, the result is exactly one of the requested sets
    let involved: Vec<_> = LoreAssociationManager::new(&catalog.ctx)
        .involved_characters(lore_id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert!(sets.contains(&involved), "{involved:?}");
}

#[tokio::test]
async fn test_profile_serializes_ids_as_strings() {
    let catalog = TestCatalog::start().await.expect("Failed to start catalog");
    let c: Character = EntityStore::new(&catalog.ctx)
        .create(character(&["Everyday"]))
        .await
        .unwrap();

    let profile = AttireComposer::new(&catalog.ctx)
        .character_profile(c.id)
        .await
        .unwrap();
    let json = serde_json::to_value(&profile).unwrap();
    assert_eq!(json["id"], c.id.to_string());
    assert_eq!(json["wardrobe"][0]["is_default"], true);
    assert!(json.get("alias").is_none());
}

// ============================================================================
// PostgreSQL scenarios
// ============================================================================

#[tokio::test]
async fn test_postgres_first_trial_end_to_end() {
    if !check_test_env() {
        return;
    }

    let catalog = TestCatalog::start_postgres().await.expect("Failed to start catalog");
    first_trial_scenario(&catalog.ctx).await;
}

#[tokio::test]
async fn test_postgres_character_delete_cascades() {
    if !check_test_env() {
        return;
    }

    let catalog = TestCatalog::start_postgres().await.expect("Failed to start catalog");
    character_cascade_scenario(&catalog.ctx).await;
}

#[tokio::test]
async fn test_postgres_gallery_round_trip() {
    if !check_test_env() {
        return;
    }

    let catalog = TestCatalog::start_postgres().await.expect("Failed to start catalog");
    let curator = GalleryCurator::new(&catalog.ctx);

    let img = curator.add_image(image(OFFICIAL_ART)).await.unwrap();
    let img = curator.set_flags(img.id, Some(true), None).await.unwrap();
    curator.reassign_category(img.id, FAN_ART).await.unwrap();

    let fan_art = curator.list_by_category(FAN_ART).await.unwrap();
    let view = fan_art.iter().find(|v| v.id == img.id).expect("image moved");
    assert!(view.is_featured);
    assert_eq!(view.category, "Fan Art");

    curator.delete_image(img.id).await.unwrap();
    assert_error(curator.delete_image(img.id).await, "NOT_FOUND").unwrap();
}
