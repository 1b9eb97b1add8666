//! PostgreSQL implementation of CatalogStore

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use codex_core::{
    Accessory, Attire, CatalogStore, CatalogTransaction, Character, CharacterLoreLink, EntityKind,
    GalleryImage, LinkFilter, LookupEntry, LookupKind, LoreEntry, RepoResult, Snowflake, TxMode,
};

use crate::models::{
    AccessoryModel, AttireModel, CharacterLoreLinkModel, CharacterModel, GalleryImageModel,
    LookupModel, LoreEntryModel,
};

use super::error::{ensure_writable, map_attire_error, map_db_error, row_not_found};

const CHARACTER_COLUMNS: &str = "id, name, alias, age, origin, physical_description, \
     power_description, bio, greatest_feat_lore_id";
const ATTIRE_COLUMNS: &str =
    "id, character_id, name, attire_type, description, hairstyle_description";
const ACCESSORY_COLUMNS: &str = "id, attire_id, description, is_weapon, unique_effect";
const LORE_COLUMNS: &str = "id, title, lore_type_id, narrative";
const IMAGE_COLUMNS: &str = "id, image_url, alt_text, is_featured, is_mature, category_id";

/// PostgreSQL implementation of CatalogStore
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Create a new PgCatalogStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    #[instrument(skip(self))]
    async fn begin(&self, mode: TxMode) -> RepoResult<Box<dyn CatalogTransaction>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Writers are SERIALIZABLE so check-then-write sequences cannot race;
        // readers get one consistent snapshot for multi-query projections
        let isolation = match mode {
            TxMode::ReadWrite => "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE",
            TxMode::ReadOnly => "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY",
        };
        sqlx::query(isolation)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        Ok(Box::new(PgCatalogTransaction { tx, mode }))
    }
}

/// One database transaction
///
/// Dropping it without `commit` rolls the database transaction back.
pub struct PgCatalogTransaction {
    tx: Transaction<'static, Postgres>,
    mode: TxMode,
}

impl PgCatalogTransaction {
    async fn fetch_characters(&mut self, filter: &str, id: Option<Snowflake>) -> RepoResult<Vec<Character>> {
        let sql = format!("SELECT {CHARACTER_COLUMNS} FROM characters {filter} ORDER BY id");
        let mut query = sqlx::query_as::<_, CharacterModel>(&sql);
        if let Some(id) = id {
            query = query.bind(id.into_inner());
        }
        let rows = query.fetch_all(&mut *self.tx).await.map_err(map_db_error)?;
        Ok(rows.into_iter().map(Character::from).collect())
    }

    async fn delete_by_id(&mut self, table: &str, kind: EntityKind, id: Snowflake) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&sql)
            .bind(id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(row_not_found(kind, id));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogTransaction for PgCatalogTransaction {
    fn mode(&self) -> TxMode {
        self.mode
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn find_lookup(&mut self, kind: LookupKind, id: Snowflake) -> RepoResult<Option<LookupEntry>> {
        let sql = format!("SELECT id, name FROM {} WHERE id = $1", LookupModel::table(kind));
        let result = sqlx::query_as::<_, LookupModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(LookupEntry::from))
    }

    #[instrument(skip(self))]
    async fn list_lookups(&mut self, kind: LookupKind) -> RepoResult<Vec<LookupEntry>> {
        let sql = format!("SELECT id, name FROM {} ORDER BY id", LookupModel::table(kind));
        let results = sqlx::query_as::<_, LookupModel>(&sql)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(LookupEntry::from).collect())
    }

    #[instrument(skip(self))]
    async fn insert_lookup(&mut self, kind: LookupKind, entry: &LookupEntry) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        let sql = format!("INSERT INTO {} (id, name) VALUES ($1, $2)", LookupModel::table(kind));
        sqlx::query(&sql)
            .bind(entry.id.into_inner())
            .bind(&entry.name)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Characters
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn find_character(&mut self, id: Snowflake) -> RepoResult<Option<Character>> {
        let mut rows = self.fetch_characters("WHERE id = $1", Some(id)).await?;
        Ok(rows.pop())
    }

    #[instrument(skip(self))]
    async fn list_characters(&mut self) -> RepoResult<Vec<Character>> {
        self.fetch_characters("", None).await
    }

    #[instrument(skip(self))]
    async fn characters_with_feat(&mut self, lore_entry_id: Snowflake) -> RepoResult<Vec<Character>> {
        self.fetch_characters("WHERE greatest_feat_lore_id = $1", Some(lore_entry_id))
            .await
    }

    #[instrument(skip(self))]
    async fn insert_character(&mut self, character: &Character) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        sqlx::query(
            r#"
            INSERT INTO characters (id, name, alias, age, origin, physical_description,
                                    power_description, bio, greatest_feat_lore_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(character.id.into_inner())
        .bind(&character.name)
        .bind(&character.alias)
        .bind(character.age)
        .bind(&character.origin)
        .bind(&character.physical_description)
        .bind(&character.power_description)
        .bind(&character.bio)
        .bind(character.greatest_feat_lore_id.map(Snowflake::into_inner))
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_character(&mut self, character: &Character) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        let result = sqlx::query(
            r#"
            UPDATE characters
            SET name = $2, alias = $3, age = $4, origin = $5, physical_description = $6,
                power_description = $7, bio = $8, greatest_feat_lore_id = $9
            WHERE id = $1
            "#,
        )
        .bind(character.id.into_inner())
        .bind(&character.name)
        .bind(&character.alias)
        .bind(character.age)
        .bind(&character.origin)
        .bind(&character.physical_description)
        .bind(&character.power_description)
        .bind(&character.bio)
        .bind(character.greatest_feat_lore_id.map(Snowflake::into_inner))
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(row_not_found(EntityKind::Character, character.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_character(&mut self, id: Snowflake) -> RepoResult<()> {
        self.delete_by_id("characters", EntityKind::Character, id).await
    }

    // ------------------------------------------------------------------------
    // Attires
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn find_attire(&mut self, id: Snowflake) -> RepoResult<Option<Attire>> {
        let sql = format!("SELECT {ATTIRE_COLUMNS} FROM attires WHERE id = $1");
        let result = sqlx::query_as::<_, AttireModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Attire::from))
    }

    #[instrument(skip(self))]
    async fn list_attires(&mut self, character_id: Option<Snowflake>) -> RepoResult<Vec<Attire>> {
        let sql = format!(
            "SELECT {ATTIRE_COLUMNS} FROM attires \
             WHERE ($1::BIGINT IS NULL OR character_id = $1) ORDER BY id"
        );
        let results = sqlx::query_as::<_, AttireModel>(&sql)
            .bind(character_id.map(Snowflake::into_inner))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Attire::from).collect())
    }

    #[instrument(skip(self))]
    async fn insert_attire(&mut self, attire: &Attire) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        sqlx::query(
            r#"
            INSERT INTO attires (id, character_id, name, attire_type, description, hairstyle_description)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(attire.id.into_inner())
        .bind(attire.character_id.into_inner())
        .bind(&attire.name)
        .bind(&attire.attire_type)
        .bind(&attire.description)
        .bind(&attire.hairstyle_description)
        .execute(&mut *self.tx)
        .await
        .map_err(map_attire_error(attire))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_attire(&mut self, attire: &Attire) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        let result = sqlx::query(
            r#"
            UPDATE attires
            SET character_id = $2, name = $3, attire_type = $4, description = $5,
                hairstyle_description = $6
            WHERE id = $1
            "#,
        )
        .bind(attire.id.into_inner())
        .bind(attire.character_id.into_inner())
        .bind(&attire.name)
        .bind(&attire.attire_type)
        .bind(&attire.description)
        .bind(&attire.hairstyle_description)
        .execute(&mut *self.tx)
        .await
        .map_err(map_attire_error(attire))?;

        if result.rows_affected() == 0 {
            return Err(row_not_found(EntityKind::Attire, attire.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_attire(&mut self, id: Snowflake) -> RepoResult<()> {
        self.delete_by_id("attires", EntityKind::Attire, id).await
    }

    // ------------------------------------------------------------------------
    // Accessories
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn find_accessory(&mut self, id: Snowflake) -> RepoResult<Option<Accessory>> {
        let sql = format!("SELECT {ACCESSORY_COLUMNS} FROM accessories WHERE id = $1");
        let result = sqlx::query_as::<_, AccessoryModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Accessory::from))
    }

    #[instrument(skip(self))]
    async fn list_accessories(&mut self, attire_id: Option<Snowflake>) -> RepoResult<Vec<Accessory>> {
        let sql = format!(
            "SELECT {ACCESSORY_COLUMNS} FROM accessories \
             WHERE ($1::BIGINT IS NULL OR attire_id = $1) ORDER BY id"
        );
        let results = sqlx::query_as::<_, AccessoryModel>(&sql)
            .bind(attire_id.map(Snowflake::into_inner))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Accessory::from).collect())
    }

    #[instrument(skip(self))]
    async fn insert_accessory(&mut self, accessory: &Accessory) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        sqlx::query(
            r#"
            INSERT INTO accessories (id, attire_id, description, is_weapon, unique_effect)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(accessory.id.into_inner())
        .bind(accessory.attire_id.into_inner())
        .bind(&accessory.description)
        .bind(accessory.is_weapon)
        .bind(&accessory.unique_effect)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_accessory(&mut self, accessory: &Accessory) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        let result = sqlx::query(
            r#"
            UPDATE accessories
            SET attire_id = $2, description = $3, is_weapon = $4, unique_effect = $5
            WHERE id = $1
            "#,
        )
        .bind(accessory.id.into_inner())
        .bind(accessory.attire_id.into_inner())
        .bind(&accessory.description)
        .bind(accessory.is_weapon)
        .bind(&accessory.unique_effect)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(row_not_found(EntityKind::Accessory, accessory.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_accessory(&mut self, id: Snowflake) -> RepoResult<()> {
        self.delete_by_id("accessories", EntityKind::Accessory, id).await
    }

    // ------------------------------------------------------------------------
    // Lore entries
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn find_lore_entry(&mut self, id: Snowflake) -> RepoResult<Option<LoreEntry>> {
        let sql = format!("SELECT {LORE_COLUMNS} FROM lore_entries WHERE id = $1");
        let result = sqlx::query_as::<_, LoreEntryModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(LoreEntry::from))
    }

    #[instrument(skip(self))]
    async fn list_lore_entries(&mut self) -> RepoResult<Vec<LoreEntry>> {
        let sql = format!("SELECT {LORE_COLUMNS} FROM lore_entries ORDER BY id");
        let results = sqlx::query_as::<_, LoreEntryModel>(&sql)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(LoreEntry::from).collect())
    }

    #[instrument(skip(self))]
    async fn insert_lore_entry(&mut self, entry: &LoreEntry) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        sqlx::query(
            r#"
            INSERT INTO lore_entries (id, title, lore_type_id, narrative)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entry.id.into_inner())
        .bind(&entry.title)
        .bind(entry.lore_type_id.into_inner())
        .bind(&entry.narrative)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_lore_entry(&mut self, entry: &LoreEntry) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        let result = sqlx::query(
            r#"
            UPDATE lore_entries
            SET title = $2, lore_type_id = $3, narrative = $4
            WHERE id = $1
            "#,
        )
        .bind(entry.id.into_inner())
        .bind(&entry.title)
        .bind(entry.lore_type_id.into_inner())
        .bind(&entry.narrative)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(row_not_found(EntityKind::LoreEntry, entry.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_lore_entry(&mut self, id: Snowflake) -> RepoResult<()> {
        self.delete_by_id("lore_entries", EntityKind::LoreEntry, id).await
    }

    // ------------------------------------------------------------------------
    // Character <-> LoreEntry links
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn list_links(&mut self, filter: LinkFilter) -> RepoResult<Vec<CharacterLoreLink>> {
        let (clause, id) = match filter {
            LinkFilter::All => ("", None),
            LinkFilter::Character(id) => ("WHERE character_id = $1", Some(id)),
            LinkFilter::LoreEntry(id) => ("WHERE lore_entry_id = $1", Some(id)),
        };
        let sql = format!(
            "SELECT character_id, lore_entry_id FROM character_lore_links {clause} \
             ORDER BY character_id, lore_entry_id"
        );
        let mut query = sqlx::query_as::<_, CharacterLoreLinkModel>(&sql);
        if let Some(id) = id {
            query = query.bind(id.into_inner());
        }
        let results = query.fetch_all(&mut *self.tx).await.map_err(map_db_error)?;

        Ok(results.into_iter().map(CharacterLoreLink::from).collect())
    }

    #[instrument(skip(self))]
    async fn insert_link(&mut self, link: CharacterLoreLink) -> RepoResult<bool> {
        ensure_writable(self.mode)?;
        let result = sqlx::query(
            r#"
            INSERT INTO character_lore_links (character_id, lore_entry_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(link.character_id.into_inner())
        .bind(link.lore_entry_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_link(&mut self, link: CharacterLoreLink) -> RepoResult<bool> {
        ensure_writable(self.mode)?;
        let result = sqlx::query(
            r#"
            DELETE FROM character_lore_links
            WHERE character_id = $1 AND lore_entry_id = $2
            "#,
        )
        .bind(link.character_id.into_inner())
        .bind(link.lore_entry_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------------
    // Gallery images
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn find_image(&mut self, id: Snowflake) -> RepoResult<Option<GalleryImage>> {
        let sql = format!("SELECT {IMAGE_COLUMNS} FROM gallery_images WHERE id = $1");
        let result = sqlx::query_as::<_, GalleryImageModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(GalleryImage::from))
    }

    #[instrument(skip(self))]
    async fn list_images(&mut self, category_id: Option<Snowflake>) -> RepoResult<Vec<GalleryImage>> {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM gallery_images \
             WHERE ($1::BIGINT IS NULL OR category_id = $1) ORDER BY id"
        );
        let results = sqlx::query_as::<_, GalleryImageModel>(&sql)
            .bind(category_id.map(Snowflake::into_inner))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(GalleryImage::from).collect())
    }

    #[instrument(skip(self))]
    async fn insert_image(&mut self, image: &GalleryImage) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        sqlx::query(
            r#"
            INSERT INTO gallery_images (id, image_url, alt_text, is_featured, is_mature, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(image.id.into_inner())
        .bind(&image.image_url)
        .bind(&image.alt_text)
        .bind(image.is_featured)
        .bind(image.is_mature)
        .bind(image.category_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_image(&mut self, image: &GalleryImage) -> RepoResult<()> {
        ensure_writable(self.mode)?;
        let result = sqlx::query(
            r#"
            UPDATE gallery_images
            SET image_url = $2, alt_text = $3, is_featured = $4, is_mature = $5, category_id = $6
            WHERE id = $1
            "#,
        )
        .bind(image.id.into_inner())
        .bind(&image.image_url)
        .bind(&image.alt_text)
        .bind(image.is_featured)
        .bind(image.is_mature)
        .bind(image.category_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(row_not_found(EntityKind::GalleryImage, image.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_image(&mut self, id: Snowflake) -> RepoResult<()> {
        self.delete_by_id("gallery_images", EntityKind::GalleryImage, id).await
    }

    // ------------------------------------------------------------------------
    // Completion
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let mode = self.mode;
        self.tx.commit().await.map_err(map_db_error)?;
        debug!(?mode, "Transaction committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgCatalogStore>();
    }

    #[test]
    fn test_transaction_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<PgCatalogTransaction>();
    }
}
