//! Gallery curator
//!
//! Category membership and featured/mature flags for gallery images, plus the
//! per-category gallery projections.

use std::collections::BTreeMap;

use codex_core::{
    CatalogTransaction, DomainError, EntityKind, GalleryImage, LookupKind, RepoResult, Snowflake,
};
use tracing::{debug, info, instrument};

use crate::dto::{CategoryGalleryView, CreateGalleryImageRequest, GalleryImageView, ImageWithCategory};

use super::context::ServiceContext;
use super::entity::create_in;
use super::error::ServiceResult;
use super::lookup::LookupRegistry;

/// Gallery curator service
pub struct GalleryCurator<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GalleryCurator<'a> {
    /// Create a new GalleryCurator
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add an image to a category
    #[instrument(skip(self, payload))]
    pub async fn add_image(&self, payload: CreateGalleryImageRequest) -> ServiceResult<GalleryImage> {
        let mut tx = self.ctx.write().await?;
        let image = create_in::<GalleryImage>(self.ctx, tx.as_mut(), payload).await?;
        tx.commit().await?;

        info!(image_id = %image.id, category_id = %image.category_id, "Gallery image added");
        Ok(image)
    }

    /// Move an image to another category, keeping its id and content
    #[instrument(skip(self))]
    pub async fn reassign_category(
        &self,
        image_id: Snowflake,
        category_id: Snowflake,
    ) -> ServiceResult<GalleryImage> {
        let mut tx = self.ctx.write().await?;
        let mut image = require_image(tx.as_mut(), image_id).await?;
        LookupRegistry::require_in(
            tx.as_mut(),
            LookupKind::GalleryImageCategory,
            category_id,
            EntityKind::GalleryImage,
            "category_id",
        )
        .await?;

        if image.category_id == category_id {
            debug!(%image_id, %category_id, "Image already in category");
            return Ok(image);
        }

        let previous = image.category_id;
        image.category_id = category_id;
        tx.update_image(&image).await?;
        tx.commit().await?;

        info!(%image_id, from = %previous, to = %category_id, "Gallery image reassigned");
        Ok(image)
    }

    /// Set either flag; a `None` leaves that flag as it is
    #[instrument(skip(self))]
    pub async fn set_flags(
        &self,
        image_id: Snowflake,
        is_featured: Option<bool>,
        is_mature: Option<bool>,
    ) -> ServiceResult<GalleryImage> {
        let mut tx = self.ctx.write().await?;
        let mut image = require_image(tx.as_mut(), image_id).await?;

        if !image.set_flags(is_featured, is_mature) {
            debug!(%image_id, "Gallery flags unchanged");
            return Ok(image);
        }
        tx.update_image(&image).await?;
        tx.commit().await?;

        info!(
            %image_id,
            is_featured = image.is_featured,
            is_mature = image.is_mature,
            "Gallery flags updated"
        );
        Ok(image)
    }

    /// Remove an image
    #[instrument(skip(self))]
    pub async fn delete_image(&self, image_id: Snowflake) -> ServiceResult<()> {
        let mut tx = self.ctx.write().await?;
        tx.delete_image(image_id).await?;
        tx.commit().await?;

        info!(%image_id, "Gallery image deleted");
        Ok(())
    }

    /// Images of one category, ordered by id
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category_id: Snowflake) -> ServiceResult<Vec<GalleryImageView>> {
        let mut tx = self.ctx.read().await?;
        let category = LookupRegistry::require_in(
            tx.as_mut(),
            LookupKind::GalleryImageCategory,
            category_id,
            EntityKind::GalleryImage,
            "category_id",
        )
        .await?;

        Ok(tx
            .list_images(Some(category_id))
            .await?
            .iter()
            .map(|image| {
                GalleryImageView::from(ImageWithCategory {
                    image,
                    category: &category.name,
                })
            })
            .collect())
    }

    /// Featured images across all categories
    #[instrument(skip(self))]
    pub async fn featured(&self, include_mature: bool) -> ServiceResult<Vec<GalleryImageView>> {
        let mut tx = self.ctx.read().await?;
        let categories = LookupRegistry::names_in(tx.as_mut(), LookupKind::GalleryImageCategory).await?;
        let images = visible_images(tx.as_mut(), include_mature).await?;

        Ok(images
            .iter()
            .filter(|image| image.is_featured)
            .map(|image| view(image, &categories))
            .collect())
    }

    /// Every category with its images, empty categories included
    #[instrument(skip(self))]
    pub async fn galleries(&self, include_mature: bool) -> ServiceResult<Vec<CategoryGalleryView>> {
        let mut tx = self.ctx.read().await?;
        let categories = LookupRegistry::names_in(tx.as_mut(), LookupKind::GalleryImageCategory).await?;

        let mut by_category: BTreeMap<Snowflake, Vec<GalleryImageView>> = BTreeMap::new();
        for image in visible_images(tx.as_mut(), include_mature).await? {
            by_category
                .entry(image.category_id)
                .or_default()
                .push(view(&image, &categories));
        }

        Ok(categories
            .iter()
            .map(|(id, name)| CategoryGalleryView {
                id: *id,
                name: name.clone(),
                images: by_category.remove(id).unwrap_or_default(),
            })
            .collect())
    }
}

async fn require_image(tx: &mut dyn CatalogTransaction, id: Snowflake) -> RepoResult<GalleryImage> {
    tx.find_image(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::GalleryImage, id))
}

async fn visible_images(tx: &mut dyn CatalogTransaction, include_mature: bool) -> RepoResult<Vec<GalleryImage>> {
    let mut images = tx.list_images(None).await?;
    images.retain(|image| image.visible_to(include_mature));
    Ok(images)
}

fn view(image: &GalleryImage, categories: &BTreeMap<Snowflake, String>) -> GalleryImageView {
    GalleryImageView::from(ImageWithCategory {
        image,
        category: categories.get(&image.category_id).map_or("", String::as_str),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::UpdateGalleryImageRequest;
    use crate::services::entity::EntityStore;
    use crate::services::testing::{seeded_context, FAN_ART, OFFICIAL_ART, SCREENSHOTS};

    fn request(alt_text: &str, category_id: Snowflake) -> CreateGalleryImageRequest {
        CreateGalleryImageRequest {
            image_url: format!("https://img.example/{}.png", alt_text.to_lowercase()),
            alt_text: alt_text.to_string(),
            category_id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_image_defaults_flags() {
        let ctx = seeded_context().await;
        let image = GalleryCurator::new(&ctx)
            .add_image(request("Dusk", OFFICIAL_ART))
            .await
            .unwrap();
        assert!(!image.is_featured);
        assert!(!image.is_mature);
    }

    #[tokio::test]
    async fn test_add_image_unknown_category() {
        let ctx = seeded_context().await;
        let err = GalleryCurator::new(&ctx)
            .add_image(request("Dusk", Snowflake::new(77)))
            .await
            .unwrap_err();
        assert_eq!(
            err.domain(),
            Some(&DomainError::dangling(
                EntityKind::GalleryImage,
                "category_id",
                EntityKind::GalleryImageCategory,
                Snowflake::new(77),
            ))
        );
    }

    #[tokio::test]
    async fn test_reassign_preserves_identity() {
        let ctx = seeded_context().await;
        let curator = GalleryCurator::new(&ctx);
        let img = curator.add_image(request("Dusk", OFFICIAL_ART)).await.unwrap();

        curator.reassign_category(img.id, FAN_ART).await.unwrap();

        let fetched = EntityStore::new(&ctx).get::<GalleryImage>(img.id).await.unwrap();
        assert_eq!(fetched.id, img.id);
        assert_eq!(fetched.image_url, img.image_url);
        assert_eq!(fetched.alt_text, img.alt_text);
        assert_eq!(fetched.category_id, FAN_ART);

        assert!(curator.list_by_category(OFFICIAL_ART).await.unwrap().is_empty());
        assert_eq!(curator.list_by_category(FAN_ART).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reassign_to_unknown_category_leaves_image() {
        let ctx = seeded_context().await;
        let curator = GalleryCurator::new(&ctx);
        let img = curator.add_image(request("Dusk", OFFICIAL_ART)).await.unwrap();

        let err = curator.reassign_category(img.id, Snowflake::new(77)).await.unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_referential));

        let fetched = EntityStore::new(&ctx).get::<GalleryImage>(img.id).await.unwrap();
        assert_eq!(fetched.category_id, OFFICIAL_ART);

        let err = curator.reassign_category(Snowflake::new(404), FAN_ART).await.unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_not_found));
    }

    #[tokio::test]
    async fn test_set_flags_is_partial() {
        let ctx = seeded_context().await;
        let curator = GalleryCurator::new(&ctx);
        let img = curator.add_image(request("Dusk", OFFICIAL_ART)).await.unwrap();

        let img = curator.set_flags(img.id, Some(true), None).await.unwrap();
        assert!(img.is_featured);
        assert!(!img.is_mature);

        let img = curator.set_flags(img.id, None, Some(true)).await.unwrap();
        assert!(img.is_featured);
        assert!(img.is_mature);

        // Content updates go through the entity store and leave flags alone
        let img = EntityStore::new(&ctx)
            .update::<GalleryImage>(
                img.id,
                UpdateGalleryImageRequest {
                    alt_text: Some("Dusk, retouched".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(img.is_featured && img.is_mature);
    }

    #[tokio::test]
    async fn test_delete_image() {
        let ctx = seeded_context().await;
        let curator = GalleryCurator::new(&ctx);
        let img = curator.add_image(request("Dusk", OFFICIAL_ART)).await.unwrap();

        curator.delete_image(img.id).await.unwrap();
        let err = curator.delete_image(img.id).await.unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_not_found));
    }

    #[tokio::test]
    async fn test_list_by_unknown_category() {
        let ctx = seeded_context().await;
        let err = GalleryCurator::new(&ctx)
            .list_by_category(Snowflake::new(77))
            .await
            .unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_referential));
    }

    #[tokio::test]
    async fn test_galleries_and_featured_hide_mature() {
        let ctx = seeded_context().await;
        let curator = GalleryCurator::new(&ctx);
        let a = curator.add_image(request("A", OFFICIAL_ART)).await.unwrap();
        let b = curator
            .add_image(CreateGalleryImageRequest {
                is_featured: true,
                is_mature: true,
                ..request("B", OFFICIAL_ART)
            })
            .await
            .unwrap();
        let c = curator
            .add_image(CreateGalleryImageRequest {
                is_featured: true,
                ..request("C", FAN_ART)
            })
            .await
            .unwrap();

        let galleries = curator.galleries(false).await.unwrap();
        let names: Vec<_> = galleries.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Official Art", "Fan Art", "Screenshots"]);
        assert_eq!(galleries[0].images.iter().map(|i| i.id).collect::<Vec<_>>(), vec![a.id]);
        assert_eq!(galleries[1].images[0].category, "Fan Art");
        assert!(galleries[2].images.is_empty());
        assert_eq!(galleries[2].id, SCREENSHOTS);

        let featured = curator.featured(false).await.unwrap();
        assert_eq!(featured.iter().map(|i| i.id).collect::<Vec<_>>(), vec![c.id]);

        let featured = curator.featured(true).await.unwrap();
        assert_eq!(featured.iter().map(|i| i.id).collect::<Vec<_>>(), vec![b.id, c.id]);
    }
}
