//! Favorite service
//!
//! Saved listings per user.

use market_core::DomainError;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::dto::{IsFavoriteResponse, ItemsResponse, ListingCard, SuccessResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct FavoriteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FavoriteService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Save a listing; saving twice is a no-op
    #[instrument(skip(self))]
    pub async fn favorite(&self, user_id: Uuid, listing_id: Uuid) -> ServiceResult<SuccessResponse> {
        self.ctx
            .listing_repo()
            .find_by_id(listing_id)
            .await?
            .ok_or(DomainError::ListingNotFound(listing_id))?;

        self.ctx.favorite_repo().add(user_id, listing_id).await?;
        debug!(user_id = %user_id, listing_id = %listing_id, "Listing favorited");
        Ok(SuccessResponse::ok())
    }

    #[instrument(skip(self))]
    pub async fn unfavorite(&self, user_id: Uuid, listing_id: Uuid) -> ServiceResult<SuccessResponse> {
        self.ctx.favorite_repo().remove(user_id, listing_id).await?;
        debug!(user_id = %user_id, listing_id = %listing_id, "Listing unfavorited");
        Ok(SuccessResponse::ok())
    }

    /// Anonymous callers never have favorites
    #[instrument(skip(self))]
    pub async fn is_favorite(
        &self,
        user_id: Option<Uuid>,
        listing_id: Uuid,
    ) -> ServiceResult<IsFavoriteResponse> {
        let is_favorite = match user_id {
            Some(user_id) => self.ctx.favorite_repo().exists(user_id, listing_id).await?,
            None => false,
        };
        Ok(IsFavoriteResponse { is_favorite })
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Uuid) -> ServiceResult<ItemsResponse<ListingCard>> {
        let listings = self.ctx.favorite_repo().listings_for_user(user_id).await?;
        Ok(ItemsResponse::new(listings.iter().map(ListingCard::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{context, listing, MemoryStore};

    #[tokio::test]
    async fn test_favorite_lifecycle() {
        let store = MemoryStore::new();
        let ctx = context(&store, None);
        let service = FavoriteService::new(&ctx);

        let user = Uuid::new_v4();
        let lamp = listing(Uuid::new_v4(), "Lamp", 15.0);
        let kast = listing(Uuid::new_v4(), "Kast", 80.0);
        let (lamp_id, kast_id) = (lamp.id, kast.id);
        store.add_listing(lamp);
        store.add_listing(kast);

        assert!(!service.is_favorite(Some(user), lamp_id).await.unwrap().is_favorite);

        service.favorite(user, lamp_id).await.unwrap();
        service.favorite(user, lamp_id).await.unwrap();
        service.favorite(user, kast_id).await.unwrap();
        assert_eq!(store.favorites.lock().len(), 2);
        assert!(service.is_favorite(Some(user), lamp_id).await.unwrap().is_favorite);

        // Most recently saved first
        let saved = service.list(user).await.unwrap();
        let titles: Vec<_> = saved.items.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Kast", "Lamp"]);

        service.unfavorite(user, lamp_id).await.unwrap();
        service.unfavorite(user, lamp_id).await.unwrap();
        assert!(!service.is_favorite(Some(user), lamp_id).await.unwrap().is_favorite);
        assert_eq!(service.list(user).await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_and_unknown_listing() {
        let store = MemoryStore::new();
        let ctx = context(&store, None);
        let service = FavoriteService::new(&ctx);

        let lamp = listing(Uuid::new_v4(), "Lamp", 15.0);
        let lamp_id = lamp.id;
        store.add_listing(lamp);
        assert!(!service.is_favorite(None, lamp_id).await.unwrap().is_favorite);

        let err = service.favorite(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "UNKNOWN_LISTING");
        assert!(store.favorites.lock().is_empty());
    }
}
