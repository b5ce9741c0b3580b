//! Listing service
//!
//! Handles the browse grid and the listing lifecycle for sellers.

use std::time::Instant;

use market_cache::PubSubChannel;
use market_core::entities::{Listing, ListingPatch, ListingStatus};
use market_core::events::{DomainEvent, ListingUpdatedEvent};
use market_core::traits::ListingBrowseQuery;
use market_core::value_objects::{PageRequest, SearchSort};
use market_core::DomainError;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::dto::{
    non_blank, parse_number, BrowseListingsParams, BrowseMeta, CreateListingRequest, ListingCard,
    ListingPage, ListingResponse, SuccessResponse, UpdateListingRequest,
};

use super::context::ServiceContext;
use super::entitlement::EntitlementService;
use super::error::ServiceResult;

/// Browse only knows the date and price orders
fn browse_sort(value: Option<&str>) -> SearchSort {
    match SearchSort::parse_or_default(value) {
        sort @ (SearchSort::PriceAsc | SearchSort::PriceDesc) => sort,
        _ => SearchSort::DateDesc,
    }
}

/// Counting is on unless the caller sends `0` or `false`
fn wants_count(value: Option<&str>) -> bool {
    !matches!(value.map(str::trim), Some("0" | "false"))
}

/// Accepts wire (`active`) or stored (`actief`) names; blank means unset
pub(crate) fn parse_status(value: Option<&str>) -> ServiceResult<Option<ListingStatus>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|()| DomainError::InvalidStatus(raw.to_string()).into()),
    }
}

/// Listing service
pub struct ListingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ListingService<'a> {
    /// Create a new ListingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Active listings for the browse grid
    #[instrument(skip(self, params))]
    pub async fn browse(&self, params: BrowseListingsParams) -> ServiceResult<ListingPage> {
        let started = Instant::now();
        let page = PageRequest::new(
            parse_number(params.page.as_deref()),
            parse_number(params.limit.as_deref()),
        );
        let counted = wants_count(params.count.as_deref());

        let category_id = match non_blank(params.category.as_deref()) {
            Some(slug) => match self.ctx.category_repo().find_category_by_slug(&slug).await? {
                Some(category) => Some(category.id),
                None => return Ok(ListingPage::empty(page.page, page.limit)),
            },
            None => None,
        };
        let subcategory_id = match non_blank(params.sub.as_deref()) {
            Some(slug) => match self.ctx.category_repo().find_subcategory_by_slug(&slug).await? {
                Some(sub) => Some(sub.id),
                None => return Ok(ListingPage::empty(page.page, page.limit)),
            },
            None => None,
        };

        let q = non_blank(params.q.as_deref());
        let query = ListingBrowseQuery {
            q: q.clone(),
            category_id,
            subcategory_id,
            sort: browse_sort(params.sort.as_deref()),
            page,
            with_count: counted,
        };
        let (mut rows, mut total) = self.ctx.listing_repo().browse(&query).await?;

        // Nothing matched the text: show the newest listings instead of an empty grid
        if rows.is_empty() && q.is_some() {
            let fallback = ListingBrowseQuery {
                q: None,
                category_id: None,
                subcategory_id: None,
                sort: SearchSort::DateDesc,
                page,
                with_count: false,
            };
            let (fallback_rows, _) = self.ctx.listing_repo().browse(&fallback).await?;
            debug!(q = ?q, fallback = fallback_rows.len(), "Browse fell back to newest listings");
            if counted && total == Some(0) {
                total = Some(i64::try_from(fallback_rows.len()).unwrap_or(i64::MAX));
            }
            rows = fallback_rows;
        }

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok(ListingPage {
            items: rows.iter().map(ListingCard::from).collect(),
            page: page.page,
            limit: page.limit,
            total,
            meta: Some(BrowseMeta {
                duration_ms,
                counted,
            }),
        })
    }

    /// Get listing by ID
    #[instrument(skip(self))]
    pub async fn get(&self, listing_id: Uuid) -> ServiceResult<ListingResponse> {
        let listing = self
            .ctx
            .listing_repo()
            .find_by_id(listing_id)
            .await?
            .ok_or(DomainError::ListingNotFound(listing_id))?;
        Ok(ListingResponse::from(listing))
    }

    /// Create a listing; business sellers are held to their plan limit
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        seller_id: Uuid,
        request: CreateListingRequest,
    ) -> ServiceResult<ListingResponse> {
        let status = parse_status(request.status.as_deref())?.unwrap_or(ListingStatus::Active);

        let profile = self.ctx.profile_repo().find_by_id(seller_id).await?;
        if let Some(profile) = &profile {
            EntitlementService::new(self.ctx)
                .ensure_can_create_listing(profile)
                .await?;
        }

        let mut listing = Listing::new(Uuid::new_v4(), seller_id, request.title.trim().to_string());
        listing.description = request.description;
        listing.price = request.price;
        listing.location = non_blank(request.location.as_deref());
        listing.state = non_blank(request.state.as_deref());
        listing.allow_offers = request.allow_offers;
        listing.images = request.images;
        listing.main_photo = non_blank(request.main_photo.as_deref());
        listing.category_id = request.category_id;
        listing.subcategory_id = request.subcategory_id;
        listing.categories = listing.category_ids();
        listing.is_business_seller = profile.as_ref().is_some_and(|p| p.is_business_profile());
        listing.status = status;

        self.ctx.listing_repo().create(&listing).await?;

        info!(listing_id = %listing.id, seller_id = %seller_id, "Listing created");

        self.publish_listing_updated(&listing, listing.status.as_str())
            .await;

        Ok(ListingResponse::from(listing))
    }

    /// Partial update by the owner
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
        request: UpdateListingRequest,
    ) -> ServiceResult<ListingResponse> {
        let status = parse_status(request.status.as_deref())?;
        let mut listing = self.owned_listing(owner_id, listing_id).await?;

        listing.apply(ListingPatch {
            title: request.title.map(|t| t.trim().to_string()),
            description: request.description,
            price: request.price,
            location: request.location,
            state: request.state,
            allow_offers: request.allow_offers,
            images: request.images,
            main_photo: request.main_photo,
            category_id: request.category_id,
            subcategory_id: request.subcategory_id,
            status,
        });

        self.ctx.listing_repo().update(&listing).await?;

        info!(listing_id = %listing_id, status = %listing.status, "Listing updated");

        self.publish_listing_updated(&listing, listing.status.as_str())
            .await;

        Ok(ListingResponse::from(listing))
    }

    /// Delete by the owner
    #[instrument(skip(self))]
    pub async fn delete(&self, owner_id: Uuid, listing_id: Uuid) -> ServiceResult<SuccessResponse> {
        let listing = self.owned_listing(owner_id, listing_id).await?;

        self.ctx.listing_repo().delete(listing_id).await?;

        info!(listing_id = %listing_id, "Listing deleted");

        self.publish_listing_updated(&listing, "deleted").await;

        Ok(SuccessResponse::ok())
    }

    /// Missing and foreign listings look the same to the caller
    async fn owned_listing(&self, owner_id: Uuid, listing_id: Uuid) -> ServiceResult<Listing> {
        let listing = self
            .ctx
            .listing_repo()
            .find_by_id(listing_id)
            .await?
            .filter(|l| l.is_owned_by(owner_id))
            .ok_or(DomainError::ListingNotAccessible(listing_id))?;
        Ok(listing)
    }

    async fn publish_listing_updated(&self, listing: &Listing, status: &str) {
        let event = DomainEvent::ListingUpdated(ListingUpdatedEvent::new(
            listing.id,
            listing.seller_id,
            status.to_string(),
        ));
        self.ctx
            .publisher()
            .publish_domain_event(&PubSubChannel::listing(listing.id), &event)
            .await
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{business, context, listing, MemoryStore};
    use crate::services::ServiceError;
    use chrono::Duration;
    use market_core::entities::Category;

    fn create_request(title: &str) -> CreateListingRequest {
        CreateListingRequest {
            title: title.to_string(),
            description: None,
            price: Some(10.0),
            location: None,
            state: None,
            allow_offers: false,
            images: vec![],
            main_photo: None,
            category_id: None,
            subcategory_id: None,
            status: None,
        }
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(Some("sold")).unwrap(), Some(ListingStatus::Sold));
        assert_eq!(parse_status(Some("actief")).unwrap(), Some(ListingStatus::Active));
        assert_eq!(parse_status(Some(" ")).unwrap(), None);
        let err = parse_status(Some("weg")).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Ongeldige status");
    }

    #[test]
    fn test_browse_sort_and_count() {
        assert_eq!(browse_sort(Some("price_asc")), SearchSort::PriceAsc);
        assert_eq!(browse_sort(Some("relevance")), SearchSort::DateDesc);
        assert_eq!(browse_sort(None), SearchSort::DateDesc);
        assert!(wants_count(None));
        assert!(wants_count(Some("1")));
        assert!(!wants_count(Some("0")));
    }

    #[tokio::test]
    async fn test_browse_unknown_category_is_empty() {
        let store = MemoryStore::new();
        store.add_listing(listing(Uuid::new_v4(), "Racefiets", 300.0));
        let ctx = context(&store, None);

        let page = ListingService::new(&ctx)
            .browse(BrowseListingsParams {
                category: Some("bestaat-niet".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, Some(0));
    }

    #[tokio::test]
    async fn test_browse_filters_by_category_slug() {
        let store = MemoryStore::new();
        store
            .categories
            .lock()
            .push(Category::new(3, "Fietsen".to_string(), "fietsen".to_string()));
        let mut bike = listing(Uuid::new_v4(), "Racefiets", 300.0);
        bike.category_id = Some(3);
        store.add_listing(bike.clone());
        store.add_listing(listing(Uuid::new_v4(), "Zetel", 80.0));
        let ctx = context(&store, None);

        let page = ListingService::new(&ctx)
            .browse(BrowseListingsParams {
                category: Some("fietsen".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, bike.id);
        assert_eq!(page.total, Some(1));
    }

    #[tokio::test]
    async fn test_browse_falls_back_to_newest() {
        let store = MemoryStore::new();
        let mut older = listing(Uuid::new_v4(), "Zetel", 80.0);
        older.created_at -= Duration::hours(1);
        store.add_listing(older);
        store.add_listing(listing(Uuid::new_v4(), "Tafel", 40.0));
        let ctx = context(&store, None);

        let page = ListingService::new(&ctx)
            .browse(BrowseListingsParams {
                q: Some("kajak".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "Tafel");
        assert_eq!(page.total, Some(2));
        assert!(page.meta.unwrap().counted);

        let page = ListingService::new(&ctx)
            .browse(BrowseListingsParams {
                q: Some("kajak".to_string()),
                count: Some("0".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, None);
    }

    #[tokio::test]
    async fn test_get_missing_listing() {
        let store = MemoryStore::new();
        let ctx = context(&store, None);
        let err = ListingService::new(&ctx).get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Niet gevonden");
    }

    #[tokio::test]
    async fn test_update_requires_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let item = listing(owner, "Racefiets", 300.0);
        store.add_listing(item.clone());
        let ctx = context(&store, None);
        let service = ListingService::new(&ctx);

        let err = service
            .update(Uuid::new_v4(), item.id, UpdateListingRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Niet gevonden of geen toegang");

        let updated = service
            .update(
                owner,
                item.id,
                UpdateListingRequest {
                    price: Some(250.0),
                    status: Some("sold".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, Some(250.0));
        assert_eq!(updated.status, "sold");
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_status() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let item = listing(owner, "Racefiets", 300.0);
        store.add_listing(item.clone());
        let ctx = context(&store, None);

        let err = ListingService::new(&ctx)
            .update(
                owner,
                item.id,
                UpdateListingRequest {
                    status: Some("archived".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let item = listing(owner, "Racefiets", 300.0);
        store.add_listing(item.clone());
        let ctx = context(&store, None);

        let res = ListingService::new(&ctx).delete(owner, item.id).await.unwrap();
        assert!(res.success);
        assert!(store.listings.lock().is_empty());
    }

    #[tokio::test]
    async fn test_recategorized_listing_leaves_old_category() {
        let store = MemoryStore::new();
        {
            let mut categories = store.categories.lock();
            categories.push(Category::new(3, "Fietsen".to_string(), "fietsen".to_string()));
            categories.push(Category::new(7, "Meubels".to_string(), "meubels".to_string()));
        }
        let ctx = context(&store, None);
        let service = ListingService::new(&ctx);
        let seller = Uuid::new_v4();

        let created = service
            .create(
                seller,
                CreateListingRequest {
                    category_id: Some(3),
                    subcategory_id: Some(30),
                    ..create_request("Bureaustoel")
                },
            )
            .await
            .unwrap();
        service
            .update(
                seller,
                created.id,
                UpdateListingRequest {
                    category_id: Some(7),
                    subcategory_id: Some(70),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = store.listings.lock()[0].clone();
        assert_eq!(stored.categories, vec![7, 70]);

        let browse = |slug: &str| BrowseListingsParams {
            category: Some(slug.to_string()),
            ..Default::default()
        };
        assert!(service.browse(browse("fietsen")).await.unwrap().items.is_empty());
        let page = service.browse(browse("meubels")).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, created.id);
    }

    #[tokio::test]
    async fn test_create_respects_plan_limit() {
        let store = MemoryStore::new();
        let seller = Uuid::new_v4();
        let mut profile = business(seller, "Kringwinkel", "");
        profile.business_plan = None;
        store.add_profile(profile);
        let ctx = context(&store, None);
        let service = ListingService::new(&ctx);

        let first = service.create(seller, create_request(" Kast ")).await.unwrap();
        assert_eq!(first.title, "Kast");
        assert!(first.is_business_seller);

        let err = service.create(seller, create_request("Stoel")).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::ListingLimitReached)
        ));
    }
}
