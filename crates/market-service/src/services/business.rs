//! Business directory service
//!
//! Lists business sellers with live ratings, a few of their listings, and the
//! category and city facets for the directory filters.

use futures::future::try_join_all;
use tracing::{debug, instrument};
use uuid::Uuid;

use market_core::entities::Profile;
use market_core::traits::{BusinessProfileQuery, RatingAggregate};
use market_core::value_objects::search::contains_pattern;
use market_core::value_objects::{BusinessSearchMode, BusinessSort};

use crate::dto::{
    non_blank, parse_number, BusinessDirectoryResponse, BusinessEntry, BusinessListingSummary,
    BusinessParams,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Active listings shown per business card
pub const LISTINGS_PER_BUSINESS: i64 = 5;

/// Sorted unique categories and resolved cities of every business
pub fn directory_facets(profiles: &[Profile]) -> (Vec<String>, Vec<String>) {
    let mut cats: Vec<String> = profiles
        .iter()
        .flat_map(|p| p.categories.iter().cloned())
        .collect();
    cats.sort();
    cats.dedup();

    let mut cities: Vec<String> = profiles
        .iter()
        .map(|p| p.resolved_city().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    cities.sort();
    cities.dedup();

    (cats, cities)
}

/// Category, subcategory and city filters
fn matches_filters(profile: &Profile, cat: Option<&str>, subcat: Option<&str>, city: Option<&str>) -> bool {
    let has_category = |c: &str| profile.categories.iter().any(|pc| pc == c);
    cat.map_or(true, has_category)
        && subcat.map_or(true, has_category)
        && city.map_or(true, |c| profile.resolved_city() == c)
}

/// Stored rating first; businesses without one qualify on their review average
fn passes_min_rating(profile: &Profile, min_rating: f64, aggregates: &[RatingAggregate]) -> bool {
    if profile.stored_rating() >= min_rating {
        return true;
    }
    aggregates
        .iter()
        .find(|a| a.business_id == profile.id)
        .is_some_and(|a| a.count > 0 && a.average >= min_rating)
}

fn sort_entries(entries: &mut [BusinessEntry], sort: BusinessSort) {
    match sort {
        BusinessSort::RatingDesc => entries.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| b.reviews.cmp(&a.reviews))
        }),
        BusinessSort::ReviewsDesc => entries.sort_by(|a, b| {
            b.reviews
                .cmp(&a.reviews)
                .then_with(|| b.rating.total_cmp(&a.rating))
        }),
        BusinessSort::NameAsc => {
            entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        BusinessSort::Relevance => {}
    }
}

/// Directory card with the rating recomputed from reviews when there are any
fn entry_for(
    profile: &Profile,
    aggregates: &[RatingAggregate],
    listings: Vec<BusinessListingSummary>,
) -> BusinessEntry {
    let (rating, reviews) = match aggregates.iter().find(|a| a.business_id == profile.id) {
        Some(agg) if agg.count > 0 => (agg.average, agg.count),
        _ => (profile.stored_rating(), profile.review_count.unwrap_or(0)),
    };

    BusinessEntry {
        id: profile.id,
        name: profile.display_name().to_string(),
        display_shop_name: profile.shop_name_or_fallback().to_string(),
        categories: profile.categories.clone(),
        city: profile.resolved_city().to_string(),
        rating,
        reviews,
        subscription_active: profile.subscription_active(),
        logo_url: profile.logo_url().map(str::to_string),
        company_name: profile.company_name.clone(),
        shop_name: profile.shop_name.clone(),
        full_name: profile.full_name.clone(),
        listings,
    }
}

/// Business directory service
pub struct BusinessDirectoryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BusinessDirectoryService<'a> {
    /// Create a new BusinessDirectoryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Filtered and sorted directory
    #[instrument(skip(self, params), fields(q = ?params.q, mode = ?params.mode))]
    pub async fn list(&self, params: BusinessParams) -> ServiceResult<BusinessDirectoryResponse> {
        let q = non_blank(params.q.as_deref());
        let mode = BusinessSearchMode::parse_or_default(params.mode.as_deref());
        let sort = BusinessSort::parse_or_default(params.sort.as_deref());
        let min_rating = parse_number::<f64>(params.min_rating.as_deref()).unwrap_or(0.0);
        let cat = non_blank(params.cat.as_deref());
        let subcat = non_blank(params.subcat.as_deref());
        let city = non_blank(params.city.as_deref());

        let profiles = self.ctx.profile_repo();
        let all = profiles.find_businesses(&BusinessProfileQuery::default()).await?;
        let (cats, cities) = directory_facets(&all);

        let pattern = q.as_deref().and_then(contains_pattern);
        let candidates = match (mode, pattern) {
            (BusinessSearchMode::Product, Some(pattern)) => {
                let seller_ids = self
                    .ctx
                    .listing_repo()
                    .seller_ids_by_title(&pattern)
                    .await?;
                if seller_ids.is_empty() {
                    Vec::new()
                } else {
                    profiles
                        .find_businesses(&BusinessProfileQuery {
                            ids: Some(seller_ids),
                            ..BusinessProfileQuery::default()
                        })
                        .await?
                }
            }
            (BusinessSearchMode::Business, Some(pattern)) => {
                profiles
                    .find_businesses(&BusinessProfileQuery {
                        name_pattern: Some(pattern),
                        ..BusinessProfileQuery::default()
                    })
                    .await?
            }
            (_, None) => all,
        };

        let mut results: Vec<Profile> = candidates
            .into_iter()
            .filter(|p| matches_filters(p, cat.as_deref(), subcat.as_deref(), city.as_deref()))
            .collect();

        let ids: Vec<Uuid> = results.iter().map(|p| p.id).collect();
        let aggregates = if ids.is_empty() {
            Vec::new()
        } else {
            let rows = self.ctx.review_repo().business_rating_rows(&ids).await?;
            RatingAggregate::from_rows(&rows)
        };

        if min_rating > 0.0 {
            results.retain(|p| passes_min_rating(p, min_rating, &aggregates));
        }

        let listing_repo = self.ctx.listing_repo();
        let listings = try_join_all(
            results
                .iter()
                .map(|p| listing_repo.active_by_seller(p.id, LISTINGS_PER_BUSINESS)),
        )
        .await?;

        let mut businesses: Vec<BusinessEntry> = results
            .iter()
            .zip(listings)
            .map(|(profile, rows)| {
                let summaries = rows.iter().map(BusinessListingSummary::from).collect();
                entry_for(profile, &aggregates, summaries)
            })
            .collect();
        sort_entries(&mut businesses, sort);

        debug!(count = businesses.len(), "Business directory built");

        Ok(BusinessDirectoryResponse {
            businesses,
            cats,
            cities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{business, context, listing, MemoryStore};
    use market_core::entities::{Review, ReviewTarget};
    use serde_json::json;

    fn entry(name: &str, rating: f64, reviews: i64) -> BusinessEntry {
        let mut profile = business(Uuid::new_v4(), name, "pro");
        profile.rating = Some(rating);
        profile.review_count = Some(reviews);
        entry_for(&profile, &[], Vec::new())
    }

    #[test]
    fn test_facets_are_sorted_and_unique() {
        let mut a = business(Uuid::new_v4(), "A", "pro");
        a.categories = vec!["fietsen".into(), "auto".into()];
        a.city = Some("Gent".into());
        let mut b = business(Uuid::new_v4(), "B", "pro");
        b.categories = vec!["fietsen".into()];
        b.address = json!({"city": "Antwerpen"});
        let c = business(Uuid::new_v4(), "C", "pro");

        let (cats, cities) = directory_facets(&[a, b, c]);
        assert_eq!(cats, vec!["auto", "fietsen"]);
        assert_eq!(cities, vec!["Antwerpen", "Gent"]);
    }

    #[test]
    fn test_min_rating_falls_back_to_reviews() {
        let mut profile = business(Uuid::new_v4(), "Atelier", "pro");
        assert!(!passes_min_rating(&profile, 4.0, &[]));

        let agg = RatingAggregate {
            business_id: profile.id,
            average: 4.5,
            count: 2,
        };
        assert!(passes_min_rating(&profile, 4.0, &[agg]));

        profile.rating = Some(4.2);
        assert!(passes_min_rating(&profile, 4.0, &[]));
    }

    #[test]
    fn test_sort_entries() {
        let mut entries = vec![entry("b", 4.0, 1), entry("A", 4.0, 5), entry("c", 5.0, 0)];

        sort_entries(&mut entries, BusinessSort::RatingDesc);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c", "A", "b"]);

        sort_entries(&mut entries, BusinessSort::ReviewsDesc);
        assert_eq!(entries[0].name, "A");

        sort_entries(&mut entries, BusinessSort::NameAsc);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "b", "c"]);
    }

    #[tokio::test]
    async fn test_product_mode_matches_listing_titles() {
        let store = MemoryStore::new();
        let shop = Uuid::new_v4();
        let other = Uuid::new_v4();
        store.add_profile(business(shop, "Fietsen Jan", "pro"));
        store.add_profile(business(other, "Meubels Els", "pro"));
        store.add_listing(listing(shop, "Stadsfiets", 120.0));
        store.add_listing(listing(other, "Eiken kast", 300.0));
        let ctx = context(&store, None);
        let service = BusinessDirectoryService::new(&ctx);

        let res = service
            .list(BusinessParams {
                q: Some("fiets".into()),
                mode: Some("product".into()),
                ..BusinessParams::default()
            })
            .await
            .unwrap();
        assert_eq!(res.businesses.len(), 1);
        assert_eq!(res.businesses[0].id, shop);
        assert_eq!(res.businesses[0].listings.len(), 1);

        let res = service
            .list(BusinessParams {
                q: Some("onderzeeër".into()),
                mode: Some("product".into()),
                ..BusinessParams::default()
            })
            .await
            .unwrap();
        assert!(res.businesses.is_empty());
    }

    #[tokio::test]
    async fn test_business_mode_recomputes_ratings() {
        let store = MemoryStore::new();
        let shop = Uuid::new_v4();
        let mut profile = business(shop, "Fietsen Jan", "pro");
        profile.rating = Some(1.0);
        store.add_profile(profile);
        store.add_profile(business(Uuid::new_v4(), "Meubels Els", "pro"));
        for rating in [4, 5] {
            store.add_review(Review::new(
                Uuid::new_v4(),
                ReviewTarget::Business(shop),
                Uuid::new_v4(),
                rating,
                "Top".into(),
            ));
        }
        let ctx = context(&store, None);

        let res = BusinessDirectoryService::new(&ctx)
            .list(BusinessParams {
                q: Some("jan".into()),
                ..BusinessParams::default()
            })
            .await
            .unwrap();
        assert_eq!(res.businesses.len(), 1);
        let entry = &res.businesses[0];
        assert!((entry.rating - 4.5).abs() < f64::EPSILON);
        assert_eq!(entry.reviews, 2);
        assert_eq!(entry.name, "Fietsen Jan");
    }

    #[tokio::test]
    async fn test_wildcard_only_query_is_ignored() {
        let store = MemoryStore::new();
        store.add_profile(business(Uuid::new_v4(), "Fietsen Jan", "pro"));
        store.add_profile(business(Uuid::new_v4(), "Meubels Els", "pro"));
        let ctx = context(&store, None);

        let res = BusinessDirectoryService::new(&ctx)
            .list(BusinessParams {
                q: Some("%%".into()),
                ..BusinessParams::default()
            })
            .await
            .unwrap();
        assert_eq!(res.businesses.len(), 2);
    }
}
