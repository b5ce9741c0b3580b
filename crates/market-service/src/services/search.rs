//! Search service
//!
//! Full-text-ish listing search with synonym expansion, layered fallbacks so
//! the storefront rarely shows an empty page, and title suggestions.

use market_core::entities::{Listing, ListingStatus};
use market_core::traits::{ListingSearchQuery, SellerFilter};
use market_core::value_objects::search::{
    expand_terms, normalize_query, MAX_SEARCH_TERMS, MAX_SUGGEST_TERMS,
};
use market_core::value_objects::{PageRequest, SearchSort};
use tracing::{debug, instrument};

use crate::dto::{
    non_blank, parse_flag, parse_number, ListingCard, SearchDebug, SearchParams, SearchResponse,
    SuggestParams, SuggestResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub const DEFAULT_SUGGEST_LIMIT: i64 = 8;
pub const MAX_SUGGEST_LIMIT: i64 = 20;

/// Listings scanned when suggesting without a query
const RECENT_TITLE_SCAN: u32 = 50;

/// Why the result page is what it is; only reported in debug output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmptyReason {
    BroadFallbackHit,
    NoResultsBroad,
    UltraFallbackAny,
    NoResults,
}

impl EmptyReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::BroadFallbackHit => "broad-fallback-hit",
            Self::NoResultsBroad => "no-results-broad",
            Self::UltraFallbackAny => "ultra-fallback-any",
            Self::NoResults => "no-results",
        }
    }
}

/// Only positive price bounds filter
fn price_bound(value: Option<&str>) -> Option<f64> {
    parse_number::<f64>(value).filter(|p| p.is_finite() && *p > 0.0)
}

fn seller_filter(params: &SearchParams) -> SellerFilter {
    if parse_flag(params.business_only.as_deref()) {
        SellerFilter::BusinessOnly
    } else if matches!(params.business.as_deref().map(str::trim), Some("0" | "false")) {
        SellerFilter::ExcludeBusiness
    } else {
        SellerFilter::Any
    }
}

/// Case-insensitive dedupe that keeps the first spelling, prefix matches first
fn rank_suggestions(titles: Vec<String>, terms: &[String], limit: usize) -> Vec<String> {
    let starts_with_term = |title: &str| {
        let lower = title.to_lowercase();
        terms.iter().any(|t| lower.starts_with(t.as_str()))
    };

    let (mut ranked, rest): (Vec<String>, Vec<String>) = titles
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .partition(|t| starts_with_term(t));
    ranked.extend(rest);

    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for title in ranked {
        let key = title.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(title);
        if out.len() >= limit {
            break;
        }
    }
    out
}

/// Search service
pub struct SearchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SearchService<'a> {
    /// Create a new SearchService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Filtered listing search
    #[instrument(skip(self, params), fields(q = ?params.q))]
    pub async fn search(&self, params: SearchParams) -> ServiceResult<SearchResponse> {
        let q = params.q.as_deref().map(str::trim).unwrap_or_default().to_string();
        let page = PageRequest::new(
            parse_number(params.page.as_deref()),
            parse_number(params.limit.as_deref()),
        );
        let status = (!parse_flag(params.show_all.as_deref())).then_some(ListingStatus::Active);

        if params.mode.as_deref().map(str::trim) == Some("simple") {
            return self.simple(&q, page.limit, status).await;
        }

        let sort = SearchSort::parse_or_default(params.sort.as_deref());
        let sellers = seller_filter(&params);
        let normalized = normalize_query(&q);
        let terms = if normalized.is_empty() {
            Vec::new()
        } else {
            expand_terms(&normalized, MAX_SEARCH_TERMS)
        };

        let query = ListingSearchQuery {
            terms,
            category_id: parse_number(params.cat_id.as_deref()),
            subcategory_id: parse_number(params.sub_id.as_deref()),
            price_min: price_bound(params.price_min.as_deref()),
            price_max: price_bound(params.price_max.as_deref()),
            state: non_blank(params.state.as_deref()),
            location: non_blank(params.location.as_deref()),
            sellers,
            status,
            sort,
            page,
        };
        let (mut rows, mut total) = self.ctx.listing_repo().search(&query).await?;
        let mut reason = None;

        // Plain text match without filters or synonyms
        if rows.is_empty() && !q.is_empty() {
            let broad = ListingSearchQuery {
                terms: vec![q.clone()],
                status,
                sort,
                page: PageRequest::first(page.limit),
                ..ListingSearchQuery::default()
            };
            let (broad_rows, broad_total) = self.ctx.listing_repo().search(&broad).await?;
            if broad_rows.is_empty() {
                reason = Some(EmptyReason::NoResultsBroad);
            } else {
                rows = broad_rows;
                total = broad_total;
                reason = Some(EmptyReason::BroadFallbackHit);
            }
        }

        // Newest listings of any kind so the page is never blank
        if rows.is_empty() {
            let any = ListingSearchQuery {
                sort: SearchSort::DateDesc,
                page: PageRequest::first(page.limit),
                ..ListingSearchQuery::default()
            };
            let (any_rows, any_total) = self.ctx.listing_repo().search(&any).await?;
            if !any_rows.is_empty() {
                rows = any_rows;
                total = any_total;
                reason.get_or_insert(EmptyReason::UltraFallbackAny);
            }
        }
        if rows.is_empty() {
            reason.get_or_insert(EmptyReason::NoResults);
        }

        debug!(received = rows.len(), total, reason = ?reason, "Search finished");

        let debug = parse_flag(params.debug.as_deref()).then(|| SearchDebug {
            q: q.clone(),
            normalized,
            sort: sort.as_str().to_string(),
            business_only: sellers == SellerFilter::BusinessOnly,
            from: page.offset(),
            to: page.last_index(),
            received: rows.len(),
            empty_reason: reason.map(EmptyReason::as_str),
        });

        Ok(SearchResponse {
            items: cards(&rows),
            page: page.page,
            limit: page.limit,
            total,
            debug,
        })
    }

    /// Newest listings with an optional plain text filter
    async fn simple(
        &self,
        q: &str,
        limit: u32,
        status: Option<ListingStatus>,
    ) -> ServiceResult<SearchResponse> {
        let page = PageRequest::first(limit);
        let query = ListingSearchQuery {
            terms: if q.is_empty() { Vec::new() } else { vec![q.to_string()] },
            status,
            sort: SearchSort::DateDesc,
            page,
            ..ListingSearchQuery::default()
        };
        let (rows, total) = self.ctx.listing_repo().search(&query).await?;

        Ok(SearchResponse {
            items: cards(&rows),
            page: page.page,
            limit: page.limit,
            total,
            debug: None,
        })
    }

    /// Title suggestions for the search box
    #[instrument(skip(self, params))]
    pub async fn suggest(&self, params: SuggestParams) -> ServiceResult<SuggestResponse> {
        let limit = parse_number::<i64>(params.limit.as_deref())
            .unwrap_or(DEFAULT_SUGGEST_LIMIT)
            .clamp(1, MAX_SUGGEST_LIMIT);
        let limit_usize = usize::try_from(limit).unwrap_or(1);
        let normalized = params
            .q
            .as_deref()
            .map(|q| normalize_query(&q.replace(['%', '_'], "")))
            .unwrap_or_default();

        if normalized.is_empty() {
            // Recent distinct titles
            let recent = ListingSearchQuery {
                status: Some(ListingStatus::Active),
                sort: SearchSort::DateDesc,
                page: PageRequest::first(RECENT_TITLE_SCAN),
                ..ListingSearchQuery::default()
            };
            let (rows, _) = self.ctx.listing_repo().search(&recent).await?;
            let titles = rows.into_iter().map(|l| l.title).collect();
            return Ok(SuggestResponse {
                suggestions: rank_suggestions(titles, &[], limit_usize),
            });
        }

        let terms = expand_terms(&normalized, MAX_SUGGEST_TERMS);
        let titles = self
            .ctx
            .listing_repo()
            .suggest_titles(&terms, limit * 3)
            .await?;

        Ok(SuggestResponse {
            suggestions: rank_suggestions(titles, &terms, limit_usize),
        })
    }
}

fn cards(rows: &[Listing]) -> Vec<ListingCard> {
    rows.iter().map(ListingCard::with_seller_flag).collect()
}
