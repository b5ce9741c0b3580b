//! Engagement service
//!
//! Listing view counting, listing stats and seller response time.

use market_core::value_objects::{ResponseTime, Viewer, RESPONSE_SAMPLE_LIMIT};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::dto::{ListingStatsResponse, ResponseTimeResponse, ViewResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct EngagementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EngagementService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Count a view; repeat views by the same viewer leave the total unchanged
    #[instrument(skip(self, viewer))]
    pub async fn record_view(&self, listing_id: Uuid, viewer: &Viewer) -> ServiceResult<ViewResponse> {
        let views = self.ctx.view_repo().record(listing_id, viewer).await?;
        debug!(listing_id = %listing_id, views, "Listing view recorded");
        Ok(ViewResponse {
            success: true,
            views,
        })
    }

    /// Zeros for a listing that does not exist
    #[instrument(skip(self))]
    pub async fn stats(&self, listing_id: Uuid) -> ServiceResult<ListingStatsResponse> {
        let Some(views) = self.ctx.view_repo().count(listing_id).await? else {
            return Ok(ListingStatsResponse::default());
        };
        let favorites = self.ctx.favorite_repo().count_for_listing(listing_id).await?;
        Ok(ListingStatsResponse { views, favorites })
    }

    #[instrument(skip(self))]
    pub async fn response_time(&self, seller_id: Uuid) -> ServiceResult<ResponseTimeResponse> {
        let messages = self
            .ctx
            .message_repo()
            .thread_messages_for(seller_id, RESPONSE_SAMPLE_LIMIT)
            .await?;
        let response_time = ResponseTime::from_messages(seller_id, &messages);
        debug!(
            seller_id = %seller_id,
            messages = messages.len(),
            samples = response_time.samples,
            "Response time computed"
        );
        Ok(ResponseTimeResponse::from(response_time))
    }
}
