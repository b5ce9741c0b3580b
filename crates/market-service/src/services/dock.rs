//! Dock service
//!
//! Every operation loads the caller's layout, applies the change, saves it
//! and returns the recomputed placement.

use tracing::{debug, instrument};
use uuid::Uuid;

use market_core::DockManager;

use crate::dto::{DockOffsetRequest, DockResponse, DockWidthRequest, MinimizeDockRequest, OpenDockRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Dock service
pub struct DockService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DockService<'a> {
    /// Create a new DockService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid) -> ServiceResult<DockResponse> {
        let manager = self.ctx.dock_repo().load(user_id).await?;
        Ok(DockResponse::from(&manager))
    }

    /// Open a conversation dock, or raise it when already open
    #[instrument(skip(self, request))]
    pub async fn open(&self, user_id: Uuid, request: OpenDockRequest) -> ServiceResult<DockResponse> {
        self.apply(user_id, move |m| {
            m.open(request.conversation_id, request.title.as_deref());
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn close(&self, user_id: Uuid, dock_id: Uuid) -> ServiceResult<DockResponse> {
        self.apply(user_id, move |m| m.close(dock_id)).await
    }

    #[instrument(skip(self, request))]
    pub async fn minimize(
        &self,
        user_id: Uuid,
        dock_id: Uuid,
        request: MinimizeDockRequest,
    ) -> ServiceResult<DockResponse> {
        self.apply(user_id, move |m| m.set_minimized(dock_id, request.minimized))
            .await
    }

    /// Record the rendered width so later docks shift by the real size
    #[instrument(skip(self, request))]
    pub async fn report_width(
        &self,
        user_id: Uuid,
        dock_id: Uuid,
        request: DockWidthRequest,
    ) -> ServiceResult<DockResponse> {
        self.apply(user_id, move |m| m.report_width(dock_id, request.width))
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn set_offset(&self, user_id: Uuid, request: DockOffsetRequest) -> ServiceResult<DockResponse> {
        self.apply(user_id, move |m| m.set_bottom_offset(request.offset))
            .await
    }

    /// Called on navigation
    #[instrument(skip(self))]
    pub async fn close_all(&self, user_id: Uuid) -> ServiceResult<DockResponse> {
        self.apply(user_id, DockManager::close_all).await
    }

    async fn apply<F>(&self, user_id: Uuid, f: F) -> ServiceResult<DockResponse>
    where
        F: FnOnce(&mut DockManager) + Send,
    {
        let mut manager = self.ctx.dock_repo().load(user_id).await?;
        f(&mut manager);
        self.ctx.dock_repo().save(user_id, &manager).await?;
        debug!(user_id = %user_id, docks = manager.docks().len(), "Dock layout saved");
        Ok(DockResponse::from(&manager))
    }
}
