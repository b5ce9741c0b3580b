//! Dock layout persistence in Redis.

use async_trait::async_trait;
use market_core::traits::{DockRepository, RepoResult};
use market_core::{DockManager, DomainError};
use uuid::Uuid;

use crate::pool::{RedisPool, RedisPoolError};

pub const DOCK_KEY_PREFIX: &str = "dock:";

/// Seven days; refreshed on every save
pub const DOCK_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Stores each user's [`DockManager`] as JSON under `dock:{user_id}`
#[derive(Clone, Debug)]
pub struct DockStore {
    pool: RedisPool,
}

impl DockStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(user_id: Uuid) -> String {
        format!("{DOCK_KEY_PREFIX}{user_id}")
    }
}

fn cache_error(err: RedisPoolError) -> DomainError {
    DomainError::CacheError(err.to_string())
}

#[async_trait]
impl DockRepository for DockStore {
    async fn load(&self, user_id: Uuid) -> RepoResult<DockManager> {
        let stored = self
            .pool
            .get_value::<DockManager>(&Self::key(user_id))
            .await
            .map_err(cache_error)?;
        Ok(stored.unwrap_or_default())
    }

    async fn save(&self, user_id: Uuid, manager: &DockManager) -> RepoResult<()> {
        self.pool
            .set(&Self::key(user_id), manager, Some(DOCK_TTL_SECS))
            .await
            .map_err(cache_error)
    }
}
