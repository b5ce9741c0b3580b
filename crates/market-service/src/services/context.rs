//! Service context - dependency container for services
//!
//! Holds all repositories, cache stores, and other dependencies needed by services.

use std::sync::Arc;

use market_cache::{DockStore, Publisher, SharedRedisPool};
use market_common::auth::JwtService;
use market_common::{MessagingConfig, StorageConfig};
use market_core::traits::{
    AttachmentRepository, BidRepository, CategoryRepository, ConversationReadRepository,
    ConversationRepository, DockRepository, FavoriteRepository, ListingRepository,
    ListingViewRepository, MessageRepository, ProfileRepository, ReviewRepository,
};
use market_db::{
    PgAttachmentRepository, PgBidRepository, PgCategoryRepository, PgConversationReadRepository,
    PgConversationRepository, PgFavoriteRepository, PgListingRepository, PgListingViewRepository,
    PgMessageRepository, PgPool, PgProfileRepository, PgReviewRepository,
};

use crate::payments::PaymentProcessor;

use super::error::{ServiceError, ServiceResult};

/// Country used for new connected accounts when none is configured
pub const DEFAULT_PAYMENTS_COUNTRY: &str = "BE";

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - The Redis publisher and dock store
/// - JWT validation
/// - The payment processor, when configured
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Redis pool
    redis_pool: SharedRedisPool,

    // Repositories
    profile_repo: Arc<dyn ProfileRepository>,
    listing_repo: Arc<dyn ListingRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    conversation_repo: Arc<dyn ConversationRepository>,
    message_repo: Arc<dyn MessageRepository>,
    attachment_repo: Arc<dyn AttachmentRepository>,
    read_repo: Arc<dyn ConversationReadRepository>,
    bid_repo: Arc<dyn BidRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    favorite_repo: Arc<dyn FavoriteRepository>,
    view_repo: Arc<dyn ListingViewRepository>,

    // Redis-backed stores
    publisher: Publisher,
    dock_repo: Arc<dyn DockRepository>,

    // Services
    jwt_service: Arc<JwtService>,
    payments: Option<Arc<dyn PaymentProcessor>>,

    // Settings
    storage: StorageConfig,
    messaging: MessagingConfig,
    payments_country: String,
}

impl ServiceContext {
    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the Redis connection pool
    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    pub fn listing_repo(&self) -> &dyn ListingRepository {
        self.listing_repo.as_ref()
    }

    pub fn category_repo(&self) -> &dyn CategoryRepository {
        self.category_repo.as_ref()
    }

    pub fn conversation_repo(&self) -> &dyn ConversationRepository {
        self.conversation_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    pub fn attachment_repo(&self) -> &dyn AttachmentRepository {
        self.attachment_repo.as_ref()
    }

    /// Get the conversation read-marker repository
    pub fn read_repo(&self) -> &dyn ConversationReadRepository {
        self.read_repo.as_ref()
    }

    pub fn bid_repo(&self) -> &dyn BidRepository {
        self.bid_repo.as_ref()
    }

    pub fn review_repo(&self) -> &dyn ReviewRepository {
        self.review_repo.as_ref()
    }

    pub fn favorite_repo(&self) -> &dyn FavoriteRepository {
        self.favorite_repo.as_ref()
    }

    /// Get the listing view counter
    pub fn view_repo(&self) -> &dyn ListingViewRepository {
        self.view_repo.as_ref()
    }

    // === Redis ===

    /// Get the Redis pub/sub publisher
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Get the dock layout store
    pub fn dock_repo(&self) -> &dyn DockRepository {
        self.dock_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Payment processor, or `PaymentsUnavailable` when none is configured
    pub fn payments(&self) -> ServiceResult<&dyn PaymentProcessor> {
        self.payments
            .as_deref()
            .ok_or(ServiceError::PaymentsUnavailable)
    }

    // === Settings ===

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn messaging(&self) -> MessagingConfig {
        self.messaging
    }

    pub fn payments_country(&self) -> &str {
        &self.payments_country
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &"SharedRedisPool")
            .field("repositories", &"...")
            .field("payments", &self.payments.is_some())
            .field("storage", &self.storage)
            .field("messaging", &self.messaging)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    listing_repo: Option<Arc<dyn ListingRepository>>,
    category_repo: Option<Arc<dyn CategoryRepository>>,
    conversation_repo: Option<Arc<dyn ConversationRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    attachment_repo: Option<Arc<dyn AttachmentRepository>>,
    read_repo: Option<Arc<dyn ConversationReadRepository>>,
    bid_repo: Option<Arc<dyn BidRepository>>,
    review_repo: Option<Arc<dyn ReviewRepository>>,
    favorite_repo: Option<Arc<dyn FavoriteRepository>>,
    view_repo: Option<Arc<dyn ListingViewRepository>>,
    dock_repo: Option<Arc<dyn DockRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    payments: Option<Arc<dyn PaymentProcessor>>,
    storage: Option<StorageConfig>,
    messaging: Option<MessagingConfig>,
    payments_country: Option<String>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    /// Pool plus the PostgreSQL implementation of every repository
    pub fn postgres(self, pool: PgPool) -> Self {
        self.profile_repo(Arc::new(PgProfileRepository::new(pool.clone())))
            .listing_repo(Arc::new(PgListingRepository::new(pool.clone())))
            .category_repo(Arc::new(PgCategoryRepository::new(pool.clone())))
            .conversation_repo(Arc::new(PgConversationRepository::new(pool.clone())))
            .message_repo(Arc::new(PgMessageRepository::new(pool.clone())))
            .attachment_repo(Arc::new(PgAttachmentRepository::new(pool.clone())))
            .read_repo(Arc::new(PgConversationReadRepository::new(pool.clone())))
            .bid_repo(Arc::new(PgBidRepository::new(pool.clone())))
            .review_repo(Arc::new(PgReviewRepository::new(pool.clone())))
            .favorite_repo(Arc::new(PgFavoriteRepository::new(pool.clone())))
            .view_repo(Arc::new(PgListingViewRepository::new(pool.clone())))
            .pool(pool)
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn listing_repo(mut self, repo: Arc<dyn ListingRepository>) -> Self {
        self.listing_repo = Some(repo);
        self
    }

    pub fn category_repo(mut self, repo: Arc<dyn CategoryRepository>) -> Self {
        self.category_repo = Some(repo);
        self
    }

    pub fn conversation_repo(mut self, repo: Arc<dyn ConversationRepository>) -> Self {
        self.conversation_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn attachment_repo(mut self, repo: Arc<dyn AttachmentRepository>) -> Self {
        self.attachment_repo = Some(repo);
        self
    }

    pub fn read_repo(mut self, repo: Arc<dyn ConversationReadRepository>) -> Self {
        self.read_repo = Some(repo);
        self
    }

    pub fn bid_repo(mut self, repo: Arc<dyn BidRepository>) -> Self {
        self.bid_repo = Some(repo);
        self
    }

    pub fn review_repo(mut self, repo: Arc<dyn ReviewRepository>) -> Self {
        self.review_repo = Some(repo);
        self
    }

    pub fn favorite_repo(mut self, repo: Arc<dyn FavoriteRepository>) -> Self {
        self.favorite_repo = Some(repo);
        self
    }

    pub fn view_repo(mut self, repo: Arc<dyn ListingViewRepository>) -> Self {
        self.view_repo = Some(repo);
        self
    }

    /// Optional; defaults to the Redis [`DockStore`] on the shared pool
    pub fn dock_repo(mut self, repo: Arc<dyn DockRepository>) -> Self {
        self.dock_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Optional; KYC operations answer `PAYMENTS_UNAVAILABLE` without it
    pub fn payments(mut self, processor: Option<Arc<dyn PaymentProcessor>>) -> Self {
        self.payments = processor;
        self
    }

    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Optional; defaults to 20 messages per 60 seconds
    pub fn messaging(mut self, messaging: MessagingConfig) -> Self {
        self.messaging = Some(messaging);
        self
    }

    /// Optional; defaults to `BE`
    pub fn payments_country(mut self, country: impl Into<String>) -> Self {
        self.payments_country = Some(country.into());
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        let redis_pool = required(self.redis_pool, "redis_pool")?;
        let inner_pool = (*redis_pool).clone();

        Ok(ServiceContext {
            pool: required(self.pool, "pool")?,
            profile_repo: required(self.profile_repo, "profile_repo")?,
            listing_repo: required(self.listing_repo, "listing_repo")?,
            category_repo: required(self.category_repo, "category_repo")?,
            conversation_repo: required(self.conversation_repo, "conversation_repo")?,
            message_repo: required(self.message_repo, "message_repo")?,
            attachment_repo: required(self.attachment_repo, "attachment_repo")?,
            read_repo: required(self.read_repo, "read_repo")?,
            bid_repo: required(self.bid_repo, "bid_repo")?,
            review_repo: required(self.review_repo, "review_repo")?,
            favorite_repo: required(self.favorite_repo, "favorite_repo")?,
            view_repo: required(self.view_repo, "view_repo")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            storage: required(self.storage, "storage")?,
            dock_repo: self
                .dock_repo
                .unwrap_or_else(|| Arc::new(DockStore::new(inner_pool.clone()))),
            publisher: Publisher::new(inner_pool),
            redis_pool,
            payments: self.payments,
            messaging: self.messaging.unwrap_or_default(),
            payments_country: self
                .payments_country
                .unwrap_or_else(|| DEFAULT_PAYMENTS_COUNTRY.to_string()),
        })
    }
}
