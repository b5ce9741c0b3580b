//! # market-service
//!
//! Application layer containing the marketplace use cases, DTOs, and the
//! payment processor client.

pub mod dto;
pub mod payments;
pub mod services;

pub use payments::{PaymentError, PaymentProcessor, StripeClient};
pub use services::{
    BidService, BusinessDirectoryService, CategoryService, ConversationService, DockService,
    EngagementService, EntitlementService, FavoriteService, KycService, ListingService,
    MessageService, PaymentRequestService, ProfileService, ReadService, ReviewService,
    SearchService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
