//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs and loosely typed query structs for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    non_blank, parse_flag, parse_number, BrowseListingsParams, BusinessParams,
    CreateListingRequest, CreateReviewRequest, DockOffsetRequest, DockWidthRequest,
    EditMessageRequest, ExternalAccountRequest, KycFileParams, KycOnboardRequest,
    MessageListParams, MinimizeDockRequest, OpenDockRequest, PaymentRequestBody, PlaceBidRequest,
    ReviewListParams, SearchParams, SendMessageRequest, ShippingChoice, StartConversationRequest,
    SuggestParams, UpdateListingRequest,
};

// Re-export commonly used response types
pub use responses::{
    BidItem, BidResponse, BidSummaryResponse, BrowseMeta, BusinessDirectoryResponse,
    BusinessEntry, BusinessListingSummary, CategoryResponse, ConversationResponse,
    ConversationSummary, CurrentProfileResponse, DockResponse, EntitlementsResponse,
    ExternalAccountResponse, HealthChecks, HealthResponse, IsFavoriteResponse, ItemsResponse,
    KycAccountResponse, KycAccountSnapshot, KycFileResponse, KycStatusResponse, ListingCard,
    ListingPage, ListingResponse, ListingStatsResponse, MessageResponse, OkResponse,
    OnboardResponse, ParticipantSummary, PaymentRequestResponse, ProfileResponse,
    ReadinessResponse, ResponseTimeResponse, ReviewItem, SearchDebug, SearchResponse,
    SubcategoryResponse, SubmittedReview, SuccessResponse, SuggestResponse, UnreadResponse,
    VerificationResponse, ViewResponse,
};

// Re-export mappers and helper structs
pub use mappers::MessageWithDetails;
