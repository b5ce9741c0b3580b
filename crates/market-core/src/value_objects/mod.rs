//! Value objects - immutable types with validation and pure domain rules

mod dock;
mod engagement;
mod entitlements;
mod kyc;
mod pagination;
pub mod search;
pub mod subscription;
mod shipping;

pub use dock::{
    Dock, DockLayout, DockManager, DEFAULT_BOTTOM_OFFSET, DEFAULT_DOCK_WIDTH, DOCK_GAP, MAX_DOCKS,
};
pub use engagement::{
    ResponseTime, ResponseTimeNote, ThreadMessage, Viewer, MAX_RESPONSE_DAYS, RESPONSE_SAMPLE_LIMIT,
};
pub use entitlements::{EntitlementLimits, EntitlementReport, Entitlements, LimitStatus, Usage};
pub use kyc::{
    check_identity_document, KycStatus, IDENTITY_DOCUMENT_MAX_BYTES, IDENTITY_DOCUMENT_TYPES,
};
pub use pagination::{PageRequest, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use search::{BusinessSearchMode, BusinessSort, SearchSort};
pub use shipping::ShippingMode;
pub use subscription::{BillingCycle, PlanType, SubscriptionData};
