//! Payment processor access
//!
//! Seller onboarding (KYC) goes through the [`PaymentProcessor`] trait;
//! [`StripeClient`] implements it against the processor's REST API.

mod processor;
mod stripe;

pub use processor::{
    AccountUpdate, CreateAccountParams, DocumentUpload, PaymentError, PaymentProcessor,
    PaymentResult, ProcessorAccount,
};
pub use stripe::{flatten_form, StripeClient};
