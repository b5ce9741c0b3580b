//! Seller verification (KYC) status derived from the payment processor account

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Largest identity document forwarded to the processor
pub const IDENTITY_DOCUMENT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Content types the processor accepts for identity documents
pub const IDENTITY_DOCUMENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "application/pdf"];

/// Check an uploaded identity document and return its normalized content type.
/// Size wins over type when both are wrong.
pub fn check_identity_document(
    len: usize,
    content_type: Option<&str>,
) -> Result<String, DomainError> {
    if len == 0 {
        return Err(DomainError::EmptyFile);
    }
    if len > IDENTITY_DOCUMENT_MAX_BYTES {
        return Err(DomainError::FileTooLarge {
            max_bytes: IDENTITY_DOCUMENT_MAX_BYTES,
        });
    }
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();
    if !IDENTITY_DOCUMENT_TYPES.contains(&mime.as_str()) {
        return Err(DomainError::InvalidMimeType(mime));
    }
    Ok(mime)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    NotOnboarded,
    Incomplete,
    Pending,
    Approved,
    Rejected { reason: String },
}

impl KycStatus {
    /// Derive from the processor's account flags
    pub fn from_account(
        details_submitted: bool,
        charges_enabled: bool,
        disabled_reason: Option<&str>,
    ) -> Self {
        if !details_submitted {
            return Self::Incomplete;
        }
        if charges_enabled {
            return Self::Approved;
        }
        match disabled_reason.filter(|r| !r.is_empty()) {
            Some(reason) => Self::Rejected {
                reason: reason.to_string(),
            },
            None => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotOnboarded => "not_onboarded",
            Self::Incomplete => "incomplete",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected { .. } => "rejected",
        }
    }

    /// User-facing message
    pub fn message(&self) -> String {
        match self {
            Self::NotOnboarded => "Nog niet geregistreerd als geverifieerde verkoper".to_string(),
            Self::Incomplete => "KYC gegevens nog niet volledig ingediend".to_string(),
            Self::Pending => "Aanvraag in verwerking bij Stripe".to_string(),
            Self::Approved => "Goedgekeurd - je kunt betalingen ontvangen".to_string(),
            Self::Rejected { reason } => format!("Afgekeurd: {reason}"),
        }
    }

    #[inline]
    pub fn can_receive_payments(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derivation() {
        assert_eq!(KycStatus::from_account(false, false, None), KycStatus::Incomplete);
        assert_eq!(KycStatus::from_account(false, true, None), KycStatus::Incomplete);
        assert_eq!(KycStatus::from_account(true, true, Some("x")), KycStatus::Approved);
        assert_eq!(KycStatus::from_account(true, false, None), KycStatus::Pending);
        assert_eq!(KycStatus::from_account(true, false, Some("")), KycStatus::Pending);
        assert_eq!(
            KycStatus::from_account(true, false, Some("rejected.fraud")),
            KycStatus::Rejected { reason: "rejected.fraud".to_string() }
        );
    }

    #[test]
    fn test_identity_document_checks() {
        assert_eq!(
            check_identity_document(10, Some("image/PNG")).unwrap(),
            "image/png"
        );
        assert_eq!(
            check_identity_document(10, Some("application/pdf; charset=binary")).unwrap(),
            "application/pdf"
        );
        assert!(matches!(
            check_identity_document(0, Some("image/png")),
            Err(DomainError::EmptyFile)
        ));
        assert!(matches!(
            check_identity_document(IDENTITY_DOCUMENT_MAX_BYTES + 1, Some("text/plain")),
            Err(DomainError::FileTooLarge { .. })
        ));
        assert!(check_identity_document(IDENTITY_DOCUMENT_MAX_BYTES, Some("image/jpeg")).is_ok());
        assert!(matches!(
            check_identity_document(10, Some("text/plain")),
            Err(DomainError::InvalidMimeType(m)) if m == "text/plain"
        ));
        assert!(matches!(
            check_identity_document(10, None),
            Err(DomainError::InvalidMimeType(_))
        ));
    }

    #[test]
    fn test_messages() {
        assert_eq!(KycStatus::Approved.message(), "Goedgekeurd - je kunt betalingen ontvangen");
        assert_eq!(
            KycStatus::Rejected { reason: "listed".to_string() }.message(),
            "Afgekeurd: listed"
        );
        assert_eq!(KycStatus::NotOnboarded.as_str(), "not_onboarded");
        assert!(KycStatus::Approved.can_receive_payments());
        assert!(!KycStatus::Pending.can_receive_payments());
    }
}
