//! Claim error taxonomy.

use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors surfaced by the claim protocol.
///
/// The front end maps these to user-facing text; the distinction between
/// "not yet paid" (retryable) and "already used" (terminal) is load-bearing
/// for that messaging, so they are separate variants rather than one
/// conflict error.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// No order or token matches the identifier. Non-retryable without a
    /// new identifier.
    #[error("No order matches the given identifier")]
    UnknownIdentifier,

    /// The order exists but payment has not been confirmed yet. Payment
    /// confirmation is asynchronous, so the caller should retry shortly.
    #[error("Payment not yet confirmed")]
    PaymentNotConfirmed,

    /// Access for this order was already redeemed. Terminal.
    #[error("Access already claimed")]
    AlreadyClaimed,

    /// The recorded amount maps to no configured tier. Operator fault: the
    /// claim has already been consumed by the time this is detected.
    #[error("Amount {amount} maps to no configured tier")]
    UnknownTier { amount: i64 },

    /// The store recorded the claim but the invite could not be created.
    /// The order stays claimed; this is a lost claim requiring manual
    /// remediation.
    #[error("Invite issuance failed after claim was recorded: {reason}")]
    CredentialIssuanceFailed { reason: String },

    /// Storage failure below the claim protocol boundary.
    #[error("Storage failure: {0}")]
    Storage(#[from] DomainError),
}

impl ClaimError {
    /// Returns true if the caller may retry the same identifier later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClaimError::PaymentNotConfirmed
                | ClaimError::CredentialIssuanceFailed { .. }
                | ClaimError::Storage(_)
        )
    }
}
