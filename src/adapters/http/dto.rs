//! Request and response DTOs for the HTTP surface.
//!
//! The claim error kinds are surfaced as machine-readable strings; the
//! front end owns the final user-facing wording.

use serde::{Deserialize, Serialize};

/// Request body for invoice creation.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceBody {
    /// Tariff amount in major currency units.
    pub amount: i64,
}

/// Response for a created invoice.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub order_id: String,
    pub access_token: String,
    pub pay_url: String,
}

/// Request body for a claim.
#[derive(Debug, Deserialize)]
pub struct ClaimBody {
    /// Order id or access token, depending on deployment variant.
    pub identifier: String,

    /// Opaque chat reference of the requester, passed through for logging.
    #[serde(default)]
    pub requester_chat_ref: Option<String>,
}

/// Response for a successful claim.
#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub order_id: String,
    pub amount: i64,
    pub tier: String,
    pub invite_link: String,
    pub expires_at: String,
}

/// Uniform error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind.
    pub error: &'static str,

    /// Human-readable detail.
    pub message: String,

    /// Whether retrying the same request later can succeed.
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn new(error: &'static str, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            error,
            message: message.into(),
            retryable,
        }
    }
}

/// Webhook acknowledgment; always returned to the processor.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
}

impl WebhookAck {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_body_accepts_missing_requester_ref() {
        let body: ClaimBody = serde_json::from_str(r#"{"identifier": "order_1"}"#).unwrap();
        assert_eq!(body.identifier, "order_1");
        assert!(body.requester_chat_ref.is_none());
    }

    #[test]
    fn webhook_ack_serializes_ok_status() {
        let json = serde_json::to_string(&WebhookAck::ok()).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }

    #[test]
    fn error_response_carries_kind_and_retryability() {
        let json = serde_json::to_value(ErrorResponse::new(
            "payment_not_confirmed",
            "Payment not yet confirmed",
            true,
        ))
        .unwrap();
        assert_eq!(json["error"], "payment_not_confirmed");
        assert_eq!(json["retryable"], true);
    }
}
