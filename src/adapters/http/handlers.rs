//! Axum request handlers.
//!
//! Transport-level concerns live here: decoding bodies, mapping command
//! handler results onto status codes, and the webhook's always-acknowledge
//! contract. Everything stateful goes through the command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::adapters::mono;
use crate::application::handlers::{
    ClaimAccessCommand, ClaimAccessHandler, ClaimIdentifier, CreateInvoiceCommand,
    CreateInvoiceHandler, IngestPaymentEventCommand, IngestPaymentEventHandler,
};
use crate::domain::foundation::{AccessToken, ErrorCode, OrderId};
use crate::domain::order::ClaimError;

use super::dto::{
    ClaimBody, ClaimResponse, CreateInvoiceBody, ErrorResponse, InvoiceResponse, WebhookAck,
};

/// Shared handler wiring for the HTTP surface.
#[derive(Clone)]
pub struct GateAppState {
    pub invoices: Arc<CreateInvoiceHandler>,
    pub payments: Arc<IngestPaymentEventHandler>,
    pub claims: Arc<ClaimAccessHandler>,
}

/// GET / - liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "channel-gate",
    }))
}

/// POST /invoices - start a purchase.
pub async fn create_invoice(
    State(state): State<GateAppState>,
    Json(body): Json<CreateInvoiceBody>,
) -> Result<(StatusCode, Json<InvoiceResponse>), (StatusCode, Json<ErrorResponse>)> {
    let created = state
        .invoices
        .handle(CreateInvoiceCommand {
            amount: body.amount,
        })
        .await
        .map_err(|e| match e.code {
            ErrorCode::InvalidAmount | ErrorCode::ValidationFailed => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("invalid_amount", e.message, false)),
            ),
            ErrorCode::PaymentProviderError => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new("payment_provider_error", e.message, true)),
            ),
            _ => {
                tracing::error!(error = %e, "invoice creation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(
                        "internal_error",
                        "Internal server error",
                        true,
                    )),
                )
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(InvoiceResponse {
            order_id: created.order_id.to_string(),
            access_token: created.access_token.to_string(),
            pay_url: created.pay_url,
        }),
    ))
}

/// POST /payments/webhook - payment processor callback.
///
/// Always answers 200: the processor redelivers on error responses, and a
/// redelivered payload that failed to parse once will fail the same way
/// again. Failures are logged for the operator instead.
pub async fn payment_webhook(
    State(state): State<GateAppState>,
    body: Bytes,
) -> Json<WebhookAck> {
    let notification = match mono::parse_notification(&body) {
        Ok(notification) => notification,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable payment webhook payload acknowledged");
            None
        }
    };

    if let Err(e) = state
        .payments
        .handle(IngestPaymentEventCommand { notification })
        .await
    {
        tracing::error!(error = %e, "payment ingestion failed, event acknowledged anyway");
    }

    Json(WebhookAck::ok())
}

/// POST /claim - redeem a paid order for a single-use invite.
pub async fn claim_access(
    State(state): State<GateAppState>,
    Json(body): Json<ClaimBody>,
) -> Result<Json<ClaimResponse>, (StatusCode, Json<ErrorResponse>)> {
    let identifier = parse_identifier(&body.identifier)
        .ok_or_else(|| claim_error_response(&ClaimError::UnknownIdentifier))?;

    let granted = state
        .claims
        .handle(ClaimAccessCommand {
            identifier,
            requester_chat_ref: body.requester_chat_ref,
        })
        .await
        .map_err(|e| claim_error_response(&e))?;

    Ok(Json(ClaimResponse {
        order_id: granted.order_id.to_string(),
        amount: granted.amount,
        tier: granted.tier.to_string(),
        invite_link: granted.invite.url,
        expires_at: granted.invite.expires_at.to_rfc3339(),
    }))
}

/// Order ids are self-describing via their prefix; anything else is treated
/// as an access token.
fn parse_identifier(raw: &str) -> Option<ClaimIdentifier> {
    if raw.starts_with("order_") {
        OrderId::new(raw).ok().map(ClaimIdentifier::OrderId)
    } else {
        AccessToken::new(raw).ok().map(ClaimIdentifier::Token)
    }
}

fn claim_error_response(error: &ClaimError) -> (StatusCode, Json<ErrorResponse>) {
    let retryable = error.is_retryable();
    let (status, kind, message) = match error {
        ClaimError::UnknownIdentifier => (
            StatusCode::NOT_FOUND,
            "unknown_identifier",
            error.to_string(),
        ),
        ClaimError::PaymentNotConfirmed => (
            StatusCode::CONFLICT,
            "payment_not_confirmed",
            error.to_string(),
        ),
        ClaimError::AlreadyClaimed => {
            (StatusCode::GONE, "already_claimed", error.to_string())
        }
        ClaimError::UnknownTier { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "unknown_tier",
            error.to_string(),
        ),
        ClaimError::CredentialIssuanceFailed { .. } => (
            StatusCode::BAD_GATEWAY,
            "credential_issuance_failed",
            error.to_string(),
        ),
        ClaimError::Storage(e) => {
            tracing::error!(error = %e, "claim failed on storage");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            )
        }
    };
    (status, Json(ErrorResponse::new(kind, message, retryable)))
}
