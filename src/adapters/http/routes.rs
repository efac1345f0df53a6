//! Route table for the HTTP surface.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, GateAppState};

/// Builds the application router.
pub fn gate_router(state: GateAppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/invoices", post(handlers::create_invoice))
        .route("/payments/webhook", post(handlers::payment_webhook))
        .route("/claim", post(handlers::claim_access))
        .with_state(state)
}
