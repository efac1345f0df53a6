//! Payment provider port.
//!
//! Invoice creation is a thin pass-through to the processor: the core only
//! needs the payable URL back. Webhook delivery arrives separately through
//! the HTTP surface.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::OrderId;

/// Request to create one payable invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceRequest {
    /// Amount in minor currency units.
    pub amount_minor: i64,

    /// Correlation reference carried back on the webhook; equals the
    /// order id.
    pub reference: OrderId,

    /// Human-readable purchase description shown on the payment page.
    pub destination_text: String,

    /// Public URL the processor calls back with payment events.
    pub webhook_url: String,

    /// URL the payer is redirected to after completing payment.
    pub redirect_url: String,
}

/// Processor response to invoice creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSession {
    /// URL of the payment page for the user.
    pub pay_url: String,
}

/// Failures while creating an invoice.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The processor rejected the request.
    #[error("Payment processor rejected the invoice: {description}")]
    Rejected { description: String },

    /// Transport failure reaching the processor.
    #[error("Payment processor unreachable: {0}")]
    Transport(String),

    /// The processor answered with a body that could not be interpreted.
    #[error("Payment processor returned an unreadable response: {0}")]
    MalformedResponse(String),
}

/// Port for the external payment processor.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Creates an invoice and returns the payable URL.
    async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
    ) -> Result<InvoiceSession, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }
}
