//! Ports (driven-side interfaces).
//!
//! Async traits at the seams between the application core and the outside
//! world: the durable order store, the invite-issuing messaging collaborator,
//! and the payment processor.

mod invite_issuer;
mod order_store;
mod payment_provider;

pub use invite_issuer::{InviteError, InviteIssuer, InviteLink, InviteRequest};
pub use order_store::OrderStore;
pub use payment_provider::{CreateInvoiceRequest, InvoiceSession, PaymentError, PaymentProvider};
