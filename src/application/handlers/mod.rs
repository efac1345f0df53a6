//! Command handlers.
//!
//! Each handler wires domain logic to the ports and owns the propagation
//! policy at its boundary: raw transport and storage errors are translated
//! here and never leak to the user-facing caller.

mod claim_access;
mod create_invoice;
mod ingest_payment_event;

pub use claim_access::{AccessGranted, ClaimAccessCommand, ClaimAccessHandler, ClaimIdentifier};
pub use create_invoice::{
    CreateInvoiceCommand, CreateInvoiceHandler, InvoiceCreated, InvoiceEndpoints,
};
pub use ingest_payment_event::{
    IngestOutcome, IngestPaymentEventCommand, IngestPaymentEventHandler,
};
