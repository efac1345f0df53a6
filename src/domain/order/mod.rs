//! Order domain: purchase intents and their claim lifecycle.

mod errors;
mod lifecycle;
mod order;
mod payment_event;
mod status;
mod tier;

pub use errors::ClaimError;
pub use lifecycle::OrderLifecycle;
pub use order::Order;
pub use payment_event::{PaymentNotification, PaymentOutcome};
pub use status::OrderStatus;
pub use tier::{Tier, TierMap};
