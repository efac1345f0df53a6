//! Payment processor adapter (Monobank merchant API).

mod client;
mod webhook_types;

pub use client::{MonoConfig, MonoPaymentProvider};
pub use webhook_types::parse_notification;
