//! Adapters (driven and driving implementations of the ports).

pub mod http;
pub mod memory;
pub mod mono;
pub mod postgres;
pub mod telegram;
