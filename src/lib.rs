//! Channel Gate - Paid Access Gateway
//!
//! This crate coordinates asynchronous payment confirmations with user access
//! requests against a persisted order record, issuing single-use, time-bounded
//! invite links to private channels exactly once per paid order.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
