//! Domain layer.
//!
//! Pure business logic: the Order aggregate, its lifecycle state machine,
//! tariff-to-destination mapping, and the claim error taxonomy. Nothing in
//! this layer performs I/O.

pub mod foundation;
pub mod order;
