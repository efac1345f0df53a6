//! Application layer: one command handler per use case.

pub mod handlers;
