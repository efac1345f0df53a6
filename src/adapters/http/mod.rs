//! HTTP adapter (axum).

mod dto;
mod handlers;
mod routes;

pub use handlers::GateAppState;
pub use routes::gate_router;
