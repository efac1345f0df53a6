//! In-memory adapter implementations.

mod order_store;

pub use order_store::InMemoryOrderStore;
