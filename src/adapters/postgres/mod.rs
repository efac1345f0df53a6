//! PostgreSQL adapter implementations.

mod order_store;

pub use order_store::PostgresOrderStore;
