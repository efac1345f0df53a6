//! Order store port.
//!
//! The store is the only shared mutable resource in the system. The messaging
//! front end and the webhook receiver may run as separate processes, so every
//! component observes order state through this port and nothing is cached in
//! process memory.
//!
//! # Atomicity contract
//!
//! `try_claim` / `try_claim_by_token` must be linearizable per key: among any
//! set of concurrent callers for the same order, at most one observes `true`.
//! Implementations combine the predicate check and the mutation into a single
//! atomic statement (a conditional `UPDATE` in Postgres, a mutex-guarded
//! check-and-set in memory); optimistic retry loops are not required.

use async_trait::async_trait;

use crate::domain::foundation::{AccessToken, DomainError, OrderId};
use crate::domain::order::Order;

/// Durable keyed record of orders with atomic claim semantics.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new pending order, or updates amount and status if the
    /// order id already exists (idempotent upsert for retried invoice
    /// creation). Must never downgrade an already-paid order.
    async fn create(&self, order: &Order) -> Result<(), DomainError>;

    /// Sets `status = paid`. Idempotent: marking an already-paid order is a
    /// no-op success. Returns whether an order with this id existed.
    ///
    /// The stored amount is never touched here; reported-amount
    /// reconciliation is the caller's concern.
    async fn mark_paid(&self, order_id: &OrderId) -> Result<bool, DomainError>;

    /// Atomically transitions `claimed: false -> true` iff
    /// `status = paid AND claimed = false`. Returns whether *this* call
    /// performed the transition.
    async fn try_claim(&self, order_id: &OrderId) -> Result<bool, DomainError>;

    /// Fetches an order by id.
    async fn get(&self, order_id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// Attaches an access token to an order. Fails with `OrderNotFound` if
    /// the order does not exist and `TokenAlreadySet` if a token was
    /// already attached (tokens are immutable once set).
    async fn set_token(&self, order_id: &OrderId, token: &AccessToken) -> Result<(), DomainError>;

    /// Fetches an order by its access token.
    async fn get_by_token(&self, token: &AccessToken) -> Result<Option<Order>, DomainError>;

    /// Same contract as [`try_claim`](OrderStore::try_claim), keyed on the
    /// access token.
    async fn try_claim_by_token(&self, token: &AccessToken) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn OrderStore) {}
    }
}
