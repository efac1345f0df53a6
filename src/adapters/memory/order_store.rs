//! In-memory implementation of OrderStore.
//!
//! Used by tests and single-process development runs. The whole map sits
//! behind one mutex, so every check-and-set executes atomically with respect
//! to all other callers, matching the Postgres adapter's row-level contract.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::foundation::{AccessToken, DomainError, ErrorCode, OrderId};
use crate::domain::order::Order;
use crate::ports::OrderStore;

/// In-memory OrderStore keyed by order id.
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.get_mut(&order.order_id) {
            // Upsert for retried invoice creation, but never downgrade a
            // paid order.
            Some(existing) if existing.status.is_paid() => {}
            Some(existing) => {
                existing.amount = order.amount;
                existing.status = order.status;
                existing.updated_at = Utc::now();
            }
            None => {
                orders.insert(order.order_id.clone(), order.clone());
            }
        }
        Ok(())
    }

    async fn mark_paid(&self, order_id: &OrderId) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.get_mut(order_id) {
            Some(order) => {
                order.mark_paid(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn try_claim(&self, order_id: &OrderId) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.get_mut(order_id) {
            Some(order) => Ok(order.claim(Utc::now()).is_ok()),
            None => Ok(false),
        }
    }

    async fn get(&self, order_id: &OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.lock().unwrap().get(order_id).cloned())
    }

    async fn set_token(
        &self,
        order_id: &OrderId,
        token: &AccessToken,
    ) -> Result<(), DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders.get_mut(order_id).ok_or_else(|| {
            DomainError::new(ErrorCode::OrderNotFound, "Order not found")
                .with_detail("order_id", order_id.to_string())
        })?;
        order.attach_token(token.clone()).map_err(|_| {
            DomainError::new(ErrorCode::TokenAlreadySet, "Access token already set")
                .with_detail("order_id", order_id.to_string())
        })
    }

    async fn get_by_token(&self, token: &AccessToken) -> Result<Option<Order>, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .find(|order| order.access_token.as_ref() == Some(token))
            .cloned())
    }

    async fn try_claim_by_token(&self, token: &AccessToken) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        match orders
            .values_mut()
            .find(|order| order.access_token.as_ref() == Some(token))
        {
            Some(order) => Ok(order.claim(Utc::now()).is_ok()),
            None => Ok(false),
        }
    }
}
