//! IngestPaymentEventHandler - Command handler for payment processor
//! notifications.
//!
//! The processor delivers at-least-once and retries indefinitely on error
//! responses, so every path through this handler acknowledges: malformed
//! payloads are discarded, duplicates are no-ops, unknown references are
//! logged and dropped.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::order::PaymentNotification;
use crate::ports::OrderStore;

/// Command carrying one parsed notification.
///
/// `notification` is `None` when the payload yielded no usable correlation
/// reference; the decision to acknowledge-and-discard still belongs here,
/// not in the transport adapter.
#[derive(Debug, Clone)]
pub struct IngestPaymentEventCommand {
    pub notification: Option<PaymentNotification>,
}

/// What ingestion did with the notification. All outcomes are acknowledged
/// to the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The referenced order is now (or already was) paid.
    MarkedPaid { order_id: String },

    /// The reference matched no order; nothing changed.
    UnknownOrder,

    /// Non-success status; decline/refund handling is out of scope.
    IgnoredStatus,

    /// No usable reference in the payload; nothing changed.
    Malformed,
}

/// Handler applying payment notifications to the order store.
pub struct IngestPaymentEventHandler {
    store: Arc<dyn OrderStore>,
}

impl IngestPaymentEventHandler {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: IngestPaymentEventCommand,
    ) -> Result<IngestOutcome, DomainError> {
        let Some(notification) = cmd.notification else {
            tracing::warn!("payment notification without reference, acknowledged and discarded");
            return Ok(IngestOutcome::Malformed);
        };

        if !notification.outcome.is_success() {
            tracing::debug!(
                reference = %notification.reference,
                outcome = ?notification.outcome,
                "non-success payment notification ignored"
            );
            return Ok(IngestOutcome::IgnoredStatus);
        }

        // Reconciliation only: the recorded tariff amount stays authoritative
        // for tier selection, a conflicting reported amount is just logged.
        if let Some(order) = self.store.get(&notification.reference).await? {
            if let Some(reported) = notification.amount_major() {
                if reported != order.amount {
                    tracing::warn!(
                        order_id = %order.order_id,
                        recorded_amount = order.amount,
                        reported_amount = reported,
                        "payment amount differs from recorded tariff"
                    );
                }
            }
        }

        let existed = self.store.mark_paid(&notification.reference).await?;
        if !existed {
            tracing::warn!(
                reference = %notification.reference,
                "payment notification for unknown order"
            );
            return Ok(IngestOutcome::UnknownOrder);
        }

        tracing::info!(order_id = %notification.reference, "order marked paid");
        Ok(IngestOutcome::MarkedPaid {
            order_id: notification.reference.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryOrderStore;
    use crate::domain::foundation::OrderId;
    use crate::domain::order::{Order, OrderStatus, PaymentOutcome};
    use chrono::Utc;

    fn success(reference: &OrderId, amount_minor: i64) -> IngestPaymentEventCommand {
        IngestPaymentEventCommand {
            notification: Some(PaymentNotification {
                reference: reference.clone(),
                outcome: PaymentOutcome::Success,
                amount_minor: Some(amount_minor),
            }),
        }
    }

    async fn pending_order(store: &InMemoryOrderStore, amount: i64) -> OrderId {
        let order_id = OrderId::generate();
        store
            .create(&Order::create(order_id.clone(), amount, Utc::now()))
            .await
            .unwrap();
        order_id
    }

    #[tokio::test]
    async fn success_notification_marks_order_paid() {
        let store = Arc::new(InMemoryOrderStore::new());
        let handler = IngestPaymentEventHandler::new(store.clone());

        let order_id = pending_order(&store, 950).await;
        let outcome = handler.handle(success(&order_id, 95000)).await.unwrap();

        assert_eq!(
            outcome,
            IngestOutcome::MarkedPaid {
                order_id: order_id.to_string()
            }
        );
        let order = store.get(&order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert!(!order.claimed);
    }

    #[tokio::test]
    async fn duplicate_notification_is_a_noop() {
        let store = Arc::new(InMemoryOrderStore::new());
        let handler = IngestPaymentEventHandler::new(store.clone());

        let order_id = pending_order(&store, 950).await;
        handler.handle(success(&order_id, 95000)).await.unwrap();
        let after_first = store.get(&order_id).await.unwrap().unwrap();

        let outcome = handler.handle(success(&order_id, 95000)).await.unwrap();
        assert!(matches!(outcome, IngestOutcome::MarkedPaid { .. }));

        let after_second = store.get(&order_id).await.unwrap().unwrap();
        assert_eq!(after_first.status, after_second.status);
        assert_eq!(after_first.amount, after_second.amount);
        assert_eq!(after_first.claimed, after_second.claimed);
    }

    #[tokio::test]
    async fn amount_mismatch_does_not_overwrite_recorded_tariff() {
        let store = Arc::new(InMemoryOrderStore::new());
        let handler = IngestPaymentEventHandler::new(store.clone());

        let order_id = pending_order(&store, 950).await;
        // Processor reports 1750 major units against a 950 order.
        handler.handle(success(&order_id, 175000)).await.unwrap();

        let order = store.get(&order_id).await.unwrap().unwrap();
        assert_eq!(order.amount, 950);
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn missing_reference_is_acknowledged_without_state_change() {
        let store = Arc::new(InMemoryOrderStore::new());
        let handler = IngestPaymentEventHandler::new(store.clone());

        let order_id = pending_order(&store, 950).await;
        let outcome = handler
            .handle(IngestPaymentEventCommand { notification: None })
            .await
            .unwrap();

        assert_eq!(outcome, IngestOutcome::Malformed);
        let order = store.get(&order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn non_success_status_is_ignored() {
        let store = Arc::new(InMemoryOrderStore::new());
        let handler = IngestPaymentEventHandler::new(store.clone());

        let order_id = pending_order(&store, 950).await;
        let outcome = handler
            .handle(IngestPaymentEventCommand {
                notification: Some(PaymentNotification {
                    reference: order_id.clone(),
                    outcome: PaymentOutcome::Other("failure".to_string()),
                    amount_minor: Some(95000),
                }),
            })
            .await
            .unwrap();

        assert_eq!(outcome, IngestOutcome::IgnoredStatus);
        let order = store.get(&order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_reference_is_reported_but_acknowledged() {
        let store = Arc::new(InMemoryOrderStore::new());
        let handler = IngestPaymentEventHandler::new(store);

        let missing = OrderId::new("order_missing").unwrap();
        let outcome = handler.handle(success(&missing, 95000)).await.unwrap();

        assert_eq!(outcome, IngestOutcome::UnknownOrder);
    }
}
