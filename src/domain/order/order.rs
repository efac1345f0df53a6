//! Order aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccessToken, OrderId, StateMachine, ValidationError};

use super::{ClaimError, OrderLifecycle, OrderStatus};

/// One purchase intent and its claim state.
///
/// The aggregate enforces the lifecycle invariants in memory; the durable
/// store enforces the same transitions atomically across processes. Both
/// paths go through [`OrderLifecycle`], so there is exactly one definition
/// of which edges exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Opaque primary key, also used as the payment processor reference.
    pub order_id: OrderId,

    /// Tariff amount in major currency units. Authoritative for tier
    /// selection; never overwritten by later payment notifications.
    pub amount: i64,

    /// Payment status, monotonic pending -> paid.
    pub status: OrderStatus,

    /// True once access has been redeemed. Never reverts.
    pub claimed: bool,

    /// Optional claim key for flows that must not expose the order id.
    pub access_token: Option<AccessToken>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new pending, unclaimed order.
    pub fn create(order_id: OrderId, amount: i64, now: DateTime<Utc>) -> Self {
        Self {
            order_id,
            amount,
            status: OrderStatus::Pending,
            claimed: false,
            access_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the explicit lifecycle state derived from the persisted pair.
    pub fn lifecycle(&self) -> OrderLifecycle {
        match (self.status, self.claimed) {
            (OrderStatus::Pending, _) => OrderLifecycle::Created,
            (OrderStatus::Paid, false) => OrderLifecycle::Paid,
            (OrderStatus::Paid, true) => OrderLifecycle::Claimed,
        }
    }

    /// Applies a confirmed payment. Idempotent: re-applying while already
    /// paid is a no-op, not an error.
    pub fn mark_paid(&mut self, now: DateTime<Utc>) {
        if self.status.is_paid() {
            return;
        }
        // Pending -> Paid is always a legal edge.
        self.status = OrderStatus::Paid;
        self.updated_at = now;
    }

    /// Attempts the claim transition.
    ///
    /// Succeeds exactly once per order: the first call on a paid, unclaimed
    /// order flips `claimed` and every later call fails.
    pub fn claim(&mut self, now: DateTime<Utc>) -> Result<(), ClaimError> {
        match self.lifecycle() {
            OrderLifecycle::Created => Err(ClaimError::PaymentNotConfirmed),
            OrderLifecycle::Claimed => Err(ClaimError::AlreadyClaimed),
            OrderLifecycle::Paid => {
                debug_assert!(self
                    .lifecycle()
                    .can_transition_to(&OrderLifecycle::Claimed));
                self.claimed = true;
                self.updated_at = now;
                Ok(())
            }
        }
    }

    /// Attaches the access token. Immutable once set.
    pub fn attach_token(&mut self, token: AccessToken) -> Result<(), ValidationError> {
        if self.access_token.is_some() {
            return Err(ValidationError::invalid_format(
                "access_token",
                "token is immutable once set",
            ));
        }
        self.access_token = Some(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn order() -> Order {
        Order::create(OrderId::generate(), 950, Utc::now())
    }

    #[test]
    fn new_order_is_created_lifecycle() {
        let order = order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.claimed);
        assert_eq!(order.lifecycle(), OrderLifecycle::Created);
    }

    #[test]
    fn mark_paid_moves_to_paid_lifecycle() {
        let mut order = order();
        order.mark_paid(Utc::now());
        assert_eq!(order.lifecycle(), OrderLifecycle::Paid);
    }

    #[test]
    fn mark_paid_is_idempotent() {
        let mut order = order();
        order.mark_paid(Utc::now());
        order.mark_paid(Utc::now());
        assert_eq!(order.status, OrderStatus::Paid);
        assert!(!order.claimed);
    }

    #[test]
    fn claim_on_pending_order_fails_as_payment_not_confirmed() {
        let mut order = order();
        assert!(matches!(
            order.claim(Utc::now()),
            Err(ClaimError::PaymentNotConfirmed)
        ));
        assert!(!order.claimed);
    }

    #[test]
    fn claim_succeeds_exactly_once_on_paid_order() {
        let mut order = order();
        order.mark_paid(Utc::now());

        assert!(order.claim(Utc::now()).is_ok());
        assert_eq!(order.lifecycle(), OrderLifecycle::Claimed);

        assert!(matches!(
            order.claim(Utc::now()),
            Err(ClaimError::AlreadyClaimed)
        ));
    }

    #[test]
    fn attach_token_succeeds_once() {
        let mut order = order();
        assert!(order.attach_token(AccessToken::generate()).is_ok());
        assert!(order.attach_token(AccessToken::generate()).is_err());
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        MarkPaid,
        Claim,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::MarkPaid), Just(Op::Claim)]
    }

    proptest! {
        /// Any operation sequence preserves the lifecycle invariants:
        /// claimed implies paid, paid never reverts, and the claim
        /// transition succeeds at most once.
        #[test]
        fn lifecycle_invariants_hold_under_any_operation_sequence(
            ops in prop::collection::vec(op_strategy(), 0..32)
        ) {
            let mut order = Order::create(OrderId::generate(), 1750, Utc::now());
            let mut successful_claims = 0u32;
            let mut was_paid = false;

            for op in ops {
                match op {
                    Op::MarkPaid => order.mark_paid(Utc::now()),
                    Op::Claim => {
                        if order.claim(Utc::now()).is_ok() {
                            successful_claims += 1;
                        }
                    }
                }

                if order.status.is_paid() {
                    was_paid = true;
                }
                // paid never reverts
                prop_assert!(!was_paid || order.status.is_paid());
                // claimed implies paid
                prop_assert!(!order.claimed || order.status.is_paid());
                prop_assert!(successful_claims <= 1);
            }
        }
    }
}
