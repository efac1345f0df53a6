//! Order payment status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Payment status of an order.
///
/// Monotonic: once an order is `Paid` it never returns to `Pending`,
/// regardless of what the payment processor delivers afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Invoice created, payment not yet confirmed. No access.
    Pending,

    /// Payment confirmed by the processor.
    Paid,
}

impl OrderStatus {
    /// Returns true if payment has been confirmed.
    pub fn is_paid(&self) -> bool {
        matches!(self, OrderStatus::Paid)
    }
}

impl StateMachine for OrderStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            (Pending, Paid)
                | (Paid, Paid) // duplicate webhook delivery is a no-op
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OrderStatus::*;
        match self {
            Pending => vec![Paid],
            Paid => vec![Paid],
        }
    }
}
