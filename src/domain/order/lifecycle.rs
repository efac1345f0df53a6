//! Order lifecycle state machine.
//!
//! Collapses the persisted `(status, claimed)` pair into one explicit tagged
//! state so every component reasons about a single authoritative lifecycle
//! rather than ad-hoc column combinations.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle of an order from creation to redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderLifecycle {
    /// Invoice created, awaiting payment confirmation.
    Created,

    /// Payment confirmed, access not yet redeemed.
    Paid,

    /// Access redeemed. Terminal: there is no way out of this state.
    Claimed,
}

impl OrderLifecycle {
    /// Returns true if the order may be claimed from this state.
    pub fn is_claimable(&self) -> bool {
        matches!(self, OrderLifecycle::Paid)
    }
}

impl StateMachine for OrderLifecycle {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OrderLifecycle::*;
        matches!(
            (self, target),
            (Created, Paid)
                | (Paid, Paid) // duplicate payment notification
                | (Paid, Claimed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OrderLifecycle::*;
        match self {
            Created => vec![Paid],
            Paid => vec![Paid, Claimed],
            Claimed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_can_only_become_paid() {
        let state = OrderLifecycle::Created;
        assert!(state.can_transition_to(&OrderLifecycle::Paid));
        assert!(!state.can_transition_to(&OrderLifecycle::Claimed));
        assert!(!state.can_transition_to(&OrderLifecycle::Created));
    }

    #[test]
    fn paid_can_become_claimed() {
        let state = OrderLifecycle::Paid;
        assert_eq!(
            state.transition_to(OrderLifecycle::Claimed),
            Ok(OrderLifecycle::Claimed)
        );
    }

    #[test]
    fn paid_accepts_duplicate_payment() {
        let state = OrderLifecycle::Paid;
        assert_eq!(state.transition_to(OrderLifecycle::Paid), Ok(OrderLifecycle::Paid));
    }

    #[test]
    fn claimed_is_terminal() {
        let state = OrderLifecycle::Claimed;
        assert!(state.is_terminal());
        assert!(state.transition_to(OrderLifecycle::Paid).is_err());
        assert!(state.transition_to(OrderLifecycle::Created).is_err());
        assert!(state.transition_to(OrderLifecycle::Claimed).is_err());
    }

    #[test]
    fn no_state_returns_to_created() {
        for state in [OrderLifecycle::Paid, OrderLifecycle::Claimed] {
            assert!(!state.can_transition_to(&OrderLifecycle::Created));
        }
    }

    #[test]
    fn only_paid_is_claimable() {
        assert!(!OrderLifecycle::Created.is_claimable());
        assert!(OrderLifecycle::Paid.is_claimable());
        assert!(!OrderLifecycle::Claimed.is_claimable());
    }
}
