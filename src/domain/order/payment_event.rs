//! Parsed payment processor notification.
//!
//! The wire shape lives in the processor adapter; this is the minimal model
//! ingestion actually consumes.

use crate::domain::foundation::OrderId;

/// Processor-reported outcome of a payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment completed, the order may be marked paid.
    Success,

    /// Anything else (processing, failure, refund). Acknowledged and
    /// ignored; decline handling is out of scope.
    Other(String),
}

impl PaymentOutcome {
    /// Parses a processor status string.
    pub fn from_status(status: &str) -> Self {
        match status {
            "success" => PaymentOutcome::Success,
            other => PaymentOutcome::Other(other.to_string()),
        }
    }

    /// Returns true for a confirmed payment.
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Success)
    }
}

/// One payment notification correlated to an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentNotification {
    /// Correlation id, equal to the `order_id` supplied at invoice creation.
    pub reference: OrderId,

    /// Reported outcome.
    pub outcome: PaymentOutcome,

    /// Reported amount in minor currency units, when present. Used for
    /// reconciliation logging only; the recorded tariff amount stays
    /// authoritative.
    pub amount_minor: Option<i64>,
}

impl PaymentNotification {
    /// Reported amount converted to major units, rounded to the nearest
    /// whole unit. Integer arithmetic throughout, so large amounts stay
    /// exact.
    pub fn amount_major(&self) -> Option<i64> {
        self.amount_minor.map(|minor| (minor + 50).div_euclid(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(amount_minor: Option<i64>) -> PaymentNotification {
        PaymentNotification {
            reference: OrderId::new("order_x").unwrap(),
            outcome: PaymentOutcome::Success,
            amount_minor,
        }
    }

    #[test]
    fn success_status_parses_to_success() {
        assert!(PaymentOutcome::from_status("success").is_success());
    }

    #[test]
    fn non_success_statuses_are_preserved_as_other() {
        let outcome = PaymentOutcome::from_status("failure");
        assert_eq!(outcome, PaymentOutcome::Other("failure".to_string()));
        assert!(!outcome.is_success());
    }

    #[test]
    fn amount_major_divides_minor_units() {
        assert_eq!(notification(Some(95000)).amount_major(), Some(950));
        assert_eq!(notification(Some(175000)).amount_major(), Some(1750));
    }

    #[test]
    fn amount_major_rounds_to_nearest_unit() {
        assert_eq!(notification(Some(95049)).amount_major(), Some(950));
        assert_eq!(notification(Some(95050)).amount_major(), Some(951));
    }

    #[test]
    fn amount_major_stays_exact_beyond_float_precision() {
        // 2^53 major units plus one: a float detour would snap this to the
        // nearest representable f64 and report one unit short.
        let minor = 900_719_925_474_099_250i64 + 50;
        assert_eq!(
            notification(Some(minor)).amount_major(),
            Some(9_007_199_254_740_993)
        );
    }

    #[test]
    fn amount_major_is_none_when_absent() {
        assert_eq!(notification(None).amount_major(), None);
    }
}
