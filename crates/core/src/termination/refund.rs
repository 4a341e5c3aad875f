//! Refund computation.
//!
//! The refund for a termination is the remaining advance: the advance paid
//! at signing minus everything invoices have drawn from it.

use rust_decimal::Decimal;

/// Minor units per major currency unit.
const MINOR_UNIT_SCALE: u32 = 2;

/// Stateless refund calculator.
pub struct RefundCalculator;

impl RefundCalculator {
    /// Remaining advance in minor units, never negative.
    #[must_use]
    pub fn remaining_advance_cents(
        advance_paid_cents: i64,
        applied_cents: impl IntoIterator<Item = i64>,
    ) -> i64 {
        let applied: i64 = applied_cents
            .into_iter()
            .fold(0_i64, |acc, cents| acc.saturating_add(cents.max(0)));
        advance_paid_cents.saturating_sub(applied).max(0)
    }

    /// Converts minor units to a two-decimal amount.
    #[must_use]
    pub fn to_decimal(cents: i64) -> Decimal {
        Decimal::new(cents, MINOR_UNIT_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_remaining_advance() {
        assert_eq!(
            RefundCalculator::remaining_advance_cents(300_000, [50_000, 25_000]),
            225_000
        );
    }

    #[test]
    fn test_remaining_advance_without_invoices() {
        assert_eq!(
            RefundCalculator::remaining_advance_cents(120_000, Vec::new()),
            120_000
        );
    }

    #[test]
    fn test_remaining_advance_never_negative() {
        assert_eq!(
            RefundCalculator::remaining_advance_cents(10_000, [8_000, 8_000]),
            0
        );
    }

    #[test]
    fn test_negative_applications_ignored() {
        assert_eq!(
            RefundCalculator::remaining_advance_cents(10_000, [-5_000, 1_000]),
            9_000
        );
    }

    #[test]
    fn test_decimal_conversion() {
        assert_eq!(RefundCalculator::to_decimal(225_050), dec!(2250.50));
        assert_eq!(RefundCalculator::to_decimal(0).to_string(), "0.00");
    }
}
