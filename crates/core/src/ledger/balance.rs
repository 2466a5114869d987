//! Normal balance rules and running balance tracking.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side on which an account's balance increases.
///
/// - Debit-normal (Asset, Expense): balance += debit - credit
/// - Credit-normal (Liability, Equity, Revenue): balance += credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl NormalBalance {
    /// Calculates the balance change for a debit/credit pair.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Running balance starting from an opening balance.
///
/// Invariant: `current == opening + sum(changes applied)`, and
/// `previous` is the balance before the most recent change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Balance before the first change.
    pub opening: Decimal,
    /// Balance before the most recent change.
    pub previous: Decimal,
    /// Balance after the most recent change.
    pub current: Decimal,
    /// Sum of debits applied.
    pub total_debit: Decimal,
    /// Sum of credits applied.
    pub total_credit: Decimal,
    /// Number of changes applied.
    pub applied: usize,
}

impl RunningBalance {
    /// Starts tracking from an opening balance.
    #[must_use]
    pub fn new(opening: Decimal) -> Self {
        Self {
            opening,
            previous: opening,
            current: opening,
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            applied: 0,
        }
    }

    /// Applies a debit/credit pair under `side` and returns the new balance.
    pub fn apply(&mut self, side: NormalBalance, debit: Decimal, credit: Decimal) -> Decimal {
        self.previous = self.current;
        self.current += side.balance_change(debit, credit);
        self.total_debit += debit;
        self.total_credit += credit;
        self.applied += 1;
        self.current
    }

    /// Net change since the opening balance.
    #[must_use]
    pub fn net_change(&self) -> Decimal {
        self.current - self.opening
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    /// Strategy for generating non-negative amounts with cents.
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn side_strategy() -> impl Strategy<Value = NormalBalance> {
        prop_oneof![Just(NormalBalance::Debit), Just(NormalBalance::Credit)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Current balance equals previous plus the change.
        #[test]
        fn prop_current_equals_previous_plus_change(
            opening in amount_strategy(),
            side in side_strategy(),
            debit in amount_strategy(),
            credit in amount_strategy(),
        ) {
            let mut rb = RunningBalance::new(opening);
            rb.apply(side, debit, credit);
            prop_assert_eq!(rb.current, rb.previous + side.balance_change(debit, credit));
        }

        /// Final balance equals opening plus the sum of all changes.
        #[test]
        fn prop_final_balance_equals_opening_plus_changes(
            opening in amount_strategy(),
            side in side_strategy(),
            pairs in prop::collection::vec((amount_strategy(), amount_strategy()), 0..30),
        ) {
            let mut rb = RunningBalance::new(opening);
            for (debit, credit) in &pairs {
                rb.apply(side, *debit, *credit);
            }

            let expected: Decimal = opening
                + pairs
                    .iter()
                    .map(|(d, c)| side.balance_change(*d, *c))
                    .sum::<Decimal>();
            prop_assert_eq!(rb.current, expected);
            prop_assert_eq!(rb.applied, pairs.len());
            prop_assert_eq!(rb.net_change(), expected - opening);
        }

        /// Debit-normal and credit-normal changes mirror each other.
        #[test]
        fn prop_sides_are_mirrored(
            debit in amount_strategy(),
            credit in amount_strategy(),
        ) {
            prop_assert_eq!(
                NormalBalance::Debit.balance_change(debit, credit),
                -NormalBalance::Credit.balance_change(debit, credit)
            );
        }
    }

    #[test]
    fn test_debit_normal_balance_change() {
        let side = NormalBalance::Debit;

        // Debit increases balance
        assert_eq!(side.balance_change(dec!(100), dec!(0)), dec!(100));

        // Credit decreases balance
        assert_eq!(side.balance_change(dec!(0), dec!(50)), dec!(-50));
    }

    #[test]
    fn test_credit_normal_balance_change() {
        let side = NormalBalance::Credit;

        // Credit increases balance
        assert_eq!(side.balance_change(dec!(0), dec!(100)), dec!(100));

        // Debit decreases balance
        assert_eq!(side.balance_change(dec!(50), dec!(0)), dec!(-50));
    }

    #[test]
    fn test_running_balance_chain() {
        let mut rb = RunningBalance::new(dec!(1000.00));
        assert_eq!(rb.apply(NormalBalance::Credit, dec!(200.00), dec!(0)), dec!(800.00));
        assert_eq!(rb.previous, dec!(1000.00));
        assert_eq!(rb.apply(NormalBalance::Credit, dec!(0), dec!(50.00)), dec!(850.00));
        assert_eq!(rb.previous, dec!(800.00));
        assert_eq!(rb.total_debit, dec!(200.00));
        assert_eq!(rb.total_credit, dec!(50.00));
        assert_eq!(rb.applied, 2);
    }

    #[test]
    fn test_untouched_running_balance() {
        let rb = RunningBalance::new(dec!(42.10));
        assert_eq!(rb.current, dec!(42.10));
        assert_eq!(rb.net_change(), Decimal::ZERO);
        assert_eq!(rb.applied, 0);
    }
}
