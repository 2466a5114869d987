//! Running balance accumulation over chronologically ordered lines.

use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{ReportRow, ReportSection};
use crate::ledger::{Account, RunningBalance, TransactionLine};

/// Walks lines in order, producing one row per line with the balance after it.
///
/// A single accumulator can span several accounts: each line is applied
/// with its own account's normal side while the balance keeps running from
/// the section opening.
#[derive(Debug, Clone)]
pub struct BalanceAccumulator {
    balance: RunningBalance,
    rows: Vec<ReportRow>,
}

impl BalanceAccumulator {
    /// Starts from `opening`.
    #[must_use]
    pub fn new(opening: Decimal) -> Self {
        Self {
            balance: RunningBalance::new(opening),
            rows: Vec::new(),
        }
    }

    /// Appends rows for `lines`, which must already be in report order.
    ///
    /// Fails on the first line that is not strictly one-sided; rows pushed
    /// before the failure are kept, the offending line is not.
    pub fn push_account(
        &mut self,
        account: &Account,
        lines: &[TransactionLine],
    ) -> Result<(), ReportError> {
        self.rows.reserve(lines.len());
        for line in lines {
            line.validate().map_err(|reason| ReportError::MalformedLine {
                line: line.id,
                account: account.id,
                reason,
            })?;
            let balance = self
                .balance
                .apply(account.normal_balance, line.debit, line.credit);
            self.rows.push(ReportRow {
                line_id: line.id,
                account_id: account.id,
                account_name: account.name.clone(),
                date: line.date,
                description: line.description.clone(),
                debit: line.debit,
                credit: line.credit,
                balance,
            });
        }
        Ok(())
    }

    /// Current running balance.
    #[must_use]
    pub fn balance(&self) -> &RunningBalance {
        &self.balance
    }

    /// Rows produced so far.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Closes the accumulator into a labelled section.
    #[must_use]
    pub fn finish(self, label: impl Into<String>) -> ReportSection {
        ReportSection {
            label: label.into(),
            opening_balance: self.balance.opening,
            total_debit: self.balance.total_debit,
            total_credit: self.balance.total_credit,
            closing_balance: self.balance.current,
            rows: self.rows,
        }
    }
}

/// Rows for one account starting from `opening`.
pub fn accumulate(
    account: &Account,
    opening: Decimal,
    lines: &[TransactionLine],
) -> Result<Vec<ReportRow>, ReportError> {
    let mut accumulator = BalanceAccumulator::new(opening);
    accumulator.push_account(account, lines)?;
    Ok(accumulator.rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountCategory, LineError, NormalBalance};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn scenario_lines(account: &Account) -> Vec<TransactionLine> {
        vec![
            TransactionLine::debit(account.id, date(5), "Equipment", dec!(200.00)),
            TransactionLine::credit(account.id, date(10), "Refund", dec!(50.00)),
        ]
    }

    #[test]
    fn test_credit_normal_scenario() {
        let loan = Account::new("Bank Loan", AccountCategory::Liability);
        assert_eq!(loan.normal_balance, NormalBalance::Credit);

        let rows = accumulate(&loan, dec!(1000.00), &scenario_lines(&loan)).unwrap();
        let balances: Vec<Decimal> = rows.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![dec!(800.00), dec!(850.00)]);
    }

    #[test]
    fn test_debit_normal_scenario() {
        let cash = Account::new("Cash", AccountCategory::Asset);
        let rows = accumulate(&cash, dec!(1000.00), &scenario_lines(&cash)).unwrap();
        let balances: Vec<Decimal> = rows.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![dec!(1200.00), dec!(1150.00)]);
    }

    #[test]
    fn test_no_lines_keeps_opening() {
        let cash = Account::new("Cash", AccountCategory::Asset);
        let section = BalanceAccumulator::new(dec!(75)).finish("Cash");
        assert!(section.rows.is_empty());
        assert_eq!(section.opening_balance, dec!(75));
        assert_eq!(section.closing_balance, dec!(75));
        assert!(accumulate(&cash, dec!(75), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_both_sided_line_names_the_line() {
        let cash = Account::new("Cash", AccountCategory::Asset);
        let mut bad = TransactionLine::debit(cash.id, date(3), "Split", dec!(10));
        bad.credit = dec!(4);
        let bad_id = bad.id;

        let err = accumulate(&cash, dec!(0), &[bad]).unwrap_err();
        match err {
            ReportError::MalformedLine { line, account, reason } => {
                assert_eq!(line, bad_id);
                assert_eq!(account, cash.id);
                assert_eq!(reason, LineError::BothSides);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_section_spanning_accounts() {
        let cash = Account::new("Cash", AccountCategory::Asset);
        let contra = Account::new("Allowance", AccountCategory::Asset)
            .with_normal_balance(NormalBalance::Credit);

        let mut acc = BalanceAccumulator::new(dec!(500));
        acc.push_account(&contra, &[TransactionLine::credit(contra.id, date(2), "Reserve", dec!(20))])
            .unwrap();
        acc.push_account(&cash, &[TransactionLine::debit(cash.id, date(1), "Sale", dec!(30))])
            .unwrap();

        let section = acc.finish("Assets");
        let balances: Vec<Decimal> = section.rows.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![dec!(520), dec!(550)]);
        assert_eq!(section.total_debit, dec!(30));
        assert_eq!(section.total_credit, dec!(20));
        assert_eq!(section.closing_balance, dec!(550));
    }

    fn line_strategy() -> impl Strategy<Value = (bool, Decimal)> {
        (any::<bool>(), (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Final balance equals opening plus the summed effect of every line.
        #[test]
        fn prop_final_balance_is_opening_plus_effects(
            opening in (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
            debit_normal in any::<bool>(),
            specs in prop::collection::vec(line_strategy(), 0..40),
        ) {
            let category = if debit_normal { AccountCategory::Asset } else { AccountCategory::Revenue };
            let account = Account::new("Prop", category);
            let lines: Vec<TransactionLine> = specs
                .iter()
                .map(|(is_debit, amount)| {
                    if *is_debit {
                        TransactionLine::debit(account.id, date(1), "d", *amount)
                    } else {
                        TransactionLine::credit(account.id, date(1), "c", *amount)
                    }
                })
                .collect();

            let rows = accumulate(&account, opening, &lines).unwrap();
            prop_assert_eq!(rows.len(), lines.len());

            let effect: Decimal = lines
                .iter()
                .map(|l| account.normal_balance.balance_change(l.debit, l.credit))
                .sum();
            let last = rows.last().map_or(opening, |r| r.balance);
            prop_assert_eq!(last, opening + effect);
        }
    }
}
