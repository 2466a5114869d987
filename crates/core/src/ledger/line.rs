//! Transaction lines: the per-account projection of posted ledger entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, LineId, TransactionId};

use super::error::LineError;

/// One debit or credit posted to a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Line ID.
    #[serde(default)]
    pub id: LineId,
    /// Parent transaction, when known.
    #[serde(default)]
    pub transaction_id: Option<TransactionId>,
    /// Account the line is posted to.
    pub account_id: AccountId,
    /// Posting date.
    pub date: NaiveDate,
    /// Description shown on reports.
    #[serde(default)]
    pub description: String,
    /// Debit amount (zero for credit lines).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (zero for debit lines).
    #[serde(default)]
    pub credit: Decimal,
    /// Insertion order, assigned by the source; breaks same-day ties.
    #[serde(default)]
    pub sequence: u64,
}

impl TransactionLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(
        account_id: AccountId,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            id: LineId::new(),
            transaction_id: None,
            account_id,
            date,
            description: description.into(),
            debit: amount,
            credit: Decimal::ZERO,
            sequence: 0,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(
        account_id: AccountId,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            credit: amount,
            debit: Decimal::ZERO,
            ..Self::debit(account_id, date, description, Decimal::ZERO)
        }
    }

    /// Checks that exactly one side carries a positive amount.
    pub fn validate(&self) -> Result<(), LineError> {
        if self.debit < Decimal::ZERO || self.credit < Decimal::ZERO {
            return Err(LineError::NegativeAmount);
        }
        match (self.debit.is_zero(), self.credit.is_zero()) {
            (false, false) => Err(LineError::BothSides),
            (true, true) => Err(LineError::NoAmount),
            _ => Ok(()),
        }
    }

    /// Chronological sort key: date, then sequence, then id.
    #[must_use]
    pub fn sort_key(&self) -> (NaiveDate, u64, LineId) {
        (self.date, self.sequence, self.id)
    }
}

/// Sorts lines into report order.
pub fn sort_chronologically(lines: &mut [TransactionLine]) {
    lines.sort_by_key(TransactionLine::sort_key);
}
