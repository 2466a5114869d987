//! Transaction source abstraction.
//!
//! The persistence layer is external; reports only need accounts, opening
//! balances, and the lines inside a date window.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::AccountId;
use thiserror::Error;

use super::filter::DateRange;
use crate::ledger::{Account, TransactionLine};

/// Errors raised by a transaction source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store could not answer.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// Reading the backing store failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to ledger data for one report build.
///
/// Implementations are expected to give snapshot-consistent answers for the
/// duration of a build.
pub trait TransactionSource: Send + Sync {
    /// Lists every account in the chart of accounts.
    fn accounts(&self) -> Result<Vec<Account>, SourceError>;

    /// Looks up one account.
    fn find_account(&self, id: AccountId) -> Result<Option<Account>, SourceError>;

    /// Balance of `account` immediately before `before`.
    fn opening_balance(&self, account: &Account, before: NaiveDate) -> Result<Decimal, SourceError>;

    /// Lines posted to `account` with dates inside `range` (inclusive).
    ///
    /// Order is unspecified; the report service sorts them.
    fn lines(&self, account: AccountId, range: &DateRange) -> Result<Vec<TransactionLine>, SourceError>;
}

impl<T: TransactionSource + ?Sized> TransactionSource for &T {
    fn accounts(&self) -> Result<Vec<Account>, SourceError> {
        (**self).accounts()
    }

    fn find_account(&self, id: AccountId) -> Result<Option<Account>, SourceError> {
        (**self).find_account(id)
    }

    fn opening_balance(&self, account: &Account, before: NaiveDate) -> Result<Decimal, SourceError> {
        (**self).opening_balance(account, before)
    }

    fn lines(&self, account: AccountId, range: &DateRange) -> Result<Vec<TransactionLine>, SourceError> {
        (**self).lines(account, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use std::sync::Arc;

    fn assert_send_sync<T: Send + Sync + ?Sized>() {}

    #[test]
    fn test_sources_are_shareable_across_threads() {
        assert_send_sync::<dyn TransactionSource>();

        let source: Arc<dyn TransactionSource> = Arc::new(InMemoryLedger::new());
        let worker = Arc::clone(&source);
        let count = std::thread::spawn(move || worker.accounts().map(|accounts| accounts.len()))
            .join()
            .unwrap()
            .unwrap();
        assert_eq!(count, 0);
    }
}
