//! Ledger error types.

use tally_shared::AppError;
use tally_shared::types::{AccountId, LineId};
use thiserror::Error;

/// Ways a transaction line can violate the one-sided amount invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineError {
    /// Both debit and credit are non-zero.
    #[error("line has both a debit and a credit amount")]
    BothSides,

    /// Neither debit nor credit is set.
    #[error("line has neither a debit nor a credit amount")]
    NoAmount,

    /// An amount is negative.
    #[error("line amounts cannot be negative")]
    NegativeAmount,
}

/// Errors raised while loading or mutating an in-memory ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Account id registered twice.
    #[error("Account already exists: {0}")]
    DuplicateAccount(AccountId),

    /// Line references an account that is not registered.
    #[error("Line {line} references unknown account {account}")]
    UnknownAccount {
        /// Offending line.
        line: LineId,
        /// Referenced account.
        account: AccountId,
    },

    /// Line violates the one-sided amount invariant.
    #[error("Line {line} is malformed: {reason}")]
    MalformedLine {
        /// Offending line.
        line: LineId,
        /// What is wrong with it.
        reason: LineError,
    },

    /// Account category name not recognized.
    #[error("Unknown account category: {0}")]
    UnknownCategory(String),

    /// Snapshot could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be parsed.
    #[error("Invalid ledger file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Io(_) => Self::Internal(err.to_string()),
            LedgerError::Parse(_) => Self::Validation(err.to_string()),
            _ => Self::DataIntegrity(err.to_string()),
        }
    }
}
