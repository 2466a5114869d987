//! Ledger reference data and transaction lines.
//!
//! - Chart of accounts with categories and normal balance sides
//! - One-sided transaction lines
//! - Running balance arithmetic
//! - An in-memory, JSON-loadable ledger

pub mod account;
pub mod balance;
pub mod error;
pub mod line;
pub mod store;

pub use account::{Account, AccountCategory};
pub use balance::{NormalBalance, RunningBalance};
pub use error::{LedgerError, LineError};
pub use line::{TransactionLine, sort_chronologically};
pub use store::{AccountRecord, InMemoryLedger, LedgerSnapshot};
