//! In-memory ledger used as a transaction source.
//!
//! Loaded from a JSON snapshot of the chart of accounts and posted lines.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, Currency, LineId};

use super::account::{Account, AccountCategory};
use super::balance::NormalBalance;
use super::error::LedgerError;
use super::line::TransactionLine;
use crate::reports::filter::DateRange;
use crate::reports::source::{SourceError, TransactionSource};

/// Account as stored in a snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account ID.
    pub id: AccountId,
    /// Optional account code.
    #[serde(default)]
    pub code: Option<String>,
    /// Display name.
    pub name: String,
    /// Category name ("asset", "liability", ...).
    pub category: String,
    /// Normal balance side; defaults from the category.
    #[serde(default)]
    pub normal_balance: Option<NormalBalance>,
    /// Balance at account inception, before any line.
    #[serde(default)]
    pub opening_balance: Decimal,
}

/// Serialized ledger contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Reporting currency, if the file names one.
    #[serde(default)]
    pub currency: Option<Currency>,
    /// Chart of accounts.
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
    /// Posted lines, in insertion order.
    #[serde(default)]
    pub lines: Vec<TransactionLine>,
}

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    inception_balance: Decimal,
}

/// Chart of accounts plus posted lines, held in memory.
///
/// Lines are validated on insert, so everything stored is one-sided.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    currency: Option<Currency>,
    accounts: BTreeMap<AccountId, StoredAccount>,
    lines: Vec<TransactionLine>,
    next_sequence: u64,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from a snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, LedgerError> {
        let mut ledger = Self {
            currency: snapshot.currency,
            ..Self::default()
        };

        for record in snapshot.accounts {
            let category = AccountCategory::parse(&record.category)
                .ok_or_else(|| LedgerError::UnknownCategory(record.category.clone()))?;
            let account = Account {
                id: record.id,
                code: record.code,
                name: record.name,
                category,
                normal_balance: record
                    .normal_balance
                    .unwrap_or_else(|| category.default_normal_balance()),
            };
            ledger.add_account(account, record.opening_balance)?;
        }

        for line in snapshot.lines {
            ledger.add_line(line)?;
        }

        Ok(ledger)
    }

    /// Parses a JSON snapshot from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LedgerError> {
        let snapshot: LedgerSnapshot = serde_json::from_reader(reader)?;
        Self::from_snapshot(snapshot)
    }

    /// Loads a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Reporting currency named by the snapshot.
    #[must_use]
    pub fn currency(&self) -> Option<Currency> {
        self.currency
    }

    /// Registers an account with its inception balance.
    pub fn add_account(&mut self, account: Account, inception_balance: Decimal) -> Result<(), LedgerError> {
        if self.accounts.contains_key(&account.id) {
            return Err(LedgerError::DuplicateAccount(account.id));
        }
        self.accounts.insert(
            account.id,
            StoredAccount {
                account,
                inception_balance,
            },
        );
        Ok(())
    }

    /// Appends a line, assigning the next sequence number.
    pub fn add_line(&mut self, mut line: TransactionLine) -> Result<LineId, LedgerError> {
        if !self.accounts.contains_key(&line.account_id) {
            return Err(LedgerError::UnknownAccount {
                line: line.id,
                account: line.account_id,
            });
        }
        line.validate()
            .map_err(|reason| LedgerError::MalformedLine { line: line.id, reason })?;

        line.sequence = self.next_sequence;
        self.next_sequence += 1;
        let id = line.id;
        self.lines.push(line);
        Ok(id)
    }

    /// Number of stored lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl TransactionSource for InMemoryLedger {
    fn accounts(&self) -> Result<Vec<Account>, SourceError> {
        Ok(self.accounts.values().map(|s| s.account.clone()).collect())
    }

    fn find_account(&self, id: AccountId) -> Result<Option<Account>, SourceError> {
        Ok(self.accounts.get(&id).map(|s| s.account.clone()))
    }

    fn opening_balance(&self, account: &Account, before: NaiveDate) -> Result<Decimal, SourceError> {
        let stored = self
            .accounts
            .get(&account.id)
            .ok_or_else(|| SourceError::Unavailable(format!("account {} is not stored", account.id)))?;

        let prior: Decimal = self
            .lines
            .iter()
            .filter(|l| l.account_id == account.id && l.date < before)
            .map(|l| account.normal_balance.balance_change(l.debit, l.credit))
            .sum();

        Ok(stored.inception_balance + prior)
    }

    fn lines(&self, account_id: AccountId, range: &DateRange) -> Result<Vec<TransactionLine>, SourceError> {
        Ok(self
            .lines
            .iter()
            .filter(|l| l.account_id == account_id && range.contains(l.date))
            .cloned()
            .collect())
    }
}
