//! Chart of accounts types.

use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

use super::balance::NormalBalance;

/// Account category (the five top-level classifications).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    /// Things the business owns.
    Asset,
    /// Things the business owes.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountCategory {
    /// All categories in chart-of-accounts order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the singular display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expense => "Expense",
        }
    }

    /// Returns the plural label used to group accounts.
    #[must_use]
    pub const fn plural_label(self) -> &'static str {
        match self {
            Self::Asset => "Assets",
            Self::Liability => "Liabilities",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expense => "Expenses",
        }
    }

    /// Returns the conventional normal balance side for the category.
    ///
    /// - Asset/Expense: debit-normal
    /// - Liability/Equity/Revenue: credit-normal
    #[must_use]
    pub const fn default_normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Parses a category from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asset" | "assets" => Some(Self::Asset),
            "liability" | "liabilities" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "revenue" | "income" => Some(Self::Revenue),
            "expense" | "expenses" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A chart of accounts entry.
///
/// Reference data: immutable for the duration of a report run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Optional account code (e.g. "1000").
    pub code: Option<String>,
    /// Display name.
    pub name: String,
    /// Category classification.
    pub category: AccountCategory,
    /// Side on which the balance increases.
    pub normal_balance: NormalBalance,
}

impl Account {
    /// Creates an account whose normal balance follows its category.
    #[must_use]
    pub fn new(name: impl Into<String>, category: AccountCategory) -> Self {
        Self {
            id: AccountId::new(),
            code: None,
            name: name.into(),
            category,
            normal_balance: category.default_normal_balance(),
        }
    }

    /// Sets the account code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Overrides the normal balance side (contra accounts).
    #[must_use]
    pub fn with_normal_balance(mut self, normal_balance: NormalBalance) -> Self {
        self.normal_balance = normal_balance;
        self
    }

    /// Name with the code appended, e.g. "Cash (1000)".
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.code {
            Some(code) => format!("{} ({code})", self.name),
            None => self.name.clone(),
        }
    }
}
