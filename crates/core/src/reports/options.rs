//! Grouped option list for the account selector.

use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::ALL_ACCOUNTS;
use crate::ledger::Account;

/// Label of the group holding the all-accounts entry.
pub const ALL_ACCOUNTS_LABEL: &str = "All Accounts";

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountOption {
    /// Value submitted by the form (`all` or an account id).
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

/// A labelled group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountOptionGroup {
    /// Group heading.
    pub label: String,
    /// Entries in display order.
    pub options: Vec<AccountOption>,
}

/// Builds the selector groups: "All Accounts" first, then one group per
/// category plural label (alphabetical), accounts ordered by name.
#[must_use]
pub fn account_options(accounts: &[Account]) -> Vec<AccountOptionGroup> {
    let mut by_category: BTreeMap<&'static str, Vec<&Account>> = BTreeMap::new();
    for account in accounts {
        by_category
            .entry(account.category.plural_label())
            .or_default()
            .push(account);
    }

    let mut groups = vec![AccountOptionGroup {
        label: ALL_ACCOUNTS_LABEL.to_string(),
        options: vec![AccountOption {
            value: ALL_ACCOUNTS.to_string(),
            label: ALL_ACCOUNTS_LABEL.to_string(),
        }],
    }];

    for (label, mut members) in by_category {
        members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        groups.push(AccountOptionGroup {
            label: label.to_string(),
            options: members
                .into_iter()
                .map(|account| AccountOption {
                    value: account.id.to_string(),
                    label: account.name.clone(),
                })
                .collect(),
        });
    }
    groups
}
