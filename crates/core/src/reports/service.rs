//! Account transactions report generation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::Currency;
use tally_shared::{EmptySectionPolicy, ReportConfig};
use tracing::{debug, info};

use super::accumulator::BalanceAccumulator;
use super::column::Column;
use super::error::ReportError;
use super::filter::{AccountSelection, DateRange, ReportFilter};
use super::source::TransactionSource;
use super::types::{ReportDto, ReportSection};
use crate::ledger::{Account, TransactionLine, sort_chronologically};

/// Builds account transactions reports.
///
/// Holds presentation settings only; ledger data comes from the
/// [`TransactionSource`] passed to each build.
#[derive(Debug, Clone)]
pub struct ReportService {
    title: String,
    currency: Currency,
    empty_sections: EmptySectionPolicy,
}

impl ReportService {
    /// Creates a service from report configuration.
    #[must_use]
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            currency: config.default_currency,
            empty_sections: config.empty_sections,
        }
    }

    /// Overrides the reporting currency.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Overrides the empty-section policy.
    #[must_use]
    pub fn with_empty_sections(mut self, policy: EmptySectionPolicy) -> Self {
        self.empty_sections = policy;
        self
    }

    /// Reporting currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Builds the report for raw form values.
    ///
    /// The date range is checked before the account id, and both before
    /// the source is queried.
    pub fn build_from_form<S: TransactionSource + ?Sized>(
        &self,
        source: &S,
        selected_account: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
        columns: Vec<Column>,
    ) -> Result<ReportDto, ReportError> {
        let filter = ReportFilter::from_form(selected_account, start, end)?;
        self.build_account_transactions_report(source, &filter, columns)
    }

    /// Builds the account transactions report for `filter`.
    ///
    /// A specific account yields one section labelled with its name. The
    /// all-accounts selection yields one section per category, ordered by
    /// the category's plural label.
    pub fn build_account_transactions_report<S: TransactionSource + ?Sized>(
        &self,
        source: &S,
        filter: &ReportFilter,
        columns: Vec<Column>,
    ) -> Result<ReportDto, ReportError> {
        let range = filter.range;
        let sections = match filter.selection {
            AccountSelection::Account(id) => {
                let account = source
                    .find_account(id)?
                    .ok_or_else(|| ReportError::account_not_found(id))?;
                vec![Self::account_section(source, &account, &range)?]
            }
            AccountSelection::All => self.category_sections(source, &range)?,
        };

        let report = ReportDto::new(
            self.title.clone(),
            self.currency,
            range,
            filter.selection,
            columns,
            sections,
        );

        info!(
            selection = %filter.selection,
            range = %range,
            sections = report.sections().len(),
            rows = report.row_count(),
            "account transactions report built"
        );
        Ok(report)
    }

    fn account_section<S: TransactionSource + ?Sized>(
        source: &S,
        account: &Account,
        range: &DateRange,
    ) -> Result<ReportSection, ReportError> {
        let opening = source.opening_balance(account, range.start())?;
        let lines = Self::lines_in_range(source, account, range)?;

        let mut accumulator = BalanceAccumulator::new(opening);
        accumulator.push_account(account, &lines)?;
        Ok(accumulator.finish(account.name.clone()))
    }

    fn category_sections<S: TransactionSource + ?Sized>(
        &self,
        source: &S,
        range: &DateRange,
    ) -> Result<Vec<ReportSection>, ReportError> {
        let mut groups: BTreeMap<&'static str, Vec<Account>> = BTreeMap::new();
        for account in source.accounts()? {
            groups
                .entry(account.category.plural_label())
                .or_default()
                .push(account);
        }

        let mut sections = Vec::with_capacity(groups.len());
        for (label, mut accounts) in groups {
            accounts.sort_by(|a, b| {
                a.name
                    .cmp(&b.name)
                    .then_with(|| a.code.cmp(&b.code))
                    .then_with(|| a.id.cmp(&b.id))
            });

            let mut opening = Decimal::ZERO;
            let mut per_account = Vec::with_capacity(accounts.len());
            for account in accounts {
                opening += source.opening_balance(&account, range.start())?;
                let lines = Self::lines_in_range(source, &account, range)?;
                per_account.push((account, lines));
            }

            let mut accumulator = BalanceAccumulator::new(opening);
            for (account, lines) in &per_account {
                accumulator.push_account(account, lines)?;
            }
            let section = accumulator.finish(label);

            if section.is_empty() && self.empty_sections == EmptySectionPolicy::Omit {
                debug!(section = label, "omitting section without rows");
                continue;
            }
            sections.push(section);
        }
        Ok(sections)
    }

    /// Lines of `account` inside `range`, in report order.
    fn lines_in_range<S: TransactionSource + ?Sized>(
        source: &S,
        account: &Account,
        range: &DateRange,
    ) -> Result<Vec<TransactionLine>, ReportError> {
        let mut lines = source.lines(account.id, range)?;
        // Sources may over-fetch; the window is inclusive on both ends.
        lines.retain(|line| line.account_id == account.id && range.contains(line.date));
        sort_chronologically(&mut lines);
        Ok(lines)
    }
}
