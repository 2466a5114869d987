//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_shared::types::{AccountId, Currency, LineId};

use super::column::Column;
use super::filter::{AccountSelection, DateRange};

/// One transaction line as it appears on the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Source line.
    pub line_id: LineId,
    /// Account the line is posted to.
    pub account_id: AccountId,
    /// Account display name.
    pub account_name: String,
    /// Posting date.
    pub date: NaiveDate,
    /// Line description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this line.
    pub balance: Decimal,
}

/// A labelled group of rows sharing one running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    /// Category plural label or account name.
    pub label: String,
    /// Balance before the first row.
    pub opening_balance: Decimal,
    /// Rows in report order.
    pub rows: Vec<ReportRow>,
    /// Sum of row debits.
    pub total_debit: Decimal,
    /// Sum of row credits.
    pub total_credit: Decimal,
    /// Balance after the last row (opening balance when there are none).
    pub closing_balance: Decimal,
}

impl ReportSection {
    /// Returns true when the section has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Message shown in place of an empty report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    /// Heading.
    pub heading: &'static str,
    /// Follow-up hint.
    pub description: &'static str,
}

impl EmptyState {
    /// The account transactions empty state.
    pub const NO_TRANSACTIONS: Self = Self {
        heading: "No Transactions Found",
        description: "Adjust the account or date range, or start by creating a transaction.",
    };
}

/// Immutable output of a report build.
///
/// Everything presentation and export need is carried here, so rendering
/// never goes back to the transaction source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDto {
    title: String,
    currency: Currency,
    range: DateRange,
    selection: AccountSelection,
    columns: Vec<Column>,
    sections: Vec<ReportSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_state: Option<EmptyState>,
}

impl ReportDto {
    /// Assembles a report. Emptiness is decided here, once.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        currency: Currency,
        range: DateRange,
        selection: AccountSelection,
        columns: Vec<Column>,
        sections: Vec<ReportSection>,
    ) -> Self {
        let empty_state = sections
            .iter()
            .all(ReportSection::is_empty)
            .then_some(EmptyState::NO_TRANSACTIONS);
        Self {
            title: title.into(),
            currency,
            range,
            selection,
            columns,
            sections,
            empty_state,
        }
    }

    /// Report title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Reporting currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Date window covered.
    #[must_use]
    pub fn range(&self) -> DateRange {
        self.range
    }

    /// First day covered.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.range.start()
    }

    /// Last day covered.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.range.end()
    }

    /// Account selection the report was built for.
    #[must_use]
    pub fn selection(&self) -> AccountSelection {
        self.selection
    }

    /// Columns in display order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Sections in display order.
    #[must_use]
    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    /// Every row across all sections, in display order.
    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.sections.iter().flat_map(|s| s.rows.iter())
    }

    /// Total number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }

    /// True when no section holds a row (or there are no sections).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.empty_state.is_some()
    }

    /// Empty-state message, present only for empty reports.
    #[must_use]
    pub fn empty_state(&self) -> Option<EmptyState> {
        self.empty_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::column::account_transaction_columns;
    use rust_decimal_macros::dec;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    fn section(label: &str, rows: Vec<ReportRow>) -> ReportSection {
        ReportSection {
            label: label.to_string(),
            opening_balance: dec!(100),
            rows,
            total_debit: dec!(0),
            total_credit: dec!(0),
            closing_balance: dec!(100),
        }
    }

    fn row() -> ReportRow {
        ReportRow {
            line_id: LineId::new(),
            account_id: AccountId::new(),
            account_name: "Cash".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            description: "Deposit".to_string(),
            debit: dec!(10),
            credit: dec!(0),
            balance: dec!(110),
        }
    }

    fn dto(sections: Vec<ReportSection>) -> ReportDto {
        ReportDto::new(
            "Account Transactions",
            Currency::Usd,
            range(),
            AccountSelection::All,
            account_transaction_columns(),
            sections,
        )
    }

    #[test]
    fn test_no_sections_is_empty() {
        let report = dto(vec![]);
        assert!(report.is_empty());
        assert_eq!(report.empty_state(), Some(EmptyState::NO_TRANSACTIONS));
    }

    #[test]
    fn test_sections_without_rows_is_empty() {
        let report = dto(vec![section("Assets", vec![]), section("Expenses", vec![])]);
        assert!(report.is_empty());
        assert_eq!(report.row_count(), 0);
    }

    #[test]
    fn test_one_populated_section_is_not_empty() {
        let report = dto(vec![section("Assets", vec![row()]), section("Expenses", vec![])]);
        assert!(!report.is_empty());
        assert_eq!(report.empty_state(), None);
        assert_eq!(report.row_count(), 1);
        assert_eq!(report.rows().count(), 1);
    }

    #[test]
    fn test_serializes_metadata() {
        let report = dto(vec![section("Assets", vec![row()])]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["selection"], "all");
        assert_eq!(json["range"]["start"], "2024-01-01");
        assert_eq!(json["sections"][0]["label"], "Assets");
        assert!(json.get("empty_state").is_none());
    }
}
