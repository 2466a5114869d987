//! Line-oriented layout shared by the table renderer and the PDF writer.

use rust_decimal::Decimal;

use crate::reports::{Column, ColumnKey, ReportDto, ReportRow, ReportSection, format_amount};

const CELL_GAP: &str = "  ";
const OPENING_LABEL: &str = "Opening balance";
const CLOSING_LABEL: &str = "Closing balance";

/// Visual weight of a laid-out line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Report title.
    Title,
    /// Section label or column header.
    Heading,
    /// Everything else.
    Body,
}

/// Where a line sits relative to its section, for paginated output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineRole {
    /// Ordinary line.
    #[default]
    Plain,
    /// Section label or column header; repeated at the top of continuation pages.
    SectionHeader,
    /// Last line of a section block.
    SectionEnd,
}

/// One line of monospaced report text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutLine {
    /// Weight.
    pub style: LineStyle,
    /// Position within a section.
    pub role: LineRole,
    /// Text, already padded.
    pub text: String,
}

impl LayoutLine {
    fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            role: LineRole::Plain,
            text: text.into(),
        }
    }

    fn with_role(mut self, role: LineRole) -> Self {
        self.role = role;
        self
    }

    fn blank() -> Self {
        Self::new(LineStyle::Body, String::new())
    }
}

/// Lays the report out as monospaced lines.
///
/// Column widths are shared across sections so amounts line up for the
/// whole report.
#[must_use]
pub fn layout(report: &ReportDto) -> Vec<LayoutLine> {
    let mut lines = vec![
        LayoutLine::new(LineStyle::Title, report.title()),
        LayoutLine::new(
            LineStyle::Body,
            format!(
                "{} | Account: {} | Currency: {}",
                report.range(),
                selection_label(report),
                report.currency().code()
            ),
        ),
        LayoutLine::blank(),
    ];

    if let Some(empty) = report.empty_state() {
        lines.push(LayoutLine::new(LineStyle::Heading, empty.heading));
        lines.push(LayoutLine::new(LineStyle::Body, empty.description));
        return lines;
    }

    let columns = report.columns();
    let widths = column_widths(report);
    let header = join_cells(columns, &widths, |c| c.label.clone());
    let rule = "-".repeat(header.chars().count());

    for (index, section) in report.sections().iter().enumerate() {
        if index > 0 {
            lines.push(LayoutLine::blank());
        }
        lines.push(
            LayoutLine::new(LineStyle::Heading, section.label.clone())
                .with_role(LineRole::SectionHeader),
        );
        lines.push(
            LayoutLine::new(LineStyle::Heading, header.clone()).with_role(LineRole::SectionHeader),
        );
        lines.push(LayoutLine::new(LineStyle::Body, rule.clone()));
        lines.push(LayoutLine::new(
            LineStyle::Body,
            join_cells(columns, &widths, |c| opening_cell(columns, c, section)),
        ));
        for row in &section.rows {
            lines.push(LayoutLine::new(
                LineStyle::Body,
                join_cells(columns, &widths, |c| c.render(row)),
            ));
        }
        lines.push(LayoutLine::new(LineStyle::Body, rule.clone()));
        lines.push(
            LayoutLine::new(
                LineStyle::Body,
                join_cells(columns, &widths, |c| closing_cell(columns, c, section)),
            )
            .with_role(LineRole::SectionEnd),
        );
    }
    lines
}

fn selection_label(report: &ReportDto) -> String {
    if report.selection().is_all() {
        return "All Accounts".to_string();
    }
    report
        .sections()
        .first()
        .map_or_else(|| report.selection().to_string(), |s| s.label.clone())
}

fn column_widths(report: &ReportDto) -> Vec<usize> {
    let columns = report.columns();
    columns
        .iter()
        .map(|column| {
            let label = column.label.chars().count();
            let cells = report
                .rows()
                .map(|row| column.render(row).chars().count())
                .max()
                .unwrap_or(0);
            let summaries = report
                .sections()
                .iter()
                .flat_map(|s| [opening_cell(columns, column, s), closing_cell(columns, column, s)])
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            label.max(cells).max(summaries)
        })
        .collect()
}

fn join_cells(columns: &[Column], widths: &[usize], cell: impl Fn(&Column) -> String) -> String {
    columns
        .iter()
        .zip(widths)
        .map(|(column, width)| column.alignment.pad(&cell(column), *width))
        .collect::<Vec<_>>()
        .join(CELL_GAP)
        .trim_end()
        .to_string()
}

fn is_first_text_column(columns: &[Column], column: &Column) -> bool {
    columns
        .iter()
        .find(|c| !c.key.is_amount())
        .is_some_and(|first| first.key == column.key)
}

fn opening_cell(columns: &[Column], column: &Column, section: &ReportSection) -> String {
    summary_cell(columns, column, OPENING_LABEL, None, section.opening_balance)
}

fn closing_cell(columns: &[Column], column: &Column, section: &ReportSection) -> String {
    summary_cell(
        columns,
        column,
        CLOSING_LABEL,
        Some((section.total_debit, section.total_credit)),
        section.closing_balance,
    )
}

fn summary_cell(
    columns: &[Column],
    column: &Column,
    label: &str,
    totals: Option<(Decimal, Decimal)>,
    balance: Decimal,
) -> String {
    match (column.key, totals) {
        (ColumnKey::Balance, _) => format_amount(balance),
        (ColumnKey::Debit, Some((debit, _))) => format_amount(debit),
        (ColumnKey::Credit, Some((_, credit))) => format_amount(credit),
        _ if is_first_text_column(columns, column) => label.to_string(),
        _ => String::new(),
    }
}

/// Cell text of `row` for every column, in column order.
#[must_use]
pub fn row_cells(columns: &[Column], row: &ReportRow) -> Vec<String> {
    columns.iter().map(|column| column.render(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{AccountSelection, DateRange, account_transaction_columns};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tally_shared::types::{AccountId, Currency, LineId};

    fn report(rows: Vec<ReportRow>) -> ReportDto {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        let section = ReportSection {
            label: "Cash".to_string(),
            opening_balance: dec!(1000),
            total_debit: rows.iter().map(|r| r.debit).sum(),
            total_credit: rows.iter().map(|r| r.credit).sum(),
            closing_balance: rows.last().map_or(dec!(1000), |r| r.balance),
            rows,
        };
        ReportDto::new(
            "Account Transactions",
            Currency::Usd,
            range,
            AccountSelection::Account(AccountId::new()),
            account_transaction_columns(),
            vec![section],
        )
    }

    fn row(description: &str, debit: Decimal, balance: Decimal) -> ReportRow {
        ReportRow {
            line_id: LineId::new(),
            account_id: AccountId::new(),
            account_name: "Cash".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            description: description.to_string(),
            debit,
            credit: dec!(0),
            balance,
        }
    }

    #[test]
    fn test_empty_report_shows_empty_state() {
        let lines = layout(&report(vec![]));
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts[0], "Account Transactions");
        assert_eq!(texts[1], "2024-01-01 to 2024-01-31 | Account: Cash | Currency: USD");
        assert!(texts.contains(&"No Transactions Found"));
        assert_eq!(lines[3].style, LineStyle::Heading);
    }

    #[test]
    fn test_section_block() {
        let lines = layout(&report(vec![row("Chairs", dec!(200), dec!(1200))]));
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();

        assert_eq!(texts[3], "Cash");
        assert!(texts[4].starts_with("Date"));
        assert!(texts[6].starts_with("Opening balance"));
        assert!(texts[6].ends_with("1000.00"));
        assert!(texts[7].starts_with("2024-01-05"));
        assert!(texts[7].contains("Chairs"));
        assert!(texts[9].starts_with("Closing balance"));
        assert!(texts[9].ends_with("1200.00"));

        let roles: Vec<LineRole> = lines.iter().map(|l| l.role).collect();
        assert_eq!(&roles[3..5], [LineRole::SectionHeader; 2]);
        assert_eq!(roles[9], LineRole::SectionEnd);
        assert!(roles[5..9].iter().all(|r| *r == LineRole::Plain));
    }

    #[test]
    fn test_amounts_right_aligned() {
        let lines = layout(&report(vec![
            row("Small", dec!(5), dec!(1005)),
            row("Large", dec!(12345.5), dec!(13350.5)),
        ]));
        let small = &lines[7].text;
        let large = &lines[8].text;
        assert_eq!(small.len(), large.len());
        assert!(small.ends_with(" 1005.00"));
    }
}
