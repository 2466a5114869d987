//! Column specs shared by the table view and the exporters.

use rust_decimal::Decimal;
use serde::Serialize;

use super::types::ReportRow;

/// Fixed date format for every date-flagged cell.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Minimum number of decimal places an amount is printed with.
const MIN_AMOUNT_SCALE: u32 = 2;

/// Report row field a column displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKey {
    /// Posting date.
    Date,
    /// Account name.
    Account,
    /// Line description.
    Description,
    /// Debit amount.
    Debit,
    /// Credit amount.
    Credit,
    /// Running balance.
    Balance,
}

impl ColumnKey {
    /// Returns the field name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Account => "account",
            Self::Description => "description",
            Self::Debit => "debit",
            Self::Credit => "credit",
            Self::Balance => "balance",
        }
    }

    /// Parses a field name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Some(Self::Date),
            "account" => Some(Self::Account),
            "description" => Some(Self::Description),
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            "balance" => Some(Self::Balance),
            _ => None,
        }
    }

    /// Returns true for money fields.
    #[must_use]
    pub fn is_amount(&self) -> bool {
        matches!(self, Self::Debit | Self::Credit | Self::Balance)
    }

    fn default_label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Account => "Account",
            Self::Description => "Description",
            Self::Debit => "Debit",
            Self::Credit => "Credit",
            Self::Balance => "Balance",
        }
    }
}

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Pad on the right.
    Left,
    /// Pad on both sides.
    Center,
    /// Pad on the left.
    Right,
}

impl Alignment {
    /// Pads `text` to `width` characters.
    #[must_use]
    pub fn pad(self, text: &str, width: usize) -> String {
        let len = text.chars().count();
        if len >= width {
            return text.to_string();
        }
        let gap = width - len;
        match self {
            Self::Left => format!("{text}{}", " ".repeat(gap)),
            Self::Right => format!("{}{text}", " ".repeat(gap)),
            Self::Center => {
                let left = gap / 2;
                format!("{}{text}{}", " ".repeat(left), " ".repeat(gap - left))
            }
        }
    }
}

/// How one report field is labelled and laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Field displayed.
    pub key: ColumnKey,
    /// Header label.
    pub label: String,
    /// Horizontal alignment.
    pub alignment: Alignment,
    /// Whether values are formatted as dates.
    pub is_date: bool,
}

impl Column {
    /// Creates a left-aligned column labelled after its key.
    #[must_use]
    pub fn make(key: ColumnKey) -> Self {
        Self {
            key,
            label: key.default_label().to_string(),
            alignment: Alignment::Left,
            is_date: false,
        }
    }

    /// Sets the header label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the alignment.
    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Flags the column as a date column.
    #[must_use]
    pub fn mark_as_date(mut self) -> Self {
        self.is_date = true;
        self
    }

    /// Column with the conventional label, alignment and date flag for `key`.
    #[must_use]
    pub fn standard(key: ColumnKey) -> Self {
        let column = Self::make(key);
        match key {
            ColumnKey::Date => column.mark_as_date(),
            ColumnKey::Debit | ColumnKey::Credit | ColumnKey::Balance => {
                column.alignment(Alignment::Right)
            }
            ColumnKey::Account | ColumnKey::Description => column,
        }
    }

    /// Cell text for `row` under this column.
    #[must_use]
    pub fn render(&self, row: &ReportRow) -> String {
        match self.key {
            ColumnKey::Date if self.is_date => row.date.format(DATE_FORMAT).to_string(),
            ColumnKey::Date => row.date.to_string(),
            ColumnKey::Account => row.account_name.clone(),
            ColumnKey::Description => row.description.clone(),
            ColumnKey::Debit => format_amount(row.debit),
            ColumnKey::Credit => format_amount(row.credit),
            ColumnKey::Balance => format_amount(row.balance),
        }
    }
}

/// The Date / Description / Debit / Credit / Balance layout.
#[must_use]
pub fn account_transaction_columns() -> Vec<Column> {
    [
        ColumnKey::Date,
        ColumnKey::Description,
        ColumnKey::Debit,
        ColumnKey::Credit,
        ColumnKey::Balance,
    ]
    .into_iter()
    .map(Column::standard)
    .collect()
}

/// Parses a comma-separated list of field names into standard columns.
///
/// Returns the unknown name on failure.
pub fn parse_columns(list: &str) -> Result<Vec<Column>, String> {
    list.split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            ColumnKey::parse(name)
                .map(Column::standard)
                .ok_or_else(|| name.trim().to_string())
        })
        .collect()
}

/// Plain decimal text: at least two decimal places, never rounded.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut amount = amount;
    if amount.is_zero() {
        amount.set_sign_positive(true);
    }
    if amount.scale() < MIN_AMOUNT_SCALE {
        amount.rescale(MIN_AMOUNT_SCALE);
    }
    amount.to_string()
}
