//! Report filter: account selection and date window.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Serialize, Serializer};
use tally_shared::types::AccountId;

use super::error::ReportError;

/// Sentinel value selecting every account.
pub const ALL_ACCOUNTS: &str = "all";

/// Which accounts a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccountSelection {
    /// Every account, grouped by category.
    #[default]
    All,
    /// One specific account.
    Account(AccountId),
}

impl AccountSelection {
    /// Parses a selector value. Blank input selects all accounts.
    ///
    /// Anything that is neither the `all` sentinel nor an account id is an
    /// unknown account.
    pub fn parse(raw: &str) -> Result<Self, ReportError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL_ACCOUNTS) {
            return Ok(Self::All);
        }
        raw.parse::<AccountId>()
            .map(Self::Account)
            .map_err(|_| ReportError::account_not_found(raw))
    }

    /// Returns true for the all-accounts selection.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl std::fmt::Display for AccountSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_ACCOUNTS),
            Self::Account(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for AccountSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inclusive calendar date window with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the window.
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, counting both ends.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Named date windows offered by the filter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateRangePreset {
    /// The reference day only.
    Today,
    /// Monday through Sunday of the reference week.
    ThisWeek,
    /// The reference calendar month.
    ThisMonth,
    /// The reference calendar quarter.
    ThisQuarter,
    /// The reference calendar year.
    ThisYear,
    /// The month before the reference month.
    LastMonth,
    /// The quarter before the reference quarter.
    LastQuarter,
    /// The year before the reference year.
    LastYear,
    /// January 1st through the reference day.
    YearToDate,
    /// The 30 days ending on the reference day.
    Last30Days,
}

impl DateRangePreset {
    /// All presets in display order.
    pub const ALL: [Self; 10] = [
        Self::Today,
        Self::ThisWeek,
        Self::ThisMonth,
        Self::ThisQuarter,
        Self::ThisYear,
        Self::LastMonth,
        Self::LastQuarter,
        Self::LastYear,
        Self::YearToDate,
        Self::Last30Days,
    ];

    /// Returns the kebab-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::ThisWeek => "this-week",
            Self::ThisMonth => "this-month",
            Self::ThisQuarter => "this-quarter",
            Self::ThisYear => "this-year",
            Self::LastMonth => "last-month",
            Self::LastQuarter => "last-quarter",
            Self::LastYear => "last-year",
            Self::YearToDate => "year-to-date",
            Self::Last30Days => "last-30-days",
        }
    }

    /// Parses a preset from its kebab-case name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Resolves the preset against a reference day.
    ///
    /// Fails when the window would fall outside the representable calendar.
    pub fn resolve(self, today: NaiveDate) -> Result<DateRange, ReportError> {
        self.window(today)
            .map(|(start, end)| DateRange { start, end })
            .ok_or(ReportError::PresetOutOfRange {
                preset: self.as_str(),
                today,
            })
    }

    fn window(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let month = month_start(today)?;
        let quarter = month.checked_sub_months(Months::new(today.month0() % 3))?;
        let year = today.checked_sub_days(Days::new(u64::from(today.ordinal0())))?;
        let day_before = |date: NaiveDate| date.checked_sub_days(Days::new(1));

        Some(match self {
            Self::Today => (today, today),
            Self::ThisWeek => {
                let back = Days::new(u64::from(today.weekday().num_days_from_monday()));
                let monday = today.checked_sub_days(back)?;
                (monday, monday.checked_add_days(Days::new(6))?)
            }
            Self::ThisMonth => (month, day_before(month.checked_add_months(Months::new(1))?)?),
            Self::ThisQuarter => (quarter, day_before(quarter.checked_add_months(Months::new(3))?)?),
            Self::ThisYear => (year, day_before(year.checked_add_months(Months::new(12))?)?),
            Self::LastMonth => (month.checked_sub_months(Months::new(1))?, day_before(month)?),
            Self::LastQuarter => (quarter.checked_sub_months(Months::new(3))?, day_before(quarter)?),
            Self::LastYear => (year.checked_sub_months(Months::new(12))?, day_before(year)?),
            Self::YearToDate => (year, today),
            Self::Last30Days => (today.checked_sub_days(Days::new(29))?, today),
        })
    }
}

impl std::fmt::Display for DateRangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.day0())))
}

/// Validated filter state for an Account Transactions report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportFilter {
    /// Account selection.
    pub selection: AccountSelection,
    /// Date window.
    pub range: DateRange,
}

impl ReportFilter {
    /// Creates a filter from already-validated parts.
    #[must_use]
    pub fn new(selection: AccountSelection, range: DateRange) -> Self {
        Self { selection, range }
    }

    /// Validates raw filter-form values.
    ///
    /// The date range is checked first, then the account selector. A missing
    /// selector defaults to all accounts.
    pub fn from_form(
        selected_account: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, ReportError> {
        let range = DateRange::new(start, end)?;
        let selection = AccountSelection::parse(selected_account.unwrap_or(ALL_ACCOUNTS))?;
        Ok(Self { selection, range })
    }
}
