//! Account transactions reporting.
//!
//! Pipeline: [`ReportFilter`] -> [`TransactionSource`] -> [`BalanceAccumulator`]
//! -> [`ReportService`] (grouping) -> [`ReportDto`] -> table and exporters.

pub mod accumulator;
pub mod column;
pub mod error;
pub mod filter;
pub mod options;
pub mod request;
pub mod service;
pub mod source;
pub mod types;


pub use accumulator::{BalanceAccumulator, accumulate};
pub use column::{
    Alignment, Column, ColumnKey, DATE_FORMAT, account_transaction_columns, format_amount,
    parse_columns,
};
pub use error::{ReportError, ReportErrorKind};
pub use filter::{ALL_ACCOUNTS, AccountSelection, DateRange, DateRangePreset, ReportFilter};
pub use options::{ALL_ACCOUNTS_LABEL, AccountOption, AccountOptionGroup, account_options};
pub use request::{ReportPhase, ReportRequest, RequestError};
pub use service::ReportService;
pub use source::{SourceError, TransactionSource};
pub use types::{EmptyState, ReportDto, ReportRow, ReportSection};
