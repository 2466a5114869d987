//! Report exporters.
//!
//! Every exporter reads only the [`ReportDto`]; nothing here touches a
//! transaction source.

mod csv;
mod layout;
mod pdf;
mod table;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tally_shared::{AppError, ReportConfig};
use thiserror::Error;

use crate::reports::ReportDto;

pub use self::csv::write_csv;
pub use self::layout::{LayoutLine, LineRole, LineStyle, layout};
pub use self::pdf::{MAX_LINES_PER_PAGE, write_pdf};
pub use self::table::render_table;

/// Default number of text lines per PDF page.
pub const DEFAULT_ROWS_PER_PAGE: usize = 48;

/// Errors raised while exporting a report.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Page layout settings are unusable.
    #[error("Layout error: {0}")]
    Layout(String),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Layout(_) => Self::Validation(err.to_string()),
            _ => Self::Export(err.to_string()),
        }
    }
}

/// Output format for exported reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values.
    Csv,
    /// Paginated PDF document.
    Pdf,
    /// Serialized report.
    Json,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
            Self::Json => "json",
        }
    }

    /// MIME type.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
            Self::Json => "application/json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Text lines per PDF page.
    pub rows_per_page: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl ExportOptions {
    /// Export settings from report configuration.
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            rows_per_page: config.rows_per_page,
        }
    }
}

/// Exports `report` in `format`.
///
/// Output is deterministic: the same report always yields the same bytes.
pub fn export(
    report: &ReportDto,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv => write_csv(report),
        ExportFormat::Pdf => write_pdf(report, options),
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(report)?),
    }
}

/// Suggested download name, e.g. `account-transactions_2024-01-01_2024-01-31.csv`.
#[must_use]
pub fn file_name(report: &ReportDto, format: ExportFormat) -> String {
    format!(
        "account-transactions_{}_{}.{}",
        report.start_date(),
        report.end_date(),
        format.extension()
    )
}
