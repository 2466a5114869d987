//! Report error types.

use chrono::NaiveDate;
use serde::Serialize;
use tally_shared::AppError;
use tally_shared::types::{AccountId, LineId};
use thiserror::Error;

use super::source::SourceError;
use crate::ledger::LineError;

/// Errors that can occur during report generation.
///
/// An empty result is never an error.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// A date preset reaches past the representable calendar.
    #[error("Date preset {preset} cannot be resolved for {today}")]
    PresetOutOfRange {
        /// Preset name.
        preset: &'static str,
        /// Reference day.
        today: NaiveDate,
    },

    /// Account not found (or the identifier is not a valid account id).
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// A line handed to the accumulator breaks the one-sided invariant.
    #[error("Line {line} on account {account} is malformed: {reason}")]
    MalformedLine {
        /// Offending line.
        line: LineId,
        /// Account the line is posted to.
        account: AccountId,
        /// What is wrong with it.
        reason: LineError,
    },

    /// The transaction source failed.
    #[error("Transaction source error: {0}")]
    Source(#[from] SourceError),
}

/// Error classification kept by a failed report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportErrorKind {
    /// Start date after end date.
    InvalidRange,
    /// Unknown account.
    NotFound,
    /// Malformed ledger data.
    DataIntegrity,
    /// Source unavailable.
    Source,
}

impl std::fmt::Display for ReportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidRange => "invalid_range",
            Self::NotFound => "not_found",
            Self::DataIntegrity => "data_integrity",
            Self::Source => "source",
        };
        f.write_str(name)
    }
}

impl ReportError {
    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ReportErrorKind {
        match self {
            Self::InvalidRange { .. } | Self::PresetOutOfRange { .. } => {
                ReportErrorKind::InvalidRange
            }
            Self::AccountNotFound(_) => ReportErrorKind::NotFound,
            Self::MalformedLine { .. } => ReportErrorKind::DataIntegrity,
            Self::Source(_) => ReportErrorKind::Source,
        }
    }

    /// Creates a not-found error for an account id.
    pub fn account_not_found(identifier: impl ToString) -> Self {
        Self::AccountNotFound(identifier.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidRange { .. } | ReportError::PresetOutOfRange { .. } => {
                Self::Validation(err.to_string())
            }
            ReportError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            ReportError::MalformedLine { .. } => Self::DataIntegrity(err.to_string()),
            ReportError::Source(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_maps_to_validation() {
        let err = ReportError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(err.kind(), ReportErrorKind::InvalidRange);
        assert_eq!(
            err.to_string(),
            "Invalid date range: start 2024-02-01 is after end 2024-01-01"
        );

        let app: AppError = err.into();
        assert_eq!(app.status_code(), 400);
        assert!(app.is_user_correctable());
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ReportError::account_not_found("petty-cash");
        assert_eq!(err.kind(), ReportErrorKind::NotFound);
        assert_eq!(err.to_string(), "Account not found: petty-cash");

        let app: AppError = err.into();
        assert_eq!(app.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_malformed_line_maps_to_data_integrity() {
        let err = ReportError::MalformedLine {
            line: LineId::new(),
            account: AccountId::new(),
            reason: LineError::BothSides,
        };
        assert_eq!(err.kind(), ReportErrorKind::DataIntegrity);

        let app: AppError = err.into();
        assert_eq!(app.status_code(), 422);
    }
}
