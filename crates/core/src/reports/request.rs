//! Lifecycle of one report request.
//!
//! ```text
//! FilterSelected -> Building -> Built -> { Rendered | Exported | Failed }
//! ```
//!
//! `Failed` is terminal. Once built, the same report can be rendered and
//! exported any number of times; a failed export leaves the phase as it was.

use serde::Serialize;
use tally_shared::AppError;
use thiserror::Error;
use tracing::{info, warn};

use super::column::Column;
use super::error::{ReportError, ReportErrorKind};
use super::filter::ReportFilter;
use super::service::ReportService;
use super::source::TransactionSource;
use super::types::ReportDto;
use crate::export::{self, ExportError, ExportFormat, ExportOptions};

/// Phase of a report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum ReportPhase {
    /// Filter chosen, nothing built yet.
    FilterSelected,
    /// Build in progress.
    Building,
    /// Report available.
    Built,
    /// Report shown as a table at least once.
    Rendered,
    /// Report exported; carries the last format written.
    Exported(ExportFormat),
    /// Build failed.
    Failed(ReportErrorKind),
}

impl ReportPhase {
    /// Returns true when a built report is available.
    #[must_use]
    pub fn has_report(self) -> bool {
        matches!(self, Self::Built | Self::Rendered | Self::Exported(_))
    }
}

impl std::fmt::Display for ReportPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FilterSelected => f.write_str("filter_selected"),
            Self::Building => f.write_str("building"),
            Self::Built => f.write_str("built"),
            Self::Rendered => f.write_str("rendered"),
            Self::Exported(format) => write!(f, "exported({format})"),
            Self::Failed(kind) => write!(f, "failed({kind})"),
        }
    }
}

/// Errors raised while driving a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The operation is not allowed in the current phase.
    #[error("cannot move report request from {from} to {to}")]
    InvalidTransition {
        /// Current phase.
        from: ReportPhase,
        /// Requested phase.
        to: ReportPhase,
    },

    /// Building the report failed.
    #[error(transparent)]
    Build(#[from] ReportError),

    /// Exporting the report failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::InvalidTransition { .. } => Self::Internal(err.to_string()),
            RequestError::Build(inner) => inner.into(),
            RequestError::Export(inner) => inner.into(),
        }
    }
}

/// One report request: a filter, its columns, and the report once built.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    filter: ReportFilter,
    columns: Vec<Column>,
    phase: ReportPhase,
    report: Option<ReportDto>,
    failure: Option<String>,
}

impl ReportRequest {
    /// Starts a request for `filter`.
    #[must_use]
    pub fn new(filter: ReportFilter, columns: Vec<Column>) -> Self {
        Self {
            filter,
            columns,
            phase: ReportPhase::FilterSelected,
            report: None,
            failure: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ReportPhase {
        self.phase
    }

    /// Filter the request was created with.
    #[must_use]
    pub fn filter(&self) -> &ReportFilter {
        &self.filter
    }

    /// The built report, if any.
    #[must_use]
    pub fn report(&self) -> Option<&ReportDto> {
        self.report.as_ref()
    }

    /// Message of the build error for failed requests.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Builds the report. Only allowed once, from `FilterSelected`.
    pub fn build<S: TransactionSource + ?Sized>(
        &mut self,
        service: &ReportService,
        source: &S,
    ) -> Result<&ReportDto, RequestError> {
        self.transition(ReportPhase::FilterSelected, ReportPhase::Building)?;

        match service.build_account_transactions_report(source, &self.filter, self.columns.clone()) {
            Ok(report) => {
                self.phase = ReportPhase::Built;
                Ok(self.report.insert(report))
            }
            Err(err) => {
                warn!(error = %err, kind = %err.kind(), "report build failed");
                self.phase = ReportPhase::Failed(err.kind());
                self.failure = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Renders the built report as a plain-text table.
    pub fn render(&mut self) -> Result<String, RequestError> {
        let report = self.built(ReportPhase::Rendered)?;
        let table = export::render_table(report);
        self.phase = ReportPhase::Rendered;
        Ok(table)
    }

    /// Exports the built report.
    ///
    /// On failure the request stays in its current phase and the report can
    /// be exported again.
    pub fn export(
        &mut self,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, RequestError> {
        let report = self.built(ReportPhase::Exported(format))?;
        let bytes = export::export(report, format, options)?;
        info!(format = %format, bytes = bytes.len(), "report exported");
        self.phase = ReportPhase::Exported(format);
        Ok(bytes)
    }

    fn built(&self, to: ReportPhase) -> Result<&ReportDto, RequestError> {
        match (&self.report, self.phase.has_report()) {
            (Some(report), true) => Ok(report),
            _ => Err(RequestError::InvalidTransition { from: self.phase, to }),
        }
    }

    fn transition(&mut self, expected: ReportPhase, to: ReportPhase) -> Result<(), RequestError> {
        if self.phase != expected {
            return Err(RequestError::InvalidTransition { from: self.phase, to });
        }
        self.phase = to;
        Ok(())
    }
}
