//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Module errors convert into this type at the boundary where a failure is
/// shown to the user (form-level message, CLI output).
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Stored data violates a ledger invariant.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Export to a file format failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP-style status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::DataIntegrity(_) => 422,
            Self::Configuration(_) | Self::Export(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DataIntegrity(_) => "DATA_INTEGRITY_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Export(_) => "EXPORT_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the user can fix the failure by changing their input.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Validation(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
