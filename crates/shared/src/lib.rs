//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Supported currencies
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, EmptySectionPolicy, LedgerConfig, MAX_ROWS_PER_PAGE, ReportConfig};
pub use error::{AppError, AppResult};
