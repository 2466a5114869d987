//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::Currency;

/// Most text lines a PDF export page can hold.
pub const MAX_ROWS_PER_PAGE: usize = 60;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Report generation configuration.
    pub reports: ReportConfig,
    /// Ledger data source configuration.
    pub ledger: LedgerConfig,
}

/// Whether category sections without rows appear in a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySectionPolicy {
    /// Emit every category section, even when it has no rows.
    Include,
    /// Drop category sections that have no rows.
    #[default]
    Omit,
}

/// Report generation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Currency used when the ledger does not name one.
    pub default_currency: Currency,
    /// Policy for category sections with no rows.
    pub empty_sections: EmptySectionPolicy,
    /// Text lines per page in PDF exports.
    pub rows_per_page: usize,
    /// Report title.
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_currency: Currency::Usd,
            empty_sections: EmptySectionPolicy::default(),
            rows_per_page: default_rows_per_page(),
            title: default_title(),
        }
    }
}

fn default_rows_per_page() -> usize {
    48
}

fn default_title() -> String {
    "Account Transactions".to_string()
}

/// Ledger data source configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Path to the ledger JSON file.
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ledger.json"),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// then `TALLY__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_env(None)
    }

    /// Like [`AppConfig::load`], reading variables from `env` instead of the
    /// process environment when given.
    fn load_with_env(env: Option<config::Map<String, String>>) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TALLY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        let rows = self.reports.rows_per_page;
        if !(1..=MAX_ROWS_PER_PAGE).contains(&rows) {
            return Err(config::ConfigError::Message(format!(
                "reports.rows_per_page must be between 1 and {MAX_ROWS_PER_PAGE}, got {rows}"
            )));
        }
        Ok(())
    }
}
