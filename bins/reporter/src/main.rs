//! Tally report CLI
//!
//! Builds account transactions reports from a JSON ledger and prints them as
//! a table or writes CSV, PDF or JSON.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::export::ExportFormat;
use tally_core::reports::DateRangePreset;
use tally_shared::{AppConfig, AppError};

#[derive(Parser, Debug)]
#[command(
    name = "tally-report",
    version,
    about = "Account transactions reports with running balances"
)]
struct Cli {
    /// Ledger JSON file (overrides `ledger.path` from configuration)
    #[arg(short, long, global = true, env = "TALLY_LEDGER")]
    ledger: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List selectable accounts grouped by category
    Accounts,

    /// Build an account transactions report
    #[command(alias = "report")]
    Build(BuildArgs),

    /// Change the default currency and print the resulting event
    Currency {
        /// ISO 4217 code of the new default
        code: String,
    },
}

#[derive(clap::Args, Debug)]
struct BuildArgs {
    /// Account id, or "all" for every account grouped by category
    #[arg(short, long, default_value = "all")]
    account: String,

    /// First day (YYYY-MM-DD)
    #[arg(short, long, requires = "to", conflicts_with = "preset")]
    from: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD)
    #[arg(short, long, requires = "from", conflicts_with = "preset")]
    to: Option<NaiveDate>,

    /// Named range (this-month, last-quarter, year-to-date, ...)
    #[arg(short, long, value_parser = parse_preset)]
    preset: Option<DateRangePreset>,

    /// Reference day for presets (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Comma-separated columns (date, account, description, debit, credit, balance)
    #[arg(short, long)]
    columns: Option<String>,

    /// Keep category sections that have no rows
    #[arg(long)]
    include_empty: bool,

    /// Reporting currency (overrides the ledger and configuration)
    #[arg(long)]
    currency: Option<String>,
}

/// How the report is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Pdf,
    Json,
}

impl OutputFormat {
    fn export_format(self) -> Option<ExportFormat> {
        match self {
            Self::Table => None,
            Self::Csv => Some(ExportFormat::Csv),
            Self::Pdf => Some(ExportFormat::Pdf),
            Self::Json => Some(ExportFormat::Json),
        }
    }
}

fn parse_preset(value: &str) -> Result<DateRangePreset, String> {
    DateRangePreset::parse(value).ok_or_else(|| {
        let known: Vec<&str> = DateRangePreset::ALL.iter().map(|p| p.as_str()).collect();
        format!("unknown preset '{value}', expected one of: {}", known.join(", "))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so exports on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()
        .map_err(AppError::from)
        .context("failed to load configuration")?;
    let ledger_path = cli.ledger.unwrap_or_else(|| config.ledger.path.clone());
    info!(ledger = %ledger_path.display(), "configuration loaded");

    match cli.command {
        Commands::Accounts => commands::accounts(&ledger_path),
        Commands::Build(args) => commands::build(&config, &ledger_path, args),
        Commands::Currency { code } => commands::currency(&config, &code).await,
    }
}
