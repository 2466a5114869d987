//! Command handlers.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use chrono::Local;
use tracing::info;

use tally_core::currency::CurrencySettings;
use tally_core::events::{DomainEvent, EventPublisher};
use tally_core::export::{self, ExportOptions};
use tally_core::ledger::InMemoryLedger;
use tally_core::reports::{
    Column, ReportFilter, ReportRequest, ReportService, TransactionSource, account_options,
    account_transaction_columns, parse_columns,
};
use tally_shared::types::Currency;
use tally_shared::{AppConfig, AppError, AppResult, EmptySectionPolicy};

use crate::BuildArgs;

fn load_ledger(path: &Path) -> anyhow::Result<InMemoryLedger> {
    let ledger = InMemoryLedger::load(path)
        .map_err(AppError::from)
        .with_context(|| format!("failed to load ledger from {}", path.display()))?;
    info!(lines = ledger.line_count(), "ledger loaded");
    Ok(ledger)
}

fn resolve_columns(list: Option<&str>) -> AppResult<Vec<Column>> {
    match list {
        Some(list) => parse_columns(list)
            .map_err(|name| AppError::Validation(format!("unknown column: {name}"))),
        None => Ok(account_transaction_columns()),
    }
}

fn parse_currency(code: &str) -> AppResult<Currency> {
    code.parse::<Currency>().map_err(AppError::Validation)
}

/// Prints the grouped account selector options.
pub fn accounts(ledger_path: &Path) -> anyhow::Result<()> {
    let ledger = load_ledger(ledger_path)?;
    let accounts = ledger.accounts()?;

    let mut out = std::io::stdout().lock();
    for group in account_options(&accounts) {
        writeln!(out, "{}", group.label)?;
        for option in group.options {
            writeln!(out, "  {:<38}  {}", option.value, option.label)?;
        }
    }
    Ok(())
}

/// Builds a report and writes it in the requested format.
pub fn build(config: &AppConfig, ledger_path: &Path, args: BuildArgs) -> anyhow::Result<()> {
    let ledger = load_ledger(ledger_path)?;

    let (start, end) = match (args.preset, args.from, args.to) {
        (Some(preset), _, _) => {
            let today = args.today.unwrap_or_else(|| Local::now().date_naive());
            let range = preset.resolve(today).map_err(AppError::from)?;
            (range.start(), range.end())
        }
        (None, Some(from), Some(to)) => (from, to),
        _ => bail!("either --preset or both --from and --to are required"),
    };

    let columns = resolve_columns(args.columns.as_deref())?;
    let currency = match args.currency.as_deref() {
        Some(code) => parse_currency(code)?,
        None => ledger.currency().unwrap_or(config.reports.default_currency),
    };

    let mut service = ReportService::new(&config.reports).with_currency(currency);
    if args.include_empty {
        service = service.with_empty_sections(EmptySectionPolicy::Include);
    }

    let filter = ReportFilter::from_form(Some(&args.account), start, end)
        .map_err(AppError::from)?;
    let mut request = ReportRequest::new(filter, columns);
    request
        .build(&service, &ledger)
        .map_err(AppError::from)?;

    let bytes = match args.format.export_format() {
        None => request
            .render()
            .map_err(AppError::from)?
            .into_bytes(),
        Some(format) => request
            .export(format, &ExportOptions::from_config(&config.reports))
            .map_err(AppError::from)?,
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "report written");
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(&bytes)?;
            out.flush()?;
        }
    }

    if let Some(report) = request.report() {
        if let Some(format) = args.format.export_format() {
            info!(suggested = %export::file_name(report, format), "export complete");
        }
    }
    Ok(())
}

/// Switches the default currency and prints the published event, if any.
pub async fn currency(config: &AppConfig, code: &str) -> anyhow::Result<()> {
    let publisher = EventPublisher::default();
    let mut rx = publisher.subscribe();
    let listener = tokio::spawn(async move { rx.recv().await.ok() });

    let mut settings = CurrencySettings::new(config.reports.default_currency, publisher);
    for currency in Currency::ALL {
        settings.enable(currency);
    }
    settings.set_default(code).map_err(AppError::from)?;
    // Dropping the last sender closes the channel so the listener finishes.
    drop(settings);

    match listener.await? {
        Some(DomainEvent::DefaultCurrencyChanged(event)) => {
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        None => println!("Default currency unchanged ({code})"),
    }
    Ok(())
}
