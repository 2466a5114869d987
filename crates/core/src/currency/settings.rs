//! Currency settings registry.

use std::collections::BTreeSet;

use tally_shared::AppError;
use tally_shared::types::Currency;
use thiserror::Error;
use tracing::info;

use crate::events::{CurrencyInfo, DefaultCurrencyChanged, DomainEvent, EventPublisher};

/// Errors raised by currency settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// The code names no supported currency.
    #[error("Currency not found: {0}")]
    NotFound(String),

    /// The currency is supported but not enabled.
    #[error("Currency {0} is not enabled")]
    NotEnabled(Currency),

    /// The default currency cannot be disabled.
    #[error("Currency {0} is the default and cannot be disabled")]
    DefaultInUse(Currency),
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::NotFound(_) => Self::NotFound(err.to_string()),
            CurrencyError::NotEnabled(_) | CurrencyError::DefaultInUse(_) => {
                Self::Validation(err.to_string())
            }
        }
    }
}

/// Enabled currencies plus the current default.
///
/// Invariant: the default is always enabled.
#[derive(Debug, Clone)]
pub struct CurrencySettings {
    enabled: BTreeSet<Currency>,
    default: Currency,
    publisher: EventPublisher,
}

impl CurrencySettings {
    /// Starts with only `default` enabled.
    #[must_use]
    pub fn new(default: Currency, publisher: EventPublisher) -> Self {
        Self {
            enabled: BTreeSet::from([default]),
            default,
            publisher,
        }
    }

    /// Current default currency.
    #[must_use]
    pub fn default_currency(&self) -> Currency {
        self.default
    }

    /// Display details of the default currency.
    #[must_use]
    pub fn default_info(&self) -> CurrencyInfo {
        self.default.into()
    }

    /// Enabled currencies in code order.
    pub fn enabled(&self) -> impl Iterator<Item = Currency> + '_ {
        self.enabled.iter().copied()
    }

    /// Returns true if `currency` is enabled.
    #[must_use]
    pub fn is_enabled(&self, currency: Currency) -> bool {
        self.enabled.contains(&currency)
    }

    /// Enables a currency. Returns false if it already was.
    pub fn enable(&mut self, currency: Currency) -> bool {
        self.enabled.insert(currency)
    }

    /// Disables a currency other than the default.
    pub fn disable(&mut self, currency: Currency) -> Result<bool, CurrencyError> {
        if currency == self.default {
            return Err(CurrencyError::DefaultInUse(currency));
        }
        Ok(self.enabled.remove(&currency))
    }

    /// Makes the currency named by `code` the default.
    ///
    /// Publishes [`DefaultCurrencyChanged`] and returns true when the default
    /// actually changes; re-selecting the current default publishes nothing.
    pub fn set_default(&mut self, code: &str) -> Result<bool, CurrencyError> {
        let currency: Currency = code
            .trim()
            .parse()
            .map_err(|_| CurrencyError::NotFound(code.trim().to_string()))?;
        if !self.is_enabled(currency) {
            return Err(CurrencyError::NotEnabled(currency));
        }
        if currency == self.default {
            return Ok(false);
        }

        let previous = std::mem::replace(&mut self.default, currency);
        let delivered = self.publisher.publish(DomainEvent::DefaultCurrencyChanged(
            DefaultCurrencyChanged {
                currency: currency.into(),
                previous: previous.code(),
            },
        ));
        info!(
            currency = %currency,
            previous = %previous,
            subscribers = delivered,
            "default currency changed"
        );
        Ok(true)
    }
}
