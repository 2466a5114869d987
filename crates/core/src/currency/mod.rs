//! Enabled currencies and the default reporting currency.

mod settings;

pub use settings::{CurrencyError, CurrencySettings};
