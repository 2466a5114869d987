//! Supported currencies.
//!
//! Amounts themselves are plain `rust_decimal::Decimal` values; a currency
//! only supplies the code, name, symbol and minor-unit precision.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Indonesian Rupiah
    Idr,
    /// Euro
    Eur,
    /// Singapore Dollar
    Sgd,
    /// Japanese Yen
    Jpy,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Self; 5] = [Self::Usd, Self::Idr, Self::Eur, Self::Sgd, Self::Jpy];

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Idr => "IDR",
            Self::Eur => "EUR",
            Self::Sgd => "SGD",
            Self::Jpy => "JPY",
        }
    }

    /// Returns the English display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Usd => "US Dollar",
            Self::Idr => "Indonesian Rupiah",
            Self::Eur => "Euro",
            Self::Sgd => "Singapore Dollar",
            Self::Jpy => "Japanese Yen",
        }
    }

    /// Returns the display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Idr => "Rp",
            Self::Eur => "€",
            Self::Sgd => "S$",
            Self::Jpy => "¥",
        }
    }

    /// Number of minor-unit decimal places.
    #[must_use]
    pub const fn precision(self) -> u32 {
        match self {
            Self::Jpy => 0,
            Self::Usd | Self::Idr | Self::Eur | Self::Sgd => 2,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "IDR" => Ok(Self::Idr),
            "EUR" => Ok(Self::Eur),
            "SGD" => Ok(Self::Sgd),
            "JPY" => Ok(Self::Jpy),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
