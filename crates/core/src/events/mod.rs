//! Domain events.
//!
//! Events go out over a `tokio` broadcast channel. Publishing never blocks
//! and is a no-op when nobody is subscribed; slow subscribers may observe
//! `RecvError::Lagged`.

use serde::Serialize;
use tally_shared::types::Currency;
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per subscriber before the oldest are dropped.
pub const DEFAULT_CAPACITY: usize = 64;

/// Public description of a currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    /// ISO 4217 code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display symbol.
    pub symbol: &'static str,
    /// Minor-unit decimal places.
    pub precision: u32,
}

impl From<Currency> for CurrencyInfo {
    fn from(currency: Currency) -> Self {
        Self {
            code: currency.code(),
            name: currency.name(),
            symbol: currency.symbol(),
            precision: currency.precision(),
        }
    }
}

/// The default currency was changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultCurrencyChanged {
    /// The new default.
    pub currency: CurrencyInfo,
    /// Code of the previous default.
    pub previous: &'static str,
}

/// Events published by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// See [`DefaultCurrencyChanged`].
    DefaultCurrencyChanged(DefaultCurrencyChanged),
}

/// Fire-and-forget publisher. Cheap to clone; clones share subscribers.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventPublisher {
    /// Creates a publisher buffering `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Registers a new subscriber. It sees events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publishes `event` to every current subscriber and returns how many
    /// received it.
    pub fn publish(&self, event: DomainEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("event dropped: no subscribers");
                0
            }
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
