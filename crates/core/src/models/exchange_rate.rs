use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback USD→JPY rate used until the first successful fetch.
pub const DEFAULT_USD_JPY_RATE: f64 = 150.0;

/// A USD→JPY conversion rate and the time it was observed.
///
/// There is always a rate: the engine never runs without one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub rate: f64,
    pub last_updated: DateTime<Utc>,
}

impl ExchangeRate {
    pub fn new(rate: f64, last_updated: DateTime<Utc>) -> Self {
        Self { rate, last_updated }
    }

    /// The fallback rate, stamped with `now`.
    pub fn fallback(now: DateTime<Utc>) -> Self {
        Self::new(DEFAULT_USD_JPY_RATE, now)
    }

    /// A usable rate is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.rate.is_finite() && self.rate > 0.0
    }
}
