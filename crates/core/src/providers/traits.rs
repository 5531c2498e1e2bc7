use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::exchange_rate::ExchangeRate;
use crate::models::holding::{AssetType, Holding};
use crate::models::ledger::{Dividend, Purchase};
use crate::models::quote::PriceQuote;

/// Source of latest market prices.
///
/// `Ok(None)` means the provider answered but has no price for the symbol.
/// `Err` means the lookup itself failed; callers degrade both to "unpriced".
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which asset types this provider can price.
    fn supported_asset_types(&self) -> Vec<AssetType>;

    async fn latest_quote(&self, symbol: &str) -> Result<Option<PriceQuote>, CoreError>;
}

/// Source of the USD→JPY rate.
///
/// `manual` is true when the user explicitly asked for a refresh.
/// A failed fetch is an `Err`, never a sentinel rate.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self, manual: bool) -> Result<ExchangeRate, CoreError>;
}

/// Read access to the record store.
///
/// Every call takes the portfolio scope explicitly; `None` covers all
/// portfolios.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HoldingsProvider: Send + Sync {
    async fn list_holdings(&self, portfolio_id: Option<u64>) -> Result<Vec<Holding>, CoreError>;

    /// Net units held: sum of signed purchase quantities in scope, never negative.
    async fn quantity_for(&self, holding_id: u64, portfolio_id: Option<u64>)
        -> Result<f64, CoreError>;

    async fn list_purchases(&self, portfolio_id: Option<u64>) -> Result<Vec<Purchase>, CoreError>;

    async fn list_dividends(&self, portfolio_id: Option<u64>) -> Result<Vec<Dividend>, CoreError>;
}

/// Wall-clock source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
