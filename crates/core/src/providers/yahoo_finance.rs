use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::AssetType;
use crate::models::quote::PriceQuote;
use super::traits::QuoteProvider;

/// Yahoo Finance quote provider for listed equities.
///
/// - **Free**: No API key required.
/// - **Coverage**: Tokyo Stock Exchange and US listings.
///
/// Tokyo codes are stored bare (e.g. `7203`) and queried as `7203.T`;
/// those quotes are in JPY. Everything else is treated as a USD listing.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to create connector: {e}"),
            })?;
        Ok(Self { connector })
    }

    /// Map a stored symbol to the Yahoo ticker and its quote currency.
    pub fn resolve_symbol(symbol: &str) -> (String, &'static str) {
        let symbol = symbol.trim().to_uppercase();
        if !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_digit()) {
            (format!("{symbol}.T"), "JPY")
        } else if symbol.ends_with(".T") {
            (symbol, "JPY")
        } else {
            (symbol, "USD")
        }
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn supported_asset_types(&self) -> Vec<AssetType> {
        vec![AssetType::Equity]
    }

    async fn latest_quote(&self, symbol: &str) -> Result<Option<PriceQuote>, CoreError> {
        let (ticker, currency) = Self::resolve_symbol(symbol);

        let resp = self
            .connector
            .get_latest_quotes(&ticker, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch latest quote for {ticker}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("No quote data for {ticker}: {e}"),
        })?;

        let last_updated = match chrono::DateTime::from_timestamp(quote.timestamp as i64, 0) {
            Some(ts) => ts,
            None => chrono::Utc::now(),
        };

        Ok(Some(PriceQuote::new(quote.close, currency, last_updated)))
    }
}
