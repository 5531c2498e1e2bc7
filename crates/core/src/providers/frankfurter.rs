use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::exchange_rate::ExchangeRate;
use super::traits::RateProvider;

const BASE_URL: &str = "https://api.frankfurter.dev/v1";

/// Frankfurter API provider for the USD→JPY exchange rate.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) reference rates.
///
/// ECB rates change once per working day, so `manual` only affects logging.
pub struct FrankfurterRateProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterRateProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at another host (used by tests and proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for FrankfurterRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Frankfurter API response types ──────────────────────────────────

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RateProvider for FrankfurterRateProvider {
    async fn fetch_rate(&self, manual: bool) -> Result<ExchangeRate, CoreError> {
        let url = format!("{}/latest?base=USD&symbols=JPY", self.base_url);
        log::debug!("Fetching USD/JPY from Frankfurter (manual: {manual})");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("HTTP {status} for USD/JPY"),
            });
        }

        let body: RatesResponse = resp.json().await.map_err(|e| CoreError::Api {
            provider: "Frankfurter".into(),
            message: format!("Failed to parse response for USD/JPY: {e}"),
        })?;

        let rate = body
            .rates
            .get("JPY")
            .copied()
            .ok_or_else(|| CoreError::RateNotAvailable("no JPY rate in response".into()))?;

        let rate = ExchangeRate::new(rate, chrono::Utc::now());
        if !rate.is_valid() {
            return Err(CoreError::RateNotAvailable(format!(
                "invalid USD/JPY rate {}",
                rate.rate
            )));
        }
        Ok(rate)
    }
}
