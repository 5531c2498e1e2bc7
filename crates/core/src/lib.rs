pub mod errors;
pub mod models;
pub mod money;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::Utc;
use std::sync::Arc;

use errors::CoreError;
use models::{exchange_rate::ExchangeRate, settings::Settings, valuation::PortfolioSnapshot};
use providers::{registry::QuoteProviderRegistry, traits::HoldingsProvider};
use services::portfolio_service::PortfolioService;

#[cfg(not(target_arch = "wasm32"))]
use providers::traits::{RateProvider, SystemClock};
#[cfg(not(target_arch = "wasm32"))]
use services::exchange_rate_service::ExchangeRateService;

/// Main entry point for the folio-tracker core library.
///
/// Holds the record store, the quote providers and the user settings.
/// The exchange rate is passed in per call so the valuation always runs
/// against one consistent rate snapshot.
#[must_use]
pub struct FolioTracker {
    store: Arc<dyn HoldingsProvider>,
    quotes: QuoteProviderRegistry,
    settings: Settings,
    portfolio_service: PortfolioService,
}

impl std::fmt::Debug for FolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolioTracker")
            .field("quote_providers", &self.quotes.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl FolioTracker {
    /// Build a tracker. Fails if the settings are invalid.
    pub fn new(
        store: Arc<dyn HoldingsProvider>,
        quotes: QuoteProviderRegistry,
        settings: Settings,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self {
            store,
            quotes,
            settings,
            portfolio_service: PortfolioService::new(),
        })
    }

    /// Tracker with the default quote providers and default settings.
    pub fn with_defaults(store: Arc<dyn HoldingsProvider>) -> Self {
        Self {
            store,
            quotes: QuoteProviderRegistry::new_with_defaults(),
            settings: Settings::default(),
            portfolio_service: PortfolioService::new(),
        }
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings after validating them.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), CoreError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Select the portfolio that `snapshot()` reports on (`None` = all).
    pub fn set_current_portfolio(&mut self, portfolio_id: Option<u64>) {
        self.settings.current_portfolio_id = portfolio_id;
    }

    #[must_use]
    pub fn current_portfolio(&self) -> Option<u64> {
        self.settings.current_portfolio_id
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// Dashboard figures for the current portfolio.
    pub async fn snapshot(&self, exchange_rate: ExchangeRate) -> Result<PortfolioSnapshot, CoreError> {
        self.snapshot_for(self.settings.current_portfolio_id, exchange_rate)
            .await
    }

    /// Dashboard figures for an explicit portfolio scope.
    pub async fn snapshot_for(
        &self,
        portfolio_id: Option<u64>,
        exchange_rate: ExchangeRate,
    ) -> Result<PortfolioSnapshot, CoreError> {
        self.portfolio_service
            .snapshot(
                self.store.as_ref(),
                &self.quotes,
                portfolio_id,
                exchange_rate,
                Utc::now(),
            )
            .await
    }

    /// Format an amount in the configured display currency.
    #[must_use]
    pub fn format_amount(&self, amount: f64) -> String {
        money::format_currency(amount, &self.settings.display_currency)
    }

    /// Exchange-rate holder configured from these settings.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn exchange_rate_service(&self, provider: Arc<dyn RateProvider>) -> ExchangeRateService {
        ExchangeRateService::new(provider, self.settings.rate_refresh.clone(), &SystemClock)
    }
}
