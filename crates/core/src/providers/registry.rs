use crate::errors::CoreError;
use crate::models::holding::{AssetType, Holding};
use crate::models::quote::PriceQuote;

#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;
use super::traits::QuoteProvider;

/// Registry of all available quote providers.
///
/// Routes requests to providers by `AssetType`, in registration order,
/// falling back to the next provider when one fails.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the default providers pre-configured.
    ///
    /// Only equities are covered. Fund holdings stay unpriced until the
    /// caller registers a provider for `AssetType::Fund`.
    pub fn new_with_defaults() -> Self {
        let mut registry = Self::new();

        // Yahoo Finance: equities, no API key needed.
        // Not available on WASM (uses native reqwest/tokio connectors)
        #[cfg(not(target_arch = "wasm32"))]
        {
            match YahooFinanceProvider::new() {
                Ok(yahoo) => registry.register(Box::new(yahoo)),
                Err(e) => log::warn!("Yahoo Finance provider unavailable: {e}"),
            }
        }

        registry
    }

    /// Register a new quote provider.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Find the first provider that supports the given asset type.
    pub fn get_provider_for(&self, asset_type: &AssetType) -> Option<&dyn QuoteProvider> {
        self.providers
            .iter()
            .find(|p| p.supported_asset_types().contains(asset_type))
            .map(|p| p.as_ref())
    }

    /// Return ALL providers that support the given asset type, ordered by registration priority.
    pub fn get_providers_for(&self, asset_type: &AssetType) -> Vec<&dyn QuoteProvider> {
        self.providers
            .iter()
            .filter(|p| p.supported_asset_types().contains(asset_type))
            .map(|p| p.as_ref())
            .collect()
    }

    /// Latest quote for a holding, trying each matching provider in turn.
    ///
    /// Returns `Ok(None)` when at least one provider answered without a price
    /// and none had one. Returns the last error when every provider failed.
    /// Quotes with a non-finite or non-positive price are rejected.
    pub async fn latest_quote(&self, holding: &Holding) -> Result<Option<PriceQuote>, CoreError> {
        let providers = self.get_providers_for(&holding.asset_type);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(holding.asset_type.to_string()));
        }

        let mut answered = false;
        let mut last_error = None;

        for provider in &providers {
            match provider.latest_quote(&holding.symbol).await {
                Ok(Some(quote)) => {
                    if !quote.price.is_finite() || quote.price <= 0.0 {
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!(
                                "Invalid price returned for {}: {} (must be finite and positive)",
                                holding.symbol, quote.price
                            ),
                        });
                        continue;
                    }
                    return Ok(Some(quote));
                }
                Ok(None) => {
                    answered = true;
                }
                Err(e) => {
                    log::debug!("{} failed for {}: {e}", provider.name(), holding.symbol);
                    last_error = Some(e);
                }
            }
        }

        if answered {
            return Ok(None);
        }
        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(holding.asset_type.to_string())))
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
