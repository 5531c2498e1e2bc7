use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::errors::CoreError;
use crate::models::exchange_rate::ExchangeRate;
use crate::models::holding::Holding;
use crate::models::quote::QuoteBook;
use crate::models::valuation::PortfolioSnapshot;
use crate::money::Rounding;
use crate::providers::registry::QuoteProviderRegistry;
use crate::providers::traits::HoldingsProvider;

use super::aggregation_service::AggregationService;
use super::rebalance_service::RebalanceService;
use super::return_service::ReturnService;
use super::valuation_service::ValuationService;

/// Gathers holdings, quantities and quotes, then runs the valuation engine
/// over the fully resolved data.
///
/// Store failures are errors. Quote failures are not: the holding is
/// simply left unpriced.
pub struct PortfolioService {
    valuation_service: ValuationService,
    aggregation_service: AggregationService,
    rebalance_service: RebalanceService,
    return_service: ReturnService,
}

impl PortfolioService {
    pub fn new() -> Self {
        Self {
            valuation_service: ValuationService::new(),
            aggregation_service: AggregationService::new(),
            rebalance_service: RebalanceService::new(),
            return_service: ReturnService::new(),
        }
    }

    /// Holdings and their net quantities within `portfolio_id`.
    pub async fn load_positions(
        &self,
        store: &dyn HoldingsProvider,
        portfolio_id: Option<u64>,
    ) -> Result<(Vec<Holding>, HashMap<u64, f64>), CoreError> {
        let holdings = store.list_holdings(portfolio_id).await?;
        let mut quantities = HashMap::with_capacity(holdings.len());
        for id in holdings.iter().filter_map(|h| h.id) {
            let quantity = store.quantity_for(id, portfolio_id).await?;
            quantities.insert(id, quantity);
        }
        Ok((holdings, quantities))
    }

    /// Latest quote per distinct symbol. Symbols whose lookup fails or
    /// returns nothing are absent from the book.
    pub async fn load_quotes(
        &self,
        registry: &QuoteProviderRegistry,
        holdings: &[Holding],
    ) -> QuoteBook {
        let mut book = QuoteBook::new();
        let mut seen = HashSet::new();

        for holding in holdings {
            if !seen.insert(holding.symbol.clone()) {
                continue;
            }
            match registry.latest_quote(holding).await {
                Ok(Some(quote)) => book.insert(&holding.symbol, quote),
                Ok(None) => log::debug!("No quote available for {}", holding.symbol),
                Err(CoreError::NoProvider(asset_type)) => {
                    log::debug!("No {asset_type} quote provider registered for {}", holding.symbol)
                }
                Err(e) => log::warn!("Quote fetch failed for {}, leaving it unpriced: {e}", holding.symbol),
            }
        }
        book
    }

    /// Build the dashboard figures for one portfolio scope.
    pub async fn snapshot(
        &self,
        store: &dyn HoldingsProvider,
        registry: &QuoteProviderRegistry,
        portfolio_id: Option<u64>,
        exchange_rate: ExchangeRate,
        as_of: DateTime<Utc>,
    ) -> Result<PortfolioSnapshot, CoreError> {
        let (holdings, quantities) = self.load_positions(store, portfolio_id).await?;
        let quotes = self.load_quotes(registry, &holdings).await;
        let purchases = store.list_purchases(portfolio_id).await?;
        let dividends = store.list_dividends(portfolio_id).await?;

        let rows = self.valuation_service.valuate_holdings(
            &holdings,
            &quotes,
            &quantities,
            &exchange_rate,
            Rounding::Integer,
        );
        let unpriced_count = rows.iter().filter(|r| !r.valuation.is_priced()).count();

        let aggregate =
            self.aggregation_service
                .aggregate_by_country(&holdings, &quotes, &quantities, &exchange_rate);

        let total_investment = self.return_service.total_investment(&holdings, &purchases);
        let total_dividends = self.return_service.total_dividends(&dividends);

        Ok(PortfolioSnapshot {
            portfolio_id,
            as_of,
            exchange_rate,
            holdings: rows,
            unpriced_count,
            aggregate,
            rebalance: self.rebalance_service.suggest_rebalance(&aggregate),
            gap: self.rebalance_service.suggest_by_gap(&aggregate),
            total_investment,
            total_dividends,
            investment_return: self
                .return_service
                .investment_return(aggregate.total, total_investment),
            dividend_yield: self
                .return_service
                .dividend_yield(total_dividends, total_investment),
        })
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
