use std::collections::HashMap;

use crate::models::exchange_rate::ExchangeRate;
use crate::models::holding::{AssetType, Holding};
use crate::models::quote::{PriceQuote, QuoteBook};
use crate::models::valuation::{HoldingValuation, Valuation};
use crate::money::Rounding;

/// Fund prices are quoted per this many units.
pub const FUND_QUOTE_UNITS: f64 = 10_000.0;

/// Computes the JPY value of a single holding.
///
/// Pure business logic: no I/O, no shared state.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Unrounded JPY value, or `None` when there is no quote.
    ///
    /// - Equity: `price * quantity`
    /// - Fund: `price * quantity / 10000`
    ///
    /// USD quotes are multiplied by the exchange rate (before the fund
    /// division). Negative or NaN quantities count as zero.
    pub fn raw_value(
        &self,
        holding: &Holding,
        quote: Option<&PriceQuote>,
        quantity: f64,
        exchange_rate: &ExchangeRate,
    ) -> Option<f64> {
        let quote = quote?;
        let quantity = quantity.max(0.0);
        if quantity == 0.0 {
            return Some(0.0);
        }

        let mut value = quote.price * quantity;
        if quote.is_usd() {
            value *= exchange_rate.rate;
        }
        if holding.asset_type == AssetType::Fund {
            value /= FUND_QUOTE_UNITS;
        }
        Some(value)
    }

    /// Value one holding, rounded at the caller's chosen precision.
    ///
    /// A missing quote yields an unpriced valuation; a zero quantity with a
    /// quote yields `0`.
    pub fn valuate(
        &self,
        holding: &Holding,
        quote: Option<&PriceQuote>,
        quantity: f64,
        exchange_rate: &ExchangeRate,
        rounding: Rounding,
    ) -> Valuation {
        match self.raw_value(holding, quote, quantity, exchange_rate) {
            Some(value) => Valuation::priced(rounding.apply(value)),
            None => Valuation::unpriced(),
        }
    }

    /// Value every holding in input order, one row each.
    ///
    /// Holdings without an id have no quantity and are valued at zero
    /// (or unpriced, if there is no quote).
    pub fn valuate_holdings(
        &self,
        holdings: &[Holding],
        quotes: &QuoteBook,
        quantities: &HashMap<u64, f64>,
        exchange_rate: &ExchangeRate,
        rounding: Rounding,
    ) -> Vec<HoldingValuation> {
        holdings
            .iter()
            .map(|holding| {
                let quantity = quantity_of(holding, quantities);
                let quote = quotes.get(&holding.symbol);
                HoldingValuation {
                    holding: holding.clone(),
                    quantity,
                    quote: quote.cloned(),
                    valuation: self.valuate(holding, quote, quantity, exchange_rate, rounding),
                }
            })
            .collect()
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Quantity lookup; holdings without a stable id hold nothing.
pub(crate) fn quantity_of(holding: &Holding, quantities: &HashMap<u64, f64>) -> f64 {
    holding
        .id
        .and_then(|id| quantities.get(&id).copied())
        .unwrap_or(0.0)
}
