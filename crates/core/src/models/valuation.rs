use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exchange_rate::ExchangeRate;
use super::holding::{Country, Holding};
use super::quote::PriceQuote;

/// Currency every valuation is expressed in.
pub const VALUATION_CURRENCY: &str = "JPY";

/// The JPY value of one holding.
///
/// `value == None` means "unpriced" (no quote available), which is
/// distinct from a priced holding worth zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub value: Option<f64>,
    pub currency: String,
}

impl Valuation {
    pub fn priced(value: f64) -> Self {
        Self {
            value: Some(value),
            currency: VALUATION_CURRENCY.to_string(),
        }
    }

    pub fn unpriced() -> Self {
        Self {
            value: None,
            currency: VALUATION_CURRENCY.to_string(),
        }
    }

    pub fn is_priced(&self) -> bool {
        self.value.is_some()
    }

    /// Contribution to a sum: unpriced counts as nothing.
    pub fn value_or_zero(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

/// One row of the holdings listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub holding: Holding,
    pub quantity: f64,
    pub quote: Option<PriceQuote>,
    pub valuation: Valuation,
}

/// Per-country and grand totals in JPY, each rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryAggregate {
    pub japan_total: f64,
    pub us_total: f64,
    pub total: f64,
}

impl CountryAggregate {
    pub fn new(japan_total: f64, us_total: f64, total: f64) -> Self {
        Self {
            japan_total,
            us_total,
            total,
        }
    }

    pub fn total_for(&self, country: Country) -> f64 {
        match country {
            Country::Japan => self.japan_total,
            Country::US => self.us_total,
        }
    }
}

/// Percentage-threshold rebalance advice.
///
/// Percentages are fractions (0.5 == 50%). `target_country` is the
/// underweighted side, or `None` when the split is within tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebalanceSuggestion {
    pub difference: f64,
    pub target_country: Option<Country>,
    pub jp_percent: f64,
    pub us_percent: f64,
}

/// Absolute yen-gap rebalance advice. Always names a country.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapSuggestion {
    /// `|japan_total - us_total|` in JPY
    pub difference: f64,
    pub target_country: Country,
}

/// Everything the dashboard shows for one portfolio scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub portfolio_id: Option<u64>,
    pub as_of: DateTime<Utc>,
    pub exchange_rate: ExchangeRate,

    /// Per-holding rows in whole yen
    pub holdings: Vec<HoldingValuation>,

    /// Number of holdings with no quote
    pub unpriced_count: usize,

    pub aggregate: CountryAggregate,
    pub rebalance: RebalanceSuggestion,
    pub gap: GapSuggestion,

    pub total_investment: f64,
    pub total_dividends: f64,

    /// Fraction, e.g. 0.12 == +12%
    pub investment_return: f64,
    pub dividend_yield: f64,
}
