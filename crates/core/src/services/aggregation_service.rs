use std::collections::HashMap;

use crate::models::exchange_rate::ExchangeRate;
use crate::models::holding::{Country, Holding};
use crate::models::quote::QuoteBook;
use crate::models::valuation::CountryAggregate;
use crate::money::round_to_tenth;

use super::valuation_service::{quantity_of, ValuationService};

/// Sums holding valuations per country.
pub struct AggregationService {
    valuation_service: ValuationService,
}

impl AggregationService {
    pub fn new() -> Self {
        Self {
            valuation_service: ValuationService::new(),
        }
    }

    /// Japan, US and grand totals in JPY.
    ///
    /// Holdings are valued unrounded and unpriced holdings contribute
    /// nothing. Each country sub-total is rounded once, after the whole
    /// reduction. The grand total is the sum of the rounded sub-totals, so
    /// `total == japan_total + us_total` holds for the figures shown.
    pub fn aggregate_by_country(
        &self,
        holdings: &[Holding],
        quotes: &QuoteBook,
        quantities: &HashMap<u64, f64>,
        exchange_rate: &ExchangeRate,
    ) -> CountryAggregate {
        let (japan_raw, us_raw) =
            holdings
                .iter()
                .fold((0.0_f64, 0.0_f64), |(japan, us), holding| {
                    let value = self
                        .valuation_service
                        .raw_value(
                            holding,
                            quotes.get(&holding.symbol),
                            quantity_of(holding, quantities),
                            exchange_rate,
                        )
                        .unwrap_or(0.0);
                    match holding.country {
                        Country::Japan => (japan + value, us),
                        Country::US => (japan, us + value),
                    }
                });

        let japan_total = round_to_tenth(japan_raw);
        let us_total = round_to_tenth(us_raw);
        CountryAggregate::new(japan_total, us_total, round_to_tenth(japan_total + us_total))
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
