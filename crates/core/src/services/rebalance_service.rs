use crate::models::holding::Country;
use crate::models::valuation::{CountryAggregate, GapSuggestion, RebalanceSuggestion};
use crate::money::round_to_tenth;

/// Minimum Japan/US share difference (as a fraction) before a target is named.
pub const REBALANCE_THRESHOLD: f64 = 0.10;

/// Suggests where the next investment should go. Never suggests selling.
pub struct RebalanceService;

impl RebalanceService {
    pub fn new() -> Self {
        Self
    }

    /// Percentage-threshold advice.
    ///
    /// With no value at all the split is reported as 50/50 with no target.
    /// Otherwise the underweighted country is named only when the shares
    /// differ by at least [`REBALANCE_THRESHOLD`].
    pub fn suggest_rebalance(&self, aggregate: &CountryAggregate) -> RebalanceSuggestion {
        let total = aggregate.japan_total + aggregate.us_total;
        if !total.is_finite() || total <= 0.0 {
            return RebalanceSuggestion {
                difference: 0.0,
                target_country: None,
                jp_percent: 0.5,
                us_percent: 0.5,
            };
        }

        let jp_percent = aggregate.japan_total / total;
        let us_percent = aggregate.us_total / total;
        let difference = (jp_percent - us_percent).abs();

        let target_country = if difference >= REBALANCE_THRESHOLD {
            if jp_percent < us_percent {
                Some(Country::Japan)
            } else {
                Some(Country::US)
            }
        } else {
            None
        };

        RebalanceSuggestion {
            difference,
            target_country,
            jp_percent,
            us_percent,
        }
    }

    /// Absolute yen-gap advice: always names the smaller side.
    /// On an exact tie the US side is named.
    pub fn suggest_by_gap(&self, aggregate: &CountryAggregate) -> GapSuggestion {
        let difference = round_to_tenth((aggregate.japan_total - aggregate.us_total).abs());
        let target_country = if aggregate.japan_total < aggregate.us_total {
            Country::Japan
        } else {
            Country::US
        };
        GapSuggestion {
            difference,
            target_country,
        }
    }
}

impl Default for RebalanceService {
    fn default() -> Self {
        Self::new()
    }
}
