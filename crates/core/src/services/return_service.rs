use std::collections::HashMap;

use crate::models::holding::{AssetType, Holding};
use crate::models::ledger::{CashFlow, Dividend, Purchase};
use crate::money::{round_to_integer, round_to_tenth};

use super::valuation_service::FUND_QUOTE_UNITS;

/// Computes investment totals, return and dividend yield.
///
/// Ratios are fractions (0.05 == 5%) and fall back to `0.0` whenever the
/// invested amount is zero or negative.
pub struct ReturnService;

impl ReturnService {
    pub fn new() -> Self {
        Self
    }

    /// `(total_value - total_investment) / total_investment`
    pub fn investment_return(&self, total_value: f64, total_investment: f64) -> f64 {
        if total_investment <= 0.0 {
            return 0.0;
        }
        (total_value - total_investment) / total_investment
    }

    /// `total_dividends / total_investment`
    pub fn dividend_yield(&self, total_dividends: f64, total_investment: f64) -> f64 {
        if total_investment <= 0.0 {
            return 0.0;
        }
        total_dividends / total_investment
    }

    /// Amount invested across purchase records.
    ///
    /// Equities contribute `price * quantity`; funds contribute
    /// `round(price * quantity / 10000)`, rounded per purchase before
    /// summing. Purchases for unknown holdings are skipped.
    pub fn total_investment(&self, holdings: &[Holding], purchases: &[Purchase]) -> f64 {
        let types: HashMap<u64, AssetType> = holdings
            .iter()
            .filter_map(|h| h.id.map(|id| (id, h.asset_type)))
            .collect();

        purchases
            .iter()
            .filter_map(|p| {
                let asset_type = types.get(&p.holding_id)?;
                Some(match asset_type {
                    AssetType::Equity => p.price * p.quantity,
                    AssetType::Fund => round_to_integer(p.price * p.quantity / FUND_QUOTE_UNITS),
                })
            })
            .sum()
    }

    pub fn total_dividends(&self, dividends: &[Dividend]) -> f64 {
        round_to_tenth(dividends.iter().map(|d| d.amount).sum())
    }

    /// Deposits minus withdrawals.
    pub fn cash_balance(&self, flows: &[CashFlow]) -> f64 {
        round_to_tenth(flows.iter().map(CashFlow::signed_amount).sum())
    }
}

impl Default for ReturnService {
    fn default() -> Self {
        Self::new()
    }
}
