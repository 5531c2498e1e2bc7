use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::{AssetType, Country, Holding};
use crate::models::ledger::{CashFlow, Dividend, Purchase};
use crate::providers::traits::HoldingsProvider;

/// In-memory record store for holdings and their ledger records.
///
/// Assigns ids on insert. Holdings are shared by every portfolio; purchases,
/// dividends and cash flows carry their own portfolio scope.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    holdings: Vec<Holding>,
    purchases: Vec<Purchase>,
    dividends: Vec<Dividend>,
    cash_flows: Vec<CashFlow>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Store a new holding. Symbols are unique.
    pub fn add_holding(&mut self, mut holding: Holding) -> Result<u64, CoreError> {
        holding.symbol = holding.symbol.trim().to_uppercase();
        if holding.symbol.is_empty() {
            return Err(CoreError::ValidationError("Symbol must not be empty".into()));
        }
        if self.holdings.iter().any(|h| h.symbol == holding.symbol) {
            return Err(CoreError::ValidationError(format!(
                "Holding {} already exists",
                holding.symbol
            )));
        }
        let id = self.allocate_id();
        holding.id = Some(id);
        self.holdings.push(holding);
        Ok(id)
    }

    /// Change the editable fields of a holding. Identity stays fixed.
    pub fn update_holding(
        &mut self,
        id: u64,
        country: Country,
        asset_type: AssetType,
    ) -> Result<(), CoreError> {
        let holding = self
            .holdings
            .iter_mut()
            .find(|h| h.id == Some(id))
            .ok_or(CoreError::HoldingNotFound(id))?;
        holding.country = country;
        holding.asset_type = asset_type;
        Ok(())
    }

    /// Delete a holding. Its ledger records are left alone.
    pub fn remove_holding(&mut self, id: u64) -> Result<Holding, CoreError> {
        let idx = self
            .holdings
            .iter()
            .position(|h| h.id == Some(id))
            .ok_or(CoreError::HoldingNotFound(id))?;
        Ok(self.holdings.remove(idx))
    }

    pub fn holding(&self, id: u64) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.id == Some(id))
    }

    pub fn holding_by_symbol(&self, symbol: &str) -> Option<&Holding> {
        let symbol = symbol.trim().to_uppercase();
        self.holdings.iter().find(|h| h.symbol == symbol)
    }

    // ── Ledger ──────────────────────────────────────────────────────

    /// Record a purchase (negative quantity for a sale).
    pub fn add_purchase(&mut self, mut purchase: Purchase) -> Result<u64, CoreError> {
        self.ensure_holding(purchase.holding_id)?;
        if !purchase.price.is_finite() || purchase.price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Purchase price must be a non-negative number, got {}",
                purchase.price
            )));
        }
        if !purchase.quantity.is_finite() || purchase.quantity == 0.0 {
            return Err(CoreError::ValidationError(
                "Purchase quantity must be a non-zero number".into(),
            ));
        }
        let id = self.allocate_id();
        purchase.id = Some(id);
        self.purchases.push(purchase);
        Ok(id)
    }

    pub fn add_dividend(&mut self, mut dividend: Dividend) -> Result<u64, CoreError> {
        self.ensure_holding(dividend.holding_id)?;
        if !dividend.amount.is_finite() || dividend.amount < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Dividend amount must be a non-negative number, got {}",
                dividend.amount
            )));
        }
        let id = self.allocate_id();
        dividend.id = Some(id);
        self.dividends.push(dividend);
        Ok(id)
    }

    pub fn add_cash_flow(&mut self, mut flow: CashFlow) -> Result<u64, CoreError> {
        if !flow.amount.is_finite() || flow.amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "{} amount must be positive, got {}",
                flow.kind, flow.amount
            )));
        }
        let id = self.allocate_id();
        flow.id = Some(id);
        self.cash_flows.push(flow);
        Ok(id)
    }

    pub fn cash_flows(&self, portfolio_id: Option<u64>) -> Vec<CashFlow> {
        self.cash_flows
            .iter()
            .filter(|f| in_scope(f.portfolio_id, portfolio_id))
            .cloned()
            .collect()
    }

    fn ensure_holding(&self, id: u64) -> Result<(), CoreError> {
        match self.holding(id) {
            Some(_) => Ok(()),
            None => Err(CoreError::HoldingNotFound(id)),
        }
    }

    fn net_quantity(&self, holding_id: u64, portfolio_id: Option<u64>) -> f64 {
        self.purchases
            .iter()
            .filter(|p| p.holding_id == holding_id && in_scope(p.portfolio_id, portfolio_id))
            .map(|p| p.quantity)
            .sum()
    }
}

/// `None` scope matches every record.
fn in_scope(record: Option<u64>, scope: Option<u64>) -> bool {
    scope.is_none() || record == scope
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingsProvider for MemoryStore {
    async fn list_holdings(&self, _portfolio_id: Option<u64>) -> Result<Vec<Holding>, CoreError> {
        Ok(self.holdings.clone())
    }

    async fn quantity_for(
        &self,
        holding_id: u64,
        portfolio_id: Option<u64>,
    ) -> Result<f64, CoreError> {
        self.ensure_holding(holding_id)?;
        let quantity = self.net_quantity(holding_id, portfolio_id);
        if quantity < 0.0 {
            log::warn!("Holding {holding_id} has negative net quantity {quantity}, treating as 0");
            return Ok(0.0);
        }
        Ok(quantity)
    }

    async fn list_purchases(&self, portfolio_id: Option<u64>) -> Result<Vec<Purchase>, CoreError> {
        Ok(self
            .purchases
            .iter()
            .filter(|p| in_scope(p.portfolio_id, portfolio_id))
            .cloned()
            .collect())
    }

    async fn list_dividends(&self, portfolio_id: Option<u64>) -> Result<Vec<Dividend>, CoreError> {
        Ok(self
            .dividends
            .iter()
            .filter(|d| in_scope(d.portfolio_id, portfolio_id))
            .cloned()
            .collect())
    }
}
