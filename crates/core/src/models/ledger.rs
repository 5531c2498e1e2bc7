use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single purchase (or sale, when `quantity` is negative) of a holding.
///
/// `price` is per share for equities and per 10,000 units for funds,
/// matching how the holding is quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Option<u64>,
    pub holding_id: u64,
    /// Portfolio scope; `None` means the record belongs to no portfolio
    #[serde(default)]
    pub portfolio_id: Option<u64>,
    pub price: f64,
    pub quantity: f64,
    pub date: NaiveDate,
}

impl Purchase {
    pub fn new(holding_id: u64, price: f64, quantity: f64, date: NaiveDate) -> Self {
        Self {
            id: None,
            holding_id,
            portfolio_id: None,
            price,
            quantity,
            date,
        }
    }

    pub fn in_portfolio(mut self, portfolio_id: u64) -> Self {
        self.portfolio_id = Some(portfolio_id);
        self
    }
}

/// A dividend received for a holding, in JPY.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub id: Option<u64>,
    pub holding_id: u64,
    #[serde(default)]
    pub portfolio_id: Option<u64>,
    pub amount: f64,
    pub date: NaiveDate,
}

impl Dividend {
    pub fn new(holding_id: u64, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: None,
            holding_id,
            portfolio_id: None,
            amount,
            date,
        }
    }

    pub fn in_portfolio(mut self, portfolio_id: u64) -> Self {
        self.portfolio_id = Some(portfolio_id);
        self
    }
}

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashFlowKind {
    Deposit,
    Withdrawal,
}

impl std::fmt::Display for CashFlowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CashFlowKind::Deposit => write!(f, "Deposit"),
            CashFlowKind::Withdrawal => write!(f, "Withdrawal"),
        }
    }
}

/// Cash deposited into or withdrawn from a portfolio (JPY, always positive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub id: Option<u64>,
    #[serde(default)]
    pub portfolio_id: Option<u64>,
    pub kind: CashFlowKind,
    pub amount: f64,
    pub date: NaiveDate,
}

impl CashFlow {
    pub fn deposit(amount: f64, date: NaiveDate) -> Self {
        Self {
            id: None,
            portfolio_id: None,
            kind: CashFlowKind::Deposit,
            amount,
            date,
        }
    }

    pub fn withdrawal(amount: f64, date: NaiveDate) -> Self {
        Self {
            id: None,
            portfolio_id: None,
            kind: CashFlowKind::Withdrawal,
            amount,
            date,
        }
    }

    pub fn in_portfolio(mut self, portfolio_id: u64) -> Self {
        self.portfolio_id = Some(portfolio_id);
        self
    }

    /// Signed effect on the cash balance.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            CashFlowKind::Deposit => self.amount,
            CashFlowKind::Withdrawal => -self.amount,
        }
    }
}
