pub mod aggregation_service;
pub mod exchange_rate_service;
pub mod portfolio_service;
pub mod rebalance_service;
pub mod return_service;
pub mod valuation_service;
