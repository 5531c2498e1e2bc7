use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

use super::exchange_rate::DEFAULT_USD_JPY_RATE;

/// How the exchange-rate holder refreshes itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateRefreshSettings {
    /// Refresh once as soon as polling starts.
    pub auto_update_on_load: bool,

    /// Seconds between scheduled refreshes.
    pub refresh_interval_secs: u64,

    /// Seconds the "just updated" indication stays on after a success.
    pub just_updated_window_secs: u64,

    /// Rate used until the first successful fetch.
    pub default_rate: f64,
}

impl RateRefreshSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn just_updated_window(&self) -> Duration {
        Duration::from_secs(self.just_updated_window_secs)
    }
}

impl Default for RateRefreshSettings {
    fn default() -> Self {
        Self {
            auto_update_on_load: true,
            refresh_interval_secs: 600,
            just_updated_window_secs: 3,
            default_rate: DEFAULT_USD_JPY_RATE,
        }
    }
}

/// User-configurable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency for formatted totals (values are always computed in JPY).
    pub display_currency: String,

    /// Portfolio scope for dashboard queries; `None` = all portfolios.
    pub current_portfolio_id: Option<u64>,

    pub rate_refresh: RateRefreshSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_currency: "JPY".to_string(),
            current_portfolio_id: None,
            rate_refresh: RateRefreshSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let refresh = &self.rate_refresh;
        if refresh.refresh_interval_secs == 0 {
            return Err(CoreError::ValidationError(
                "refresh_interval_secs must be greater than zero".into(),
            ));
        }
        if !refresh.default_rate.is_finite() || refresh.default_rate <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "default_rate must be a positive number, got {}",
                refresh.default_rate
            )));
        }
        if self.display_currency.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "display_currency must not be empty".into(),
            ));
        }
        Ok(())
    }
}
