use serde::{Deserialize, Serialize};

/// Market a holding belongs to. Determines its aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    Japan,
    US,
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Country::Japan => write!(f, "Japan"),
            Country::US => write!(f, "US"),
        }
    }
}

/// The kind of instrument. Determines the valuation formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    /// Individual shares: price is per share
    Equity,
    /// Investment trusts: price is quoted per 10,000 units
    Fund,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Equity => write!(f, "Equity"),
            AssetType::Fund => write!(f, "Fund"),
        }
    }
}

/// A tracked stock or fund position.
///
/// `id` is assigned by the record store and stays stable for the holding's
/// lifetime. A holding that has not been stored yet has no id and is
/// excluded from quantity lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: Option<u64>,

    /// Exchange code or fund identifier, uppercased (e.g. "7203", "AAPL")
    pub symbol: String,

    /// Optional display name
    #[serde(default)]
    pub name: String,

    pub country: Country,

    pub asset_type: AssetType,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, country: Country, asset_type: AssetType) -> Self {
        Self {
            id: None,
            symbol: symbol.into().trim().to_uppercase(),
            name: String::new(),
            country,
            asset_type,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Convenience constructors for the common combinations
    pub fn japan_equity(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Country::Japan, AssetType::Equity)
    }

    pub fn us_equity(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Country::US, AssetType::Equity)
    }

    pub fn fund(symbol: impl Into<String>, country: Country) -> Self {
        Self::new(symbol, country, AssetType::Fund)
    }
}
