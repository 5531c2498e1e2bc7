use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A point-in-time market price for a symbol.
///
/// Produced by a quote provider and treated as read-only input by the
/// valuation engine. Fund quotes are usually JPY but nothing assumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,

    /// ISO-like currency code, uppercased ("JPY", "USD", ...)
    pub currency: String,

    pub last_updated: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(price: f64, currency: impl Into<String>, last_updated: DateTime<Utc>) -> Self {
        Self {
            price,
            currency: currency.into().to_uppercase(),
            last_updated,
        }
    }

    pub fn is_usd(&self) -> bool {
        self.currency == "USD"
    }
}

/// Latest quotes keyed by uppercased symbol, fully resolved before any
/// valuation runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteBook {
    quotes: HashMap<String, PriceQuote>,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, quote: PriceQuote) {
        self.quotes.insert(symbol.to_uppercase(), quote);
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceQuote> {
        self.quotes.get(&symbol.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<(String, PriceQuote)> for QuoteBook {
    fn from_iter<T: IntoIterator<Item = (String, PriceQuote)>>(iter: T) -> Self {
        let mut book = QuoteBook::new();
        for (symbol, quote) in iter {
            book.insert(&symbol, quote);
        }
        book
    }
}
