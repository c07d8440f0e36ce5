//! Index quotes and the source that serves them.
//!
//! The QuoteSource trait abstracts over where current index values come from
//! so request handlers take an injected store instead of reading a global.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Snapshot quote for one market index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuote {
    pub name: String,
    pub symbol: String,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
    pub description: String,
}

impl IndexQuote {
    pub fn new(
        name: &str,
        symbol: &str,
        value: f64,
        change: f64,
        change_percent: f64,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            value,
            change,
            change_percent,
            description: description.to_string(),
        }
    }
}

/// Read access to current index quotes.
pub trait QuoteSource: Send + Sync {
    /// Quote for an exact (case-sensitive) symbol.
    fn quote(&self, symbol: &str) -> Option<IndexQuote>;

    /// All quotes, in catalog order.
    fn all(&self) -> Vec<IndexQuote>;

    /// When the quotes were last loaded, if ever.
    fn last_updated(&self) -> Option<DateTime<Local>>;
}

/// In-memory quote source.
#[derive(Debug, Clone)]
pub struct IndexCatalog {
    quotes: Vec<IndexQuote>,
    loaded_at: DateTime<Local>,
}

impl IndexCatalog {
    /// Every quote must carry a finite, positive value so it can anchor a
    /// series.
    pub fn new(quotes: Vec<IndexQuote>) -> Result<Self, CatalogError> {
        if let Some(bad) = quotes
            .iter()
            .find(|q| !q.value.is_finite() || q.value <= 0.0)
        {
            return Err(CatalogError::InvalidQuote {
                symbol: bad.symbol.clone(),
                value: bad.value,
            });
        }
        Ok(Self::loaded(quotes))
    }

    fn loaded(quotes: Vec<IndexQuote>) -> Self {
        Self {
            quotes,
            loaded_at: Local::now(),
        }
    }

    /// S&P 500, NASDAQ Composite and Dow Jones Industrial Average.
    pub fn default_us() -> Self {
        Self::loaded(vec![
            IndexQuote::new(
                "S&P 500",
                "SPX",
                4847.69,
                23.45,
                0.49,
                "Standard & Poor's 500",
            ),
            IndexQuote::new(
                "NASDAQ",
                "IXIC",
                15234.78,
                -67.23,
                -0.44,
                "NASDAQ Composite Index",
            ),
            IndexQuote::new(
                "Dow Jones",
                "DJI",
                38789.12,
                145.67,
                0.38,
                "Dow Jones Industrial Average",
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.quotes.iter().map(|q| q.symbol.as_str()).collect()
    }
}

impl Default for IndexCatalog {
    fn default() -> Self {
        Self::default_us()
    }
}

impl QuoteSource for IndexCatalog {
    fn quote(&self, symbol: &str) -> Option<IndexQuote> {
        self.quotes.iter().find(|q| q.symbol == symbol).cloned()
    }

    fn all(&self) -> Vec<IndexQuote> {
        self.quotes.clone()
    }

    fn last_updated(&self) -> Option<DateTime<Local>> {
        Some(self.loaded_at)
    }
}
