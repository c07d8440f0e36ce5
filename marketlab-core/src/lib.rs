//! MarketLab Core: synthetic historical series for index charts.
//!
//! This crate contains:
//! - Timeframe tags (`1D` … `10Y`) and their sampling configuration
//! - Per-(timeframe, symbol) volatility table
//! - The synthetic series generator (trend + bounded random walk)
//! - A BLAKE3 seed hierarchy for reproducible series
//! - Index catalog behind the `QuoteSource` trait
//! - History service producing the chart and index JSON payloads
//! - TOML configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod history;
pub mod rng;
pub mod series;
pub mod timeframe;
pub mod volatility;

pub use catalog::{IndexCatalog, IndexQuote, QuoteSource};
pub use config::AppConfig;
pub use error::{CatalogError, ConfigError, SeriesError, VolatilityError};
pub use history::{HistoricalResponse, HistoryService, IndicesResponse};
pub use rng::SeedHierarchy;
pub use series::{generate, ChartData, Series, SeriesGenerator, SeriesPoint, SeriesRequest};
pub use timeframe::Timeframe;
pub use volatility::VolatilityTable;
