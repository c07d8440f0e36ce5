//! Structured error types for the request boundary and configuration.
//!
//! The generator itself never fails; these cover inputs rejected before a
//! series is built and configuration that cannot be loaded.

use thiserror::Error;

use crate::timeframe::Timeframe;

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("current value must be finite and positive, got {value}")]
    InvalidCurrentValue { value: f64 },

    #[error("unknown timeframe '{0}' (expected one of 1D, 1M, 3M, 1Y, 5Y, 10Y)")]
    UnknownTimeframe(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum VolatilityError {
    #[error("volatility {value} for {symbol} on {timeframe} is outside (0, 0.05]")]
    OutOfRange {
        timeframe: Timeframe,
        symbol: String,
        value: f64,
    },

    #[error("default volatility {0} is outside (0, 0.05]")]
    DefaultOutOfRange(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("index '{symbol}' has invalid value {value}")]
    InvalidQuote { symbol: String, value: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Volatility(#[from] VolatilityError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("unknown timeframe '{0}' in volatility overrides")]
    UnknownTimeframe(String),
}
