//! TOML configuration: master seed, volatility overrides, index catalog.
//!
//! Every section is optional. An empty file yields the built-in volatility
//! table, the default US index catalog and unseeded generation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::catalog::{IndexCatalog, IndexQuote};
use crate::error::ConfigError;
use crate::rng::SeedHierarchy;
use crate::series::SeriesGenerator;
use crate::timeframe::Timeframe;
use crate::volatility::VolatilityTable;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolatilityConfig {
    /// Replaces the default used for unknown symbols.
    #[serde(default)]
    pub default: Option<f64>,

    /// `timeframe tag -> symbol -> volatility`, merged over the built-in table.
    #[serde(default)]
    pub overrides: BTreeMap<String, BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub volatility: VolatilityConfig,

    /// Replaces the default catalog when non-empty.
    #[serde(default)]
    pub indices: Vec<IndexQuote>,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // Surfaces bad quotes, bad tags and out-of-range values at load time.
        self.catalog()?;
        self.volatility_table()?;
        Ok(())
    }

    /// Built-in table with this config's overrides applied.
    pub fn volatility_table(&self) -> Result<VolatilityTable, ConfigError> {
        let mut table = VolatilityTable::builtin();
        if let Some(default) = self.volatility.default {
            table.set_default(default)?;
        }
        for (tag, symbols) in &self.volatility.overrides {
            let timeframe: Timeframe = tag
                .parse()
                .map_err(|_| ConfigError::UnknownTimeframe(tag.clone()))?;
            for (symbol, value) in symbols {
                table.set(timeframe, symbol, *value)?;
            }
        }
        Ok(table)
    }

    pub fn generator(&self) -> Result<SeriesGenerator, ConfigError> {
        Ok(SeriesGenerator::new(self.volatility_table()?))
    }

    pub fn catalog(&self) -> Result<IndexCatalog, ConfigError> {
        if self.indices.is_empty() {
            Ok(IndexCatalog::default_us())
        } else {
            Ok(IndexCatalog::new(self.indices.clone())?)
        }
    }

    pub fn seeds(&self) -> Option<SeedHierarchy> {
        self.seed.map(SeedHierarchy::new)
    }
}
