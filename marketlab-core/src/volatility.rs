//! Per-(timeframe, symbol) volatility lookup.

use std::collections::BTreeMap;

use crate::error::VolatilityError;
use crate::timeframe::Timeframe;

/// Volatility used for symbols the table has no entry for.
pub const DEFAULT_VOLATILITY: f64 = 0.015;

/// Upper bound (inclusive) accepted for any entry.
pub const MAX_VOLATILITY: f64 = 0.05;

/// Fractional per-step volatility keyed by timeframe then symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityTable {
    default: f64,
    entries: BTreeMap<Timeframe, BTreeMap<String, f64>>,
}

fn in_range(value: f64) -> bool {
    value > 0.0 && value <= MAX_VOLATILITY
}

impl VolatilityTable {
    /// Table with no per-symbol entries; every lookup returns `default`.
    pub fn empty(default: f64) -> Result<Self, VolatilityError> {
        if !in_range(default) {
            return Err(VolatilityError::DefaultOutOfRange(default));
        }
        Ok(Self {
            default,
            entries: BTreeMap::new(),
        })
    }

    /// Built-in entries for the three major US indices.
    pub fn builtin() -> Self {
        let rows: [(Timeframe, [f64; 3]); 6] = [
            (Timeframe::OneDay, [0.005, 0.008, 0.004]),
            (Timeframe::OneMonth, [0.015, 0.025, 0.012]),
            (Timeframe::ThreeMonths, [0.015, 0.025, 0.012]),
            (Timeframe::OneYear, [0.015, 0.025, 0.012]),
            (Timeframe::FiveYears, [0.020, 0.030, 0.015]),
            (Timeframe::TenYears, [0.025, 0.035, 0.018]),
        ];

        let entries = rows
            .into_iter()
            .map(|(tf, [spx, ixic, dji])| {
                let symbols: BTreeMap<String, f64> = [("SPX", spx), ("IXIC", ixic), ("DJI", dji)]
                    .into_iter()
                    .map(|(s, v)| (s.to_string(), v))
                    .collect();
                (tf, symbols)
            })
            .collect();

        Self {
            default: DEFAULT_VOLATILITY,
            entries,
        }
    }

    pub fn default_volatility(&self) -> f64 {
        self.default
    }

    pub fn set_default(&mut self, value: f64) -> Result<(), VolatilityError> {
        if !in_range(value) {
            return Err(VolatilityError::DefaultOutOfRange(value));
        }
        self.default = value;
        Ok(())
    }

    /// Insert or replace the entry for `(timeframe, symbol)`.
    pub fn set(
        &mut self,
        timeframe: Timeframe,
        symbol: &str,
        value: f64,
    ) -> Result<(), VolatilityError> {
        if !in_range(value) {
            return Err(VolatilityError::OutOfRange {
                timeframe,
                symbol: symbol.to_string(),
                value,
            });
        }
        self.entries
            .entry(timeframe)
            .or_default()
            .insert(symbol.to_string(), value);
        Ok(())
    }

    /// Volatility for `symbol` on `timeframe`, or the default.
    pub fn lookup(&self, timeframe: Timeframe, symbol: &str) -> f64 {
        self.entries
            .get(&timeframe)
            .and_then(|symbols| symbols.get(symbol))
            .copied()
            .unwrap_or(self.default)
    }

    /// Number of explicit entries across all timeframes.
    pub fn len(&self) -> usize {
        self.entries.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VolatilityTable {
    fn default() -> Self {
        Self::builtin()
    }
}
