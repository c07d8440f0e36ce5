//! Synthetic historical series generator.
//!
//! Fabricates a plausible-looking price history that ends near a known
//! current value:
//! - a starting value is drawn from a timeframe-dependent band around the
//!   current value
//! - each step adds a linear drift toward the current value plus a uniform
//!   perturbation scaled by the symbol's volatility
//! - values are floored at 10% of the current value
//!
//! The output is for chart mockups only. It has no statistical meaning.

use chrono::{Duration, Local, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SeriesError;
use crate::rng::SeedHierarchy;
use crate::timeframe::{is_weekend, roll_to_monday, Timeframe};
use crate::volatility::VolatilityTable;

/// Fraction of the current value below which the series never falls.
pub const FLOOR_FRACTION: f64 = 0.1;

/// One emitted chart point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
    /// Calendar position of the point.
    pub at: NaiveDateTime,
}

/// Wire form of a series: two parallel arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// A generated series, oldest point first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first_value(&self) -> Option<f64> {
        self.points.first().map(|p| p.value)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// Lowest and highest value, `None` for an empty series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.points.iter().map(|p| p.value);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    pub fn into_chart_data(self) -> ChartData {
        let (labels, values) = self.points.into_iter().map(|p| (p.label, p.value)).unzip();
        ChartData { labels, values }
    }
}

/// Validated generator input.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRequest {
    current_value: f64,
    symbol: String,
    timeframe: Timeframe,
}

impl SeriesRequest {
    /// Rejects a non-finite or non-positive current value.
    pub fn new(
        current_value: f64,
        symbol: impl Into<String>,
        timeframe: Timeframe,
    ) -> Result<Self, SeriesError> {
        if !current_value.is_finite() || current_value <= 0.0 {
            return Err(SeriesError::InvalidCurrentValue {
                value: current_value,
            });
        }
        Ok(Self {
            current_value,
            symbol: symbol.into(),
            timeframe,
        })
    }

    /// Same as [`SeriesRequest::new`] with an unparsed tag; unknown tags
    /// resolve to `1Y`.
    pub fn from_tag(
        current_value: f64,
        symbol: impl Into<String>,
        tag: &str,
    ) -> Result<Self, SeriesError> {
        Self::new(current_value, symbol, Timeframe::resolve(tag))
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Lowest value the series may take, rounded up to the next cent.
    pub fn floor(&self) -> f64 {
        let floor = self.current_value * FLOOR_FRACTION;
        let cents = floor * 100.0;
        if cents.is_finite() {
            cents.ceil() / 100.0
        } else {
            floor
        }
    }
}

/// Values too large to scale by 100 have no cent precision left and pass
/// through unchanged.
fn round_cents(value: f64) -> f64 {
    let cents = value * 100.0;
    if cents.is_finite() {
        cents.round() / 100.0
    } else {
        value
    }
}

/// Stateless generator over a volatility table.
#[derive(Debug, Clone, Default)]
pub struct SeriesGenerator {
    volatility: VolatilityTable,
}

impl SeriesGenerator {
    pub fn new(volatility: VolatilityTable) -> Self {
        Self { volatility }
    }

    pub fn volatility(&self) -> &VolatilityTable {
        &self.volatility
    }

    /// Generate a series ending now, using the thread-local RNG.
    pub fn generate(&self, request: &SeriesRequest) -> Series {
        let end = Local::now().naive_local();
        self.generate_with(request, end, &mut rand::thread_rng())
    }

    /// Generate a reproducible series from a seed hierarchy.
    pub fn generate_seeded(
        &self,
        request: &SeriesRequest,
        seeds: &SeedHierarchy,
        iteration: u64,
        end: NaiveDateTime,
    ) -> Series {
        let mut rng = seeds.rng_for(request.symbol(), request.timeframe(), iteration);
        self.generate_with(request, end, &mut rng)
    }

    /// Generate a series whose window closes at `end`, drawing from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        request: &SeriesRequest,
        end: NaiveDateTime,
        rng: &mut R,
    ) -> Series {
        let timeframe = request.timeframe();
        let config = timeframe.config();
        let current = request.current_value();
        let floor = request.floor();

        let start = end - Duration::days(config.total_days);
        let band = timeframe.start_band();
        let mut value = (current * (band.low + rng.gen::<f64>() * band.width)).min(f64::MAX);
        let trend = (current - value) / config.point_count as f64;
        let volatility = self.volatility.lookup(timeframe, request.symbol());

        let mut points = Vec::with_capacity(config.point_count);
        for index in 0..config.point_count {
            let mut at = timeframe.point_time(start, index);
            if timeframe.skips_weekends() && is_weekend(at) {
                if !timeframe.rolls_weekends_forward() {
                    continue;
                }
                at = roll_to_monday(at);
            }

            // Suppressed labels still move the walk.
            let label = timeframe.label(index, at);
            let delta = trend + (rng.gen::<f64>() - 0.5) * value * volatility;
            value = (value + delta).clamp(floor, f64::MAX);

            if !label.is_empty() {
                points.push(SeriesPoint {
                    label,
                    value: round_cents(value),
                    at,
                });
            }
        }

        debug!(
            symbol = request.symbol(),
            timeframe = %timeframe,
            volatility,
            points = points.len(),
            "generated synthetic series"
        );

        Series {
            symbol: request.symbol().to_string(),
            timeframe,
            points,
        }
    }
}

/// Generate a series with the built-in volatility table, ending now.
pub fn generate(
    current_value: f64,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<Vec<SeriesPoint>, SeriesError> {
    let request = SeriesRequest::new(current_value, symbol, timeframe)?;
    Ok(SeriesGenerator::default().generate(&request).points)
}
