//! Request-level service: resolves a symbol to its current value and builds
//! the historical chart payload.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{IndexQuote, QuoteSource};
use crate::error::SeriesError;
use crate::rng::SeedHierarchy;
use crate::series::{ChartData, Series, SeriesGenerator, SeriesRequest};
use crate::timeframe::Timeframe;

pub const INDEX_NOT_FOUND: &str = "Index not found";

/// Payload for a historical chart request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoricalResponse {
    Found {
        success: bool,
        symbol: String,
        /// Tag as requested, even when it resolved to the `1Y` fallback.
        timeframe: String,
        historical_data: ChartData,
    },
    NotFound {
        success: bool,
        error: String,
    },
}

impl HistoricalResponse {
    pub fn found(symbol: &str, timeframe: &str, series: Series) -> Self {
        HistoricalResponse::Found {
            success: true,
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            historical_data: series.into_chart_data(),
        }
    }

    pub fn not_found() -> Self {
        HistoricalResponse::NotFound {
            success: false,
            error: INDEX_NOT_FOUND.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, HistoricalResponse::Found { .. })
    }

    pub fn chart_data(&self) -> Option<&ChartData> {
        match self {
            HistoricalResponse::Found {
                historical_data, ..
            } => Some(historical_data),
            HistoricalResponse::NotFound { .. } => None,
        }
    }
}

/// Payload listing every index quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicesResponse {
    pub success: bool,
    pub timestamp: DateTime<Local>,
    /// When the quote source last loaded its quotes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Local>>,
    pub indices: Vec<IndexQuote>,
}

/// Builds chart payloads from an injected quote source.
pub struct HistoryService<Q: QuoteSource> {
    quotes: Q,
    generator: SeriesGenerator,
    seeds: Option<SeedHierarchy>,
    fixed_end: Option<NaiveDateTime>,
}

impl<Q: QuoteSource> HistoryService<Q> {
    pub fn new(quotes: Q, generator: SeriesGenerator) -> Self {
        Self {
            quotes,
            generator,
            seeds: None,
            fixed_end: None,
        }
    }

    /// Draw from a seed hierarchy instead of the thread-local RNG.
    pub fn with_seeds(mut self, seeds: SeedHierarchy) -> Self {
        self.seeds = Some(seeds);
        self
    }

    /// Close every window at `end` instead of now.
    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.fixed_end = Some(end);
        self
    }

    pub fn quotes(&self) -> &Q {
        &self.quotes
    }

    pub fn generator(&self) -> &SeriesGenerator {
        &self.generator
    }

    fn end(&self) -> NaiveDateTime {
        self.fixed_end
            .unwrap_or_else(|| Local::now().naive_local())
    }

    /// Build a series for an explicit current value; the symbol need not be
    /// in the quote source.
    pub fn series(&self, request: &SeriesRequest) -> Series {
        let end = self.end();
        match &self.seeds {
            Some(seeds) => self.generator.generate_seeded(request, seeds, 0, end),
            None => self
                .generator
                .generate_with(request, end, &mut rand::thread_rng()),
        }
    }

    /// Historical payload for a catalog symbol. A missing tag means `1Y`.
    ///
    /// A quote whose value cannot anchor a series is reported as
    /// "Index not found". `IndexCatalog` rejects such quotes on construction,
    /// so only other quote sources can hit this.
    pub fn historical(&self, symbol: &str, timeframe: Option<&str>) -> HistoricalResponse {
        let tag = timeframe.unwrap_or(Timeframe::default().tag());

        let Some(quote) = self.quotes.quote(symbol) else {
            info!(symbol, "historical request for unknown index");
            return HistoricalResponse::not_found();
        };

        let request = match SeriesRequest::from_tag(quote.value, symbol, tag) {
            Ok(request) => request,
            Err(err) => {
                warn!(symbol, %err, "index has no usable current value");
                return HistoricalResponse::not_found();
            }
        };
        if request.timeframe().tag() != tag {
            debug!(requested = tag, resolved = %request.timeframe(), "timeframe fell back");
        }

        HistoricalResponse::found(symbol, tag, self.series(&request))
    }

    /// Historical payload for an ad-hoc value, bypassing the quote source.
    pub fn historical_for_value(
        &self,
        symbol: &str,
        current_value: f64,
        timeframe: Option<&str>,
    ) -> Result<HistoricalResponse, SeriesError> {
        let tag = timeframe.unwrap_or(Timeframe::default().tag());
        let request = SeriesRequest::from_tag(current_value, symbol, tag)?;
        Ok(HistoricalResponse::found(symbol, tag, self.series(&request)))
    }

    pub fn indices(&self) -> IndicesResponse {
        IndicesResponse {
            success: true,
            timestamp: Local::now(),
            last_updated: self.quotes.last_updated(),
            indices: self.quotes.all(),
        }
    }
}
