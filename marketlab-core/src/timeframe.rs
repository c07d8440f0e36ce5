//! Chart timeframes and their sampling configuration.
//!
//! A [`Timeframe`] names a historical window (`1D` … `10Y`). Each one maps to a
//! fixed [`TimeframeConfig`] (window length, number of candidate points, stride
//! between them), a starting band for the fabricated opening value, and a
//! label format for the chart axis.

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SeriesError;

/// Named historical window.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Timeframe {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "10Y")]
    TenYears,
}

/// Distance between two consecutive candidate points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Hours(i64),
    Days(i64),
}

impl Step {
    pub fn duration(self) -> Duration {
        match self {
            Step::Hours(h) => Duration::hours(h),
            Step::Days(d) => Duration::days(d),
        }
    }
}

/// Window length and sampling for one timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeframeConfig {
    pub total_days: i64,
    pub point_count: usize,
    pub step: Step,
}

/// Range the fabricated starting value is drawn from, as a multiple of the
/// current value: `low + U[0,1) * width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartBand {
    pub low: f64,
    pub width: f64,
}

impl StartBand {
    pub fn high(&self) -> f64 {
        self.low + self.width
    }
}

/// Every `MONTHLY_LABEL_STRIDE`th day carries a label on the 1Y axis.
pub const MONTHLY_LABEL_STRIDE: usize = 30;

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::OneDay,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::OneYear,
        Timeframe::FiveYears,
        Timeframe::TenYears,
    ];

    /// Lenient lookup: unknown tags fall back to `1Y`.
    pub fn resolve(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    pub fn tag(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1D",
            Timeframe::OneMonth => "1M",
            Timeframe::ThreeMonths => "3M",
            Timeframe::OneYear => "1Y",
            Timeframe::FiveYears => "5Y",
            Timeframe::TenYears => "10Y",
        }
    }

    pub fn config(self) -> TimeframeConfig {
        match self {
            Timeframe::OneDay => TimeframeConfig {
                total_days: 1,
                point_count: 24,
                step: Step::Hours(1),
            },
            Timeframe::OneMonth => TimeframeConfig {
                total_days: 30,
                point_count: 30,
                step: Step::Days(1),
            },
            Timeframe::ThreeMonths => TimeframeConfig {
                total_days: 90,
                point_count: 90,
                step: Step::Days(1),
            },
            Timeframe::OneYear => TimeframeConfig {
                total_days: 365,
                point_count: 365,
                step: Step::Days(1),
            },
            // Weekly candidates
            Timeframe::FiveYears => TimeframeConfig {
                total_days: 1825,
                point_count: 260,
                step: Step::Days(1825 / 260),
            },
            // Bi-weekly candidates
            Timeframe::TenYears => TimeframeConfig {
                total_days: 3650,
                point_count: 260,
                step: Step::Days(3650 / 260),
            },
        }
    }

    pub fn start_band(self) -> StartBand {
        match self {
            Timeframe::OneDay => StartBand { low: 0.98, width: 0.04 },
            Timeframe::OneMonth | Timeframe::ThreeMonths => StartBand { low: 0.85, width: 0.30 },
            Timeframe::OneYear => StartBand { low: 0.70, width: 0.60 },
            Timeframe::FiveYears | Timeframe::TenYears => StartBand { low: 0.30, width: 0.40 },
        }
    }

    /// Whether candidate dates falling on Saturday/Sunday are treated as
    /// closed trading days.
    pub fn skips_weekends(self) -> bool {
        self != Timeframe::OneDay
    }

    /// Stepped timeframes move weekend candidates to the next Monday instead
    /// of dropping them; with a 7 or 14 day stride every candidate shares one
    /// weekday.
    pub fn rolls_weekends_forward(self) -> bool {
        matches!(self, Timeframe::FiveYears | Timeframe::TenYears)
    }

    /// Timestamp of candidate `index` for a window that starts at `start`.
    pub fn point_time(self, start: NaiveDateTime, index: usize) -> NaiveDateTime {
        let step = self.config().step.duration();
        start + step * index as i32
    }

    /// Axis label for candidate `index` at `at`. Empty when the label is
    /// suppressed to keep the axis readable.
    pub fn label(self, index: usize, at: NaiveDateTime) -> String {
        match self {
            Timeframe::OneDay => at.format("%H:%M").to_string(),
            Timeframe::OneMonth | Timeframe::ThreeMonths => at.format("%m/%d").to_string(),
            Timeframe::OneYear => {
                if index % MONTHLY_LABEL_STRIDE == 0 {
                    at.format("%b %Y").to_string()
                } else {
                    String::new()
                }
            }
            Timeframe::FiveYears | Timeframe::TenYears => at.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Timeframe {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.tag() == s)
            .ok_or_else(|| SeriesError::UnknownTimeframe(s.to_string()))
    }
}

pub fn is_weekend(at: NaiveDateTime) -> bool {
    matches!(at.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Move a weekend timestamp forward to the following Monday, same time of day.
pub fn roll_to_monday(at: NaiveDateTime) -> NaiveDateTime {
    match at.weekday() {
        Weekday::Sat => at + Duration::days(2),
        Weekday::Sun => at + Duration::days(1),
        _ => at,
    }
}
