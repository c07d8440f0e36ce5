//! Property tests for the synthetic series generator.
//!
//! Uses proptest to verify, across random seeds, window end dates and
//! current values:
//! 1. Floor: no value falls below 10% of the current value
//! 2. Convergence: the last value ends within a bound set by the start band,
//!    the trend steps taken and the symbol's volatility
//! 3. 1D sampling: 24 hourly points, no weekend skipping
//! 4. 1Y labeling: roughly one label per 30 days
//! 5. Weekends: never emitted outside 1D
//! 6. Fallback: an unknown tag behaves exactly like 1Y

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use marketlab_core::timeframe::is_weekend;
use marketlab_core::{
    generate, SeedHierarchy, Series, SeriesGenerator, SeriesRequest, Timeframe, VolatilityTable,
};
use proptest::prelude::*;
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ──────────────────────────────────────────────────────────

fn run(current: f64, symbol: &str, timeframe: Timeframe, end: NaiveDateTime, seed: u64) -> Series {
    let request = SeriesRequest::new(current, symbol, timeframe).unwrap();
    SeriesGenerator::default().generate_with(&request, end, &mut StdRng::seed_from_u64(seed))
}

/// Walk steps taken up to and including the last emitted point. Skipped
/// weekend candidates take no step, so the trend only closes this share of
/// the gap between the start and the current value.
fn steps_to_last_point(timeframe: Timeframe, end: NaiveDateTime) -> usize {
    let config = timeframe.config();
    let start = end - Duration::days(config.total_days);
    let mut steps = 0;
    let mut through_last = 0;
    for index in 0..config.point_count {
        let at = timeframe.point_time(start, index);
        if timeframe.skips_weekends() && is_weekend(at) && !timeframe.rolls_weekends_forward() {
            continue;
        }
        steps += 1;
        if !timeframe.label(index, at).is_empty() {
            through_last = steps;
        }
    }
    through_last
}

/// Largest relative distance between the last value and the current value:
/// the untaken share of the worst start offset, plus six standard deviations
/// of the summed uniform perturbations.
fn convergence_bound(timeframe: Timeframe, symbol: &str, end: NaiveDateTime) -> f64 {
    let band = timeframe.start_band();
    let steps = steps_to_last_point(timeframe, end) as f64;
    let total = timeframe.config().point_count as f64;
    let volatility = VolatilityTable::builtin().lookup(timeframe, symbol);

    let start_offset = (1.0 - band.low).max(band.high() - 1.0);
    let untaken = start_offset * (1.0 - steps / total);
    let noise = 6.0 * volatility * band.high().max(1.0) * (steps / 12.0).sqrt();
    untaken + noise
}

/// Every draw is exactly 0.5: the start sits mid-band and perturbations vanish.
fn midpoint_draws() -> StepRng {
    StepRng::new(1 << 63, 0)
}

fn is_hh_mm(label: &str) -> bool {
    let bytes = label.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit())
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_timeframe() -> impl Strategy<Value = Timeframe> {
    prop::sample::select(Timeframe::ALL.to_vec())
}

fn arb_current() -> impl Strategy<Value = f64> {
    (0.5..100_000.0_f64).prop_map(|v| (v * 100.0).round() / 100.0)
}

fn arb_symbol() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["AAPL", "SPX", "IXIC", "DJI"])
}

fn arb_end() -> impl Strategy<Value = NaiveDateTime> {
    (0..3650_i64, 0..24_u32).prop_map(|(days, hour)| {
        let date = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + Duration::days(days);
        date.and_hms_opt(hour, 30, 0).unwrap()
    })
}

// ── 1–2. Floor and convergence ───────────────────────────────────────

proptest! {
    #[test]
    fn values_never_fall_below_floor(
        current in arb_current(),
        symbol in arb_symbol(),
        timeframe in arb_timeframe(),
        end in arb_end(),
        seed in any::<u64>(),
    ) {
        let series = run(current, symbol, timeframe, end, seed);
        let floor = current * 0.1;
        for value in series.values() {
            prop_assert!(value >= floor - 1e-9, "{value} below floor {floor}");
        }
    }

    #[test]
    fn series_is_non_empty_and_converges(
        current in arb_current(),
        symbol in arb_symbol(),
        timeframe in arb_timeframe(),
        end in arb_end(),
        seed in any::<u64>(),
    ) {
        let series = run(current, symbol, timeframe, end, seed);
        prop_assert!(!series.is_empty());

        let last = series.last_value().unwrap();
        let distance = (last - current).abs() / current;
        let bound = convergence_bound(timeframe, symbol, end);
        prop_assert!(
            distance < bound,
            "{timeframe}/{symbol}: last {last} vs current {current}, bound {bound}"
        );
    }

    #[test]
    fn trend_closes_the_gap_it_walks(
        symbol in arb_symbol(),
        timeframe in arb_timeframe(),
        end in arb_end(),
    ) {
        let current = 1000.0;
        let request = SeriesRequest::new(current, symbol, timeframe).unwrap();
        let series = SeriesGenerator::default().generate_with(&request, end, &mut midpoint_draws());

        let band = timeframe.start_band();
        let start = current * (band.low + 0.5 * band.width);
        let share = steps_to_last_point(timeframe, end) as f64
            / timeframe.config().point_count as f64;
        let expected = start + (current - start) * share;

        let last = series.last_value().unwrap();
        prop_assert!(
            (last - expected).abs() <= 0.01,
            "{timeframe}: last {last}, expected {expected}"
        );
    }
}

// ── 3–5. Sampling and labels ─────────────────────────────────────────

proptest! {
    #[test]
    fn one_day_has_every_hour(end in arb_end(), seed in any::<u64>()) {
        let series = run(4847.69, "SPX", Timeframe::OneDay, end, seed);
        prop_assert_eq!(series.len(), 24);
        for point in &series.points {
            prop_assert!(is_hh_mm(&point.label), "bad label {:?}", point.label);
        }
    }

    #[test]
    fn one_year_labels_are_monthly(end in arb_end(), seed in any::<u64>()) {
        let series = run(100.0, "AAPL", Timeframe::OneYear, end, seed);
        // 13 candidates (days 0, 30, ..., 360); weekends drop a few
        prop_assert!((9..=13).contains(&series.len()), "got {}", series.len());
        for pair in series.points.windows(2) {
            prop_assert!(pair[1].at - pair[0].at >= Duration::days(30));
        }
    }

    #[test]
    fn weekends_never_appear_outside_one_day(
        timeframe in arb_timeframe(),
        end in arb_end(),
        seed in any::<u64>(),
    ) {
        prop_assume!(timeframe != Timeframe::OneDay);
        let series = run(100.0, "AAPL", timeframe, end, seed);
        for point in &series.points {
            prop_assert!(
                !matches!(point.at.weekday(), Weekday::Sat | Weekday::Sun),
                "{timeframe} emitted {}", point.at
            );
        }
    }

    #[test]
    fn unknown_tag_matches_one_year(end in arb_end(), seed in any::<u64>()) {
        let generator = SeriesGenerator::default();
        let fallback = SeriesRequest::from_tag(250.0, "SPX", "7Y").unwrap();
        let one_year = SeriesRequest::from_tag(250.0, "SPX", "1Y").unwrap();

        let a = generator.generate_with(&fallback, end, &mut StdRng::seed_from_u64(seed));
        let b = generator.generate_with(&one_year, end, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a, b);
    }
}

// ── Plain tests ──────────────────────────────────────────────────────

#[test]
fn one_day_ignores_weekends() {
    // Sunday
    let end = NaiveDate::from_ymd_opt(2024, 6, 16)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let series = run(100.0, "SPX", Timeframe::OneDay, end, 1);
    assert_eq!(series.len(), 24);
    assert_eq!(series.points[0].label, "09:00");
    assert_eq!(series.points[23].label, "08:00");
}

#[test]
fn daily_timeframes_undercount_by_weekends() {
    // Window of 90 days starting Monday 2024-03-18 holds 25 weekend days.
    let end = NaiveDate::from_ymd_opt(2024, 6, 16)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let series = run(100.0, "AAPL", Timeframe::ThreeMonths, end, 3);
    assert_eq!(series.len(), 65);
}

#[test]
fn unseeded_calls_differ_but_keep_shape() {
    let a = generate(100.0, "AAPL", Timeframe::OneMonth).unwrap();
    let b = generate(100.0, "AAPL", Timeframe::OneMonth).unwrap();
    assert_eq!(a.len(), b.len());
    let values_a: Vec<f64> = a.iter().map(|p| p.value).collect();
    let values_b: Vec<f64> = b.iter().map(|p| p.value).collect();
    assert_ne!(values_a, values_b);
    for value in values_a.iter().chain(&values_b) {
        assert!(*value >= 10.0);
    }
}

#[test]
fn seed_hierarchy_reproduces_series() {
    let end = NaiveDate::from_ymd_opt(2023, 11, 2)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let generator = SeriesGenerator::default();
    let seeds = SeedHierarchy::new(2024);
    let request = SeriesRequest::new(38789.12, "DJI", Timeframe::FiveYears).unwrap();

    let first = generator.generate_seeded(&request, &seeds, 0, end);
    let again = generator.generate_seeded(&request, &seeds, 0, end);
    let next = generator.generate_seeded(&request, &seeds, 1, end);

    assert_eq!(first, again);
    assert_ne!(first.values(), next.values());
    assert_eq!(first.labels(), next.labels());
}
