//! Forecast aggregation
//!
//! Collapses a provider's forecast samples into at most [`MAX_FORECAST_DAYS`]
//! per-day entries. Each calendar date is represented by the sample closest to
//! midday; daily-resolution sources have one sample per date, so that sample
//! is used as-is.

use crate::models::{ForecastDay, ForecastPoint};
use chrono::{NaiveDate, Timelike};
use std::collections::BTreeMap;
use tracing::debug;

/// Length of the condensed forecast
pub const MAX_FORECAST_DAYS: usize = 5;

const NOON_SECONDS: u32 = 12 * 60 * 60;

fn distance_from_noon(point: &ForecastPoint) -> u32 {
    point.time.num_seconds_from_midnight().abs_diff(NOON_SECONDS)
}

/// Group `points` by date and pick one representative per date.
///
/// Dates come back ascending. On a tie the earlier sample wins.
#[must_use]
pub fn bucket_by_day(points: &[ForecastPoint]) -> BTreeMap<NaiveDate, &ForecastPoint> {
    let mut buckets: BTreeMap<NaiveDate, &ForecastPoint> = BTreeMap::new();

    for point in points {
        buckets
            .entry(point.time.date())
            .and_modify(|current| {
                let closer = distance_from_noon(point) < distance_from_noon(current);
                let tie_but_earlier = distance_from_noon(point) == distance_from_noon(current)
                    && point.time < current.time;
                if closer || tie_but_earlier {
                    *current = point;
                }
            })
            .or_insert(point);
    }

    buckets
}

/// Build the condensed forecast shown to the user.
///
/// `today` is the current date in the source's timezone. The bucket for today
/// (and anything older) is dropped, then the rest is truncated to
/// [`MAX_FORECAST_DAYS`]. Short forecasts are returned short.
#[must_use]
pub fn aggregate_daily(points: &[ForecastPoint], today: NaiveDate) -> Vec<ForecastDay> {
    let buckets = bucket_by_day(points);
    let days: Vec<ForecastDay> = buckets
        .into_iter()
        .skip_while(|(date, _)| *date <= today)
        .take(MAX_FORECAST_DAYS)
        .map(|(_, point)| ForecastDay::from(point))
        .collect();

    debug!(
        "Aggregated {} forecast points into {} days after {}",
        points.len(),
        days.len(),
        today
    );

    days
}
