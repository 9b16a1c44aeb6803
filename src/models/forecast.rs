//! Forecast points, per-day entries and the raw fetch bundle

use super::{CurrentConditions, ResolvedPlace};
use crate::icons::{Icon, WeatherCode};
use crate::units::{DisplayUnit, format_degrees};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single forecast sample as delivered by a provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPoint {
    /// Timestamp in the source's own timezone
    pub time: NaiveDateTime,
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Minimum temperature in Celsius
    pub temp_min: f64,
    /// Provider weather code
    pub code: WeatherCode,
}

/// One day of the condensed forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Minimum temperature in Celsius
    pub temp_min: f64,
    pub code: WeatherCode,
}

impl ForecastDay {
    #[must_use]
    pub fn icon(&self) -> Icon {
        self.code.icon()
    }

    /// Short weekday label, e.g. "Mon"
    #[must_use]
    pub fn day_name(&self) -> String {
        self.date.format("%a").to_string()
    }

    /// High / low, e.g. `31° / 24°`
    #[must_use]
    pub fn format_range(&self, unit: DisplayUnit) -> String {
        format!(
            "{} / {}",
            format_degrees(self.temp_max, unit),
            format_degrees(self.temp_min, unit)
        )
    }
}

impl From<&ForecastPoint> for ForecastDay {
    fn from(point: &ForecastPoint) -> Self {
        Self {
            date: point.time.date(),
            temp_max: point.temp_max,
            temp_min: point.temp_min,
            code: point.code,
        }
    }
}

/// Everything one fetch returns, before aggregation
#[derive(Debug, Clone)]
pub struct WeatherReport {
    /// Place the data belongs to, as named by the provider
    pub place: ResolvedPlace,
    pub current: CurrentConditions,
    /// Raw forecast samples, any resolution
    pub points: Vec<ForecastPoint>,
    /// Current date in the source's timezone
    pub today: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_from_point() {
        let time = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let point = ForecastPoint {
            time,
            temp_max: 31.2,
            temp_min: 24.4,
            code: WeatherCode::Wmo(63),
        };

        let day = ForecastDay::from(&point);
        assert_eq!(day.date, time.date());
        assert_eq!(day.day_name(), "Mon");
        assert_eq!(day.format_range(DisplayUnit::Celsius), "31° / 24°");
        assert_eq!(day.format_range(DisplayUnit::Fahrenheit), "88° / 76°");
        assert_eq!(day.icon().description, "Moderate rain");
    }
}
