//! Current conditions model and display methods

use crate::icons::{Icon, WeatherCode};
use crate::units::{DisplayUnit, format_temp};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current weather at a place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Apparent temperature in Celsius
    pub feels_like: Option<f64>,
    /// Wind speed in km/h
    pub wind_speed_kmh: f64,
    /// Provider weather code
    pub code: WeatherCode,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Relative humidity (0-100)
    pub humidity: Option<u8>,
    /// Sunrise, in the place's local time
    pub sunrise: Option<NaiveDateTime>,
    /// Sunset, in the place's local time
    pub sunset: Option<NaiveDateTime>,
    /// When this reading was fetched
    pub observed_at: DateTime<Utc>,
}

impl CurrentConditions {
    /// Display icon for the current weather code
    #[must_use]
    pub fn icon(&self) -> Icon {
        self.code.icon()
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self, unit: DisplayUnit) -> String {
        format_temp(self.temperature, unit)
    }

    /// Format feels-like temperature, if known
    #[must_use]
    pub fn format_feels_like(&self, unit: DisplayUnit) -> Option<String> {
        self.feels_like.map(|t| format_temp(t, unit))
    }

    /// Format wind speed, e.g. `14 km/h`
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} km/h", self.wind_speed_kmh.round() as i64)
    }

    /// Format humidity, e.g. `78%`
    #[must_use]
    pub fn format_humidity(&self) -> Option<String> {
        self.humidity.map(|h| format!("{h}%"))
    }

    /// Format sunrise as `HH:MM`
    #[must_use]
    pub fn format_sunrise(&self) -> Option<String> {
        self.sunrise.map(|t| t.format("%H:%M").to_string())
    }

    /// Format sunset as `HH:MM`
    #[must_use]
    pub fn format_sunset(&self) -> Option<String> {
        self.sunset.map(|t| t.format("%H:%M").to_string())
    }
}
