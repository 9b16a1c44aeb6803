//! Weather code to display glyph mapping

use serde::{Deserialize, Serialize};

/// A provider weather code, tagged with the scheme it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", content = "code", rename_all = "snake_case")]
pub enum WeatherCode {
    /// WMO interpretation code (Open-Meteo)
    /// See: https://open-meteo.com/en/docs#weathervariables
    Wmo(i32),
    /// OpenWeatherMap condition id
    /// See: https://openweathermap.org/weather-conditions
    OpenWeatherMap(i32),
}

/// Glyph and short description for a weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub glyph: &'static str,
    pub description: &'static str,
}

impl Icon {
    const fn new(glyph: &'static str, description: &'static str) -> Self {
        Self { glyph, description }
    }
}

/// Shown for any code outside the lookup tables
pub const DEFAULT_ICON: Icon = Icon::new("🌡", "Other");

const CLEAR: Icon = Icon::new("☀", "Clear sky");
const MAINLY_CLEAR: Icon = Icon::new("🌤", "Mainly clear");
const PARTLY_CLOUDY: Icon = Icon::new("⛅", "Partly cloudy");
const OVERCAST: Icon = Icon::new("☁", "Overcast");
const LIGHT_RAIN: Icon = Icon::new("🌦", "Slight rain");
const RAIN: Icon = Icon::new("🌧", "Moderate rain");
const HEAVY_RAIN: Icon = Icon::new("🌧", "Heavy rain");
const LIGHT_SNOW: Icon = Icon::new("🌨", "Slight snow");
const SNOW: Icon = Icon::new("🌨", "Moderate snow");
const HEAVY_SNOW: Icon = Icon::new("❄", "Heavy snow");

/// Map a weather code to its display icon; unknown codes get [`DEFAULT_ICON`]
#[must_use]
pub fn map_weather_code_to_icon(code: WeatherCode) -> Icon {
    match code {
        WeatherCode::Wmo(code) => match code {
            0 => CLEAR,
            1 => MAINLY_CLEAR,
            2 => PARTLY_CLOUDY,
            3 => OVERCAST,
            61 => LIGHT_RAIN,
            63 => RAIN,
            65 => HEAVY_RAIN,
            71 => LIGHT_SNOW,
            73 => SNOW,
            75 => HEAVY_SNOW,
            _ => DEFAULT_ICON,
        },
        WeatherCode::OpenWeatherMap(code) => match code {
            800 => CLEAR,
            801 => MAINLY_CLEAR,
            802 => PARTLY_CLOUDY,
            803 | 804 => OVERCAST,
            500 => LIGHT_RAIN,
            501 => RAIN,
            502 => HEAVY_RAIN,
            600 => LIGHT_SNOW,
            601 => SNOW,
            602 => HEAVY_SNOW,
            _ => DEFAULT_ICON,
        },
    }
}

/// Human-readable condition for a code.
///
/// WMO codes use the full table; the glyph table only covers a subset.
/// OpenWeatherMap sends its own description, so its codes fall back to the
/// icon's.
#[must_use]
pub fn weather_code_to_description(code: WeatherCode) -> &'static str {
    match code {
        WeatherCode::Wmo(code) => match code {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Moderate drizzle",
            55 => "Dense drizzle",
            56 => "Light freezing drizzle",
            57 => "Dense freezing drizzle",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            66 => "Light freezing rain",
            67 => "Heavy freezing rain",
            71 => "Slight snow",
            73 => "Moderate snow",
            75 => "Heavy snow",
            77 => "Snow grains",
            80 => "Slight rain showers",
            81 => "Moderate rain showers",
            82 => "Violent rain showers",
            85 => "Slight snow showers",
            86 => "Heavy snow showers",
            95 => "Thunderstorm",
            96 => "Thunderstorm with slight hail",
            99 => "Thunderstorm with heavy hail",
            _ => "Unknown",
        },
        WeatherCode::OpenWeatherMap(_) => map_weather_code_to_icon(code).description,
    }
}

impl WeatherCode {
    #[must_use]
    pub fn icon(self) -> Icon {
        map_weather_code_to_icon(self)
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        weather_code_to_description(self)
    }
}
