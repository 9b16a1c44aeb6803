//! Temperature unit handling
//!
//! Stored temperatures are always degrees Celsius; conversion happens only
//! when a value is formatted for display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature unit used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    /// The other unit
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    /// Unit suffix including the degree sign
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for DisplayUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(Self::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(Self::Fahrenheit),
            other => Err(format!("unknown unit '{other}', expected celsius or fahrenheit")),
        }
    }
}

/// Convert a Celsius value into `unit`.
///
/// Celsius passes through untouched; Fahrenheit is rounded to a whole degree.
#[must_use]
pub fn convert_temp(celsius: f64, unit: DisplayUnit) -> f64 {
    match unit {
        DisplayUnit::Celsius => celsius,
        DisplayUnit::Fahrenheit => (celsius * 1.8 + 32.0).round(),
    }
}

/// Whole-degree display value
#[must_use]
pub fn display_degrees(celsius: f64, unit: DisplayUnit) -> i64 {
    // `as` saturates; forecasts never come near the limits
    convert_temp(celsius, unit).round() as i64
}

/// Format a temperature with its unit, e.g. `21°C`
#[must_use]
pub fn format_temp(celsius: f64, unit: DisplayUnit) -> String {
    format!("{}{}", display_degrees(celsius, unit), unit.symbol())
}

/// Format a temperature with a bare degree sign, e.g. `21°`
#[must_use]
pub fn format_degrees(celsius: f64, unit: DisplayUnit) -> String {
    format!("{}°", display_degrees(celsius, unit))
}

/// Convert m/s into km/h
#[must_use]
pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * 3.6
}
