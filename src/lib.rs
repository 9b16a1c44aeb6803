//! `Skycast` - current conditions and a short forecast for any city
//!
//! This library resolves a city name or device position to a place, fetches
//! weather from a configurable provider, condenses the forecast to one entry
//! per day and formats it for display in Celsius or Fahrenheit.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod icons;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod render;
pub mod screen;
pub mod sensor;
pub mod units;
pub mod weather;

// Re-export core types for public API
pub use aggregator::{MAX_FORECAST_DAYS, aggregate_daily};
pub use config::{ProviderKind, SkycastConfig};
pub use error::{ErrorKind, Notice, SkycastError};
pub use icons::{Icon, WeatherCode, map_weather_code_to_icon, weather_code_to_description};
pub use location_resolver::{LocationParser, LocationResolver};
pub use models::{
    CurrentConditions, ForecastDay, ForecastPoint, LocationQuery, ResolvedPlace, WeatherReport,
};
pub use screen::{ScreenState, WeatherScreen};
pub use sensor::{ConfiguredSensor, LocationSensor, PermissionStatus};
pub use units::{DisplayUnit, convert_temp};
pub use weather::{WeatherProvider, build_provider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;
