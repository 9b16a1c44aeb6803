//! Configuration management for `Skycast`
//!
//! Settings come from an optional TOML file layered under `SKYCAST_*`
//! environment variables, then get defaults filled in and are validated
//! before anything talks to the network.

use crate::SkycastError;
use crate::units::DisplayUnit;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `Skycast`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Display preferences
    #[serde(default)]
    pub display: DisplayConfig,
    /// Device location settings
    #[serde(default)]
    pub location: LocationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which upstream weather service to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Open-Meteo forecast + geocoding, no key required
    #[default]
    OpenMeteo,
    /// OpenWeatherMap REST API, key required
    OpenWeatherMap,
}

/// Weather provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Upstream provider
    #[serde(default)]
    pub provider: ProviderKind,
    /// API key (OpenWeatherMap only)
    pub api_key: Option<String>,
    /// Base URL for forecast requests, provider default when unset
    pub base_url: Option<String>,
    /// Base URL for forward geocoding, provider default when unset
    pub geocoding_url: Option<String>,
    /// Base URL for reverse geocoding, provider default when unset
    pub reverse_geocoding_url: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// Display preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// City shown on launch
    #[serde(default = "default_city")]
    pub default_city: String,
    /// Initial temperature unit
    #[serde(default)]
    pub units: DisplayUnit,
}

/// Stand-in for the device location sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Whether location access is granted
    #[serde(default = "default_location_allowed")]
    pub allowed: bool,
    /// Device latitude in decimal degrees
    pub latitude: Option<f64>,
    /// Device longitude in decimal degrees
    pub longitude: Option<f64>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_timeout() -> u32 {
    10
}

fn default_city() -> String {
    "Kolkata".to_string()
}

fn default_location_allowed() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            base_url: None,
            geocoding_url: None,
            reverse_geocoding_url: None,
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            units: DisplayUnit::default(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            allowed: default_location_allowed(),
            latitude: None,
            longitude: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SkycastConfig {
    /// Load configuration from `config_path`, or the default file when `None`
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SKYCAST_WEATHER__API_KEY=... overrides weather.api_key
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycast").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.display.default_city.trim().is_empty() {
            self.display.default_city = default_city();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        for url in [
            &mut self.weather.base_url,
            &mut self.weather.geocoding_url,
            &mut self.weather.reverse_geocoding_url,
        ] {
            if url.as_deref().is_some_and(|u| u.trim().is_empty()) {
                *url = None;
            }
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the API key against the selected provider
    pub fn validate_api_key(&self) -> Result<()> {
        match (&self.weather.provider, &self.weather.api_key) {
            (ProviderKind::OpenWeatherMap, None) => Err(SkycastError::config(
                "OpenWeatherMap requires weather.api_key (or SKYCAST_WEATHER__API_KEY)",
            )
            .into()),
            (_, Some(key)) if key.trim().is_empty() => Err(SkycastError::config(
                "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
            )
            .into()),
            (_, Some(key)) if key.len() > 100 => Err(SkycastError::config(
                "Weather API key appears to be invalid (too long). Please check your API key.",
            )
            .into()),
            _ => Ok(()),
        }
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 120 {
            return Err(SkycastError::config("Weather API timeout cannot exceed 120 seconds").into());
        }

        if let Some(lat) = self.location.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(SkycastError::config(format!(
                    "location.latitude must be between -90 and 90, got: {lat}"
                ))
                .into());
            }
        }

        if let Some(lon) = self.location.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(SkycastError::config(format!(
                    "location.longitude must be between -180 and 180, got: {lon}"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("weather.base_url", &self.weather.base_url),
            ("weather.geocoding_url", &self.weather.geocoding_url),
            ("weather.reverse_geocoding_url", &self.weather.reverse_geocoding_url),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(SkycastError::config(format!(
                        "{name} must be a valid HTTP or HTTPS URL"
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }
}
