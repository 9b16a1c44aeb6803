//! OpenWeatherMap REST integration (API key required)
//!
//! Current conditions come from `/weather`, the forecast from the 3-hourly
//! `/forecast` endpoint. Requests always use metric units; conversion to
//! Fahrenheit is a display concern.

use super::{HttpClient, WeatherProvider, endpoint};
use crate::config::WeatherConfig;
use crate::icons::WeatherCode;
use crate::models::{CurrentConditions, ForecastPoint, ResolvedPlace, WeatherReport};
use crate::units::ms_to_kmh;
use crate::{Result, SkycastError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

const DEFAULT_DATA_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Base URLs for data and geocoding
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub data: String,
    pub geocoding: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            data: DEFAULT_DATA_URL.to_string(),
            geocoding: DEFAULT_GEO_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn from_config(config: &WeatherConfig) -> Self {
        let defaults = Self::default();
        // One geocoding service covers both directions here
        let geocoding = config
            .geocoding_url
            .clone()
            .or_else(|| config.reverse_geocoding_url.clone())
            .unwrap_or(defaults.geocoding);
        Self {
            data: config.base_url.clone().unwrap_or(defaults.data),
            geocoding,
        }
    }

    /// Point both services at one server, handy for tests
    pub fn all(base: &str) -> Self {
        Self {
            data: base.to_string(),
            geocoding: base.to_string(),
        }
    }
}

pub struct OpenWeatherMapProvider {
    http: HttpClient,
    api_key: String,
    endpoints: Endpoints,
}

impl OpenWeatherMapProvider {
    pub fn new(http: HttpClient, api_key: String, endpoints: Endpoints) -> Self {
        Self {
            http,
            api_key,
            endpoints,
        }
    }

    fn data_url(&self, path: &str, place: &ResolvedPlace) -> String {
        format!(
            "{}?lat={}&lon={}&units=metric&appid={}",
            endpoint(&self.endpoints.data, path),
            place.latitude,
            place.longitude,
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapProvider {
    fn name(&self) -> &'static str {
        "openweathermap"
    }

    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<Vec<ResolvedPlace>> {
        let url = format!(
            "{}?q={}&limit=5&appid={}",
            endpoint(&self.endpoints.geocoding, "direct"),
            urlencoding::encode(name),
            urlencoding::encode(&self.api_key)
        );

        let results: Vec<GeoResult> = self.http.get_json(&url).await?;
        if results.is_empty() {
            warn!("No results found for location '{}'", name);
        } else {
            debug!("Found {} geocoding results for '{}'", results.len(), name);
        }

        Ok(results.into_iter().map(ResolvedPlace::from).collect())
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Option<ResolvedPlace>> {
        let url = format!(
            "{}?lat={}&lon={}&limit=1&appid={}",
            endpoint(&self.endpoints.geocoding, "reverse"),
            latitude,
            longitude,
            urlencoding::encode(&self.api_key)
        );

        let results: Vec<GeoResult> = self.http.get_json(&url).await?;
        let place = results.into_iter().next().map(|result| ResolvedPlace {
            // Keep the device's own fix rather than the town centre
            latitude,
            longitude,
            ..ResolvedPlace::from(result)
        });
        if let Some(place) = &place {
            info!("Reverse geocoded to: {}", place.display_name());
        }
        Ok(place)
    }

    #[instrument(skip(self, place), fields(place = %place.name))]
    async fn fetch(&self, place: &ResolvedPlace) -> Result<WeatherReport> {
        let current_url = self.data_url("weather", place);
        let forecast_url = self.data_url("forecast", place);

        let (current, forecast) = tokio::try_join!(
            self.http.get_json::<CurrentResponse>(&current_url),
            self.http.get_json::<ForecastResponse>(&forecast_url),
        )?;

        let report = build_report(place, current, forecast)?;
        info!(
            "Retrieved forecast for {} with {} data points",
            report.place.name,
            report.points.len()
        );
        Ok(report)
    }
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl From<GeoResult> for ResolvedPlace {
    fn from(result: GeoResult) -> Self {
        Self {
            name: result.name,
            latitude: result.lat,
            longitude: result.lon,
            country: result.country,
            region: result.state,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Condition {
    id: i32,
    description: String,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Sys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: Option<String>,
    dt: i64,
    /// Shift in seconds from UTC
    #[serde(default)]
    timezone: i64,
    main: CurrentMain,
    wind: Wind,
    weather: Vec<Condition>,
    sys: Option<Sys>,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: ForecastMain,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

/// Unix seconds to a naive timestamp, shifted by `offset` seconds
fn naive_at(unix: i64, offset: i64) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp(unix.checked_add(offset)?, 0).map(|dt| dt.naive_utc())
}

fn build_report(
    place: &ResolvedPlace,
    current: CurrentResponse,
    forecast: ForecastResponse,
) -> Result<WeatherReport> {
    let condition = current
        .weather
        .first()
        .ok_or_else(|| SkycastError::api("current weather has no condition entry"))?;

    // Forecast `dt_txt` is UTC, so buckets and "today" are UTC dates too
    let today = naive_at(current.dt, 0)
        .ok_or_else(|| SkycastError::api(format!("invalid observation time {}", current.dt)))?
        .date();

    let sys = current.sys.as_ref();
    let conditions = CurrentConditions {
        temperature: current.main.temp,
        feels_like: current.main.feels_like,
        wind_speed_kmh: ms_to_kmh(current.wind.speed),
        code: WeatherCode::OpenWeatherMap(condition.id),
        description: condition.description.clone(),
        humidity: current.main.humidity,
        sunrise: sys
            .and_then(|s| s.sunrise)
            .and_then(|t| naive_at(t, current.timezone)),
        sunset: sys
            .and_then(|s| s.sunset)
            .and_then(|t| naive_at(t, current.timezone)),
        observed_at: Utc::now(),
    };

    let points = forecast
        .list
        .into_iter()
        .filter_map(|entry| {
            let code = entry.weather.first()?.id;
            Some(ForecastPoint {
                time: naive_at(entry.dt, 0)?,
                temp_max: entry.main.temp_max,
                temp_min: entry.main.temp_min,
                code: WeatherCode::OpenWeatherMap(code),
            })
        })
        .collect();

    let mut resolved = place.clone();
    if let Some(name) = current.name.filter(|n| !n.is_empty()) {
        resolved.name = name;
    }

    Ok(WeatherReport {
        place: resolved,
        current: conditions,
        points,
        today,
    })
}
