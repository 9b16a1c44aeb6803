//! Open-Meteo forecast and geocoding, Nominatim reverse geocoding
//!
//! No API key required. Forecasts are requested at daily resolution with
//! `timezone=auto`, so all timestamps are already local to the place.

use super::{HttpClient, WeatherProvider, endpoint};
use crate::config::WeatherConfig;
use crate::icons::WeatherCode;
use crate::models::{CurrentConditions, ForecastPoint, ResolvedPlace, WeatherReport};
use crate::{Result, SkycastError};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1";
const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
const DEFAULT_REVERSE_URL: &str = "https://nominatim.openstreetmap.org";

/// Today plus the five days shown
const FORECAST_DAYS: u32 = 6;

/// Base URLs for the three services
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub forecast: String,
    pub geocoding: String,
    pub reverse: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            forecast: DEFAULT_FORECAST_URL.to_string(),
            geocoding: DEFAULT_GEOCODING_URL.to_string(),
            reverse: DEFAULT_REVERSE_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn from_config(config: &WeatherConfig) -> Self {
        let defaults = Self::default();
        Self {
            forecast: config.base_url.clone().unwrap_or(defaults.forecast),
            geocoding: config.geocoding_url.clone().unwrap_or(defaults.geocoding),
            reverse: config.reverse_geocoding_url.clone().unwrap_or(defaults.reverse),
        }
    }

    /// Point every service at one server, handy for tests
    pub fn all(base: &str) -> Self {
        Self {
            forecast: base.to_string(),
            geocoding: base.to_string(),
            reverse: base.to_string(),
        }
    }
}

pub struct OpenMeteoProvider {
    http: HttpClient,
    endpoints: Endpoints,
}

impl OpenMeteoProvider {
    pub fn new(http: HttpClient, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn name(&self) -> &'static str {
        "open-meteo"
    }

    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<Vec<ResolvedPlace>> {
        let url = format!(
            "{}?name={}&count=5&language=en&format=json",
            endpoint(&self.endpoints.geocoding, "search"),
            urlencoding::encode(name)
        );

        let response: GeocodingResponse = self.http.get_json(&url).await?;
        let places: Vec<ResolvedPlace> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(ResolvedPlace::from)
            .collect();

        if places.is_empty() {
            warn!("No results found for location '{}'", name);
        } else {
            debug!(
                "Geocoding results: {:?}",
                places
                    .iter()
                    .map(|p| format!("{} ({})", p.name, p.format_coordinates()))
                    .collect::<Vec<_>>()
            );
        }

        Ok(places)
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Option<ResolvedPlace>> {
        let url = format!(
            "{}?lat={}&lon={}&format=json&addressdetails=1&zoom=10",
            endpoint(&self.endpoints.reverse, "reverse"),
            latitude,
            longitude
        );

        let response: NominatimResponse = self.http.get_json(&url).await?;
        let place = response.into_place(latitude, longitude);
        if let Some(place) = &place {
            info!("Reverse geocoded to: {}", place.display_name());
        }
        Ok(place)
    }

    #[instrument(skip(self, place), fields(place = %place.name))]
    async fn fetch(&self, place: &ResolvedPlace) -> Result<WeatherReport> {
        let url = format!(
            "{}?latitude={}&longitude={}\
             &current=temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,weather_code\
             &daily=weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset\
             &timezone=auto&forecast_days={}&wind_speed_unit=kmh",
            endpoint(&self.endpoints.forecast, "forecast"),
            place.latitude,
            place.longitude,
            FORECAST_DAYS
        );

        let response: ForecastResponse = self.http.get_json(&url).await?;
        let report = response.into_report(place.clone())?;

        info!(
            "Retrieved forecast for {} with {} daily points",
            report.place.name,
            report.points.len()
        );
        Ok(report)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

impl From<GeocodingResult> for ResolvedPlace {
    fn from(result: GeocodingResult) -> Self {
        Self {
            name: result.name,
            latitude: result.latitude,
            longitude: result.longitude,
            country: result.country,
            region: result.admin1,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl NominatimResponse {
    fn into_place(self, latitude: f64, longitude: f64) -> Option<ResolvedPlace> {
        let address = self.address?;
        let name = address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.municipality)
            .or(address.county)
            .or_else(|| address.state.clone())?;

        Some(ResolvedPlace {
            name,
            latitude,
            longitude,
            country: address.country,
            region: address.state,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    time: String,
    temperature_2m: f64,
    apparent_temperature: Option<f64>,
    relative_humidity_2m: Option<f64>,
    wind_speed_10m: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    sunrise: Vec<Option<String>>,
    #[serde(default)]
    sunset: Vec<Option<String>>,
}

fn parse_local_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

impl ForecastResponse {
    fn into_report(self, place: ResolvedPlace) -> Result<WeatherReport> {
        let current = self
            .current
            .ok_or_else(|| SkycastError::api("Open-Meteo response has no current block"))?;
        let daily = self
            .daily
            .ok_or_else(|| SkycastError::api("Open-Meteo response has no daily block"))?;

        let now = parse_local_time(&current.time).ok_or_else(|| {
            SkycastError::api(format!("invalid current time '{}'", current.time))
        })?;
        let today = now.date();

        let mut points = Vec::with_capacity(daily.time.len());
        let mut sunrise = None;
        let mut sunset = None;

        for (i, day) in daily.time.iter().enumerate() {
            let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") else {
                warn!("Skipping daily entry with invalid date '{}'", day);
                continue;
            };

            if date == today {
                sunrise = daily
                    .sunrise
                    .get(i)
                    .and_then(|s| s.as_deref())
                    .and_then(parse_local_time);
                sunset = daily
                    .sunset
                    .get(i)
                    .and_then(|s| s.as_deref())
                    .and_then(parse_local_time);
            }

            let max = daily.temperature_2m_max.get(i).copied().flatten();
            let min = daily.temperature_2m_min.get(i).copied().flatten();
            let code = daily.weather_code.get(i).copied().flatten();
            let (Some(temp_max), Some(temp_min), Some(code)) = (max, min, code) else {
                debug!("Skipping incomplete daily entry for {}", date);
                continue;
            };

            points.push(ForecastPoint {
                time: date.and_time(NaiveTime::default()),
                temp_max,
                temp_min,
                code: WeatherCode::Wmo(code),
            });
        }

        let code = WeatherCode::Wmo(current.weather_code);
        let conditions = CurrentConditions {
            temperature: current.temperature_2m,
            feels_like: current.apparent_temperature,
            wind_speed_kmh: current.wind_speed_10m,
            code,
            description: code.description().to_string(),
            humidity: current
                .relative_humidity_2m
                .map(|h| h.round().clamp(0.0, 100.0) as u8),
            sunrise,
            sunset,
            observed_at: Utc::now(),
        };

        Ok(WeatherReport {
            place,
            current: conditions,
            points,
            today,
        })
    }
}
