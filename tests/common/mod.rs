//! Shared fixtures for the integration tests
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde_json::{Value, json};
use skycast::config::ProviderKind;
use skycast::{SkycastConfig, WeatherProvider, build_provider};
use std::sync::Arc;
use wiremock::MockServer;

pub const KOLKATA: (f64, f64) = (22.5726, 88.3639);

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// Config pointing every endpoint at the mock server
pub fn config_for(server: &MockServer, provider: ProviderKind) -> SkycastConfig {
    let mut config = SkycastConfig::default();
    config.weather.provider = provider;
    config.weather.base_url = Some(server.uri());
    config.weather.geocoding_url = Some(server.uri());
    config.weather.reverse_geocoding_url = Some(server.uri());
    config.weather.timeout_seconds = 2;
    if provider == ProviderKind::OpenWeatherMap {
        config.weather.api_key = Some("test-key".to_string());
    }
    config
}

pub fn provider_for(server: &MockServer, provider: ProviderKind) -> Arc<dyn WeatherProvider> {
    build_provider(&config_for(server, provider)).unwrap()
}

pub fn open_meteo_search(name: &str, lat: f64, lon: f64) -> Value {
    json!({
        "results": [{
            "id": 1275004,
            "name": name,
            "latitude": lat,
            "longitude": lon,
            "country": "India",
            "admin1": "West Bengal"
        }],
        "generationtime_ms": 0.5
    })
}

pub fn open_meteo_no_results() -> Value {
    json!({ "generationtime_ms": 0.3 })
}

/// Six daily entries starting on 2026-10-17, observed that morning
pub fn open_meteo_forecast() -> Value {
    json!({
        "latitude": 22.5,
        "longitude": 88.375,
        "timezone": "Asia/Kolkata",
        "current": {
            "time": "2026-10-17T11:45",
            "interval": 900,
            "temperature_2m": 30.6,
            "apparent_temperature": 36.2,
            "relative_humidity_2m": 78,
            "wind_speed_10m": 13.7,
            "weather_code": 2
        },
        "daily": {
            "time": [
                "2026-10-17", "2026-10-18", "2026-10-19",
                "2026-10-20", "2026-10-21", "2026-10-22"
            ],
            "weather_code": [2, 0, 1, 3, 61, 63],
            "temperature_2m_max": [31.0, 32.0, 33.0, 34.0, 35.0, 36.0],
            "temperature_2m_min": [24.0, 24.5, 25.0, 25.5, 26.0, 26.5],
            "sunrise": [
                "2026-10-17T05:38", "2026-10-18T05:38", "2026-10-19T05:39",
                "2026-10-20T05:39", "2026-10-21T05:40", "2026-10-22T05:40"
            ],
            "sunset": [
                "2026-10-17T17:15", "2026-10-18T17:14", "2026-10-19T17:13",
                "2026-10-20T17:12", "2026-10-21T17:12", "2026-10-22T17:11"
            ]
        }
    })
}

pub fn nominatim_city(city: &str) -> Value {
    json!({
        "place_id": 1,
        "display_name": format!("{city}, West Bengal, India"),
        "address": {
            "city": city,
            "state": "West Bengal",
            "country": "India"
        }
    })
}

pub fn owm_direct(name: &str) -> Value {
    json!([{
        "name": name,
        "lat": KOLKATA.0,
        "lon": KOLKATA.1,
        "country": "IN",
        "state": "West Bengal"
    }])
}

/// Current conditions observed at 2026-10-17 06:30 UTC
pub fn owm_current() -> Value {
    json!({
        "coord": { "lat": KOLKATA.0, "lon": KOLKATA.1 },
        "weather": [{ "id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d" }],
        "main": { "temp": 30.6, "feels_like": 36.2, "humidity": 78, "pressure": 1008 },
        "wind": { "speed": 3.8, "deg": 190 },
        "dt": at(2026, 10, 17, 6, 30).and_utc().timestamp(),
        "sys": { "country": "IN", "sunrise": 1_792_195_560_i64, "sunset": 1_792_237_320_i64 },
        "timezone": 19800,
        "name": "Kolkata"
    })
}

/// Three-hourly entries from 2026-10-17 09:00 to 2026-10-22 21:00 UTC.
///
/// The noon slot of day `n` after today has `temp_max` 30 + n and code 500;
/// every other slot is 20° and clear.
pub fn owm_three_hourly() -> Value {
    let start = at(2026, 10, 17, 9, 0);
    let today = start.date();
    let list: Vec<Value> = (0..45)
        .map(|i| {
            let time = start + chrono::Duration::hours(3 * i);
            let offset = (time.date() - today).num_days();
            let (temp_max, code) = if time.hour() == 12 {
                (30.0 + offset as f64, 500)
            } else {
                (20.0, 800)
            };
            json!({
                "dt": time.and_utc().timestamp(),
                "main": { "temp": temp_max - 1.0, "temp_min": temp_max - 5.0, "temp_max": temp_max },
                "weather": [{ "id": code, "main": "", "description": "", "icon": "" }],
                "dt_txt": time.format("%Y-%m-%d %H:%M:%S").to_string()
            })
        })
        .collect();

    json!({ "cod": "200", "cnt": list.len(), "list": list })
}
