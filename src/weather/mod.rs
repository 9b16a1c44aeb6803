//! Weather provider integrations
//!
//! Both upstream services sit behind [`WeatherProvider`]; which one is used is
//! a configuration detail (`weather.provider`).

use crate::config::{ProviderKind, SkycastConfig};
use crate::models::{ResolvedPlace, WeatherReport};
use crate::{Result, SkycastError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

pub mod open_meteo;
pub mod openweathermap;

pub use open_meteo::OpenMeteoProvider;
pub use openweathermap::OpenWeatherMapProvider;

const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

/// Geocoding plus current/forecast lookup against one upstream service
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    /// Forward geocoding; best match first, empty when nothing matched
    async fn geocode(&self, name: &str) -> Result<Vec<ResolvedPlace>>;

    /// Reverse geocoding; `None` when no place is near the coordinates
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Option<ResolvedPlace>>;

    /// Current conditions and raw forecast points for a place
    async fn fetch(&self, place: &ResolvedPlace) -> Result<WeatherReport>;
}

/// Build the provider selected in configuration
pub fn build_provider(config: &SkycastConfig) -> Result<Arc<dyn WeatherProvider>> {
    let http = HttpClient::new(Duration::from_secs(config.weather.timeout_seconds.into()))?;

    let provider: Arc<dyn WeatherProvider> = match config.weather.provider {
        ProviderKind::OpenMeteo => Arc::new(OpenMeteoProvider::new(
            http,
            open_meteo::Endpoints::from_config(&config.weather),
        )),
        ProviderKind::OpenWeatherMap => {
            let api_key = config
                .weather
                .api_key
                .clone()
                .ok_or_else(|| SkycastError::config("OpenWeatherMap requires an API key"))?;
            Arc::new(OpenWeatherMapProvider::new(
                http,
                api_key,
                openweathermap::Endpoints::from_config(&config.weather),
            ))
        }
    };

    info!("Using weather provider: {}", provider.name());
    Ok(provider)
}

/// Thin JSON-over-HTTP client shared by the providers
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client whose every request gives up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SkycastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// GET `url` and decode the JSON body.
    ///
    /// Non-success statuses, timeouts and undecodable bodies all become
    /// [`SkycastError::Api`].
    #[instrument(name = "http_get", level = "debug", skip(self, url), fields(url = %redact(url)))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let start = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Request timed out after {}s", self.timeout.as_secs());
                SkycastError::api(format!(
                    "request timed out after {}s",
                    self.timeout.as_secs()
                ))
            } else {
                warn!("Network error: {}", e);
                SkycastError::from(e)
            }
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            error!("API request failed with status {}: {}", status, snippet);
            return Err(SkycastError::api(format!(
                "API request failed with status: {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let bytes = response.bytes().await.map_err(SkycastError::from)?;
        let parsed = serde_json::from_slice(&bytes).map_err(|e| {
            error!("Failed to parse response: {}", e);
            SkycastError::api(format!("malformed response: {e}"))
        })?;

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 5 {
            warn!("Slow API response detected: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(parsed)
    }
}

/// Strip API keys from URLs before they reach the logs
fn redact(url: &str) -> String {
    match url.split_once("appid=") {
        Some((head, tail)) => {
            let rest = tail.split_once('&').map(|(_, r)| r);
            match rest {
                Some(rest) => format!("{head}appid=***&{rest}"),
                None => format!("{head}appid=***"),
            }
        }
        None => url.to_string(),
    }
}

/// Join a configured base URL and a path without doubling slashes
fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact() {
        assert_eq!(
            redact("https://x/weather?lat=1&appid=secret&units=metric"),
            "https://x/weather?lat=1&appid=***&units=metric"
        );
        assert_eq!(redact("https://x/forecast?appid=secret"), "https://x/forecast?appid=***");
        assert_eq!(redact("https://x/search?name=Kolkata"), "https://x/search?name=Kolkata");
    }

    #[test]
    fn test_endpoint_join() {
        assert_eq!(endpoint("http://a/v1/", "/forecast"), "http://a/v1/forecast");
        assert_eq!(endpoint("http://a/v1", "forecast"), "http://a/v1/forecast");
    }

    #[test]
    fn test_build_provider_from_config() {
        let mut config = SkycastConfig::default();
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "open-meteo");

        config.weather.provider = ProviderKind::OpenWeatherMap;
        assert!(build_provider(&config).is_err());

        config.weather.api_key = Some("0123456789abcdef".to_string());
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "openweathermap");
    }
}
