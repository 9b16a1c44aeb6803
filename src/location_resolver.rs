//! Location Resolution Module
//!
//! Turns user input (a search string or a device fix) into a [`ResolvedPlace`]
//! via the configured provider's geocoding.

use crate::models::{LocationQuery, ResolvedPlace};
use crate::weather::WeatherProvider;
use crate::{Result, SkycastError};
use tracing::{debug, warn};

/// Location parsing utilities
pub struct LocationParser;

impl LocationParser {
    /// Parse a search box entry.
    ///
    /// Blank input is rejected with [`SkycastError::EmptyQuery`]; `lat,lon`
    /// within valid ranges becomes a coordinate query; anything else is a name.
    pub fn parse(input: &str) -> Result<LocationQuery> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SkycastError::EmptyQuery);
        }

        if let Some((lat, lon)) = Self::parse_coordinates(input) {
            return Ok(LocationQuery::Coordinates(lat, lon));
        }

        Ok(LocationQuery::Name(input.to_string()))
    }

    /// Parse coordinates from string like "22.5726,88.3639" or "22.5726 88.3639"
    fn parse_coordinates(input: &str) -> Option<(f64, f64)> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let [lat, lon] = parts.as_slice() else {
            return None;
        };

        let lat = lat.parse::<f64>().ok()?;
        let lon = lon.parse::<f64>().ok()?;

        ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)).then_some((lat, lon))
    }
}

/// Service for resolving location queries
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a location query into a place
    pub async fn resolve(
        provider: &dyn WeatherProvider,
        query: LocationQuery,
    ) -> Result<ResolvedPlace> {
        debug!("Resolving location query: {:?}", query);

        let place = match query {
            LocationQuery::Name(name) => Self::resolve_name(provider, &name).await?,
            LocationQuery::Coordinates(lat, lon) => {
                Self::resolve_coordinates(provider, lat, lon).await?
            }
        };

        debug!(
            "Resolved location: {} at ({})",
            place.name,
            place.format_coordinates()
        );

        Ok(place)
    }

    /// Resolve a place name via forward geocoding
    async fn resolve_name(provider: &dyn WeatherProvider, name: &str) -> Result<ResolvedPlace> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SkycastError::EmptyQuery);
        }

        debug!("Geocoding location name: {}", name);
        provider
            .geocode(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SkycastError::place_not_found(name))
    }

    /// Resolve coordinates to a named place via reverse geocoding
    ///
    /// A miss, or a failing reverse lookup, falls back to naming the place by
    /// its coordinates so the weather fetch can still go ahead.
    async fn resolve_coordinates(
        provider: &dyn WeatherProvider,
        lat: f64,
        lon: f64,
    ) -> Result<ResolvedPlace> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(SkycastError::validation(format!(
                "coordinates out of range: {lat}, {lon}"
            )));
        }

        match provider.reverse_geocode(lat, lon).await {
            Ok(Some(place)) => Ok(place),
            Ok(None) => {
                debug!("No reverse geocoding results found, using coordinates as name");
                Ok(ResolvedPlace::from_coordinates(lat, lon))
            }
            Err(e) => {
                warn!("Reverse geocoding failed: {}, using coordinates as name", e);
                Ok(ResolvedPlace::from_coordinates(lat, lon))
            }
        }
    }
}
