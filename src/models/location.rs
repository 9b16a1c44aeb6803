//! Location query and resolved place models

use serde::{Deserialize, Serialize};

/// What the user asked for: a city name or a coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free-text place name
    Name(String),
    /// Latitude, longitude in decimal degrees
    Coordinates(f64, f64),
}

/// Canonical place produced by geocoding
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedPlace {
    /// Place name as reported by the geocoder
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country name or code
    pub country: Option<String>,
    /// First-level administrative region
    pub region: Option<String>,
}

impl ResolvedPlace {
    /// Create a new place
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            country: None,
            region: None,
        }
    }

    /// Place named after its own coordinates, used when reverse geocoding finds nothing
    #[must_use]
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::new(format_coordinates(latitude, longitude), latitude, longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format_coordinates(self.latitude, self.longitude)
    }

    /// Name with country for disambiguation, e.g. "Kolkata, India"
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() && *country != self.name => {
                format!("{}, {}", self.name, country)
            }
            _ => self.name.clone(),
        }
    }
}

fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.4}, {longitude:.4}")
}
