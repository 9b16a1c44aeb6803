//! Error types and user-facing notices for `Skycast`

use serde::Serialize;
use thiserror::Error;

/// Main error type for the `Skycast` library
#[derive(Error, Debug)]
pub enum SkycastError {
    /// Search submitted with nothing but whitespace
    #[error("Search query is empty")]
    EmptyQuery,

    /// Geocoding returned no results
    #[error("Place not found: {query}")]
    PlaceNotFound { query: String },

    /// The device refused access to its location
    #[error("Location permission denied")]
    LocationPermissionDenied,

    /// Permission was granted but no position could be read
    #[error("Location unavailable: {message}")]
    LocationUnavailable { message: String },

    /// Network, HTTP status or response parsing failures
    #[error("API error: {message}")]
    Api { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

/// Coarse failure classes shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyQuery,
    PlaceNotFound,
    LocationPermissionDenied,
    NetworkOrParseFailure,
    Startup,
}

/// A user-visible alert raised when an action fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl SkycastError {
    /// Create a new place-not-found error
    pub fn place_not_found<S: Into<String>>(query: S) -> Self {
        Self::PlaceNotFound {
            query: query.into(),
        }
    }

    /// Create a new location-unavailable error
    pub fn location_unavailable<S: Into<String>>(message: S) -> Self {
        Self::LocationUnavailable {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Classify this error for the display layer
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyQuery => ErrorKind::EmptyQuery,
            Self::PlaceNotFound { .. } => ErrorKind::PlaceNotFound,
            Self::LocationPermissionDenied => ErrorKind::LocationPermissionDenied,
            Self::LocationUnavailable { .. } | Self::Api { .. } => {
                ErrorKind::NetworkOrParseFailure
            }
            Self::Config { .. } | Self::Validation { .. } => ErrorKind::Startup,
        }
    }

    /// Notice to raise for this error, `None` when it should pass silently
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::EmptyQuery => None,
            Self::PlaceNotFound { .. } => Some(Notice::new("No data", "Could not find weather.")),
            Self::LocationPermissionDenied => {
                Some(Notice::new("Location denied", "Permission denied."))
            }
            Self::LocationUnavailable { .. } => Some(Notice::new("Error", "Unable to get location.")),
            Self::Api { .. } => Some(Notice::new("Error", "Failed to fetch weather data.")),
            Self::Config { .. } | Self::Validation { .. } => {
                Some(Notice::new("Error", self.user_message()))
            }
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyQuery => "Enter a city name to search.".to_string(),
            Self::PlaceNotFound { query } => format!("No place called '{query}' was found."),
            Self::LocationPermissionDenied => {
                "Location access was denied. Search for a city instead.".to_string()
            }
            Self::LocationUnavailable { .. } => "Unable to determine your location.".to_string(),
            Self::Api { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            Self::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            Self::Validation { message } => format!("Invalid input: {message}"),
        }
    }
}

impl From<reqwest::Error> for SkycastError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::api(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::api(format!("malformed response: {err}"))
        } else {
            Self::api(format!("network error: {err}"))
        }
    }
}
