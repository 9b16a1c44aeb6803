//! Data models for `Skycast`
//!
//! This module contains the core domain models organized by concern:
//! - Location: queries and geocoded places
//! - Weather: current conditions
//! - Forecast: raw forecast points and condensed per-day entries

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{ForecastDay, ForecastPoint, WeatherReport};
pub use location::{LocationQuery, ResolvedPlace};
pub use weather::CurrentConditions;
