//! Device location sensor
//!
//! The screen asks for permission first and reads a single fix afterwards.
//! On the command line the "device" is whatever the configuration says.

use crate::config::LocationConfig;
use crate::{Result, SkycastError};
use async_trait::async_trait;

/// Outcome of a permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// A one-shot position source
#[async_trait]
pub trait LocationSensor: Send + Sync {
    /// Ask for foreground location access
    async fn request_permission(&self) -> PermissionStatus;

    /// Read the current position as (latitude, longitude)
    async fn current_position(&self) -> Result<(f64, f64)>;
}

/// Sensor backed by fixed coordinates from configuration or flags
#[derive(Debug, Clone, Default)]
pub struct ConfiguredSensor {
    allowed: bool,
    position: Option<(f64, f64)>,
}

impl ConfiguredSensor {
    pub fn new(allowed: bool, position: Option<(f64, f64)>) -> Self {
        Self { allowed, position }
    }

    pub fn from_config(config: &LocationConfig) -> Self {
        let position = config.latitude.zip(config.longitude);
        Self::new(config.allowed, position)
    }
}

#[async_trait]
impl LocationSensor for ConfiguredSensor {
    async fn request_permission(&self) -> PermissionStatus {
        if self.allowed {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    async fn current_position(&self) -> Result<(f64, f64)> {
        self.position.ok_or_else(|| {
            SkycastError::location_unavailable(
                "no position configured; set location.latitude and location.longitude",
            )
        })
    }
}
