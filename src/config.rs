//! Axis limits loaded from TOML.
//!
//! ```toml
//! [axes.x]
//! name = "gantry"
//! max_velocity = 300.0
//! max_accel = 3000.0
//! max_jerk = 50000.0
//!
//! [axes.z]
//! max_velocity = 25.0
//! min_velocity = -10.0
//! ```
//!
//! Missing minima mirror the maxima. A `max_jerk` of zero selects the
//! acceleration-limited solver, a `max_accel` of zero the velocity-limited one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::limits::{KinematicLimits, LimitsError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid limits for axis '{axis}': {source}")]
    Limits {
        axis: String,
        #[source]
        source: LimitsError,
    },
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MotionConfig {
    #[serde(default)]
    pub axes: HashMap<String, AxisConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AxisConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,
    #[serde(default)]
    pub min_velocity: Option<f64>,
    #[serde(default = "default_max_accel")]
    pub max_accel: f64,
    #[serde(default)]
    pub min_accel: Option<f64>,
    #[serde(default = "default_max_jerk")]
    pub max_jerk: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            name: None,
            max_velocity: default_max_velocity(),
            min_velocity: None,
            max_accel: default_max_accel(),
            min_accel: None,
            max_jerk: default_max_jerk(),
        }
    }
}

impl AxisConfig {
    /// Kinematic limits of the axis, validated.
    pub fn limits(&self) -> Result<KinematicLimits, LimitsError> {
        let limits = KinematicLimits::new(
            self.max_velocity,
            self.min_velocity.unwrap_or(-self.max_velocity),
            self.max_accel,
            self.min_accel.unwrap_or(-self.max_accel),
            self.max_jerk,
        );
        limits.validate()?;
        Ok(limits)
    }
}

impl MotionConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: MotionConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the limits of every axis.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, config) in &self.axes {
            config.limits().map_err(|source| ConfigError::Limits {
                axis: axis.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn axis(&self, key: &str) -> Option<&AxisConfig> {
        self.axes.get(key)
    }

    /// Validated limits of the axis `key`, `None` if it is not configured.
    pub fn limits(&self, key: &str) -> Option<Result<KinematicLimits, ConfigError>> {
        let config = self.axes.get(key)?;
        Some(config.limits().map_err(|source| ConfigError::Limits {
            axis: key.to_string(),
            source,
        }))
    }
}

fn default_max_velocity() -> f64 {
    300.0
}

fn default_max_accel() -> f64 {
    3000.0
}

fn default_max_jerk() -> f64 {
    50000.0
}

pub fn load_config(path: impl AsRef<Path>) -> Result<MotionConfig, ConfigError> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => match MotionConfig::from_toml_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::error!("Failed to load motion config '{}': {}", path.display(), e);
                Err(e)
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path.display(), e);
            Err(ConfigError::Io(e))
        }
    }
}
