//! Aggregate pipeline configuration
//!
//! Everything a session needs in one serializable document: the tracker
//! handoff, the asset calibration, the occluder geometry, and the device
//! debounce delay. Validation runs before any part is applied.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::constants;
use crate::core::types::{CalibrationSpec, OccluderSpec};
use crate::tracker::engine::TrackerConfig;
use crate::tracker::error::TrackerError;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "invalid parameter '{}' = '{}': {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => write!(f, "I/O error: {}", message),
            ConfigError::SerializationError { message } => {
                write!(f, "serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Handoff to the external tracking engine
    pub tracker: TrackerConfig,
    /// Static calibration mapping tracked poses onto the loaded asset
    pub calibration: CalibrationSpec,
    /// Soft occluder geometry relative to the anchor
    pub occluder: OccluderSpec,
    /// Quiet period for resize/orientation bursts, in milliseconds
    pub debounce_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            calibration: CalibrationSpec::default(),
            occluder: OccluderSpec::default(),
            debounce_delay_ms: constants::DEFAULT_DEBOUNCE_DELAY_MS,
        }
    }
}

impl PipelineConfig {
    /// Validate every section. Nothing is applied on failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracker.validate().map_err(|e| match e {
            TrackerError::ConfigurationRejected { parameter, value } => {
                ConfigError::InvalidParameter {
                    parameter: format!("tracker.{}", parameter),
                    value,
                    reason: "rejected by tracker configuration rules".to_string(),
                }
            }
            other => ConfigError::InvalidParameter {
                parameter: "tracker".to_string(),
                value: String::new(),
                reason: other.to_string(),
            },
        })?;

        self.calibration
            .validate()
            .map_err(|e| ConfigError::InvalidParameter {
                parameter: "calibration".to_string(),
                value: String::new(),
                reason: e.to_string(),
            })?;

        self.occluder
            .validate()
            .map_err(|e| ConfigError::InvalidParameter {
                parameter: "occluder".to_string(),
                value: String::new(),
                reason: e.to_string(),
            })?;

        if self.debounce_delay_ms > 10_000 {
            return Err(ConfigError::InvalidParameter {
                parameter: "debounce_delay_ms".to_string(),
                value: self.debounce_delay_ms.to_string(),
                reason: "debounce longer than 10s would make resizes feel stuck".to_string(),
            });
        }

        Ok(())
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("failed to read config file '{}': {}", path_str, e),
        })?;

        let config: PipelineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("failed to write config file '{}': {}", path_str, e),
        })
    }
}
