//! Tracker communication error types

use std::fmt;

use crate::core::types::CameraFacing;

/// Errors surfaced by the external tracking engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// Camera permission was denied by the user or platform
    CameraAccessDenied { reason: String },
    /// The requested facing mode does not exist on this device
    FacingUnavailable { facing: CameraFacing },
    /// The engine rejected part of its configuration
    ConfigurationRejected { parameter: String, value: String },
    /// Internal engine failure (model load, GPU context, capture stall)
    EngineFailure { details: String },
    /// A capture-dependent call arrived while capture was not running
    NotCapturing,
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::CameraAccessDenied { reason } => {
                write!(f, "camera access denied: {}", reason)
            }
            TrackerError::FacingUnavailable { facing } => {
                write!(f, "camera facing mode '{}' unavailable on this device", facing)
            }
            TrackerError::ConfigurationRejected { parameter, value } => {
                write!(f, "tracker rejected configuration: {} = {}", parameter, value)
            }
            TrackerError::EngineFailure { details } => {
                write!(f, "tracking engine failure: {}", details)
            }
            TrackerError::NotCapturing => write!(f, "tracker is not capturing"),
        }
    }
}

impl std::error::Error for TrackerError {}

impl TrackerError {
    /// Whether recovering requires user action (no automatic retry makes
    /// sense, e.g. a permission prompt was dismissed).
    pub fn requires_user_action(&self) -> bool {
        matches!(self, TrackerError::CameraAccessDenied { .. })
    }
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_failures_require_user_action() {
        let denied = TrackerError::CameraAccessDenied {
            reason: "prompt dismissed".to_string(),
        };
        assert!(denied.requires_user_action());
        assert!(!TrackerError::NotCapturing.requires_user_action());
    }

    #[test]
    fn display_includes_the_facing_mode() {
        let err = TrackerError::FacingUnavailable {
            facing: CameraFacing::Environment,
        };
        assert!(err.to_string().contains("environment"));
    }
}
