//! Session state, errors, and statistics

use std::fmt;

use crate::core::types::CameraFacing;
use crate::tracker::error::TrackerError;
use crate::utils::config::ConfigError;

/// Lifecycle state of a tracking session. Only one session may be
/// `Ready` at a time; camera-facing changes pass through `Initializing`
/// again without tearing the overlay down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Destroyed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Uninitialized => write!(f, "uninitialized"),
            SessionState::Initializing => write!(f, "initializing"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Destroyed => write!(f, "destroyed"),
        }
    }
}

/// Session error taxonomy. A detection gap is deliberately absent: it is
/// an expected condition handled by hold-last-pose, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Camera/tracker setup failed. Fatal to startup; surfaced to the
    /// caller with no automatic retry (permission failures need user
    /// action).
    Initialization { source: TrackerError },
    /// A facing-mode change failed. Recoverable: the session stays ready
    /// on the prior facing mode.
    CameraSwitch {
        requested: CameraFacing,
        source: TrackerError,
    },
    /// A lifecycle operation arrived in the wrong state
    StatePrecondition {
        operation: &'static str,
        state: SessionState,
    },
    /// Another lifecycle transition is still in flight
    TransitionInFlight { operation: &'static str },
    /// Invalid configuration, rejected before anything was applied
    Configuration {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Overlay content was already attached
    ModelAlreadyAttached,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Initialization { source } => {
                write!(f, "tracking initialization failed: {}", source)
            }
            SessionError::CameraSwitch { requested, source } => {
                write!(f, "camera switch to '{}' failed: {}", requested, source)
            }
            SessionError::StatePrecondition { operation, state } => {
                write!(f, "operation '{}' not allowed in state '{}'", operation, state)
            }
            SessionError::TransitionInFlight { operation } => {
                write!(f, "operation '{}' rejected: a lifecycle transition is in flight", operation)
            }
            SessionError::Configuration { parameter, value, reason } => {
                write!(f, "invalid configuration '{}' = '{}': {}", parameter, value, reason)
            }
            SessionError::ModelAlreadyAttached => {
                write!(f, "overlay model is already attached")
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Initialization { source } => Some(source),
            SessionError::CameraSwitch { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                SessionError::Configuration { parameter, value, reason }
            }
            other => SessionError::Configuration {
                parameter: "config".to_string(),
                value: String::new(),
                reason: other.to_string(),
            },
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Per-session bookkeeping, reset only by constructing a new session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    /// Tracker frames handled
    pub frames_processed: u64,
    /// Frames carrying an accepted detection
    pub detections: u64,
    /// Frames with no accepted detection (gaps)
    pub gaps: u64,
    /// Gaps since the last accepted detection
    pub consecutive_gaps: u32,
    /// Completed camera-facing switches
    pub facing_switches: u32,
    /// Engine faults observed while draining frames
    pub engine_faults: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_display_is_lowercase() {
        assert_eq!(SessionState::Ready.to_string(), "ready");
        assert_eq!(SessionState::Uninitialized.to_string(), "uninitialized");
    }

    #[test]
    fn initialization_error_exposes_its_source() {
        use std::error::Error;
        let err = SessionError::Initialization {
            source: TrackerError::CameraAccessDenied {
                reason: "denied".to_string(),
            },
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("camera access denied"));
    }

    #[test]
    fn config_errors_convert_with_parameter_names() {
        let err: SessionError = ConfigError::InvalidParameter {
            parameter: "occluder".to_string(),
            value: String::new(),
            reason: "bad radii".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            SessionError::Configuration { parameter, .. } if parameter == "occluder"
        ));
    }
}
