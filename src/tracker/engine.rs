//! Tracking engine trait and configuration

use serde::{Deserialize, Serialize};

use crate::core::constants;
use crate::core::types::CameraFacing;
use crate::tracker::error::{TrackerError, TrackerResult};
use crate::tracker::frame::TrackerFrame;

/// Progress of an in-flight capture start or facing switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureProgress {
    /// Camera/engine still warming up
    Pending,
    /// First-frame pipeline is armed
    Armed,
}

/// One-euro landmark stabilizer tuning, applied inside the engine before
/// poses ever reach this pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilizerOptions {
    pub min_cut_off: f64,
    pub beta: f64,
    /// Expected processing frequency bounds in Hz
    pub freq_range: [f64; 2],
    /// Pixel-displacement band where filtering is forced on the NN input
    pub force_filter_input_range: [f64; 2],
}

impl Default for StabilizerOptions {
    fn default() -> Self {
        Self {
            min_cut_off: constants::DEFAULT_STABILIZER_MIN_CUT_OFF,
            beta: constants::DEFAULT_STABILIZER_BETA,
            freq_range: constants::DEFAULT_STABILIZER_FREQ_RANGE,
            force_filter_input_range: constants::DEFAULT_STABILIZER_FORCE_INPUT_RANGE,
        }
    }
}

/// Pose flip-filter settings. Absent means the filter is disabled; the
/// pipeline branches on the option, never on field presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFilterConfig {
    /// Landmark error above which the filter switches detection models
    pub switch_error_threshold: f64,
    /// Mask selecting which model variant the filter may switch to
    pub right_hand: bool,
    pub flipped: bool,
}

impl Default for PoseFilterConfig {
    fn default() -> Self {
        Self {
            switch_error_threshold: constants::DEFAULT_FLIP_SWITCH_ERROR_THRESHOLD,
            right_hand: true,
            flipped: false,
        }
    }
}

/// Configuration handed to the external tracker at initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Minimum detection confidence, in (0, 1]
    pub detection_threshold: f64,
    /// Landmark label set used for pose estimation
    pub landmark_labels: Vec<String>,
    /// Maximum number of hands tracked simultaneously
    pub max_hands: u8,
    /// Pose flip filter, tagged option
    pub pose_filter: Option<PoseFilterConfig>,
    pub stabilizer: StabilizerOptions,
    /// Damping factors applied to raw pose translations
    pub translation_scaling: [f64; 3],
    /// Per-axis factors applied to object points before pose estimation.
    /// Tunable calibration input passed to the engine verbatim; this
    /// pipeline never inserts it into its own transform order.
    pub object_point_factors: [f64; 3],
    /// Allow the engine to mirror the tracked object for left hands
    pub enable_flip_object: bool,
    /// Digital zoom applied to the tracking camera feed
    pub camera_zoom: f64,
    pub initial_facing: CameraFacing,
    /// Canvas the engine draws the raw video feed into
    pub video_target: String,
    /// Draw debug landmarks over the video feed
    pub debug_landmarks: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            detection_threshold: constants::DEFAULT_DETECTION_THRESHOLD,
            landmark_labels: constants::WRIST_LANDMARK_LABELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_hands: constants::DEFAULT_MAX_HANDS,
            pose_filter: Some(PoseFilterConfig::default()),
            stabilizer: StabilizerOptions::default(),
            translation_scaling: constants::DEFAULT_TRANSLATION_SCALING,
            object_point_factors: constants::DEFAULT_OBJECT_POINT_FACTORS,
            enable_flip_object: true,
            camera_zoom: constants::DEFAULT_CAMERA_ZOOM,
            initial_facing: CameraFacing::User,
            video_target: "ar-video-canvas".to_string(),
            debug_landmarks: false,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> TrackerResult<()> {
        if !(self.detection_threshold > 0.0 && self.detection_threshold <= 1.0) {
            return Err(TrackerError::ConfigurationRejected {
                parameter: "detection_threshold".to_string(),
                value: self.detection_threshold.to_string(),
            });
        }
        if self.landmark_labels.is_empty() {
            return Err(TrackerError::ConfigurationRejected {
                parameter: "landmark_labels".to_string(),
                value: "[]".to_string(),
            });
        }
        if self.max_hands == 0 {
            return Err(TrackerError::ConfigurationRejected {
                parameter: "max_hands".to_string(),
                value: "0".to_string(),
            });
        }
        if self.stabilizer.freq_range[0] >= self.stabilizer.freq_range[1] {
            return Err(TrackerError::ConfigurationRejected {
                parameter: "stabilizer.freq_range".to_string(),
                value: format!("{:?}", self.stabilizer.freq_range),
            });
        }
        if !(self.camera_zoom.is_finite() && self.camera_zoom > 0.0) {
            return Err(TrackerError::ConfigurationRejected {
                parameter: "camera_zoom".to_string(),
                value: self.camera_zoom.to_string(),
            });
        }
        if self.translation_scaling.iter().any(|f| !(*f > 0.0)) {
            return Err(TrackerError::ConfigurationRejected {
                parameter: "translation_scaling".to_string(),
                value: format!("{:?}", self.translation_scaling),
            });
        }
        if self.object_point_factors.iter().any(|f| !(*f > 0.0)) {
            return Err(TrackerError::ConfigurationRejected {
                parameter: "object_point_factors".to_string(),
                value: format!("{:?}", self.object_point_factors),
            });
        }
        Ok(())
    }
}

/// Abstraction over the external tracking engine (neural-network wrist
/// tracker plus camera capture plus landmark stabilizer).
///
/// Contract notes:
/// - `start_capture` and `switch_facing` begin an asynchronous warm-up;
///   completion is observed by polling `poll_capture`.
/// - A failed `switch_facing` (or a failure reported while its warm-up is
///   polled) leaves the engine capturing on its prior facing mode.
/// - `poll_frame` returns `Ok(None)` when no freshly processed camera
///   frame is available; frames arrive at the tracker's own cadence.
pub trait TrackerEngine {
    fn configure(&mut self, config: &TrackerConfig) -> TrackerResult<()>;

    /// Begin camera capture with the given facing mode.
    fn start_capture(&mut self, facing: CameraFacing) -> TrackerResult<()>;

    /// Request a restart of capture with a new facing mode.
    fn switch_facing(&mut self, facing: CameraFacing) -> TrackerResult<()>;

    /// Poll warm-up progress of a capture start or facing switch.
    fn poll_capture(&mut self) -> TrackerResult<CaptureProgress>;

    /// Drain the next processed camera frame, if any.
    fn poll_frame(&mut self) -> TrackerResult<Option<TrackerFrame>>;

    fn stop_capture(&mut self) -> TrackerResult<()>;

    /// Release the engine and its camera handle.
    fn release(&mut self) -> TrackerResult<()>;

    fn active_facing(&self) -> CameraFacing;

    /// Capability query; facing availability is device-dependent.
    fn supports_facing(&self, facing: CameraFacing) -> bool;

    /// Vertical field of view of the engine's current camera model, in
    /// degrees. Changes with the facing mode.
    fn vertical_fov_deg(&self) -> f64;

    fn is_capturing(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TrackerConfig::default().validate().is_ok());
    }

    #[test]
    fn default_config_matches_wrist_tracking_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.detection_threshold, 0.98);
        assert_eq!(config.landmark_labels.len(), 6);
        assert_eq!(config.max_hands, 1);
        assert_eq!(config.object_point_factors, [1.0, 1.3, 1.0]);
        let filter = config.pose_filter.expect("filter enabled by default");
        assert_eq!(filter.switch_error_threshold, 0.2);
        assert!(filter.right_hand);
        assert!(!filter.flipped);
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        for bad in [0.0, -0.5, 1.5] {
            let config = TrackerConfig {
                detection_threshold: bad,
                ..TrackerConfig::default()
            };
            assert!(config.validate().is_err(), "threshold {} accepted", bad);
        }
    }

    #[test]
    fn empty_landmark_set_is_rejected() {
        let config = TrackerConfig {
            landmark_labels: Vec::new(),
            ..TrackerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TrackerError::ConfigurationRejected { parameter, .. }) if parameter == "landmark_labels"
        ));
    }

    #[test]
    fn inverted_stabilizer_freq_range_is_rejected() {
        let mut config = TrackerConfig::default();
        config.stabilizer.freq_range = [144.0, 2.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn disabled_pose_filter_is_representable() {
        let config = TrackerConfig {
            pose_filter: None,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
