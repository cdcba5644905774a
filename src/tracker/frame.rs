//! Per-frame payload delivered by the tracking engine

use crate::core::types::TrackerPose;

/// Which hand the detection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandLabel {
    Right,
    Left,
}

/// A stabilized 2D landmark in video-frame coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// One processed camera frame. The tracker runs at its own cadence,
/// asynchronously relative to render frames; a fresh value is delivered
/// per processed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerFrame {
    /// Whether anything was detected at all this frame
    pub detected: bool,
    /// Detection confidence in [0, 1]
    pub score: f64,
    /// Stabilized landmarks, empty on a gap
    pub landmarks: Vec<Landmark>,
    /// Estimated wrist pose in tracker space, absent on a gap
    pub pose: Option<TrackerPose>,
    pub label: HandLabel,
}

impl TrackerFrame {
    /// A frame carrying a confident detection.
    pub fn detection(pose: TrackerPose, score: f64, label: HandLabel) -> Self {
        Self {
            detected: true,
            score,
            landmarks: Vec::new(),
            pose: Some(pose),
            label,
        }
    }

    /// A frame with no detection. Expected and silently handled
    /// downstream via hold-last-pose; never an error.
    pub fn gap() -> Self {
        Self {
            detected: false,
            score: 0.0,
            landmarks: Vec::new(),
            pose: None,
            label: HandLabel::Right,
        }
    }

    pub fn with_landmarks(mut self, landmarks: Vec<Landmark>) -> Self {
        self.landmarks = landmarks;
        self
    }
}
