//! Deterministic mock tracking engine for tests and demos
//!
//! Frames are scripted through a queue; warm-up after a capture start or
//! facing switch is a fixed countdown of `poll_capture` calls; failures
//! are injected explicitly. No randomness anywhere, so every test run
//! observes the same sequence.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use nalgebra::{UnitQuaternion, Vector3};

use crate::core::types::{CameraFacing, PoseScale, TrackerPose};
use crate::tracker::engine::{CaptureProgress, TrackerConfig, TrackerEngine};
use crate::tracker::error::{TrackerError, TrackerResult};
use crate::tracker::frame::{HandLabel, TrackerFrame};

pub struct MockTracker {
    config: Option<TrackerConfig>,
    facing: CameraFacing,
    supported: Vec<CameraFacing>,
    capturing: bool,
    released: bool,
    /// Number of `poll_capture` calls before warm-up completes
    warmup_polls: u32,
    warmup_remaining: u32,
    frames: VecDeque<TrackerFrame>,
    fail_next_start: Option<TrackerError>,
    fail_next_switch: Option<TrackerError>,
    fail_warmup_after_switch: Option<TrackerError>,
    armed_warmup_failure: Option<TrackerError>,
    prior_facing: Option<CameraFacing>,
    fov_user_deg: f64,
    fov_environment_deg: f64,
}

impl MockTracker {
    pub fn new() -> Self {
        Self {
            config: None,
            facing: CameraFacing::User,
            supported: vec![CameraFacing::User, CameraFacing::Environment],
            capturing: false,
            released: false,
            warmup_polls: 1,
            warmup_remaining: 0,
            frames: VecDeque::new(),
            fail_next_start: None,
            fail_next_switch: None,
            fail_warmup_after_switch: None,
            armed_warmup_failure: None,
            prior_facing: None,
            fov_user_deg: 55.0,
            fov_environment_deg: 48.0,
        }
    }

    /// Restrict the set of available facing modes.
    pub fn with_supported_facings(mut self, supported: Vec<CameraFacing>) -> Self {
        self.supported = supported;
        self
    }

    /// Number of `poll_capture` calls a warm-up takes.
    pub fn with_warmup_polls(mut self, polls: u32) -> Self {
        self.warmup_polls = polls;
        self
    }

    /// Queue a raw frame for `poll_frame`.
    pub fn push_frame(&mut self, frame: TrackerFrame) {
        self.frames.push_back(frame);
    }

    /// Queue a confident right-hand detection at the given translation.
    pub fn push_detection(&mut self, translation: Vector3<f64>, score: f64) {
        let pose = TrackerPose::new(translation, UnitQuaternion::identity(), PoseScale::Uniform(1.0));
        self.frames
            .push_back(TrackerFrame::detection(pose, score, HandLabel::Right));
    }

    /// Queue a detection gap.
    pub fn push_gap(&mut self) {
        self.frames.push_back(TrackerFrame::gap());
    }

    /// Make the next `start_capture` fail with the given error.
    pub fn fail_next_start(&mut self, error: TrackerError) {
        self.fail_next_start = Some(error);
    }

    /// Make the next `switch_facing` fail with the given error.
    pub fn fail_next_switch(&mut self, error: TrackerError) {
        self.fail_next_switch = Some(error);
    }

    /// Make the warm-up following the next `switch_facing` fail. The mock
    /// then reverts to the prior facing, as the engine contract requires.
    pub fn fail_warmup_after_switch(&mut self, error: TrackerError) {
        self.fail_warmup_after_switch = Some(error);
    }

    pub fn queued_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Configuration the engine last accepted, if any.
    pub fn accepted_config(&self) -> Option<&TrackerConfig> {
        self.config.as_ref()
    }
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerEngine for MockTracker {
    fn configure(&mut self, config: &TrackerConfig) -> TrackerResult<()> {
        config.validate()?;
        self.config = Some(config.clone());
        Ok(())
    }

    fn start_capture(&mut self, facing: CameraFacing) -> TrackerResult<()> {
        if let Some(error) = self.fail_next_start.take() {
            return Err(error);
        }
        if !self.supports_facing(facing) {
            return Err(TrackerError::FacingUnavailable { facing });
        }
        self.facing = facing;
        self.capturing = true;
        self.released = false;
        self.warmup_remaining = self.warmup_polls;
        Ok(())
    }

    fn switch_facing(&mut self, facing: CameraFacing) -> TrackerResult<()> {
        if !self.capturing {
            return Err(TrackerError::NotCapturing);
        }
        if let Some(error) = self.fail_next_switch.take() {
            // prior facing kept: no partial switch
            return Err(error);
        }
        if !self.supports_facing(facing) {
            return Err(TrackerError::FacingUnavailable { facing });
        }
        self.prior_facing = Some(self.facing);
        self.facing = facing;
        self.warmup_remaining = self.warmup_polls;
        if let Some(error) = self.fail_warmup_after_switch.take() {
            self.armed_warmup_failure = Some(error);
        }
        Ok(())
    }

    fn poll_capture(&mut self) -> TrackerResult<CaptureProgress> {
        if !self.capturing {
            return Err(TrackerError::NotCapturing);
        }
        if let Some(error) = self.armed_warmup_failure.take() {
            // restart failed: fall back to the previous capture
            if let Some(prior) = self.prior_facing.take() {
                self.facing = prior;
            }
            self.warmup_remaining = 0;
            return Err(error);
        }
        if self.warmup_remaining > 0 {
            self.warmup_remaining -= 1;
            if self.warmup_remaining > 0 {
                return Ok(CaptureProgress::Pending);
            }
        }
        Ok(CaptureProgress::Armed)
    }

    fn poll_frame(&mut self) -> TrackerResult<Option<TrackerFrame>> {
        if !self.capturing {
            return Err(TrackerError::NotCapturing);
        }
        Ok(self.frames.pop_front())
    }

    fn stop_capture(&mut self) -> TrackerResult<()> {
        self.capturing = false;
        self.warmup_remaining = 0;
        Ok(())
    }

    fn release(&mut self) -> TrackerResult<()> {
        self.capturing = false;
        self.released = true;
        self.frames.clear();
        Ok(())
    }

    fn active_facing(&self) -> CameraFacing {
        self.facing
    }

    fn supports_facing(&self, facing: CameraFacing) -> bool {
        self.supported.contains(&facing)
    }

    fn vertical_fov_deg(&self) -> f64 {
        match self.facing {
            CameraFacing::User => self.fov_user_deg,
            CameraFacing::Environment => self.fov_environment_deg,
        }
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }
}

/// Shared handle to a mock tracker. The session owns its engine box, so
/// tests and demos keep one of these to continue scripting frames and
/// inspecting engine state after the handoff. Single-threaded, like the
/// rest of the pipeline.
#[derive(Clone)]
pub struct SharedMockTracker(Rc<RefCell<MockTracker>>);

impl SharedMockTracker {
    pub fn new(mock: MockTracker) -> Self {
        Self(Rc::new(RefCell::new(mock)))
    }

    pub fn push_frame(&self, frame: TrackerFrame) {
        self.0.borrow_mut().push_frame(frame);
    }

    pub fn push_detection(&self, translation: Vector3<f64>, score: f64) {
        self.0.borrow_mut().push_detection(translation, score);
    }

    pub fn push_gap(&self) {
        self.0.borrow_mut().push_gap();
    }

    pub fn fail_next_start(&self, error: TrackerError) {
        self.0.borrow_mut().fail_next_start(error);
    }

    pub fn fail_next_switch(&self, error: TrackerError) {
        self.0.borrow_mut().fail_next_switch(error);
    }

    pub fn fail_warmup_after_switch(&self, error: TrackerError) {
        self.0.borrow_mut().fail_warmup_after_switch(error);
    }

    pub fn facing(&self) -> CameraFacing {
        self.0.borrow().active_facing()
    }

    pub fn released(&self) -> bool {
        self.0.borrow().is_released()
    }

    pub fn queued_frames(&self) -> usize {
        self.0.borrow().queued_frames()
    }
}

impl TrackerEngine for SharedMockTracker {
    fn configure(&mut self, config: &TrackerConfig) -> TrackerResult<()> {
        self.0.borrow_mut().configure(config)
    }

    fn start_capture(&mut self, facing: CameraFacing) -> TrackerResult<()> {
        self.0.borrow_mut().start_capture(facing)
    }

    fn switch_facing(&mut self, facing: CameraFacing) -> TrackerResult<()> {
        self.0.borrow_mut().switch_facing(facing)
    }

    fn poll_capture(&mut self) -> TrackerResult<CaptureProgress> {
        self.0.borrow_mut().poll_capture()
    }

    fn poll_frame(&mut self) -> TrackerResult<Option<TrackerFrame>> {
        self.0.borrow_mut().poll_frame()
    }

    fn stop_capture(&mut self) -> TrackerResult<()> {
        self.0.borrow_mut().stop_capture()
    }

    fn release(&mut self) -> TrackerResult<()> {
        self.0.borrow_mut().release()
    }

    fn active_facing(&self) -> CameraFacing {
        self.0.borrow().active_facing()
    }

    fn supports_facing(&self, facing: CameraFacing) -> bool {
        self.0.borrow().supports_facing(facing)
    }

    fn vertical_fov_deg(&self) -> f64 {
        self.0.borrow().vertical_fov_deg()
    }

    fn is_capturing(&self) -> bool {
        self.0.borrow().is_capturing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warmup_counts_down_per_poll() {
        let mut mock = MockTracker::new().with_warmup_polls(3);
        mock.start_capture(CameraFacing::User).unwrap();
        assert_eq!(mock.poll_capture().unwrap(), CaptureProgress::Pending);
        assert_eq!(mock.poll_capture().unwrap(), CaptureProgress::Pending);
        assert_eq!(mock.poll_capture().unwrap(), CaptureProgress::Armed);
        // stays armed afterwards
        assert_eq!(mock.poll_capture().unwrap(), CaptureProgress::Armed);
    }

    #[test]
    fn frames_drain_in_order() {
        let mut mock = MockTracker::new();
        mock.start_capture(CameraFacing::User).unwrap();
        mock.push_detection(Vector3::new(1.0, 0.0, 0.0), 0.99);
        mock.push_gap();

        let first = mock.poll_frame().unwrap().unwrap();
        assert!(first.detected);
        let second = mock.poll_frame().unwrap().unwrap();
        assert!(!second.detected);
        assert!(mock.poll_frame().unwrap().is_none());
    }

    #[test]
    fn failed_switch_keeps_the_prior_facing() {
        let mut mock = MockTracker::new();
        mock.start_capture(CameraFacing::User).unwrap();
        mock.fail_next_switch(TrackerError::EngineFailure {
            details: "capture restart stalled".to_string(),
        });
        assert!(mock.switch_facing(CameraFacing::Environment).is_err());
        assert_eq!(mock.active_facing(), CameraFacing::User);
    }

    #[test]
    fn warmup_failure_after_switch_reverts_facing() {
        let mut mock = MockTracker::new();
        mock.start_capture(CameraFacing::User).unwrap();
        assert_eq!(mock.poll_capture().unwrap(), CaptureProgress::Armed);

        mock.fail_warmup_after_switch(TrackerError::EngineFailure {
            details: "capture restart stalled".to_string(),
        });
        mock.switch_facing(CameraFacing::Environment).unwrap();
        assert!(mock.poll_capture().is_err());
        // fell back to the previous capture, still armed
        assert_eq!(mock.active_facing(), CameraFacing::User);
        assert_eq!(mock.poll_capture().unwrap(), CaptureProgress::Armed);
    }

    #[test]
    fn unsupported_facing_is_reported() {
        let mut mock =
            MockTracker::new().with_supported_facings(vec![CameraFacing::User]);
        mock.start_capture(CameraFacing::User).unwrap();
        assert_eq!(
            mock.switch_facing(CameraFacing::Environment),
            Err(TrackerError::FacingUnavailable {
                facing: CameraFacing::Environment
            })
        );
    }

    #[test]
    fn fov_tracks_the_facing_mode() {
        let mut mock = MockTracker::new();
        mock.start_capture(CameraFacing::User).unwrap();
        let front = mock.vertical_fov_deg();
        mock.switch_facing(CameraFacing::Environment).unwrap();
        assert_ne!(front, mock.vertical_fov_deg());
    }

    #[test]
    fn release_clears_capture_state() {
        let mut mock = MockTracker::new();
        mock.start_capture(CameraFacing::User).unwrap();
        mock.push_gap();
        mock.release().unwrap();
        assert!(mock.is_released());
        assert!(!mock.is_capturing());
        assert_eq!(mock.queued_frames(), 0);
    }
}
