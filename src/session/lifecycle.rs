//! The tracking session: lifecycle management and per-frame sync
//!
//! An explicit session object owns all mutable pipeline state (the boxed
//! engine, the overlay anchor, the last published render pose, the
//! statistics) and is passed by reference to the render-loop and
//! device-adaptation callbacks. There is no ambient singleton.
//!
//! The concurrency model is single-threaded cooperative. Two external
//! callback sources drive the session: the render loop calls
//! [`TrackingSession::per_frame_sync`] once per display frame, and the
//! host calls [`TrackingSession::pump`] at tracking cadence to drive
//! in-flight lifecycle transitions and drain processed camera frames.
//! Lifecycle transitions are two-phase (request, then poll to completion
//! through `pump`) and serialized: a request while another transition is
//! pending is rejected, never interleaved.

use crate::core::types::{CameraFacing, RenderPose, Sizing};
use crate::geometry::convert::{convert, Calibration};
use crate::geometry::occluder::build_occlusion_volume;
use crate::scene::anchor::OverlayAnchor;
use crate::scene::camera::RenderCamera;
use crate::scene::node::TransformNode;
use crate::session::types::{SessionError, SessionResult, SessionState, SessionStats};
use crate::tracker::engine::{CaptureProgress, TrackerEngine};
use crate::tracker::frame::TrackerFrame;
use crate::utils::config::PipelineConfig;

/// A lifecycle transition currently being driven by `pump`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingTransition {
    Initialize,
    FacingSwitch {
        to: CameraFacing,
        prior: CameraFacing,
    },
}

/// Owner of one tracking session from initialization to teardown.
pub struct TrackingSession {
    engine: Box<dyn TrackerEngine>,
    config: PipelineConfig,
    calibration: Calibration,
    state: SessionState,
    pending: Option<PendingTransition>,
    anchor: OverlayAnchor,
    last_pose: Option<RenderPose>,
    stats: SessionStats,
}

impl TrackingSession {
    /// Create a session over an engine. The configuration is validated in
    /// full before anything is applied.
    pub fn new(engine: Box<dyn TrackerEngine>, config: PipelineConfig) -> SessionResult<Self> {
        config.validate()?;
        let calibration =
            Calibration::from_spec(&config.calibration).map_err(|e| SessionError::Configuration {
                parameter: "calibration".to_string(),
                value: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            engine,
            config,
            calibration,
            state: SessionState::Uninitialized,
            pending: None,
            anchor: OverlayAnchor::new(),
            last_pose: None,
            stats: SessionStats::default(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// The most recently published render pose, held across detection
    /// gaps.
    pub fn last_pose(&self) -> Option<&RenderPose> {
        self.last_pose.as_ref()
    }

    pub fn anchor(&self) -> &OverlayAnchor {
        &self.anchor
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn active_facing(&self) -> CameraFacing {
        self.engine.active_facing()
    }

    /// Selfie feeds are displayed mirrored.
    pub fn is_mirrored(&self) -> bool {
        self.active_facing() == CameraFacing::User
    }

    /// Hand the configuration to the engine and start capture. The
    /// session reaches `Ready` once `pump` observes the first-frame
    /// pipeline armed. Failures surface to the caller; there is no
    /// automatic retry, since camera-permission failures need user
    /// action.
    pub fn begin_initialize(&mut self) -> SessionResult<()> {
        if self.pending.is_some() {
            return Err(SessionError::TransitionInFlight {
                operation: "initialize",
            });
        }
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::StatePrecondition {
                operation: "initialize",
                state: self.state,
            });
        }

        self.engine
            .configure(&self.config.tracker)
            .map_err(|source| SessionError::Initialization { source })?;
        self.engine
            .start_capture(self.config.tracker.initial_facing)
            .map_err(|source| SessionError::Initialization { source })?;

        self.state = SessionState::Initializing;
        self.pending = Some(PendingTransition::Initialize);
        log::info!(
            "tracking session initializing, facing '{}'",
            self.config.tracker.initial_facing
        );
        Ok(())
    }

    /// Convenience wrapper driving `pump` until the session is ready.
    pub fn initialize_blocking(&mut self, max_pumps: u32) -> SessionResult<()> {
        self.begin_initialize()?;
        for _ in 0..max_pumps {
            self.pump()?;
            if self.state == SessionState::Ready {
                return Ok(());
            }
        }
        Err(SessionError::Initialization {
            source: crate::tracker::error::TrackerError::EngineFailure {
                details: format!("capture warm-up incomplete after {} pumps", max_pumps),
            },
        })
    }

    /// Request a camera-facing change. The session transitions
    /// `Ready → Initializing → Ready` through `pump` without tearing the
    /// overlay down: the anchor, the held pose, and per-frame sync keep
    /// operating throughout. On failure the session remains ready on the
    /// prior facing mode; never a partial switch.
    pub fn begin_facing_switch(&mut self, facing: CameraFacing) -> SessionResult<()> {
        if self.pending.is_some() {
            return Err(SessionError::TransitionInFlight {
                operation: "switch facing",
            });
        }
        if self.state != SessionState::Ready {
            return Err(SessionError::StatePrecondition {
                operation: "switch facing",
                state: self.state,
            });
        }
        let prior = self.engine.active_facing();
        if facing == prior {
            log::debug!("facing '{}' already active", facing);
            return Ok(());
        }
        if !self.engine.supports_facing(facing) {
            return Err(SessionError::CameraSwitch {
                requested: facing,
                source: crate::tracker::error::TrackerError::FacingUnavailable { facing },
            });
        }
        self.engine
            .switch_facing(facing)
            .map_err(|source| SessionError::CameraSwitch {
                requested: facing,
                source,
            })?;

        self.state = SessionState::Initializing;
        self.pending = Some(PendingTransition::FacingSwitch { to: facing, prior });
        log::info!("switching camera facing '{}' -> '{}'", prior, facing);
        Ok(())
    }

    /// Drive the session: complete any in-flight lifecycle transition and
    /// drain processed camera frames. Returns the number of frames
    /// handled. Called from the tracking callback cadence.
    pub fn pump(&mut self) -> SessionResult<u32> {
        if matches!(self.state, SessionState::Uninitialized | SessionState::Destroyed) {
            return Ok(0);
        }

        if let Some(transition) = self.pending {
            match self.engine.poll_capture() {
                Ok(CaptureProgress::Pending) => {}
                Ok(CaptureProgress::Armed) => {
                    self.pending = None;
                    self.state = SessionState::Ready;
                    match transition {
                        PendingTransition::Initialize => {
                            log::info!("tracking session ready");
                        }
                        PendingTransition::FacingSwitch { to, .. } => {
                            self.stats.facing_switches += 1;
                            log::info!("camera facing '{}' active", to);
                        }
                    }
                }
                Err(source) => {
                    self.pending = None;
                    return match transition {
                        PendingTransition::Initialize => {
                            self.state = SessionState::Uninitialized;
                            let _ = self.engine.stop_capture();
                            Err(SessionError::Initialization { source })
                        }
                        PendingTransition::FacingSwitch { to, prior } => {
                            // the engine fell back to the prior capture
                            self.state = SessionState::Ready;
                            log::warn!(
                                "camera switch to '{}' failed, staying on '{}'",
                                to,
                                prior
                            );
                            Err(SessionError::CameraSwitch {
                                requested: to,
                                source,
                            })
                        }
                    };
                }
            }
        }

        let mut handled = 0;
        if self.state == SessionState::Ready {
            loop {
                match self.engine.poll_frame() {
                    Ok(Some(frame)) => {
                        self.handle_frame(frame);
                        handled += 1;
                    }
                    Ok(None) => break,
                    Err(error) => {
                        self.stats.engine_faults += 1;
                        log::warn!("tracker fault while draining frames: {}", error);
                        break;
                    }
                }
            }
        }
        Ok(handled)
    }

    /// Stop capture, release the engine, and enter `Destroyed`. Safe to
    /// call from any state, any number of times.
    pub fn destroy(&mut self) {
        if self.state == SessionState::Destroyed {
            return;
        }
        self.pending = None;
        if self.engine.is_capturing() {
            if let Err(error) = self.engine.stop_capture() {
                log::warn!("stop_capture during destroy failed: {}", error);
            }
        }
        if let Err(error) = self.engine.release() {
            log::warn!("engine release during destroy failed: {}", error);
        }
        self.state = SessionState::Destroyed;
        log::info!("tracking session destroyed");
    }

    /// Mount the loaded watch model under the anchor, together with the
    /// occlusion volume built from the configured spec. Tolerates being
    /// called long after tracking has started producing poses.
    pub fn attach_model(&mut self, model: TransformNode) -> SessionResult<()> {
        let volume =
            build_occlusion_volume(&self.config.occluder).map_err(|e| SessionError::Configuration {
                parameter: "occluder".to_string(),
                value: String::new(),
                reason: e.to_string(),
            })?;
        self.anchor
            .attach(model, volume)
            .map_err(|_| SessionError::ModelAlreadyAttached)
    }

    /// The registered per-frame callback, invoked by the render loop once
    /// per display frame: reconcile the renderer camera with the current
    /// canvas sizing and the tracker's camera model. O(1) and
    /// allocation-free.
    pub fn per_frame_sync(&self, sizing: &Sizing, camera: &mut RenderCamera) {
        let effective_fov = self.engine.vertical_fov_deg() / self.config.tracker.camera_zoom;
        camera.reconcile(sizing, effective_fov);
    }

    /// One processed tracker frame. A missing or under-threshold
    /// detection is a gap: expected, counted, and handled by retaining
    /// the previous render pose exactly (hold-last-pose). The converter
    /// is not invoked on gaps.
    fn handle_frame(&mut self, frame: TrackerFrame) {
        self.stats.frames_processed += 1;

        let accepted = frame.detected
            && frame.score >= self.config.tracker.detection_threshold
            && frame.pose.is_some();

        if accepted {
            if let Some(tracker_pose) = frame.pose {
                let render_pose = convert(&tracker_pose, &self.calibration);
                self.anchor.update_transform(&render_pose);
                self.last_pose = Some(render_pose);
                self.stats.detections += 1;
                self.stats.consecutive_gaps = 0;
                return;
            }
        }

        self.stats.gaps += 1;
        self.stats.consecutive_gaps += 1;
    }
}
