//! Wrist-anchored AR overlay synchronization
//!
//! Takes raw wrist poses from an external hand-tracking engine, converts
//! them into stable render-space transforms, drives a soft occlusion
//! volume alongside the overlaid watch model, and keeps the whole
//! pipeline consistent across viewport resizes, orientation changes, and
//! front/back camera switches.

pub mod core;
pub mod device;
pub mod geometry;
pub mod scene;
pub mod session;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use crate::core::types::{
    CalibrationSpec, CameraFacing, OccluderSpec, PoseScale, RenderPose, Sizing, SpecError,
    TrackerPose, ViewportDims,
};
pub use crate::device::controller::{
    compute_sizing, DeviceAdaptationController, FixedViewport, ViewportProvider,
};
pub use crate::device::debounce::DebounceTimer;
pub use crate::geometry::convert::{apply_calibration, convert, remap, Calibration};
pub use crate::geometry::occluder::{build_occlusion_volume, OcclusionVolume, SoftOccluderTag};
pub use crate::scene::anchor::{AttachError, OverlayAnchor};
pub use crate::scene::camera::{RenderCamera, RendererHooks};
pub use crate::scene::node::TransformNode;
pub use crate::session::lifecycle::TrackingSession;
pub use crate::session::types::{SessionError, SessionResult, SessionState, SessionStats};
pub use crate::tracker::engine::{
    CaptureProgress, PoseFilterConfig, StabilizerOptions, TrackerConfig, TrackerEngine,
};
pub use crate::tracker::error::{TrackerError, TrackerResult};
pub use crate::tracker::frame::{HandLabel, Landmark, TrackerFrame};
pub use crate::tracker::mock::{MockTracker, SharedMockTracker};
pub use crate::utils::config::{ConfigError, PipelineConfig};
