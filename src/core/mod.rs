//! Core data types shared across the overlay pipeline

pub mod constants;
pub mod types;

pub use types::{
    quat_from_xyzw, CalibrationSpec, CameraFacing, OccluderSpec, PoseScale, RenderPose, Sizing,
    SpecError, TrackerPose, ViewportDims,
};
