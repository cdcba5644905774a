//! Data model for the pose-to-render synchronization pipeline
//!
//! Two coordinate spaces exist side by side: *tracker space* (the axis
//! convention of the external tracking engine) and *render space* (the
//! convention of the 3D scene graph). They are kept apart at the type
//! level: a [`TrackerPose`] can only become a [`RenderPose`] through the
//! converter in `geometry::convert`.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::constants;

/// Scale component of a tracked pose. The engine usually reports a single
/// uniform factor but may scale each axis independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseScale {
    Uniform(f64),
    PerAxis(Vector3<f64>),
}

impl PoseScale {
    pub fn to_vector(self) -> Vector3<f64> {
        match self {
            PoseScale::Uniform(s) => Vector3::repeat(s),
            PoseScale::PerAxis(v) => v,
        }
    }
}

/// A pose sample as emitted by the tracking engine, in tracker-space axes.
/// Immutable once produced; the engine creates a fresh value every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerPose {
    pub translation: Vector3<f64>,
    pub quaternion: UnitQuaternion<f64>,
    pub scale: PoseScale,
}

impl TrackerPose {
    pub fn new(translation: Vector3<f64>, quaternion: UnitQuaternion<f64>, scale: PoseScale) -> Self {
        Self {
            translation,
            quaternion,
            scale,
        }
    }
}

/// A pose in render-space axes, ready to drive the overlay's follower node.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPose {
    pub translation: Vector3<f64>,
    pub quaternion: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}

impl RenderPose {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            quaternion: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }
}

/// Errors raised when a geometry or calibration spec is malformed.
/// Detected at construction time, never during per-frame use.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecError {
    /// Radius range must satisfy `0 <= inner < outer`
    InvalidRadiusRange { inner: f64, outer: f64 },
    /// Flatten coefficient must lie in (0, 1]
    InvalidFlattenCoeff { value: f64 },
    /// Height must be positive
    InvalidHeight { value: f64 },
    /// Scale must be finite and positive
    InvalidScale { value: f64 },
    /// Quaternion has (near-)zero norm and cannot be normalized
    DegenerateQuaternion { coords: [f64; 4] },
    /// A vector component is not a finite number
    NonFiniteComponent { field: &'static str },
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::InvalidRadiusRange { inner, outer } => {
                write!(f, "invalid radius range: inner {} must be >= 0 and < outer {}", inner, outer)
            }
            SpecError::InvalidFlattenCoeff { value } => {
                write!(f, "flatten coefficient {} outside (0, 1]", value)
            }
            SpecError::InvalidHeight { value } => {
                write!(f, "height {} must be positive", value)
            }
            SpecError::InvalidScale { value } => {
                write!(f, "scale {} must be finite and positive", value)
            }
            SpecError::DegenerateQuaternion { coords } => {
                write!(f, "quaternion {:?} has near-zero norm", coords)
            }
            SpecError::NonFiniteComponent { field } => {
                write!(f, "non-finite component in {}", field)
            }
        }
    }
}

impl std::error::Error for SpecError {}

/// Build a unit quaternion from `[x, y, z, w]` coordinates, rejecting
/// degenerate inputs.
pub fn quat_from_xyzw(coords: [f64; 4]) -> Result<UnitQuaternion<f64>, SpecError> {
    let [x, y, z, w] = coords;
    if !(x.is_finite() && y.is_finite() && z.is_finite() && w.is_finite()) {
        return Err(SpecError::NonFiniteComponent { field: "quaternion" });
    }
    let q = Quaternion::new(w, x, y, z);
    if q.norm() < 1e-9 {
        return Err(SpecError::DegenerateQuaternion { coords });
    }
    Ok(UnitQuaternion::new_normalize(q))
}

fn check_finite3(v: [f64; 3], field: &'static str) -> Result<(), SpecError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(SpecError::NonFiniteComponent { field })
    }
}

/// Static per-session calibration mapping a generic tracked pose onto a
/// specific 3D asset's local frame. Accounts for the asset's modeling
/// origin and scale. Quaternion stored as `[x, y, z, w]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSpec {
    pub scale: f64,
    pub offset: [f64; 3],
    pub quaternion: [f64; 4],
}

impl CalibrationSpec {
    /// The no-op calibration.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset: [0.0; 3],
            quaternion: [0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SpecError::InvalidScale { value: self.scale });
        }
        check_finite3(self.offset, "calibration offset")?;
        quat_from_xyzw(self.quaternion)?;
        Ok(())
    }
}

impl Default for CalibrationSpec {
    /// Calibration tuned for the bundled wrist-watch asset.
    fn default() -> Self {
        Self {
            scale: constants::DEFAULT_CALIBRATION_SCALE,
            offset: constants::DEFAULT_CALIBRATION_OFFSET,
            quaternion: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Geometry of the soft occluding volume, relative to the anchor (not
/// world space). `radius_range[0]` is the interior radius where the
/// overlay is fully faded; `radius_range[1]` the exterior radius where it
/// is fully opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccluderSpec {
    pub radius_range: [f64; 2],
    pub height: f64,
    pub offset: [f64; 3],
    pub quaternion: [f64; 4],
    pub flatten_coeff: f64,
}

impl OccluderSpec {
    pub fn validate(&self) -> Result<(), SpecError> {
        let [inner, outer] = self.radius_range;
        if !inner.is_finite() || !outer.is_finite() || inner < 0.0 || inner >= outer {
            return Err(SpecError::InvalidRadiusRange { inner, outer });
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(SpecError::InvalidHeight { value: self.height });
        }
        if !self.flatten_coeff.is_finite() || self.flatten_coeff <= 0.0 || self.flatten_coeff > 1.0 {
            return Err(SpecError::InvalidFlattenCoeff {
                value: self.flatten_coeff,
            });
        }
        check_finite3(self.offset, "occluder offset")?;
        quat_from_xyzw(self.quaternion)?;
        Ok(())
    }

    pub fn inner_radius(&self) -> f64 {
        self.radius_range[0]
    }

    pub fn outer_radius(&self) -> f64 {
        self.radius_range[1]
    }
}

impl Default for OccluderSpec {
    /// Occluder tuned for an adult wrist seen by the wrist-back model.
    fn default() -> Self {
        Self {
            radius_range: constants::DEFAULT_OCCLUDER_RADIUS_RANGE,
            height: constants::DEFAULT_OCCLUDER_HEIGHT,
            offset: [0.0; 3],
            quaternion: constants::DEFAULT_OCCLUDER_QUATERNION,
            flatten_coeff: constants::DEFAULT_OCCLUDER_FLATTEN,
        }
    }
}

/// Which physical camera feeds the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraFacing {
    /// Front ("selfie") camera
    User,
    /// Rear camera
    Environment,
}

impl fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraFacing::User => write!(f, "user"),
            CameraFacing::Environment => write!(f, "environment"),
        }
    }
}

/// Raw viewport dimensions as reported by the device surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportDims {
    pub width: u32,
    pub height: u32,
}

impl ViewportDims {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Placement of the AR canvas inside the viewport. Derived state,
/// recomputed on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub left: f64,
}

impl Sizing {
    /// Width over height of the canvas.
    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_scale_expands_to_vector() {
        let v = PoseScale::Uniform(2.5).to_vector();
        assert_eq!(v, Vector3::new(2.5, 2.5, 2.5));
    }

    #[test]
    fn identity_calibration_is_valid() {
        let spec = CalibrationSpec::identity();
        assert!(spec.validate().is_ok());
        assert_eq!(spec.scale, 1.0);
    }

    #[test]
    fn default_calibration_matches_watch_asset() {
        let spec = CalibrationSpec::default();
        assert!(spec.validate().is_ok());
        assert_eq!(spec.scale, 1.9006);
        assert_eq!(spec.offset, [0.076, -0.916, -0.504]);
    }

    #[test]
    fn occluder_spec_rejects_inverted_radii() {
        let spec = OccluderSpec {
            radius_range: [4.7, 4.0],
            ..OccluderSpec::default()
        };
        assert_eq!(
            spec.validate(),
            Err(SpecError::InvalidRadiusRange { inner: 4.7, outer: 4.0 })
        );
    }

    #[test]
    fn occluder_spec_rejects_equal_radii() {
        let spec = OccluderSpec {
            radius_range: [4.0, 4.0],
            ..OccluderSpec::default()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn occluder_spec_rejects_flatten_out_of_range() {
        for bad in [0.0, -0.2, 1.5] {
            let spec = OccluderSpec {
                flatten_coeff: bad,
                ..OccluderSpec::default()
            };
            assert!(spec.validate().is_err(), "flatten {} accepted", bad);
        }
    }

    #[test]
    fn degenerate_quaternion_is_rejected() {
        assert!(matches!(
            quat_from_xyzw([0.0, 0.0, 0.0, 0.0]),
            Err(SpecError::DegenerateQuaternion { .. })
        ));
    }

    #[test]
    fn quat_from_xyzw_normalizes() {
        let q = quat_from_xyzw([0.707, 0.0, 0.0, 0.707]).unwrap();
        let c = q.into_inner().coords;
        assert!((c.norm() - 1.0).abs() < 1e-12);
        assert!((c.x - c.w).abs() < 1e-12);
    }
}
