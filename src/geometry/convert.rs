//! Tracker-space to render-space pose conversion
//!
//! The tracking engine models the wrist with Y up and Z forward in its own
//! handedness; the scene graph expects the renderer's convention. The
//! remap is the fixed permutation `(x, y, z) -> (x, z, -y)` on both the
//! translation and the quaternion vector part. It is a structural fact of
//! the two coordinate systems, not a tunable.
//!
//! Calibration is applied after the remap, entirely in render space, in a
//! fixed order: scale, then rotate, then translate. Swapping that order
//! changes visual alignment and is a bug, not a choice.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::core::types::{quat_from_xyzw, CalibrationSpec, RenderPose, SpecError, TrackerPose};

/// A validated, runtime-ready calibration baked from a [`CalibrationSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub scale: f64,
    pub offset: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
}

impl Calibration {
    /// Bake a spec into runtime form, validating it once up front so the
    /// per-frame path stays total.
    pub fn from_spec(spec: &CalibrationSpec) -> Result<Self, SpecError> {
        spec.validate()?;
        Ok(Self {
            scale: spec.scale,
            offset: Vector3::from(spec.offset),
            rotation: quat_from_xyzw(spec.quaternion)?,
        })
    }

    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }
}

/// Apply the fixed axis permutation taking a tracker-space pose into
/// render space.
pub fn remap(pose: &TrackerPose) -> RenderPose {
    let t = pose.translation;
    let q = pose.quaternion.into_inner().coords; // [x, y, z, w]
    let s = pose.scale.to_vector();
    RenderPose {
        translation: Vector3::new(t.x, t.z, -t.y),
        quaternion: UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.z, -q.y)),
        // the scale axes follow the same y/z swap; signs drop out
        scale: Vector3::new(s.x, s.z, s.y),
    }
}

/// Compose a calibration onto a render-space pose: scale, then rotate,
/// then translate. The offset is expressed in the pose's local frame, so
/// it is scaled and rotated by the pose before translating.
pub fn apply_calibration(pose: &RenderPose, calibration: &Calibration) -> RenderPose {
    RenderPose {
        translation: pose.translation
            + pose.quaternion * pose.scale.component_mul(&calibration.offset),
        quaternion: pose.quaternion * calibration.rotation,
        scale: pose.scale * calibration.scale,
    }
}

/// Convert a tracked pose into the final render-space model transform.
/// Pure, O(1). Not invoked on detection gaps; the caller retains the
/// previous render pose instead.
pub fn convert(pose: &TrackerPose, calibration: &Calibration) -> RenderPose {
    apply_calibration(&remap(pose), calibration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PoseScale;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    fn assert_vec_close(a: &Vector3<f64>, b: &Vector3<f64>) {
        assert_close(a.x, b.x);
        assert_close(a.y, b.y);
        assert_close(a.z, b.z);
    }

    #[test]
    fn identity_calibration_applies_exactly_the_axis_permutation() {
        let pose = TrackerPose::new(
            Vector3::new(1.0, 2.0, 3.0),
            UnitQuaternion::new_normalize(Quaternion::new(0.9, 0.1, 0.2, 0.3)),
            PoseScale::Uniform(1.0),
        );
        let out = convert(&pose, &Calibration::identity());

        assert_vec_close(&out.translation, &Vector3::new(1.0, 3.0, -2.0));

        let q_in = pose.quaternion.into_inner().coords;
        let q_out = out.quaternion.into_inner().coords;
        assert_close(q_out.x, q_in.x);
        assert_close(q_out.y, q_in.z);
        assert_close(q_out.z, -q_in.y);
        assert_close(q_out.w, q_in.w);
    }

    #[test]
    fn per_axis_scale_follows_the_swap() {
        let pose = TrackerPose::new(
            Vector3::zeros(),
            UnitQuaternion::identity(),
            PoseScale::PerAxis(Vector3::new(1.0, 2.0, 3.0)),
        );
        let out = remap(&pose);
        assert_vec_close(&out.scale, &Vector3::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn noop_calibration_is_idempotent() {
        let noop = Calibration::from_spec(&CalibrationSpec::identity()).unwrap();
        let pose = RenderPose {
            translation: Vector3::new(0.4, -1.2, 2.5),
            quaternion: UnitQuaternion::new_normalize(Quaternion::new(0.8, 0.0, 0.5, 0.1)),
            scale: Vector3::new(1.5, 1.5, 1.5),
        };
        let once = apply_calibration(&pose, &noop);
        let twice = apply_calibration(&once, &noop);
        assert_eq!(once, pose);
        assert_eq!(twice, pose);
    }

    #[test]
    fn calibration_order_is_scale_rotate_translate() {
        // Pose: translation (10, 0, 0), quarter turn about Z, uniform scale 2.
        let quarter_z = UnitQuaternion::new_normalize(Quaternion::new(
            (0.5f64).sqrt(),
            0.0,
            0.0,
            (0.5f64).sqrt(),
        ));
        let pose = RenderPose {
            translation: Vector3::new(10.0, 0.0, 0.0),
            quaternion: quarter_z,
            scale: Vector3::repeat(2.0),
        };
        let calibration = Calibration {
            scale: 3.0,
            offset: Vector3::new(1.0, 0.0, 0.0),
            rotation: UnitQuaternion::identity(),
        };
        let out = apply_calibration(&pose, &calibration);

        // Offset scaled by 2, then rotated onto +Y, then translated.
        assert_vec_close(&out.translation, &Vector3::new(10.0, 2.0, 0.0));
        assert_vec_close(&out.scale, &Vector3::repeat(6.0));
    }

    #[test]
    fn baked_calibration_rejects_bad_spec() {
        let spec = CalibrationSpec {
            scale: -1.0,
            ..CalibrationSpec::identity()
        };
        assert!(Calibration::from_spec(&spec).is_err());
    }

    #[test]
    fn convert_with_default_watch_calibration_scales_uniformly() {
        let calibration = Calibration::from_spec(&CalibrationSpec::default()).unwrap();
        let pose = TrackerPose::new(
            Vector3::zeros(),
            UnitQuaternion::identity(),
            PoseScale::Uniform(1.0),
        );
        let out = convert(&pose, &calibration);
        assert_vec_close(&out.scale, &Vector3::repeat(1.9006));
        // Identity orientation: offset passes through the remapped frame unrotated.
        assert_vec_close(&out.translation, &Vector3::new(0.076, -0.916, -0.504));
    }
}
