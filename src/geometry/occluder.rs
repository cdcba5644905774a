//! Soft occlusion volume construction
//!
//! The occluder is an open-ended cylinder wrapped around the tracked
//! wrist. It never renders color; the renderer's shading stage uses the
//! attached metadata to fade overlay fragments radially between the
//! interior radius (fully hidden) and the exterior radius (fully
//! visible). Built once per asset load, not per frame.

use nalgebra::{UnitQuaternion, Vector3};

use crate::core::constants::OCCLUDER_RADIAL_SEGMENTS;
use crate::core::types::{quat_from_xyzw, OccluderSpec, SpecError};

/// Cylinder primitive description handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderGeometry {
    pub radius_top: f64,
    pub radius_bottom: f64,
    pub height: f64,
    pub radial_segments: u32,
    pub height_segments: u32,
    /// Caps are omitted so the volume reads as a sleeve, not a solid.
    pub open_ended: bool,
}

/// Metadata consumed by the renderer's fragment fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftOccluderTag {
    pub is_soft_occluder: bool,
    /// Exterior radius: fragments beyond it are fully visible.
    pub radius: f64,
    /// Width of the radial fade band (exterior minus interior radius).
    pub fade_width: f64,
}

/// The built occluding volume: geometry, placement relative to the
/// anchor, and fade metadata. The builder supplies data only; drawing is
/// the renderer's job.
#[derive(Debug, Clone, PartialEq)]
pub struct OcclusionVolume {
    pub geometry: CylinderGeometry,
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
    pub metadata: SoftOccluderTag,
}

/// Build the occlusion volume for a validated spec. Malformed specs fail
/// here, at construction time, never at per-frame use.
pub fn build_occlusion_volume(spec: &OccluderSpec) -> Result<OcclusionVolume, SpecError> {
    spec.validate()?;

    let outer = spec.outer_radius();
    Ok(OcclusionVolume {
        geometry: CylinderGeometry {
            radius_top: outer,
            radius_bottom: outer,
            height: spec.height,
            radial_segments: OCCLUDER_RADIAL_SEGMENTS,
            height_segments: 1,
            open_ended: true,
        },
        position: Vector3::from(spec.offset),
        rotation: quat_from_xyzw(spec.quaternion)?,
        // wrists are elliptical; flatten one cross-section axis
        scale: Vector3::new(1.0, 1.0, spec.flatten_coeff),
        metadata: SoftOccluderTag {
            is_soft_occluder: true,
            radius: outer,
            fade_width: outer - spec.inner_radius(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wrist_occluder_dimensions() {
        let spec = OccluderSpec {
            radius_range: [4.0, 4.7],
            height: 48.0,
            flatten_coeff: 0.6,
            ..OccluderSpec::default()
        };
        let volume = build_occlusion_volume(&spec).unwrap();

        assert_eq!(volume.geometry.radius_top, 4.7);
        assert_eq!(volume.geometry.radius_bottom, 4.7);
        assert_eq!(volume.geometry.height, 48.0);
        assert!(volume.geometry.open_ended);
        assert_eq!(volume.scale, Vector3::new(1.0, 1.0, 0.6));

        assert!(volume.metadata.is_soft_occluder);
        assert_eq!(volume.metadata.radius, 4.7);
        assert!((volume.metadata.fade_width - 0.7).abs() < 1e-12);
    }

    #[test]
    fn placement_comes_from_the_spec() {
        let spec = OccluderSpec {
            offset: [0.5, -1.0, 2.0],
            ..OccluderSpec::default()
        };
        let volume = build_occlusion_volume(&spec).unwrap();
        assert_eq!(volume.position, Vector3::new(0.5, -1.0, 2.0));
        // default orientation is a quarter turn about X
        let c = volume.rotation.into_inner().coords;
        assert!((c.x - c.w).abs() < 1e-9);
        assert!(c.y.abs() < 1e-9 && c.z.abs() < 1e-9);
    }

    #[test]
    fn malformed_spec_fails_at_build_time() {
        let spec = OccluderSpec {
            radius_range: [5.0, 4.0],
            ..OccluderSpec::default()
        };
        assert!(build_occlusion_volume(&spec).is_err());

        let spec = OccluderSpec {
            height: 0.0,
            ..OccluderSpec::default()
        };
        assert!(build_occlusion_volume(&spec).is_err());
    }
}
