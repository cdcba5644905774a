//! Render camera model and renderer notification seam
//!
//! The real camera belongs to the external renderer; [`RenderCamera`]
//! mirrors the projection parameters this pipeline is responsible for
//! keeping in sync with the video feed. The per-frame sync only writes
//! scalar fields; the projection matrix is rebuilt lazily on request.

use nalgebra::{Matrix4, Perspective3};

use crate::core::types::Sizing;

/// Hooks the pipeline calls back into the rendering engine with.
pub trait RendererHooks {
    /// The AR canvas geometry changed; resize the renderer viewport.
    fn viewport_resized(&mut self, sizing: &Sizing);
}

/// Perspective camera state reconciled once per render frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCamera {
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub viewport: Sizing,
    projection_dirty: bool,
}

impl RenderCamera {
    pub fn new(fov_y_deg: f64, near: f64, far: f64) -> Self {
        Self {
            fov_y_deg,
            aspect: 1.0,
            near,
            far,
            viewport: Sizing {
                width: 1.0,
                height: 1.0,
                top: 0.0,
                left: 0.0,
            },
            projection_dirty: true,
        }
    }

    /// Update the parameters driven by canvas geometry and the tracker's
    /// camera model. O(1), allocation-free; called at render-loop
    /// frequency.
    pub fn reconcile(&mut self, sizing: &Sizing, effective_fov_y_deg: f64) {
        if self.viewport != *sizing || self.fov_y_deg != effective_fov_y_deg {
            self.viewport = *sizing;
            self.aspect = sizing.aspect();
            self.fov_y_deg = effective_fov_y_deg;
            self.projection_dirty = true;
        }
    }

    pub fn projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    /// Rebuild the projection matrix, clearing the dirty flag.
    pub fn projection_matrix(&mut self) -> Matrix4<f64> {
        self.projection_dirty = false;
        Perspective3::new(self.aspect, self.fov_y_deg.to_radians(), self.near, self.far)
            .to_homogeneous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portrait_sizing() -> Sizing {
        Sizing {
            width: 390.0,
            height: 844.0,
            top: 0.0,
            left: 0.0,
        }
    }

    #[test]
    fn reconcile_updates_aspect_and_fov() {
        let mut camera = RenderCamera::new(50.0, 0.1, 100.0);
        camera.reconcile(&portrait_sizing(), 55.0);
        assert!((camera.aspect - 390.0 / 844.0).abs() < 1e-12);
        assert_eq!(camera.fov_y_deg, 55.0);
        assert!(camera.projection_dirty());
    }

    #[test]
    fn unchanged_input_leaves_projection_clean() {
        let mut camera = RenderCamera::new(50.0, 0.1, 100.0);
        camera.reconcile(&portrait_sizing(), 55.0);
        let _ = camera.projection_matrix();
        assert!(!camera.projection_dirty());

        camera.reconcile(&portrait_sizing(), 55.0);
        assert!(!camera.projection_dirty());
    }

    #[test]
    fn projection_matrix_reflects_fov() {
        let mut camera = RenderCamera::new(60.0, 0.1, 100.0);
        camera.reconcile(&portrait_sizing(), 60.0);
        let m = camera.projection_matrix();
        // m[(1,1)] = 1 / tan(fov/2)
        let expected = 1.0 / (30.0f64.to_radians().tan());
        assert!((m[(1, 1)] - expected).abs() < 1e-9);
    }
}
