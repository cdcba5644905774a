//! Minimal transform node in the classic translate-rotate-scale convention

use nalgebra::{UnitQuaternion, Vector3};

use crate::core::types::RenderPose;

/// A named scene-graph node with a local TRS transform. The real node
/// lives in the external renderer; this mirror carries exactly the state
/// the pipeline owns and hands over.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformNode {
    pub name: String,
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}

impl TransformNode {
    /// Identity-transform node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }

    /// Overwrite this node's transform from a render pose.
    pub fn set_pose(&mut self, pose: &RenderPose) {
        self.position = pose.translation;
        self.rotation = pose.quaternion;
        self.scale = pose.scale;
    }

    /// Transform a point from this node's local space into its parent's.
    pub fn transform_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.position + self.rotation * self.scale.component_mul(point)
    }

    /// Flatten `self ∘ child` into a single node. Non-uniform parent
    /// scale composes componentwise (no shear), matching the TRS node
    /// convention of the renderer.
    pub fn compose(&self, child: &TransformNode) -> TransformNode {
        TransformNode {
            name: child.name.clone(),
            position: self.transform_point(&child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale.component_mul(&child.scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Quaternion;

    #[test]
    fn new_node_is_identity() {
        let node = TransformNode::new("follower");
        assert_eq!(node.transform_point(&Vector3::new(1.0, 2.0, 3.0)), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn set_pose_copies_all_components() {
        let mut node = TransformNode::new("follower");
        let pose = RenderPose {
            translation: Vector3::new(1.0, -2.0, 0.5),
            quaternion: UnitQuaternion::new_normalize(Quaternion::new(0.9, 0.1, 0.0, 0.4)),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        node.set_pose(&pose);
        assert_eq!(node.position, pose.translation);
        assert_eq!(node.rotation, pose.quaternion);
        assert_eq!(node.scale, pose.scale);
    }

    #[test]
    fn compose_with_identity_is_child() {
        let parent = TransformNode::new("parent");
        let mut child = TransformNode::new("child");
        child.position = Vector3::new(3.0, 0.0, -1.0);
        child.scale = Vector3::new(0.5, 0.5, 0.5);
        let composed = parent.compose(&child);
        assert_eq!(composed.position, child.position);
        assert_eq!(composed.scale, child.scale);
    }

    #[test]
    fn compose_applies_parent_scale_then_rotation_to_child_position() {
        let mut parent = TransformNode::new("parent");
        parent.position = Vector3::new(0.0, 10.0, 0.0);
        parent.scale = Vector3::repeat(2.0);
        // quarter turn about Z: +X maps to +Y
        parent.rotation = UnitQuaternion::new_normalize(Quaternion::new(
            (0.5f64).sqrt(),
            0.0,
            0.0,
            (0.5f64).sqrt(),
        ));

        let mut child = TransformNode::new("child");
        child.position = Vector3::new(1.0, 0.0, 0.0);

        let composed = parent.compose(&child);
        assert!((composed.position - Vector3::new(0.0, 12.0, 0.0)).norm() < 1e-9);
    }
}
