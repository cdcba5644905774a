//! Overlay anchor: the transform hierarchy that lets one tracked pose
//! drive the watch model and its occluder as a single rigid unit
//!
//! Three levels of indirection decouple per-frame tracking from async
//! asset loading:
//!
//! - *follower*: overwritten by the tracking callback every frame;
//! - *mount*: stable attachment point for loaded content;
//! - *content root*: holds the loaded model and the occlusion volume as
//!   siblings.
//!
//! The follower can be updated long before any content exists; attaching
//! later never perturbs it.

use std::fmt;

use nalgebra::Vector3;

use crate::core::types::RenderPose;
use crate::geometry::occluder::OcclusionVolume;
use crate::scene::node::TransformNode;

/// Errors from anchor content management.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachError {
    /// The hierarchy is established exactly once per session.
    AlreadyAttached,
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::AlreadyAttached => write!(f, "overlay content is already attached"),
        }
    }
}

impl std::error::Error for AttachError {}

/// Loaded content mounted under the anchor.
#[derive(Debug, Clone)]
struct AttachedContent {
    root: TransformNode,
    model: TransformNode,
    occluder_node: TransformNode,
    occluder: OcclusionVolume,
}

/// Owner of the follower → mount → content hierarchy.
#[derive(Debug, Clone)]
pub struct OverlayAnchor {
    follower: TransformNode,
    mount: TransformNode,
    content: Option<AttachedContent>,
}

impl OverlayAnchor {
    pub fn new() -> Self {
        Self {
            follower: TransformNode::new("follower"),
            mount: TransformNode::new("mount"),
            content: None,
        }
    }

    /// Mount the loaded model and its occlusion volume under the anchor.
    /// Called once, whenever asset loading finishes; tracking may already
    /// have been driving the follower for many frames.
    pub fn attach(&mut self, model: TransformNode, occluder: OcclusionVolume) -> Result<(), AttachError> {
        if self.content.is_some() {
            return Err(AttachError::AlreadyAttached);
        }
        let mut occluder_node = TransformNode::new("soft-occluder");
        occluder_node.position = occluder.position;
        occluder_node.rotation = occluder.rotation;
        occluder_node.scale = occluder.scale;

        self.content = Some(AttachedContent {
            root: TransformNode::new("content"),
            model,
            occluder_node,
            occluder,
        });
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.content.is_some()
    }

    /// Copy the render pose onto the follower node. Strict pass-through:
    /// stabilization happens upstream in the tracking engine, so this
    /// stays deterministic and testable in isolation.
    pub fn update_transform(&mut self, pose: &RenderPose) {
        self.follower.set_pose(pose);
    }

    pub fn follower(&self) -> &TransformNode {
        &self.follower
    }

    /// The occlusion volume currently mounted, if any.
    pub fn occlusion_volume(&self) -> Option<&OcclusionVolume> {
        self.content.as_ref().map(|c| &c.occluder)
    }

    fn content_base(&self) -> Option<TransformNode> {
        self.content
            .as_ref()
            .map(|c| self.follower.compose(&self.mount).compose(&c.root))
    }

    /// World transform of the model node, if content is attached.
    pub fn model_world_transform(&self) -> Option<TransformNode> {
        let base = self.content_base()?;
        self.content.as_ref().map(|c| base.compose(&c.model))
    }

    /// World transform of the occluder node. Parented under the same
    /// per-frame node as the model, so it tracks the wrist rigidly with
    /// zero added latency.
    pub fn occluder_world_transform(&self) -> Option<TransformNode> {
        let base = self.content_base()?;
        self.content.as_ref().map(|c| base.compose(&c.occluder_node))
    }

    /// World position of the follower origin; useful for debug overlays.
    pub fn anchor_position(&self) -> Vector3<f64> {
        self.follower.position
    }
}

impl Default for OverlayAnchor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::OccluderSpec;
    use crate::geometry::occluder::build_occlusion_volume;
    use nalgebra::{Quaternion, UnitQuaternion};

    fn watch_volume() -> OcclusionVolume {
        build_occlusion_volume(&OccluderSpec::default()).unwrap()
    }

    fn sample_pose() -> RenderPose {
        RenderPose {
            translation: Vector3::new(0.5, 1.0, -2.0),
            quaternion: UnitQuaternion::new_normalize(Quaternion::new(0.9, 0.1, 0.2, 0.0)),
            scale: Vector3::repeat(1.9),
        }
    }

    #[test]
    fn updates_before_attach_touch_only_the_follower() {
        let mut anchor = OverlayAnchor::new();
        anchor.update_transform(&sample_pose());

        assert!(!anchor.is_attached());
        assert_eq!(anchor.follower().position, Vector3::new(0.5, 1.0, -2.0));
        assert!(anchor.model_world_transform().is_none());
        assert!(anchor.occluder_world_transform().is_none());
    }

    #[test]
    fn attach_is_rejected_the_second_time() {
        let mut anchor = OverlayAnchor::new();
        anchor
            .attach(TransformNode::new("watch"), watch_volume())
            .unwrap();
        let again = anchor.attach(TransformNode::new("watch"), watch_volume());
        assert_eq!(again, Err(AttachError::AlreadyAttached));
        assert!(anchor.is_attached());
    }

    #[test]
    fn attach_does_not_perturb_the_follower() {
        let mut anchor = OverlayAnchor::new();
        anchor.update_transform(&sample_pose());
        let before = anchor.follower().clone();
        anchor
            .attach(TransformNode::new("watch"), watch_volume())
            .unwrap();
        assert_eq!(anchor.follower(), &before);
    }

    #[test]
    fn update_transform_is_a_strict_pass_through() {
        let mut anchor = OverlayAnchor::new();
        let pose = sample_pose();
        anchor.update_transform(&pose);
        assert_eq!(anchor.follower().position, pose.translation);
        assert_eq!(anchor.follower().rotation, pose.quaternion);
        assert_eq!(anchor.follower().scale, pose.scale);
    }

    #[test]
    fn model_and_occluder_share_the_follower_transform() {
        let mut anchor = OverlayAnchor::new();
        anchor
            .attach(TransformNode::new("watch"), watch_volume())
            .unwrap();

        let pose = RenderPose {
            translation: Vector3::new(3.0, 0.0, 0.0),
            quaternion: UnitQuaternion::identity(),
            scale: Vector3::repeat(2.0),
        };
        anchor.update_transform(&pose);

        let model = anchor.model_world_transform().unwrap();
        let occluder = anchor.occluder_world_transform().unwrap();
        // model sits at the follower origin; occluder is offset-free by default
        assert_eq!(model.position, Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(occluder.position, Vector3::new(3.0, 0.0, 0.0));
        // flatten factor rides on top of the follower scale
        assert!((occluder.scale.z - 2.0 * 0.6).abs() < 1e-12);
    }
}
