//! Scene-graph boundary: the transform hierarchy driven by tracked poses
//! and the render camera whose projection the per-frame sync mutates.

pub mod anchor;
pub mod camera;
pub mod node;

pub use anchor::{AttachError, OverlayAnchor};
pub use camera::{RenderCamera, RendererHooks};
pub use node::TransformNode;
