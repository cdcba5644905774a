//! Pure geometry: tracker-to-render pose conversion and the soft
//! occlusion volume. Everything here is synchronous, total over validated
//! inputs, and free of side effects.

pub mod convert;
pub mod occluder;

pub use convert::{apply_calibration, convert, remap, Calibration};
pub use occluder::{build_occlusion_volume, CylinderGeometry, OcclusionVolume, SoftOccluderTag};
