//! Device adaptation: viewport sizing policy, debounced resize and
//! orientation handling, and the query seam to the device surface.

pub mod controller;
pub mod debounce;

pub use controller::{compute_sizing, DeviceAdaptationController, FixedViewport, ViewportProvider};
pub use debounce::DebounceTimer;
