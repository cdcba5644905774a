//! Boundary to the external hand-tracking engine
//!
//! The neural-network tracker, its stabilizer, and the camera capture all
//! live behind the [`TrackerEngine`] trait. This module defines the trait,
//! the configuration handed over at initialization, the per-frame payload,
//! the error taxonomy, and a deterministic mock for tests and demos.

pub mod engine;
pub mod error;
pub mod frame;
pub mod mock;

pub use engine::{CaptureProgress, PoseFilterConfig, StabilizerOptions, TrackerConfig, TrackerEngine};
pub use error::{TrackerError, TrackerResult};
pub use frame::{HandLabel, Landmark, TrackerFrame};
pub use mock::{MockTracker, SharedMockTracker};
