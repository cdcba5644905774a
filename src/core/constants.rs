//! Tuned product defaults for the wrist-watch try-on pipeline

/// Minimum detection confidence accepted from the tracking engine.
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.98;

/// Wrist landmark set used for pose estimation. The smaller six-label set
/// is more stable than the full eight-label one.
pub const WRIST_LANDMARK_LABELS: [&str; 6] = [
    "wristBack",
    "wristRight",
    "wristPalm",
    "wristPalmTop",
    "wristBackTop",
    "wristLeft",
];

/// Maximum number of hands tracked simultaneously.
pub const DEFAULT_MAX_HANDS: u8 = 1;

/// Interior (full fade) and exterior (fully opaque) radii of the wrist
/// occluder, in model units.
pub const DEFAULT_OCCLUDER_RADIUS_RANGE: [f64; 2] = [4.0, 4.7];

/// Height of the occluding cylinder along the forearm.
pub const DEFAULT_OCCLUDER_HEIGHT: f64 = 48.0;

/// Flattening applied to the occluder cross-section; 1.0 keeps it circular.
pub const DEFAULT_OCCLUDER_FLATTEN: f64 = 0.6;

/// Occluder orientation relative to the anchor: a quarter turn about X,
/// stored as [x, y, z, w].
pub const DEFAULT_OCCLUDER_QUATERNION: [f64; 4] = [0.707, 0.0, 0.0, 0.707];

/// Uniform scale mapping the watch asset onto the tracked wrist.
pub const DEFAULT_CALIBRATION_SCALE: f64 = 1.9006;

/// Offset of the watch asset origin from the tracked wrist point.
pub const DEFAULT_CALIBRATION_OFFSET: [f64; 3] = [0.076, -0.916, -0.504];

/// Damping applied to raw pose translations by the tracking engine.
pub const DEFAULT_TRANSLATION_SCALING: [f64; 3] = [0.3, 0.3, 0.3];

/// Per-axis factors applied to object points before pose estimation,
/// lowering extreme pose angles. Handed to the engine as-is.
pub const DEFAULT_OBJECT_POINT_FACTORS: [f64; 3] = [1.0, 1.3, 1.0];

/// One-euro stabilizer defaults.
pub const DEFAULT_STABILIZER_MIN_CUT_OFF: f64 = 0.001;
pub const DEFAULT_STABILIZER_BETA: f64 = 5.0;
pub const DEFAULT_STABILIZER_FREQ_RANGE: [f64; 2] = [2.0, 144.0];
pub const DEFAULT_STABILIZER_FORCE_INPUT_RANGE: [f64; 2] = [2.5, 6.0];

/// Landmark error above which the pose flip filter switches models.
pub const DEFAULT_FLIP_SWITCH_ERROR_THRESHOLD: f64 = 0.2;

/// Digital zoom applied to the tracking camera feed.
pub const DEFAULT_CAMERA_ZOOM: f64 = 1.0;

/// Quiet period required before a resize burst is applied.
pub const DEFAULT_DEBOUNCE_DELAY_MS: u64 = 200;

/// Radial tessellation of the occluder cylinder.
pub const OCCLUDER_RADIAL_SEGMENTS: u32 = 32;
