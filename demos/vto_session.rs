//! Minimal try-on pipeline walkthrough: convert a tracked pose, build the
//! occluder, and run a short session against the mock engine.

use nalgebra::{UnitQuaternion, Vector3};

use posesync::{
    build_occlusion_volume, convert, Calibration, MockTracker, OccluderSpec, PipelineConfig,
    PoseScale, SharedMockTracker, TrackerPose, TrackingSession, TransformNode,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Pose conversion ===");
    let tracked = TrackerPose::new(
        Vector3::new(0.1, 0.5, -0.2),
        UnitQuaternion::identity(),
        PoseScale::Uniform(1.0),
    );
    let calibration = Calibration::from_spec(&PipelineConfig::default().calibration)?;
    let render = convert(&tracked, &calibration);
    println!(
        "tracker ({:.2}, {:.2}, {:.2}) -> render ({:.3}, {:.3}, {:.3}), scale {:.4}",
        tracked.translation.x,
        tracked.translation.y,
        tracked.translation.z,
        render.translation.x,
        render.translation.y,
        render.translation.z,
        render.scale.x
    );

    println!("\n=== Occlusion volume ===");
    let volume = build_occlusion_volume(&OccluderSpec::default())?;
    println!(
        "cylinder r={} h={} open={}, fade width {:.2}",
        volume.geometry.radius_top,
        volume.geometry.height,
        volume.geometry.open_ended,
        volume.metadata.fade_width
    );

    println!("\n=== Session ===");
    let shared = SharedMockTracker::new(MockTracker::new());
    let mut session = TrackingSession::new(Box::new(shared.clone()), PipelineConfig::default())?;
    session.initialize_blocking(8)?;
    session.attach_model(TransformNode::new("watch"))?;

    shared.push_detection(Vector3::new(0.3, 0.2, -0.5), 0.995);
    shared.push_gap();
    session.pump()?;

    let stats = session.stats();
    println!(
        "frames {} / detections {} / gaps {} (pose held across the gap)",
        stats.frames_processed, stats.detections, stats.gaps
    );

    session.destroy();
    Ok(())
}
