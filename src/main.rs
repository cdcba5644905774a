//! End-to-end simulation of a try-on session over the mock engine:
//! initialization, tracked frames with gaps, a resize burst, a camera
//! flip, and teardown.

use std::time::{Duration, Instant};

use nalgebra::Vector3;

use posesync::{
    compute_sizing, CameraFacing, DeviceAdaptationController, FixedViewport, MockTracker,
    PipelineConfig, RenderCamera, RendererHooks, SessionState, SharedMockTracker, Sizing,
    TrackingSession, TransformNode, ViewportDims,
};

struct LoggingRenderer;

impl RendererHooks for LoggingRenderer {
    fn viewport_resized(&mut self, sizing: &Sizing) {
        println!(
            "  renderer viewport -> {}x{} at ({}, {})",
            sizing.width, sizing.height, sizing.left, sizing.top
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Wrist AR Overlay - Session Simulation ===\n");

    let config = PipelineConfig::default();
    let shared = SharedMockTracker::new(MockTracker::new().with_warmup_polls(2));
    let mut session = TrackingSession::new(Box::new(shared.clone()), config)?;

    // -- initialization -------------------------------------------------
    println!("--- Initialization ---");
    session.begin_initialize()?;
    while session.state() != SessionState::Ready {
        session.pump()?;
    }
    println!("session ready, facing '{}'\n", session.active_facing());

    // -- device adaptation ----------------------------------------------
    let viewport = FixedViewport::new(390, 844);
    let mut controller = DeviceAdaptationController::new(
        Box::new(viewport.clone()),
        session.config().debounce_delay(),
    );
    let mut renderer = LoggingRenderer;
    let mut camera = RenderCamera::new(50.0, 0.1, 100.0);

    println!("--- Tracked frames ---");
    shared.push_detection(Vector3::new(0.2, 0.1, -0.4), 0.99);
    shared.push_detection(Vector3::new(0.22, 0.09, -0.41), 0.99);
    shared.push_gap();
    let handled = session.pump()?;
    println!("handled {} frames", handled);
    if let Some(pose) = session.last_pose() {
        println!(
            "held pose translation ({:.3}, {:.3}, {:.3})\n",
            pose.translation.x, pose.translation.y, pose.translation.z
        );
    }

    // model arrives late, tracking has been running the whole time
    session.attach_model(TransformNode::new("watch"))?;
    println!("watch model attached, occluder mounted\n");

    // -- resize burst ----------------------------------------------------
    println!("--- Resize burst ---");
    let t0 = Instant::now();
    for i in 0..10 {
        controller.on_resize(t0 + Duration::from_millis(i * 5));
    }
    viewport.set(844, 390);
    controller.tick(
        t0 + Duration::from_millis(45) + session.config().debounce_delay(),
        session.is_ready(),
        &mut renderer,
    );
    println!("applied {} resize cycle(s)\n", controller.resize_cycles());

    session.per_frame_sync(controller.sizing(), &mut camera);
    println!(
        "camera reconciled: fov {:.1} deg, aspect {:.3}\n",
        camera.fov_y_deg, camera.aspect
    );

    // -- camera flip -----------------------------------------------------
    println!("--- Camera flip ---");
    session.begin_facing_switch(CameraFacing::Environment)?;
    while session.state() != SessionState::Ready {
        session.pump()?;
    }
    session.per_frame_sync(controller.sizing(), &mut camera);
    println!(
        "facing '{}', mirrored: {}, fov {:.1} deg\n",
        session.active_facing(),
        session.is_mirrored(),
        camera.fov_y_deg
    );

    // -- teardown --------------------------------------------------------
    let stats = session.stats().clone();
    session.destroy();
    session.destroy(); // idempotent

    println!("--- Stats ---");
    println!("frames processed: {}", stats.frames_processed);
    println!("detections:       {}", stats.detections);
    println!("gaps:             {}", stats.gaps);
    println!("facing switches:  {}", stats.facing_switches);

    let sizing = compute_sizing(ViewportDims::new(844, 390));
    println!(
        "\nlandscape sizing check: {}x{} at left {}",
        sizing.width, sizing.height, sizing.left
    );

    println!("\nSession simulation completed successfully!");
    Ok(())
}
