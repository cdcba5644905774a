//! Viewport sizing policy and debounced device-event handling
//!
//! The AR canvas is square-constrained to the shorter viewport edge and
//! horizontally centered, matching the square-ish input framing the
//! tracking model expects. Resize and orientation bursts are coalesced by
//! the debounce timer; the renderer is only notified once the session is
//! ready, but the sizing itself is always kept current so layout is
//! correct before the first frame.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::core::types::{Sizing, ViewportDims};
use crate::device::debounce::DebounceTimer;
use crate::scene::camera::RendererHooks;

/// Device surface seam: viewport dimensions are queried, never assumed.
pub trait ViewportProvider {
    fn dimensions(&self) -> ViewportDims;
}

/// Square-constrained, horizontally centered canvas placement.
pub fn compute_sizing(dims: ViewportDims) -> Sizing {
    let vw = f64::from(dims.width);
    let vh = f64::from(dims.height);
    let width = vw.min(vh);
    Sizing {
        width,
        height: vh,
        top: 0.0,
        left: (vw - width) / 2.0,
    }
}

/// Reacts to viewport resize/orientation events without ever
/// desynchronizing the overlay from the video feed. Infallible: pure
/// geometry plus event bookkeeping.
pub struct DeviceAdaptationController {
    viewport: Box<dyn ViewportProvider>,
    timer: DebounceTimer,
    sizing: Sizing,
    resize_cycles: u32,
}

impl DeviceAdaptationController {
    pub fn new(viewport: Box<dyn ViewportProvider>, debounce_delay: Duration) -> Self {
        let sizing = compute_sizing(viewport.dimensions());
        Self {
            viewport,
            timer: DebounceTimer::new(debounce_delay),
            sizing,
            resize_cycles: 0,
        }
    }

    /// A resize event arrived; fold it into the pending quiet period.
    pub fn on_resize(&mut self, now: Instant) {
        log::debug!("viewport resize event, debouncing");
        self.timer.schedule(now);
    }

    /// Orientation changes reuse the resize path: the viewport dimensions
    /// are re-queried either way.
    pub fn on_orientation_change(&mut self, now: Instant) {
        log::debug!("orientation change event, debouncing");
        self.timer.schedule(now);
    }

    /// Current canvas placement, valid from construction onward.
    pub fn sizing(&self) -> &Sizing {
        &self.sizing
    }

    /// Number of applied recompute/notify cycles.
    pub fn resize_cycles(&self) -> u32 {
        self.resize_cycles
    }

    pub fn has_pending_resize(&self) -> bool {
        self.timer.is_pending()
    }

    /// Drive the debounce timer. When the quiet period elapses the sizing
    /// is recomputed; the renderer is notified only if the session is
    /// ready (before that there is nothing to notify). Returns the fresh
    /// sizing when a cycle was applied.
    pub fn tick(
        &mut self,
        now: Instant,
        session_ready: bool,
        renderer: &mut dyn RendererHooks,
    ) -> Option<Sizing> {
        if !self.timer.poll(now) {
            return None;
        }
        self.sizing = compute_sizing(self.viewport.dimensions());
        self.resize_cycles += 1;
        log::debug!(
            "applied viewport sizing {}x{} at left {}",
            self.sizing.width,
            self.sizing.height,
            self.sizing.left
        );
        if session_ready {
            renderer.viewport_resized(&self.sizing);
        }
        Some(self.sizing)
    }
}

/// In-memory viewport for demos and tests; dimensions are settable
/// through shared handles.
#[derive(Debug)]
pub struct FixedViewport {
    dims: Cell<ViewportDims>,
}

impl FixedViewport {
    pub fn new(width: u32, height: u32) -> Rc<Self> {
        Rc::new(Self {
            dims: Cell::new(ViewportDims::new(width, height)),
        })
    }

    pub fn set(&self, width: u32, height: u32) {
        self.dims.set(ViewportDims::new(width, height));
    }
}

impl ViewportProvider for Rc<FixedViewport> {
    fn dimensions(&self) -> ViewportDims {
        self.dims.get()
    }
}
