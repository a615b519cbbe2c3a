//! Execution environment
//!
//! Bundles the capabilities the engine needs from its host. The viewport is
//! optional: without one the code is running outside a browser (server
//! rendering, static generation) and consumers fall back to static defaults.

use crate::frame::{Clock, FrameScheduler, NullScheduler, SystemClock};
use crate::viewport::Viewport;
use std::sync::Arc;

/// Host capabilities: viewport, frame scheduler, and clock
#[derive(Clone)]
pub struct Environment {
    viewport: Option<Arc<dyn Viewport>>,
    frames: Arc<dyn FrameScheduler>,
    clock: Arc<dyn Clock>,
}

impl Environment {
    pub fn new(
        viewport: Option<Arc<dyn Viewport>>,
        frames: Arc<dyn FrameScheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            viewport,
            frames,
            clock,
        }
    }

    /// Environment with no viewport and no frame loop
    pub fn headless() -> Self {
        Self {
            viewport: None,
            frames: Arc::new(NullScheduler::new()),
            clock: Arc::new(SystemClock::new()),
        }
    }

    pub fn viewport(&self) -> Option<&Arc<dyn Viewport>> {
        self.viewport.as_ref()
    }

    pub fn frames(&self) -> &Arc<dyn FrameScheduler> {
        &self.frames
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// True when scroll APIs are available
    pub fn is_interactive(&self) -> bool {
        self.viewport.is_some()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("interactive", &self.is_interactive())
            .finish_non_exhaustive()
    }
}
