//! Frame-driven loops
//!
//! [`FrameLoop`] calls a step function once per animation frame until the
//! step reports it is done or the loop is cancelled. Each run carries a
//! generation number; a frame callback from an earlier run (one the
//! scheduler failed to cancel) sees a stale generation and does nothing.

use std::sync::{Arc, Mutex, Weak};
use veer_core::frame::{FrameHandle, FrameScheduler};
use veer_core::sync::lock;

/// Step function: receives the frame timestamp, returns true to keep running
pub type StepFn = Box<dyn FnMut(u64) -> bool + Send>;

#[derive(Default)]
struct LoopState {
    generation: u64,
    running: bool,
    handle: Option<FrameHandle>,
    step: Option<StepFn>,
    frames: u64,
}

struct LoopShared {
    frames: Arc<dyn FrameScheduler>,
    state: Mutex<LoopState>,
}

impl LoopShared {
    fn schedule(self: &Arc<Self>, state: &mut LoopState) {
        let weak: Weak<LoopShared> = Arc::downgrade(self);
        let generation = state.generation;
        state.handle = Some(self.frames.request_frame(Box::new(move |now: u64| {
            if let Some(shared) = weak.upgrade() {
                shared.on_frame(generation, now);
            }
        })));
    }

    fn on_frame(self: &Arc<Self>, generation: u64, now: u64) {
        let mut step = {
            let mut state = lock(&self.state);
            if !state.running || state.generation != generation {
                return;
            }
            state.handle = None;
            state.frames += 1;
            match state.step.take() {
                Some(step) => step,
                None => return,
            }
        };

        // Lock released: the step may cancel this loop
        let keep_going = step(now);

        let mut state = lock(&self.state);
        if !state.running || state.generation != generation {
            return;
        }
        if keep_going {
            state.step = Some(step);
            self.schedule(&mut state);
        } else {
            state.running = false;
            tracing::trace!("frame loop finished after {} frames", state.frames);
        }
    }
}

/// Cancellable per-frame driver
///
/// Cancels itself on drop.
pub struct FrameLoop {
    shared: Arc<LoopShared>,
}

impl FrameLoop {
    pub fn new(frames: Arc<dyn FrameScheduler>) -> Self {
        Self {
            shared: Arc::new(LoopShared {
                frames,
                state: Mutex::new(LoopState::default()),
            }),
        }
    }

    /// Start calling `step` on every frame
    ///
    /// Returns false (and drops `step`) if the loop is already running.
    pub fn run<F>(&self, step: F) -> bool
    where
        F: FnMut(u64) -> bool + Send + 'static,
    {
        let mut state = lock(&self.shared.state);
        if state.running {
            return false;
        }
        state.generation += 1;
        state.running = true;
        state.frames = 0;
        state.step = Some(Box::new(step));
        self.shared.schedule(&mut state);
        true
    }

    /// Stop the loop and cancel the pending frame. Returns true if it was running.
    pub fn cancel(&self) -> bool {
        let (was_running, handle) = {
            let mut state = lock(&self.shared.state);
            let was_running = state.running;
            state.running = false;
            state.generation += 1;
            state.step = None;
            (was_running, state.handle.take())
        };
        if let Some(handle) = handle {
            self.shared.frames.cancel(handle);
        }
        was_running
    }

    pub fn is_running(&self) -> bool {
        lock(&self.shared.state).running
    }

    /// Frames the current (or last) run has stepped
    pub fn frames_run(&self) -> u64 {
        lock(&self.shared.state).frames
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
