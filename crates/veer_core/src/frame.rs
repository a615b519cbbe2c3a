//! Frame and timer scheduling
//!
//! The engine never reads wall time or registers frame callbacks directly.
//! It goes through [`Clock`] and [`FrameScheduler`], which the host supplies:
//! a browser binding forwards to its animation-frame and timer APIs, while
//! tests and headless replays use [`ManualFrameLoop`] and step time by hand.

use crate::sync::lock;
use slotmap::{new_key_type, SlotMap};
use std::sync::Mutex;
use std::time::Instant;

new_key_type! {
    /// Handle for a scheduled frame or timeout callback
    pub struct FrameHandle;
}

/// Callback run on a frame; receives the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(u64) + Send>;

/// Monotonic millisecond clock
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Schedules callbacks on the next animation frame or after a delay
pub trait FrameScheduler: Send + Sync {
    /// Run `callback` on the next frame
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Run `callback` once `delay_ms` have elapsed
    fn request_timeout(&self, delay_ms: u64, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending callback. Returns false if it already ran or was unknown.
    fn cancel(&self, handle: FrameHandle) -> bool;
}

/// Wall clock measured from construction
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Scheduler for environments without a frame loop (server rendering)
///
/// Accepts requests and drops the callbacks; nothing ever runs.
#[derive(Default)]
pub struct NullScheduler {
    handles: Mutex<SlotMap<FrameHandle, ()>>,
}

impl NullScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for NullScheduler {
    fn request_frame(&self, _callback: FrameCallback) -> FrameHandle {
        lock(&self.handles).insert(())
    }

    fn request_timeout(&self, _delay_ms: u64, _callback: FrameCallback) -> FrameHandle {
        lock(&self.handles).insert(())
    }

    fn cancel(&self, handle: FrameHandle) -> bool {
        lock(&self.handles).remove(handle).is_some()
    }
}

enum Trigger {
    Frame,
    Timeout { due_ms: u64 },
}

struct Scheduled {
    trigger: Trigger,
    seq: u64,
    callback: FrameCallback,
}

#[derive(Default)]
struct LoopState {
    now_ms: u64,
    next_seq: u64,
    frames_run: u64,
    pending: SlotMap<FrameHandle, Scheduled>,
}

impl LoopState {
    fn schedule(&mut self, trigger: Trigger, callback: FrameCallback) -> FrameHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(Scheduled {
            trigger,
            seq,
            callback,
        })
    }

    /// Remove and return the earliest due timeout, if any
    fn take_due_timeout(&mut self) -> Option<(u64, FrameCallback)> {
        let now = self.now_ms;
        let (handle, due) = self
            .pending
            .iter()
            .filter_map(|(handle, s)| match s.trigger {
                Trigger::Timeout { due_ms } if due_ms <= now => Some((handle, (due_ms, s.seq))),
                _ => None,
            })
            .min_by_key(|(_, key)| *key)?;
        let scheduled = self.pending.remove(handle)?;
        Some((due.0, scheduled.callback))
    }
}

/// Deterministic frame loop with a fake clock
///
/// Implements both [`Clock`] and [`FrameScheduler`]. Time only moves when
/// [`advance`](Self::advance) or [`tick`](Self::tick) is called.
///
/// - Frame callbacks run on [`run_frame`](Self::run_frame). Callbacks
///   requested while a frame is running are deferred to the next frame.
/// - Timeouts run during [`advance`](Self::advance) in due order, each seeing
///   the clock at its due time.
pub struct ManualFrameLoop {
    state: Mutex<LoopState>,
}

impl ManualFrameLoop {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            state: Mutex::new(LoopState {
                now_ms,
                ..LoopState::default()
            }),
        }
    }

    /// Current fake time
    pub fn now(&self) -> u64 {
        lock(&self.state).now_ms
    }

    /// Move time forward, firing timeouts that come due
    pub fn advance(&self, ms: u64) {
        let target = lock(&self.state).now_ms.saturating_add(ms);
        loop {
            let due = {
                let mut state = lock(&self.state);
                state.now_ms = target;
                let due = state.take_due_timeout();
                if let Some((due_ms, _)) = &due {
                    // Callbacks observe their own due time, not the target
                    state.now_ms = *due_ms;
                }
                due
            };
            match due {
                Some((due_ms, callback)) => callback(due_ms),
                None => break,
            }
        }
        lock(&self.state).now_ms = target;
    }

    /// Run every frame callback queued before this call
    ///
    /// Returns the number of callbacks run.
    pub fn run_frame(&self) -> usize {
        let (now, batch) = {
            let mut state = lock(&self.state);
            state.frames_run += 1;
            let mut handles: Vec<(u64, FrameHandle)> = state
                .pending
                .iter()
                .filter(|(_, s)| matches!(s.trigger, Trigger::Frame))
                .map(|(handle, s)| (s.seq, handle))
                .collect();
            handles.sort_unstable_by_key(|(seq, _)| *seq);
            let batch: Vec<FrameCallback> = handles
                .into_iter()
                .filter_map(|(_, handle)| state.pending.remove(handle))
                .map(|s| s.callback)
                .collect();
            (state.now_ms, batch)
        };
        let count = batch.len();
        for callback in batch {
            callback(now);
        }
        count
    }

    /// Advance time by `ms`, then run a frame
    pub fn tick(&self, ms: u64) -> usize {
        self.advance(ms);
        self.run_frame()
    }

    /// Run `frames` ticks of `frame_ms` each
    pub fn run_frames(&self, frames: usize, frame_ms: u64) {
        for _ in 0..frames {
            self.tick(frame_ms);
        }
    }

    /// Number of frame callbacks waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        lock(&self.state)
            .pending
            .values()
            .filter(|s| matches!(s.trigger, Trigger::Frame))
            .count()
    }

    /// Number of timeouts not yet fired
    pub fn pending_timeouts(&self) -> usize {
        lock(&self.state)
            .pending
            .values()
            .filter(|s| matches!(s.trigger, Trigger::Timeout { .. }))
            .count()
    }

    /// Frames run so far
    pub fn frames_run(&self) -> u64 {
        lock(&self.state).frames_run
    }
}

impl Default for ManualFrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualFrameLoop {
    fn now_ms(&self) -> u64 {
        self.now()
    }
}

impl FrameScheduler for ManualFrameLoop {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        lock(&self.state).schedule(Trigger::Frame, callback)
    }

    fn request_timeout(&self, delay_ms: u64, callback: FrameCallback) -> FrameHandle {
        let mut state = lock(&self.state);
        let due_ms = state.now_ms.saturating_add(delay_ms);
        state.schedule(Trigger::Timeout { due_ms }, callback)
    }

    fn cancel(&self, handle: FrameHandle) -> bool {
        lock(&self.state).pending.remove(handle).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<(&'static str, u64)>>>, impl Fn(&'static str) -> FrameCallback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let make = move |name: &'static str| -> FrameCallback {
            let log = log_clone.clone();
            Box::new(move |now: u64| log.lock().unwrap().push((name, now)))
        };
        (log, make)
    }

    #[test]
    fn test_frames_run_in_request_order() {
        let frames = ManualFrameLoop::new();
        let (log, cb) = recorder();

        frames.request_frame(cb("a"));
        frames.request_frame(cb("b"));
        assert_eq!(frames.pending_frames(), 2);

        assert_eq!(frames.tick(16), 2);
        assert_eq!(*log.lock().unwrap(), vec![("a", 16), ("b", 16)]);
        assert_eq!(frames.pending_frames(), 0);
    }

    #[test]
    fn test_frame_requested_during_frame_runs_next_frame() {
        let frames = Arc::new(ManualFrameLoop::new());
        let (log, cb) = recorder();

        let inner = frames.clone();
        let second = cb("second");
        frames.request_frame(Box::new(move |_: u64| {
            inner.request_frame(second);
        }));

        assert_eq!(frames.tick(16), 1);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(frames.tick(16), 1);
        assert_eq!(*log.lock().unwrap(), vec![("second", 32)]);
    }

    #[test]
    fn test_cancel_frame() {
        let frames = ManualFrameLoop::new();
        let (log, cb) = recorder();

        let handle = frames.request_frame(cb("cancelled"));
        assert!(frames.cancel(handle));
        assert!(!frames.cancel(handle));
        frames.tick(16);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_timeouts_fire_at_due_time_in_order() {
        let frames = ManualFrameLoop::new();
        let (log, cb) = recorder();

        frames.request_timeout(30, cb("late"));
        frames.request_timeout(10, cb("early"));
        frames.advance(5);
        assert!(log.lock().unwrap().is_empty());

        frames.advance(100);
        assert_eq!(*log.lock().unwrap(), vec![("early", 10), ("late", 30)]);
        assert_eq!(frames.now(), 105);
        assert_eq!(frames.pending_timeouts(), 0);
    }

    #[test]
    fn test_null_scheduler_never_runs() {
        let scheduler = NullScheduler::new();
        let handle = scheduler.request_frame(Box::new(|_: u64| panic!("must not run")));
        assert!(scheduler.cancel(handle));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
