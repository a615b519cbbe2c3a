//! Scroll sampling
//!
//! [`ScrollSampler`] turns raw scroll and resize events into a normalized
//! progress stream. Raw events are coalesced: the first event after a sample
//! schedules one flush (on the next animation frame, or after the throttle
//! interval), and every further event before that flush is absorbed. The
//! flush reads the live scroll offset, so only the latest position matters.
//!
//! Without a viewport (server rendering) the sampler is inert and reports a
//! progress of 0.

use crate::environment::Environment;
use crate::events::{event_types, ListenerId, ViewportEvent};
use crate::frame::{Clock, FrameHandle, FrameScheduler};
use crate::reactive::SubscriptionId;
use crate::sync::{isolate, lock};
use crate::viewport::{RegionBounds, Viewport};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Normalized scroll position at a point in time
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollSample {
    /// Position within the tracked region, 0 at its start and 1 at its end
    pub progress: f32,
    pub timestamp_ms: u64,
}

/// How raw events are coalesced into samples
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum ThrottleMode {
    /// At most one sample per animation frame
    #[default]
    #[serde(rename = "raf")]
    AnimationFrame,
    /// At most one sample per `interval_ms`
    #[serde(rename = "timeout")]
    Timeout { interval_ms: u64 },
}

/// Region whose scroll progress is tracked
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScrollContainer {
    /// The whole document
    #[default]
    Document,
    /// A single element, looked up by id on every sample
    Element { id: String },
}

/// Sampler options
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Pixels trimmed from both ends of the tracked region
    pub edge_margin: f64,
    pub container: ScrollContainer,
    pub throttle: ThrottleMode,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            edge_margin: 0.0,
            container: ScrollContainer::Document,
            throttle: ThrottleMode::AnimationFrame,
        }
    }
}

/// Map a scroll offset onto `[start, end]`, clamped to `[0, 1]`
///
/// An empty or inverted range, or a non-finite offset, yields 0.
pub fn normalize_progress(offset: f64, start: f64, end: f64) -> f32 {
    let span = end - start;
    if !(span > 0.0) || !offset.is_finite() {
        return 0.0;
    }
    ((offset - start) / span).clamp(0.0, 1.0) as f32
}

/// Progress of the configured container in the viewport's current state
pub fn measure(viewport: &dyn Viewport, config: &SamplerConfig) -> f32 {
    let region = match &config.container {
        ScrollContainer::Document => RegionBounds::new(0.0, viewport.document_height()),
        ScrollContainer::Element { id } => match viewport.element_bounds(id) {
            Some(bounds) => bounds,
            None => {
                tracing::trace!("scroll container `{}` not found", id);
                return 0.0;
            }
        },
    };
    let margin = config.edge_margin.max(0.0);
    let start = region.top + margin;
    let end = region.top + region.height - viewport.viewport_height() - margin;
    normalize_progress(viewport.scroll_offset(), start, end)
}

type SampleSubscriber = Arc<dyn Fn(&ScrollSample) + Send + Sync>;

struct SamplerState {
    current: ScrollSample,
    pending: Option<FrameHandle>,
    last_emit_ms: Option<u64>,
    listeners: SmallVec<[ListenerId; 2]>,
}

struct SamplerShared {
    viewport: Option<Arc<dyn Viewport>>,
    frames: Arc<dyn FrameScheduler>,
    clock: Arc<dyn Clock>,
    config: SamplerConfig,
    mounted: AtomicBool,
    state: Mutex<SamplerState>,
    subscribers: Mutex<SlotMap<SubscriptionId, SampleSubscriber>>,
    raw_events: AtomicU64,
    samples: AtomicU64,
}

impl SamplerShared {
    fn on_event(self: &Arc<Self>) {
        self.raw_events.fetch_add(1, Ordering::Relaxed);
        if !self.mounted.load(Ordering::SeqCst) {
            return;
        }

        let mut state = lock(&self.state);
        if state.pending.is_some() {
            return;
        }

        let weak = Arc::downgrade(self);
        let flush = Box::new(move |now: u64| {
            if let Some(shared) = weak.upgrade() {
                shared.flush(now);
            }
        });
        let handle = match self.config.throttle {
            ThrottleMode::AnimationFrame => self.frames.request_frame(flush),
            ThrottleMode::Timeout { interval_ms } => {
                let delay = match state.last_emit_ms {
                    Some(last) => last
                        .saturating_add(interval_ms)
                        .saturating_sub(self.clock.now_ms()),
                    None => 0,
                };
                self.frames.request_timeout(delay, flush)
            }
        };
        state.pending = Some(handle);
    }

    fn flush(&self, now: u64) {
        // A callback that outlived its cancellation must not touch anything
        if !self.mounted.load(Ordering::SeqCst) {
            return;
        }
        let Some(viewport) = &self.viewport else {
            return;
        };

        let sample = ScrollSample {
            progress: measure(viewport.as_ref(), &self.config),
            timestamp_ms: now,
        };
        {
            let mut state = lock(&self.state);
            state.pending = None;
            state.last_emit_ms = Some(now);
            state.current = sample;
        }
        self.samples.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("scroll sample {:.4} at {}ms", sample.progress, now);

        let subscribers: Vec<SampleSubscriber> =
            lock(&self.subscribers).values().cloned().collect();
        for subscriber in subscribers {
            isolate("scroll sample subscriber", || subscriber(&sample));
        }
    }
}

/// Throttled, normalized scroll progress source
///
/// Detaches on drop.
pub struct ScrollSampler {
    shared: Arc<SamplerShared>,
}

impl ScrollSampler {
    /// Attach to the environment's viewport
    ///
    /// Registers one scroll and one resize listener and measures the initial
    /// position. In a headless environment nothing is registered.
    pub fn attach(env: &Environment, config: SamplerConfig) -> Self {
        let viewport = env.viewport().cloned();
        let initial = ScrollSample {
            progress: viewport
                .as_deref()
                .map(|vp| measure(vp, &config))
                .unwrap_or(0.0),
            timestamp_ms: env.now_ms(),
        };

        let shared = Arc::new(SamplerShared {
            viewport,
            frames: Arc::clone(env.frames()),
            clock: Arc::clone(env.clock()),
            config,
            mounted: AtomicBool::new(true),
            state: Mutex::new(SamplerState {
                current: initial,
                pending: None,
                last_emit_ms: None,
                listeners: SmallVec::new(),
            }),
            subscribers: Mutex::new(SlotMap::with_key()),
            raw_events: AtomicU64::new(0),
            samples: AtomicU64::new(0),
        });

        match &shared.viewport {
            Some(viewport) => {
                let mut listeners = SmallVec::new();
                for event_type in [event_types::SCROLL, event_types::RESIZE] {
                    let weak: Weak<SamplerShared> = Arc::downgrade(&shared);
                    listeners.push(viewport.add_listener(
                        event_type,
                        Arc::new(move |_: &ViewportEvent| {
                            if let Some(shared) = weak.upgrade() {
                                shared.on_event();
                            }
                        }),
                    ));
                }
                lock(&shared.state).listeners = listeners;
                tracing::debug!(
                    "scroll sampler attached ({:?}, initial progress {:.3})",
                    shared.config.throttle,
                    initial.progress
                );
            }
            None => {
                shared.mounted.store(false, Ordering::SeqCst);
                tracing::debug!("no viewport; scroll sampler is inert");
            }
        }

        Self { shared }
    }

    /// Latest sample
    pub fn current(&self) -> ScrollSample {
        lock(&self.shared.state).current
    }

    /// True while listeners are registered
    pub fn is_attached(&self) -> bool {
        self.shared.mounted.load(Ordering::SeqCst)
    }

    /// Receive every future sample
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ScrollSample) + Send + Sync + 'static,
    {
        lock(&self.shared.subscribers).insert(Arc::new(callback))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        lock(&self.shared.subscribers).remove(id).is_some()
    }

    /// Remove listeners, cancel any pending flush and drop subscribers
    ///
    /// Safe to call more than once.
    pub fn detach(&self) {
        let was_mounted = self.shared.mounted.swap(false, Ordering::SeqCst);
        let (listeners, pending) = {
            let mut state = lock(&self.shared.state);
            (std::mem::take(&mut state.listeners), state.pending.take())
        };
        if let Some(viewport) = &self.shared.viewport {
            for id in listeners {
                viewport.remove_listener(id);
            }
        }
        if let Some(handle) = pending {
            self.shared.frames.cancel(handle);
        }
        lock(&self.shared.subscribers).clear();
        if was_mounted {
            tracing::debug!("scroll sampler detached");
        }
    }

    /// Raw scroll/resize events received so far
    pub fn raw_event_count(&self) -> u64 {
        self.shared.raw_events.load(Ordering::Relaxed)
    }

    /// Samples emitted so far
    pub fn sample_count(&self) -> u64 {
        self.shared.samples.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.shared.config
    }
}

impl Drop for ScrollSampler {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for ScrollSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollSampler")
            .field("attached", &self.is_attached())
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}
