//! Viewport abstraction
//!
//! A [`Viewport`] is the host's scrollable surface: it reports the scroll
//! offset and geometry and delivers scroll/resize events. Browser bindings
//! implement it over `window`/`document`; [`SimulatedViewport`] is the
//! headless implementation used by tests and trace replay.

use crate::events::{dispatch_to, event_types, EventDispatcher, EventHandler, EventType, ListenerId, ViewportEvent};
use crate::sync::lock;
use rustc_hash::FxHashMap;
use std::sync::Mutex;

/// Vertical extent of a tracked element, in document coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionBounds {
    /// Distance from the document top to the element top
    pub top: f64,
    pub height: f64,
}

impl RegionBounds {
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// A scrollable surface that reports geometry and emits viewport events
pub trait Viewport: Send + Sync {
    /// Current vertical scroll offset. May be negative or past the end
    /// during rubber-band scrolling.
    fn scroll_offset(&self) -> f64;

    /// Visible height
    fn viewport_height(&self) -> f64;

    /// Total scrollable content height
    fn document_height(&self) -> f64;

    /// Bounds of the element with the given id, if it exists
    fn element_bounds(&self, id: &str) -> Option<RegionBounds>;

    /// Register a listener for [`event_types::SCROLL`] or [`event_types::RESIZE`]
    fn add_listener(&self, event_type: EventType, handler: EventHandler) -> ListenerId;

    /// Remove a listener. Returns false if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

struct Geometry {
    offset: f64,
    width: f64,
    viewport_height: f64,
    document_height: f64,
    elements: FxHashMap<String, RegionBounds>,
    timestamp: u64,
}

/// Headless viewport driven by explicit calls
pub struct SimulatedViewport {
    geometry: Mutex<Geometry>,
    dispatcher: Mutex<EventDispatcher>,
}

impl SimulatedViewport {
    pub fn new(viewport_height: f64, document_height: f64) -> Self {
        Self {
            geometry: Mutex::new(Geometry {
                offset: 0.0,
                width: 1280.0,
                viewport_height,
                document_height,
                elements: FxHashMap::default(),
                timestamp: 0,
            }),
            dispatcher: Mutex::new(EventDispatcher::new()),
        }
    }

    /// Register an element that can be tracked as a scroll container
    pub fn insert_element(&self, id: impl Into<String>, bounds: RegionBounds) {
        lock(&self.geometry).elements.insert(id.into(), bounds);
    }

    /// Set the timestamp stamped on subsequently dispatched events
    pub fn set_timestamp(&self, timestamp: u64) {
        lock(&self.geometry).timestamp = timestamp;
    }

    /// Scroll to `offset` and dispatch a scroll event
    ///
    /// No clamping is applied, so overscroll can be simulated.
    pub fn scroll_to(&self, offset: f64) -> usize {
        let event = {
            let mut geometry = lock(&self.geometry);
            geometry.offset = offset;
            ViewportEvent::scroll(offset, geometry.timestamp)
        };
        self.emit(&event)
    }

    /// Change the viewport size and dispatch a resize event
    pub fn resize(&self, width: f64, viewport_height: f64) -> usize {
        let event = {
            let mut geometry = lock(&self.geometry);
            geometry.width = width;
            geometry.viewport_height = viewport_height;
            ViewportEvent::resize(width, viewport_height, geometry.timestamp)
        };
        self.emit(&event)
    }

    /// Change the content height without dispatching anything
    pub fn set_document_height(&self, document_height: f64) {
        lock(&self.geometry).document_height = document_height;
    }

    /// Visible width
    pub fn width(&self) -> f64 {
        lock(&self.geometry).width
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        lock(&self.dispatcher).len()
    }

    fn emit(&self, event: &ViewportEvent) -> usize {
        let handlers = lock(&self.dispatcher).handlers_for(event.event_type);
        dispatch_to(&handlers, event)
    }
}

impl Viewport for SimulatedViewport {
    fn scroll_offset(&self) -> f64 {
        lock(&self.geometry).offset
    }

    fn viewport_height(&self) -> f64 {
        lock(&self.geometry).viewport_height
    }

    fn document_height(&self) -> f64 {
        lock(&self.geometry).document_height
    }

    fn element_bounds(&self, id: &str) -> Option<RegionBounds> {
        lock(&self.geometry).elements.get(id).copied()
    }

    fn add_listener(&self, event_type: EventType, handler: EventHandler) -> ListenerId {
        debug_assert!(event_type == event_types::SCROLL || event_type == event_types::RESIZE);
        lock(&self.dispatcher).register(event_type, handler)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        lock(&self.dispatcher).unregister(id)
    }
}
