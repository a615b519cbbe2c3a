//! Viewport event dispatch
//!
//! Scroll and resize notifications delivered to registered listeners. A
//! listener that panics is contained and logged; it stays registered and the
//! remaining listeners still receive the event.

use crate::sync::isolate;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::Arc;

/// Event type identifier
pub type EventType = u32;

/// Viewport event types
pub mod event_types {
    use super::EventType;

    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;
}

new_key_type! {
    /// Handle returned when a listener is registered
    pub struct ListenerId;
}

/// A viewport event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportEvent {
    pub event_type: EventType,
    pub data: EventData,
    /// Milliseconds on the environment clock
    pub timestamp: u64,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Scroll { offset: f64 },
    Resize { width: f64, height: f64 },
}

impl ViewportEvent {
    pub fn scroll(offset: f64, timestamp: u64) -> Self {
        Self {
            event_type: event_types::SCROLL,
            data: EventData::Scroll { offset },
            timestamp,
        }
    }

    pub fn resize(width: f64, height: f64, timestamp: u64) -> Self {
        Self {
            event_type: event_types::RESIZE,
            data: EventData::Resize { width, height },
            timestamp,
        }
    }
}

/// Event handler function type
pub type EventHandler = Arc<dyn Fn(&ViewportEvent) + Send + Sync>;

struct Registration {
    event_type: EventType,
    handler: EventHandler,
}

/// Keeps listeners per event type
///
/// The dispatcher does not lock anything itself. Owners that share it behind
/// a mutex should call [`EventDispatcher::handlers_for`] under the lock and
/// [`dispatch_to`] after releasing it, so handlers may register or remove
/// listeners while running.
pub struct EventDispatcher {
    listeners: SlotMap<ListenerId, Registration>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
        }
    }

    /// Register a handler for an event type
    pub fn register(&mut self, event_type: EventType, handler: EventHandler) -> ListenerId {
        self.listeners.insert(Registration {
            event_type,
            handler,
        })
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Handlers currently registered for an event type
    pub fn handlers_for(&self, event_type: EventType) -> SmallVec<[EventHandler; 4]> {
        self.listeners
            .values()
            .filter(|r| r.event_type == event_type)
            .map(|r| Arc::clone(&r.handler))
            .collect()
    }

    /// Dispatch an event to all registered handlers
    pub fn dispatch(&self, event: &ViewportEvent) -> usize {
        dispatch_to(&self.handlers_for(event.event_type), event)
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Invoke each handler, isolating panics. Returns how many completed normally.
pub fn dispatch_to(handlers: &[EventHandler], event: &ViewportEvent) -> usize {
    handlers
        .iter()
        .filter(|handler| isolate("viewport listener", || handler(event)))
        .count()
}
