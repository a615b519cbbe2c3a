//! Veer Core Runtime
//!
//! This crate provides the environment primitives the theme engine is built on:
//!
//! - **Viewport events**: Scroll/resize listeners with per-handler failure isolation
//! - **Frame scheduling**: Animation-frame and timer callbacks behind an injectable clock
//! - **Reactive stores**: Shared values pushed to any number of subscribers
//! - **Scoped context**: Dependency injection without module-level globals
//! - **Scroll sampling**: Frame-throttled, normalized scroll progress
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use veer_core::frame::ManualFrameLoop;
//! use veer_core::scroll::{SamplerConfig, ScrollSampler};
//! use veer_core::viewport::SimulatedViewport;
//! use veer_core::Environment;
//!
//! let frames = Arc::new(ManualFrameLoop::new());
//! let viewport = Arc::new(SimulatedViewport::new(800.0, 2800.0));
//! let env = Environment::new(Some(viewport.clone()), frames.clone(), frames.clone());
//!
//! let sampler = ScrollSampler::attach(&env, SamplerConfig::default());
//! viewport.scroll_to(1000.0);
//! frames.tick(16);
//!
//! assert_eq!(sampler.current().progress, 0.5);
//! ```

pub mod color;
pub mod context;
pub mod environment;
pub mod events;
pub mod frame;
pub mod reactive;
pub mod scroll;
pub mod sync;
pub mod viewport;

pub use color::{Color, ColorParseError};
pub use context::{ContextError, Scope};
pub use environment::Environment;
pub use events::{EventData, EventDispatcher, EventHandler, EventType, ListenerId, ViewportEvent};
pub use frame::{Clock, FrameCallback, FrameHandle, FrameScheduler, ManualFrameLoop, SystemClock};
pub use reactive::{Store, SubscriptionId};
pub use scroll::{SamplerConfig, ScrollContainer, ScrollSample, ScrollSampler, ThrottleMode};
pub use viewport::{RegionBounds, SimulatedViewport, Viewport};
