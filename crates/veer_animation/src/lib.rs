//! Veer Animation System
//!
//! Time-based interpolation for theme transitions.
//!
//! # Features
//!
//! - **Easing Curves**: Polynomial presets and CSS cubic Bézier curves
//! - **Tweens**: Eased progress computed from elapsed clock time
//! - **Frame Loops**: Cancellable per-frame drivers over an injected scheduler
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use veer_animation::{Easing, FrameLoop, Tween};
//! use veer_core::frame::ManualFrameLoop;
//!
//! let frames = Arc::new(ManualFrameLoop::new());
//! let driver = FrameLoop::new(frames.clone());
//! let tween = Tween::new(0, 100, Easing::Linear);
//! let last = Arc::new(Mutex::new(0.0));
//!
//! let out = last.clone();
//! driver.run(move |now: u64| {
//!     *out.lock().unwrap() = tween.value_at(now);
//!     !tween.is_finished(now)
//! });
//! frames.run_frames(10, 16);
//!
//! assert_eq!(*last.lock().unwrap(), 1.0);
//! assert!(!driver.is_running());
//! ```

pub mod driver;
pub mod easing;
pub mod tween;

pub use driver::FrameLoop;
pub use easing::{Easing, EasingParseError};
pub use tween::Tween;
