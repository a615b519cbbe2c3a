//! Veer Theme Engine
//!
//! Scroll-driven switching between two visual themes with hysteresis.
//!
//! # Features
//!
//! - **Hysteresis**: separate enter and exit thresholds, so scroll jitter
//!   near a boundary cannot make the theme flicker
//! - **Time-based transitions**: once triggered, a transition runs for a fixed
//!   duration along an easing curve, independent of scroll speed
//! - **Scoped distribution**: one provider per page tree, read by any number
//!   of consumers through [`use_theme`]
//! - **Design tokens**: typed token sets for both themes, blended into CSS
//!   custom properties while a transition runs
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use veer_core::frame::ManualFrameLoop;
//! use veer_core::viewport::SimulatedViewport;
//! use veer_core::{Environment, Scope};
//! use veer_theme::{use_theme, EngineConfig, ThemeIdentity, ThemeProvider, ThemeTokens};
//!
//! let frames = Arc::new(ManualFrameLoop::new());
//! let viewport = Arc::new(SimulatedViewport::new(800.0, 2800.0));
//! let env = Environment::new(Some(viewport.clone()), frames.clone(), frames.clone());
//!
//! let root = Scope::root();
//! let _provider =
//!     ThemeProvider::mount(&root, &env, EngineConfig::default(), ThemeTokens::default())
//!         .unwrap();
//! let theme = use_theme(&root).unwrap();
//!
//! // Scroll past the enter threshold and let the transition play out
//! viewport.scroll_to(1200.0);
//! frames.run_frames(60, 16);
//!
//! assert_eq!(theme.active_theme(), ThemeIdentity::Secondary);
//! assert_eq!(theme.theme_class("hero"), "hero hero--refined-brutalist");
//! ```

pub mod bindings;
pub mod config;
pub mod error;
pub mod identity;
pub mod machine;
pub mod presets;
pub mod provider;
pub mod state;
pub mod tokens;

pub use bindings::{body_class, theme_class, theme_class_with_variants, CssVariables, ThemeCondition};
pub use config::EngineConfig;
pub use error::{Result, ThemeError};
pub use identity::ThemeIdentity;
pub use machine::{Advance, HysteresisMachine, Observation, Phase, SwitchRecord};
pub use provider::{use_theme, ThemeContext, ThemeProvider};
pub use state::TransitionState;
pub use tokens::{Dimension, ThemeToken, ThemeTokens, TokenSet, TokenValue, Unit};
