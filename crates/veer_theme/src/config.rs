//! Engine configuration
//!
//! ```toml
//! enter_threshold = 0.4
//! exit_threshold = 0.35
//! transition_duration_ms = 600
//! easing = "cubic-bezier(0.4, 0, 0.2, 1)"
//! initial_theme = "extreme-brutalist"
//!
//! [sampler]
//! edge_margin = 0.0
//!
//! [sampler.container]
//! kind = "document"
//!
//! [sampler.throttle]
//! mode = "raf"
//! ```

use crate::error::{Result, ThemeError};
use crate::identity::ThemeIdentity;
use serde::{Deserialize, Serialize};
use veer_animation::Easing;
use veer_core::scroll::SamplerConfig;

pub const DEFAULT_ENTER_THRESHOLD: f32 = 0.40;
pub const DEFAULT_EXIT_THRESHOLD: f32 = 0.35;
pub const DEFAULT_TRANSITION_DURATION_MS: u64 = 600;

/// Thresholds, timing and sampling options for a provider
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Progress at or above which Primary moves to Secondary
    pub enter_threshold: f32,
    /// Progress at or below which Secondary moves back to Primary
    pub exit_threshold: f32,
    pub transition_duration_ms: u64,
    pub easing: Easing,
    /// Theme shown before any scroll input
    pub initial_theme: ThemeIdentity,
    pub sampler: SamplerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enter_threshold: DEFAULT_ENTER_THRESHOLD,
            exit_threshold: DEFAULT_EXIT_THRESHOLD,
            transition_duration_ms: DEFAULT_TRANSITION_DURATION_MS,
            easing: Easing::STANDARD,
            initial_theme: ThemeIdentity::Primary,
            sampler: SamplerConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_thresholds(mut self, enter: f32, exit: f32) -> Self {
        self.enter_threshold = enter;
        self.exit_threshold = exit;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.transition_duration_ms = duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_initial_theme(mut self, theme: ThemeIdentity) -> Self {
        self.initial_theme = theme;
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    /// Reject configurations that would misbehave at runtime
    pub fn validate(&self) -> Result<()> {
        unit_interval("enter_threshold", self.enter_threshold as f64)?;
        unit_interval("exit_threshold", self.exit_threshold as f64)?;
        if self.exit_threshold >= self.enter_threshold {
            return Err(ThemeError::InvalidThresholds {
                enter: self.enter_threshold,
                exit: self.exit_threshold,
            });
        }
        if !self.sampler.edge_margin.is_finite() || self.sampler.edge_margin < 0.0 {
            return Err(ThemeError::InvalidConfig {
                field: "sampler.edge_margin",
                reason: format!(
                    "must be a non-negative pixel count, got {}",
                    self.sampler.edge_margin
                ),
            });
        }
        self.easing.validate()?;
        Ok(())
    }

    /// Parse and validate a TOML document; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ThemeError::OutOfRange { field, value })
    }
}
