//! Recorded scroll traces
//!
//! ```toml
//! viewport_height = 800.0
//! document_height = 2800.0
//!
//! [[elements]]
//! id = "story"
//! top = 400.0
//! height = 3000.0
//!
//! [[events]]
//! at_ms = 0
//! kind = "scroll"
//! offset = 120.0
//!
//! [[events]]
//! at_ms = 250
//! kind = "progress"
//! value = 0.6
//!
//! [[events]]
//! at_ms = 900
//! kind = "resize"
//! width = 1024.0
//! height = 700.0
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use veer_theme::ThemeIdentity;

/// A recorded session: page geometry plus timestamped events
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Trace {
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    #[serde(default = "default_document_height")]
    pub document_height: f64,
    #[serde(default)]
    pub elements: Vec<TraceElement>,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

fn default_viewport_height() -> f64 {
    800.0
}

fn default_document_height() -> f64 {
    2800.0
}

/// Element that a `container = { kind = "element" }` sampler can track
#[derive(Debug, Deserialize, Serialize)]
pub struct TraceElement {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TraceEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: TraceAction,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TraceAction {
    /// Scroll to an absolute offset in pixels
    Scroll { offset: f64 },
    /// Scroll to a fraction of the document's scrollable range
    Progress { value: f64 },
    /// Resize the viewport
    Resize { width: f64, height: f64 },
    /// Change content height; takes effect on the next event
    Document { height: f64 },
    /// Request a theme, as a toggle button would
    Theme { theme: ThemeIdentity },
    /// Request the opposite theme
    Toggle,
}

impl Trace {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut trace = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        trace.events.sort_by_key(|e| e.at_ms);
        Ok(trace)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let trace: Trace = toml::from_str(content)?;
        if !(trace.viewport_height > 0.0 && trace.document_height > 0.0) {
            anyhow::bail!(
                "viewport_height and document_height must be positive (got {} and {})",
                trace.viewport_height,
                trace.document_height
            );
        }
        Ok(trace)
    }

    /// Time of the last event, or 0 for an empty trace
    pub fn end_ms(&self) -> u64 {
        self.events.iter().map(|e| e.at_ms).max().unwrap_or(0)
    }
}
