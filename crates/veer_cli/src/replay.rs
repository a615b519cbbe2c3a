//! Headless trace replay
//!
//! Mounts a provider over a simulated viewport and a manual frame loop,
//! plays the trace's events at their timestamps and records every theme
//! change the engine publishes.

use crate::trace::{Trace, TraceAction};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};
use veer_core::frame::ManualFrameLoop;
use veer_core::viewport::{RegionBounds, SimulatedViewport, Viewport};
use veer_core::{Environment, Scope};
use veer_theme::{EngineConfig, ThemeIdentity, ThemeProvider, ThemeTokens, TransitionState};

/// Frames to run after the last event before giving up on settling
const SETTLE_FRAME_LIMIT: usize = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ThemeChange {
    Started {
        at_ms: u64,
        from: ThemeIdentity,
        to: ThemeIdentity,
        scroll_progress: f32,
    },
    Completed {
        at_ms: u64,
        theme: ThemeIdentity,
    },
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub raw_events: u64,
    pub samples: u64,
    pub switches: u64,
    pub frames: u64,
    pub final_theme: ThemeIdentity,
    pub settled_at_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub changes: Vec<ThemeChange>,
    pub summary: Summary,
}

/// Play `trace` through a fresh engine
pub fn run(trace: &Trace, config: EngineConfig, tokens: ThemeTokens, frame_ms: u64) -> Result<Report> {
    if frame_ms == 0 {
        anyhow::bail!("frame interval must be at least 1ms");
    }

    let frames = Arc::new(ManualFrameLoop::new());
    let viewport = Arc::new(SimulatedViewport::new(trace.viewport_height, trace.document_height));
    for element in &trace.elements {
        viewport.insert_element(element.id.clone(), RegionBounds::new(element.top, element.height));
    }
    let env = Environment::new(Some(viewport.clone()), frames.clone(), frames.clone());

    let root = Scope::root();
    let provider = ThemeProvider::mount(&root, &env, config, tokens)
        .context("Failed to mount theme provider")?;
    let theme = provider.context();

    let changes = Arc::new(Mutex::new(Vec::new()));
    let previous = Arc::new(Mutex::new(theme.state()));
    {
        let changes = Arc::clone(&changes);
        let clock = Arc::clone(&frames);
        theme.subscribe(move |state: &TransitionState| {
            let mut previous = previous.lock().unwrap_or_else(|e| e.into_inner());
            let mut changes = changes.lock().unwrap_or_else(|e| e.into_inner());
            record(&mut changes, &previous, state, clock.now());
            *previous = *state;
        });
    }
    if theme.is_transitioning() {
        // Mounted past a threshold; the first transition began before subscribing
        let state = theme.state();
        changes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ThemeChange::Started {
                at_ms: 0,
                from: state.active_theme,
                to: state.target_theme,
                scroll_progress: state.last_scroll_progress,
            });
    }

    for event in &trace.events {
        // Whole frames up to the event, then the remainder
        while frames.now() + frame_ms <= event.at_ms {
            frames.tick(frame_ms);
        }
        frames.advance(event.at_ms.saturating_sub(frames.now()));
        viewport.set_timestamp(event.at_ms);

        match &event.action {
            TraceAction::Scroll { offset } => {
                viewport.scroll_to(*offset);
            }
            TraceAction::Progress { value } => {
                // Against the geometry as of this event
                let scrollable =
                    (viewport.document_height() - viewport.viewport_height()).max(0.0);
                viewport.scroll_to(value * scrollable);
            }
            TraceAction::Resize { width, height } => {
                viewport.resize(*width, *height);
            }
            TraceAction::Document { height } => {
                viewport.set_document_height(*height);
            }
            TraceAction::Theme { theme: requested } => {
                theme.set_theme(*requested)?;
            }
            TraceAction::Toggle => {
                theme.toggle_theme()?;
            }
        }
        tracing::trace!("replayed {:?} at {}ms", event.action, event.at_ms);
    }

    // Flush the last sample, then let any transition finish
    frames.tick(frame_ms);
    let mut settle_frames = 0;
    while theme.is_transitioning() {
        if settle_frames == SETTLE_FRAME_LIMIT {
            anyhow::bail!("engine did not settle after {} frames", SETTLE_FRAME_LIMIT);
        }
        frames.tick(frame_ms);
        settle_frames += 1;
    }

    let summary = Summary {
        raw_events: provider.raw_event_count(),
        samples: provider.sample_count(),
        switches: theme.switch_count(),
        frames: frames.frames_run(),
        final_theme: theme.active_theme(),
        settled_at_ms: frames.now(),
    };
    provider.unmount();

    let changes = changes.lock().unwrap_or_else(|e| e.into_inner()).clone();
    Ok(Report { changes, summary })
}

fn record(changes: &mut Vec<ThemeChange>, previous: &TransitionState, state: &TransitionState, at_ms: u64) {
    if state.active_theme != previous.active_theme {
        changes.push(ThemeChange::Completed {
            at_ms,
            theme: state.active_theme,
        });
    }
    let started = state.is_transitioning
        && (!previous.is_transitioning
            || state.target_theme != previous.target_theme
            || state.active_theme != previous.active_theme);
    if started {
        changes.push(ThemeChange::Started {
            at_ms,
            from: state.active_theme,
            to: state.target_theme,
            scroll_progress: state.last_scroll_progress,
        });
    }
}

impl fmt::Display for ThemeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeChange::Started {
                at_ms,
                from,
                to,
                scroll_progress,
            } => write!(
                f,
                "{:>8}ms  started    {} -> {} (scroll {:.3})",
                at_ms, from, to, scroll_progress
            ),
            ThemeChange::Completed { at_ms, theme } => {
                write!(f, "{:>8}ms  completed  {}", at_ms, theme)
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for change in &self.changes {
            writeln!(f, "{}", change)?;
        }
        let s = &self.summary;
        write!(
            f,
            "{} raw events, {} samples, {} switches over {} frames; settled on {} at {}ms",
            s.raw_events, s.samples, s.switches, s.frames, s.final_theme, s.settled_at_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(source: &str) -> Report {
        let trace = Trace::parse(source).unwrap();
        run(&trace, EngineConfig::default(), ThemeTokens::default(), 16).unwrap()
    }

    #[test]
    fn test_replay_scroll_down_and_back() {
        let report = replay(
            r#"
            [[events]]
            at_ms = 100
            kind = "progress"
            value = 0.6

            [[events]]
            at_ms = 2000
            kind = "progress"
            value = 0.1
            "#,
        );

        let kinds: Vec<_> = report
            .changes
            .iter()
            .map(|c| match c {
                ThemeChange::Started { to, .. } => ("started", *to),
                ThemeChange::Completed { theme, .. } => ("completed", *theme),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("started", ThemeIdentity::Secondary),
                ("completed", ThemeIdentity::Secondary),
                ("started", ThemeIdentity::Primary),
                ("completed", ThemeIdentity::Primary),
            ]
        );
        assert_eq!(report.summary.switches, 2);
        assert_eq!(report.summary.final_theme, ThemeIdentity::Primary);
        assert_eq!(report.summary.raw_events, 2);
    }

    #[test]
    fn test_replay_jitter_in_dead_zone() {
        let mut source = String::new();
        for i in 0..100 {
            let value = if i % 2 == 0 { 0.36 } else { 0.39 };
            source.push_str(&format!(
                "[[events]]\nat_ms = {}\nkind = \"progress\"\nvalue = {}\n",
                i * 5,
                value
            ));
        }
        let report = replay(&source);
        assert!(report.changes.is_empty());
        assert_eq!(report.summary.switches, 0);
        assert!(report.summary.samples < report.summary.raw_events);
    }

    #[test]
    fn test_progress_follows_document_growth() {
        // 1800 - 800 leaves 1000px to scroll, so 0.3 lands at 300px
        let report = replay(
            r#"
            [[events]]
            at_ms = 0
            kind = "document"
            height = 1800.0

            [[events]]
            at_ms = 100
            kind = "progress"
            value = 0.3
            "#,
        );
        assert!(report.changes.is_empty());
        assert_eq!(report.summary.switches, 0);
        assert_eq!(report.summary.final_theme, ThemeIdentity::Primary);
    }

    #[test]
    fn test_replay_toggle() {
        let report = replay("[[events]]\nat_ms = 0\nkind = \"toggle\"\n");
        assert_eq!(report.summary.final_theme, ThemeIdentity::Secondary);
        assert!(report.to_string().contains("completed  refined-brutalist"));
    }

    #[test]
    fn test_json_report() {
        let report = replay("[[events]]\nat_ms = 0\nkind = \"progress\"\nvalue = 0.9\n");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["changes"][0]["event"], "started");
        assert_eq!(json["summary"]["final_theme"], "refined-brutalist");
    }
}
