//! Hysteresis theme state machine
//!
//! States are `Stable(theme)` and `Transitioning { from, to, progress }`.
//!
//! - `Stable(Primary)` starts a transition to Secondary on a sample at or
//!   above the enter threshold.
//! - `Stable(Secondary)` starts a transition to Primary on a sample at or
//!   below the exit threshold.
//! - A running transition advances with clock time only. Samples that arrive
//!   meanwhile are remembered, and the latest one is evaluated when the
//!   transition completes (finish-then-reevaluate). A reversal is never
//!   dropped and the running transition is never restarted.
//!
//! Samples strictly between the thresholds never start anything, so scroll
//! jitter narrower than the gap cannot make the theme oscillate.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::identity::ThemeIdentity;
use crate::state::TransitionState;
use std::collections::VecDeque;
use veer_animation::{Easing, Tween};

/// Completed switches kept for diagnostics
const HISTORY_LIMIT: usize = 64;

/// Public view of the machine's state
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Stable(ThemeIdentity),
    Transitioning {
        from: ThemeIdentity,
        to: ThemeIdentity,
        progress: f32,
    },
}

/// Result of feeding a sample or request to the machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    /// Nothing to do
    Ignored,
    /// A transition toward this theme started
    Started(ThemeIdentity),
    /// A transition is running; the input is held until it completes
    Deferred,
}

/// Result of advancing the clock
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Advance {
    /// No transition running
    Idle,
    /// Still running, at this eased progress
    Progressed(f32),
    /// Finished on `theme`; `next` is the transition started from held input
    Completed {
        theme: ThemeIdentity,
        next: Option<ThemeIdentity>,
    },
}

/// A completed switch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwitchRecord {
    pub from: ThemeIdentity,
    pub to: ThemeIdentity,
    pub started_ms: u64,
    pub completed_ms: u64,
}

#[derive(Clone, Copy, Debug)]
enum Held {
    Sample(f32),
    Request(ThemeIdentity),
}

#[derive(Clone, Copy, Debug)]
struct Running {
    to: ThemeIdentity,
    tween: Tween,
}

/// Deterministic scroll-to-theme decision machine
///
/// Time is passed in explicitly; the machine owns no timers.
#[derive(Clone, Debug)]
pub struct HysteresisMachine {
    enter_threshold: f32,
    exit_threshold: f32,
    duration_ms: u64,
    easing: Easing,
    active: ThemeIdentity,
    running: Option<Running>,
    progress: f32,
    last_sample: f32,
    held: Option<Held>,
    switches: u64,
    history: VecDeque<SwitchRecord>,
}

impl HysteresisMachine {
    /// Build a machine from a validated config
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            enter_threshold: config.enter_threshold,
            exit_threshold: config.exit_threshold,
            duration_ms: config.transition_duration_ms,
            easing: config.easing,
            active: config.initial_theme,
            running: None,
            progress: 1.0,
            last_sample: 0.0,
            held: None,
            switches: 0,
            history: VecDeque::new(),
        })
    }

    /// Feed a scroll progress sample taken at `now_ms`
    ///
    /// Non-finite samples are ignored; others are clamped to `[0, 1]`.
    pub fn observe(&mut self, progress: f32, now_ms: u64) -> Observation {
        if !progress.is_finite() {
            tracing::trace!("ignoring non-finite scroll sample");
            return Observation::Ignored;
        }
        let progress = progress.clamp(0.0, 1.0);
        self.last_sample = progress;

        if self.running.is_some() {
            self.held = Some(Held::Sample(progress));
            return Observation::Deferred;
        }
        match self.decide(progress) {
            Some(to) => {
                self.start(to, now_ms);
                Observation::Started(to)
            }
            None => Observation::Ignored,
        }
    }

    /// Ask for `target` regardless of scroll position
    pub fn request(&mut self, target: ThemeIdentity, now_ms: u64) -> Observation {
        match self.running {
            Some(running) if running.to == target => {
                self.held = None;
                Observation::Ignored
            }
            Some(_) => {
                self.held = Some(Held::Request(target));
                Observation::Deferred
            }
            None if target == self.active => Observation::Ignored,
            None => {
                self.start(target, now_ms);
                Observation::Started(target)
            }
        }
    }

    /// Move a running transition to `now_ms`
    pub fn advance(&mut self, now_ms: u64) -> Advance {
        let Some(running) = self.running else {
            return Advance::Idle;
        };

        let eased = running.tween.value_at(now_ms).clamp(0.0, 1.0);
        // Overshooting curves must not move progress backwards
        self.progress = self.progress.max(eased);
        if !running.tween.is_finished(now_ms) {
            tracing::trace!("transition to {} at {:.3}", running.to, self.progress);
            return Advance::Progressed(self.progress);
        }

        let from = self.active;
        self.running = None;
        self.active = running.to;
        self.progress = 1.0;
        self.switches += 1;
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(SwitchRecord {
            from,
            to: running.to,
            started_ms: running.tween.start_ms(),
            completed_ms: now_ms,
        });
        tracing::debug!("theme transition {} -> {} completed at {}ms", from, running.to, now_ms);

        let next = match self.held.take() {
            Some(Held::Sample(progress)) => self.decide(progress),
            Some(Held::Request(target)) => (target != self.active).then_some(target),
            None => None,
        };
        if let Some(next) = next {
            self.start(next, now_ms);
        }
        Advance::Completed {
            theme: running.to,
            next,
        }
    }

    /// Switch immediately without a transition
    pub fn jump_to(&mut self, theme: ThemeIdentity, now_ms: u64) {
        self.running = None;
        self.held = None;
        self.progress = 1.0;
        if theme != self.active {
            let from = self.active;
            self.active = theme;
            self.switches += 1;
            if self.history.len() == HISTORY_LIMIT {
                self.history.pop_front();
            }
            self.history.push_back(SwitchRecord {
                from,
                to: theme,
                started_ms: now_ms,
                completed_ms: now_ms,
            });
            tracing::debug!("theme switched {} -> {} without transition", from, theme);
        }
    }

    /// Snapshot for consumers
    pub fn state(&self) -> TransitionState {
        TransitionState {
            active_theme: self.active,
            target_theme: self.target(),
            is_transitioning: self.running.is_some(),
            transition_progress: if self.running.is_some() { self.progress } else { 1.0 },
            last_scroll_progress: self.last_sample,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.running {
            Some(running) => Phase::Transitioning {
                from: self.active,
                to: running.to,
                progress: self.progress,
            },
            None => Phase::Stable(self.active),
        }
    }

    pub fn active(&self) -> ThemeIdentity {
        self.active
    }

    pub fn target(&self) -> ThemeIdentity {
        self.running.map(|r| r.to).unwrap_or(self.active)
    }

    pub fn is_transitioning(&self) -> bool {
        self.running.is_some()
    }

    /// Completed switches since construction
    pub fn switch_count(&self) -> u64 {
        self.switches
    }

    /// Most recent completed switches, oldest first
    pub fn history(&self) -> impl Iterator<Item = &SwitchRecord> {
        self.history.iter()
    }

    pub fn thresholds(&self) -> (f32, f32) {
        (self.enter_threshold, self.exit_threshold)
    }

    /// Theme a stable machine would move to on `progress`, if any
    fn decide(&self, progress: f32) -> Option<ThemeIdentity> {
        match self.active {
            ThemeIdentity::Primary if progress >= self.enter_threshold => {
                Some(ThemeIdentity::Secondary)
            }
            ThemeIdentity::Secondary if progress <= self.exit_threshold => {
                Some(ThemeIdentity::Primary)
            }
            _ => None,
        }
    }

    fn start(&mut self, to: ThemeIdentity, now_ms: u64) {
        tracing::debug!(
            "theme transition {} -> {} started at {}ms (sample {:.3})",
            self.active,
            to,
            now_ms,
            self.last_sample
        );
        self.running = Some(Running {
            to,
            tween: Tween::new(now_ms, self.duration_ms, self.easing),
        });
        self.progress = 0.0;
        self.held = None;
    }
}
