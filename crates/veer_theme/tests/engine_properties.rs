//! End-to-end behaviour of the theme engine
//!
//! Drives a mounted provider through a simulated viewport and a fake frame
//! loop, the same way a browser binding would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use veer_animation::Easing;
use veer_core::frame::{FrameCallback, FrameHandle, FrameScheduler, ManualFrameLoop};
use veer_core::viewport::SimulatedViewport;
use veer_core::{Environment, Scope};
use veer_theme::{
    use_theme, EngineConfig, ThemeContext, ThemeError, ThemeIdentity, ThemeProvider, ThemeToken,
    ThemeTokens, TransitionState,
};

/// 2000px of scrollable range, so progress is `offset / 2000`
const VIEWPORT: f64 = 800.0;
const DOCUMENT: f64 = 2800.0;
const FRAME_MS: u64 = 16;

struct Page {
    root: Scope,
    frames: Arc<ManualFrameLoop>,
    viewport: Arc<SimulatedViewport>,
    provider: ThemeProvider,
    theme: ThemeContext,
}

impl Page {
    fn mount(config: EngineConfig) -> Self {
        Self::mount_at(config, 0.0)
    }

    fn mount_at(config: EngineConfig, progress: f64) -> Self {
        let frames = Arc::new(ManualFrameLoop::new());
        let viewport = Arc::new(SimulatedViewport::new(VIEWPORT, DOCUMENT));
        viewport.scroll_to(progress * (DOCUMENT - VIEWPORT));
        let env = Environment::new(Some(viewport.clone()), frames.clone(), frames.clone());
        let root = Scope::root();
        let provider = ThemeProvider::mount(&root, &env, config, ThemeTokens::default()).unwrap();
        let theme = use_theme(&root.child()).unwrap();
        Self {
            root,
            frames,
            viewport,
            provider,
            theme,
        }
    }

    /// Scroll, then run the frame that flushes the sample
    fn scroll(&self, progress: f64) {
        self.viewport.scroll_to(progress * (DOCUMENT - VIEWPORT));
        self.frames.tick(FRAME_MS);
    }

    /// Run frames until no transition is left; returns the time it settled
    fn settle(&self) -> u64 {
        for _ in 0..1000 {
            if !self.theme.is_transitioning() {
                break;
            }
            self.frames.tick(FRAME_MS);
        }
        self.frames.now()
    }
}

/// Scheduler whose cancellations never take effect
///
/// Stands in for a host that fires an already-queued frame callback after
/// teardown.
struct LeakyScheduler {
    inner: Arc<ManualFrameLoop>,
}

impl FrameScheduler for LeakyScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        self.inner.request_frame(callback)
    }

    fn request_timeout(&self, delay_ms: u64, callback: FrameCallback) -> FrameHandle {
        self.inner.request_timeout(delay_ms, callback)
    }

    fn cancel(&self, _handle: FrameHandle) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Threshold crossing
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_upward_crossing_switches_once() {
    let page = Page::mount(EngineConfig::default());
    page.scroll(0.1);
    page.scroll(0.5);
    page.settle();

    assert_eq!(page.theme.active_theme(), ThemeIdentity::Secondary);
    assert_eq!(page.theme.switch_count(), 1);
}

#[test]
fn test_downward_crossing_switches_once() {
    let config = EngineConfig::default().with_initial_theme(ThemeIdentity::Secondary);
    let page = Page::mount_at(config, 0.5);
    assert_eq!(page.theme.active_theme(), ThemeIdentity::Secondary);
    assert!(!page.theme.is_transitioning());

    page.scroll(0.5);
    page.scroll(0.1);
    page.settle();

    assert_eq!(page.theme.active_theme(), ThemeIdentity::Primary);
    assert_eq!(page.theme.switch_count(), 1);
}

#[test]
fn test_mounting_past_threshold_transitions() {
    let page = Page::mount_at(EngineConfig::default(), 0.8);
    assert!(page.theme.is_transitioning());
    assert_eq!(page.theme.target_theme(), ThemeIdentity::Secondary);
    page.settle();
    assert_eq!(page.theme.active_theme(), ThemeIdentity::Secondary);
}

#[test]
fn test_dead_zone_noise_through_provider() {
    let page = Page::mount(EngineConfig::default());
    for i in 0..200 {
        page.scroll(if i % 2 == 0 { 0.36 } else { 0.39 });
    }
    assert_eq!(page.theme.active_theme(), ThemeIdentity::Primary);
    assert!(!page.theme.is_transitioning());
    assert_eq!(page.theme.switch_count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────
// Transition timing
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_duration_independent_of_extra_samples() {
    let page = Page::mount(EngineConfig::default());
    page.scroll(0.5);
    let started = page.frames.now();
    assert!(page.theme.is_transitioning());

    let mut offset = 0.5;
    let mut last_progress = 0.0;
    while page.theme.is_transitioning() {
        offset = (offset + 0.02f64).min(1.0);
        // Several raw events per frame, all in the same direction
        for _ in 0..5 {
            page.viewport
                .scroll_to(offset * (DOCUMENT - VIEWPORT));
        }
        page.frames.tick(FRAME_MS);

        let progress = page.theme.transition_progress();
        assert!(progress >= last_progress || !page.theme.is_transitioning());
        last_progress = progress;
    }

    let elapsed = page.frames.now() - started;
    assert!(
        (600..=600 + FRAME_MS).contains(&elapsed),
        "settled after {}ms",
        elapsed
    );
    assert_eq!(page.theme.transition_progress(), 1.0);
    assert_eq!(page.theme.switch_count(), 1);
}

#[test]
fn test_reversal_mid_transition_finishes_then_reverses() {
    let page = Page::mount(EngineConfig::default());
    page.scroll(0.6);
    page.frames.run_frames(10, FRAME_MS);
    let before = page.theme.transition_progress();

    page.scroll(0.1);
    // No restart and no snap back
    assert_eq!(page.theme.target_theme(), ThemeIdentity::Secondary);
    assert!(page.theme.transition_progress() >= before);

    // First transition lands on Secondary before the reversal starts
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    page.theme.subscribe(move |state: &TransitionState| {
        let mut log = log.lock().unwrap();
        if log.last() != Some(&state.active_theme) {
            log.push(state.active_theme);
        }
    });
    page.settle();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![ThemeIdentity::Primary, ThemeIdentity::Secondary, ThemeIdentity::Primary]
    );
    assert_eq!(page.theme.switch_count(), 2);
}

// ─────────────────────────────────────────────────────────────────────────
// Throttling
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_event_storm_yields_one_sample_per_frame() {
    let page = Page::mount(EngineConfig::default());
    let samples_before = page.provider.sample_count();
    let events_before = page.provider.raw_event_count();

    for i in 0..50 {
        page.viewport.scroll_to(10.0 * i as f64);
    }
    page.frames.tick(FRAME_MS);

    assert_eq!(page.provider.raw_event_count() - events_before, 50);
    assert_eq!(page.provider.sample_count() - samples_before, 1);
    assert!((page.theme.last_scroll_progress() - 490.0 / 2000.0).abs() < 1e-6);
}

// ─────────────────────────────────────────────────────────────────────────
// Cleanup
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_no_mutation_after_unmount() {
    let clock = Arc::new(ManualFrameLoop::new());
    let leaky = Arc::new(LeakyScheduler {
        inner: clock.clone(),
    });
    let viewport = Arc::new(SimulatedViewport::new(VIEWPORT, DOCUMENT));
    let env = Environment::new(Some(viewport.clone()), leaky, clock.clone());
    let root = Scope::root();
    let provider =
        ThemeProvider::mount(&root, &env, EngineConfig::default(), ThemeTokens::default()).unwrap();
    let theme = provider.context();

    let updates = Arc::new(AtomicUsize::new(0));
    let counter = updates.clone();
    theme.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    viewport.scroll_to(1200.0);
    clock.run_frames(3, FRAME_MS);
    assert!(theme.is_transitioning());

    let frozen = theme.state();
    let update_count = updates.load(Ordering::SeqCst);
    provider.unmount();

    // The driver's next frame is still queued; let it fire
    assert!(clock.pending_frames() > 0);
    viewport.scroll_to(100.0);
    clock.run_frames(60, FRAME_MS);

    assert_eq!(theme.state(), frozen);
    assert_eq!(updates.load(Ordering::SeqCst), update_count);
    assert_eq!(viewport.listener_count(), 0);
    assert!(use_theme(&root).is_err());
}

#[test]
fn test_drop_detaches_listeners() {
    let page = Page::mount(EngineConfig::default());
    assert_eq!(page.viewport.listener_count(), 2);
    let Page {
        root,
        viewport,
        provider,
        theme,
        ..
    } = page;
    drop(provider);
    assert_eq!(viewport.listener_count(), 0);
    assert!(!theme.is_mounted());
    assert!(matches!(use_theme(&root), Err(ThemeError::NoProvider)));
}

// ─────────────────────────────────────────────────────────────────────────
// Token blending
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_numeric_tokens_hit_midpoint() {
    let config = EngineConfig::default().with_easing(Easing::Linear);
    let page = Page::mount(config);
    page.scroll(0.5);

    // Linear, 600ms: halfway after 300ms
    page.frames.run_frames((300 / FRAME_MS) as usize, FRAME_MS);
    page.frames.tick(300 % FRAME_MS);
    assert_eq!(page.theme.transition_progress(), 0.5);

    let vars = page.theme.css_variables();
    assert_eq!(vars.token(ThemeToken::BorderWidth), Some("6px"));
    assert_eq!(vars.token(ThemeToken::BorderRadius), Some("4px"));
    assert_eq!(vars.get("--theme-transition-progress"), Some("0.500"));
}

#[test]
fn test_text_tokens_step_at_half() {
    let tokens = ThemeTokens::default();
    let from = tokens.resolve(ThemeIdentity::Primary);
    let to = tokens.resolve(ThemeIdentity::Secondary);
    let state = |progress| TransitionState {
        target_theme: ThemeIdentity::Secondary,
        is_transitioning: true,
        transition_progress: progress,
        ..TransitionState::stable(ThemeIdentity::Primary)
    };

    let early = veer_theme::CssVariables::from_state(&state(0.49), &tokens);
    let late = veer_theme::CssVariables::from_state(&state(0.51), &tokens);

    assert_eq!(early.token(ThemeToken::FontPrimary), Some(from.typography.primary.as_str()));
    assert_eq!(late.token(ThemeToken::FontPrimary), Some(to.typography.primary.as_str()));
    assert_eq!(early.token(ThemeToken::AnimationEasing), Some(from.animations.easing.as_str()));
    assert_eq!(late.token(ThemeToken::AnimationEasing), Some(to.animations.easing.as_str()));
}

// ─────────────────────────────────────────────────────────────────────────
// Server rendering
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_mount_is_static_primary() {
    let root = Scope::root();
    let _provider = ThemeProvider::mount(
        &root,
        &Environment::headless(),
        EngineConfig::default(),
        ThemeTokens::default(),
    )
    .unwrap();
    let theme = use_theme(&root).unwrap();

    assert_eq!(theme.active_theme(), ThemeIdentity::Primary);
    assert!(!theme.is_transitioning());
    assert_eq!(theme.transition_progress(), 1.0);
    assert_eq!(
        theme.css_variables(),
        veer_theme::CssVariables::for_theme(theme.theme_tokens(), ThemeIdentity::Primary)
    );
}

// ─────────────────────────────────────────────────────────────────────────
// Context wiring
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_consumer_without_provider_fails() {
    let orphan = Scope::root().child();
    let err = use_theme(&orphan).unwrap_err();
    assert!(matches!(err, ThemeError::NoProvider));
    assert!(err.to_string().contains("no theme provider"));
}

#[test]
fn test_nested_provider_shadows_outer() {
    let outer = Page::mount(EngineConfig::default());
    let subtree = outer.root.child();
    let inner_config = EngineConfig::default().with_initial_theme(ThemeIdentity::Secondary);
    let _inner = ThemeProvider::mount(
        &subtree,
        &Environment::headless(),
        inner_config,
        ThemeTokens::default(),
    )
    .unwrap();

    assert_eq!(
        use_theme(&subtree.child()).unwrap().active_theme(),
        ThemeIdentity::Secondary
    );
    assert_eq!(use_theme(&outer.root).unwrap().active_theme(), ThemeIdentity::Primary);
}

#[test]
fn test_consumers_see_every_update() {
    let page = Page::mount(EngineConfig::default());
    let a = use_theme(&page.root.child()).unwrap();
    let b = use_theme(&page.root.child().child()).unwrap();

    page.scroll(0.7);
    page.frames.run_frames(5, FRAME_MS);
    assert_eq!(a.state(), b.state());
    assert_eq!(a.state(), page.theme.state());
    assert!(a.is_transitioning());

    page.settle();
    assert_eq!(b.theme_class("nav"), "nav nav--refined-brutalist");
    assert!(b.condition(ThemeIdentity::Secondary).is_active);
}
