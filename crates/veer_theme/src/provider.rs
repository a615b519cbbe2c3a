//! Theme provider and consumer context
//!
//! A [`ThemeProvider`] owns one engine per page tree: the scroll sampler, the
//! hysteresis machine, the frame loop that advances transitions, and the
//! [`Store`] every consumer reads from. Mounting it publishes a
//! [`ThemeContext`] into a [`Scope`]; descendants obtain it with
//! [`use_theme`].
//!
//! ```rust
//! use veer_core::{Environment, Scope};
//! use veer_theme::{use_theme, EngineConfig, ThemeIdentity, ThemeProvider, ThemeTokens};
//!
//! let root = Scope::root();
//! let provider = ThemeProvider::mount(
//!     &root,
//!     &Environment::headless(),
//!     EngineConfig::default(),
//!     ThemeTokens::default(),
//! )
//! .unwrap();
//!
//! let theme = use_theme(&root.child()).unwrap();
//! assert_eq!(theme.active_theme(), ThemeIdentity::Primary);
//! assert!(!theme.is_transitioning());
//!
//! provider.unmount();
//! assert!(use_theme(&root).is_err());
//! ```

use crate::bindings::{self, CssVariables, ThemeCondition};
use crate::config::EngineConfig;
use crate::error::{Result, ThemeError};
use crate::identity::ThemeIdentity;
use crate::machine::{HysteresisMachine, Observation, SwitchRecord};
use crate::state::TransitionState;
use crate::tokens::{ThemeTokens, TokenSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use veer_animation::FrameLoop;
use veer_core::scroll::{ScrollSample, ScrollSampler};
use veer_core::sync::lock;
use veer_core::{Environment, Scope, Store, SubscriptionId};

struct ProviderInner {
    env: Environment,
    config: EngineConfig,
    tokens: Arc<ThemeTokens>,
    machine: Mutex<HysteresisMachine>,
    store: Store<TransitionState>,
    driver: FrameLoop,
    sampler: Mutex<Option<ScrollSampler>>,
    mounted: AtomicBool,
}

impl ProviderInner {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn on_sample(self: &Arc<Self>, sample: &ScrollSample) {
        if !self.is_mounted() {
            return;
        }
        let (observation, state) = {
            let mut machine = lock(&self.machine);
            let observation = machine.observe(sample.progress, sample.timestamp_ms);
            (observation, machine.state())
        };
        tracing::trace!(
            "scroll sample {:.3} at {}ms: {:?}",
            sample.progress,
            sample.timestamp_ms,
            observation
        );
        self.store.set_if_changed(state);
        if matches!(observation, Observation::Started(_)) {
            self.ensure_running();
        }
    }

    /// One frame of the transition loop. Returns true to keep running.
    fn on_frame(&self, now_ms: u64) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let state = {
            let mut machine = lock(&self.machine);
            machine.advance(now_ms);
            machine.state()
        };
        self.store.set_if_changed(state);
        // Subscribers may have requested a theme while being notified
        self.is_mounted() && lock(&self.machine).is_transitioning()
    }

    fn ensure_running(self: &Arc<Self>) {
        if self.driver.is_running() {
            return;
        }
        let weak: Weak<ProviderInner> = Arc::downgrade(self);
        self.driver.run(move |now_ms| match weak.upgrade() {
            Some(inner) => inner.on_frame(now_ms),
            None => false,
        });
    }

    fn request(self: &Arc<Self>, theme: ThemeIdentity) -> Result<()> {
        if !self.is_mounted() {
            return Err(ThemeError::Unmounted);
        }
        let now_ms = self.env.now_ms();
        let (observation, state) = {
            let mut machine = lock(&self.machine);
            let observation = if self.env.is_interactive() {
                machine.request(theme, now_ms)
            } else {
                // Nothing would drive a transition without a frame loop
                machine.jump_to(theme, now_ms);
                Observation::Ignored
            };
            (observation, machine.state())
        };
        tracing::debug!("theme {} requested: {:?}", theme, observation);
        self.store.set_if_changed(state);
        if matches!(observation, Observation::Started(_)) {
            self.ensure_running();
        }
        Ok(())
    }

    fn shutdown(&self) -> bool {
        if !self.mounted.swap(false, Ordering::SeqCst) {
            return false;
        }
        self.driver.cancel();
        let sampler = lock(&self.sampler).take();
        if let Some(sampler) = sampler {
            sampler.detach();
        }
        self.store.close();
        true
    }
}

/// Owner of the theme engine for one page tree
///
/// Unmounts on drop.
pub struct ThemeProvider {
    inner: Arc<ProviderInner>,
    scope: Scope,
}

impl ThemeProvider {
    /// Validate `config`, start sampling and publish a [`ThemeContext`] into `scope`
    ///
    /// Fails with [`ThemeError::DuplicateProvider`] if `scope` already holds
    /// one. A provider in a descendant scope shadows an ancestor's for its
    /// subtree.
    pub fn mount(
        scope: &Scope,
        env: &Environment,
        config: EngineConfig,
        tokens: ThemeTokens,
    ) -> Result<Self> {
        let machine = HysteresisMachine::new(&config)?;
        let initial = machine.state();
        let inner = Arc::new(ProviderInner {
            env: env.clone(),
            tokens: Arc::new(tokens),
            machine: Mutex::new(machine),
            store: Store::new(initial),
            driver: FrameLoop::new(Arc::clone(env.frames())),
            sampler: Mutex::new(None),
            mounted: AtomicBool::new(true),
            config,
        });

        scope.provide(ThemeContext {
            inner: Arc::clone(&inner),
        })?;

        if env.is_interactive() {
            let sampler = ScrollSampler::attach(env, inner.config.sampler.clone());
            let weak = Arc::downgrade(&inner);
            sampler.subscribe(move |sample| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_sample(sample);
                }
            });
            let initial = sampler.current();
            *lock(&inner.sampler) = Some(sampler);
            inner.on_sample(&initial);
        }

        tracing::debug!(
            "theme provider mounted at depth {} (interactive: {}, active: {})",
            scope.depth(),
            env.is_interactive(),
            inner.store.with(|s| s.active_theme)
        );

        Ok(Self {
            inner,
            scope: scope.clone(),
        })
    }

    /// A handle equivalent to what [`use_theme`] returns below this provider
    pub fn context(&self) -> ThemeContext {
        ThemeContext {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Stop sampling, cancel any running transition and withdraw the context
    ///
    /// Pending frame callbacks become no-ops. Safe to call more than once.
    pub fn unmount(&self) {
        if !self.inner.shutdown() {
            return;
        }
        if let Some(context) = self.scope.withdraw::<ThemeContext>() {
            if !Arc::ptr_eq(&context.inner, &self.inner) {
                // Not ours; put it back
                let _ = self.scope.provide((*context).clone());
            }
        }
        tracing::debug!("theme provider unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    /// Raw scroll/resize events seen by the sampler
    pub fn raw_event_count(&self) -> u64 {
        lock(&self.inner.sampler)
            .as_ref()
            .map(|s| s.raw_event_count())
            .unwrap_or(0)
    }

    /// Samples forwarded by the sampler
    pub fn sample_count(&self) -> u64 {
        lock(&self.inner.sampler)
            .as_ref()
            .map(|s| s.sample_count())
            .unwrap_or(0)
    }

    /// Recent completed switches, oldest first
    pub fn history(&self) -> Vec<SwitchRecord> {
        lock(&self.inner.machine).history().copied().collect()
    }
}

impl Drop for ThemeProvider {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Consumer handle to the nearest provider
///
/// Every read goes to the provider's store, so it always reflects the latest
/// published [`TransitionState`].
#[derive(Clone)]
pub struct ThemeContext {
    inner: Arc<ProviderInner>,
}

impl ThemeContext {
    /// Consistent snapshot of the whole state
    pub fn state(&self) -> TransitionState {
        self.inner.store.get()
    }

    pub fn active_theme(&self) -> ThemeIdentity {
        self.inner.store.with(|s| s.active_theme)
    }

    pub fn target_theme(&self) -> ThemeIdentity {
        self.inner.store.with(|s| s.target_theme)
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.store.with(|s| s.is_transitioning)
    }

    pub fn transition_progress(&self) -> f32 {
        self.inner.store.with(|s| s.transition_progress)
    }

    pub fn last_scroll_progress(&self) -> f32 {
        self.inner.store.with(|s| s.last_scroll_progress)
    }

    /// Token set of the active theme
    pub fn tokens(&self) -> &TokenSet {
        self.inner.tokens.resolve(self.active_theme())
    }

    /// Token sets of both themes
    pub fn theme_tokens(&self) -> &ThemeTokens {
        &self.inner.tokens
    }

    /// `"base base--<active-theme>"`
    pub fn theme_class(&self, base: &str) -> String {
        bindings::theme_class(base, self.active_theme())
    }

    pub fn theme_class_with_variants(
        &self,
        base: &str,
        variants: &[(ThemeIdentity, &str)],
    ) -> String {
        bindings::theme_class_with_variants(base, self.active_theme(), variants)
    }

    pub fn body_class(&self) -> String {
        bindings::body_class(self.active_theme())
    }

    pub fn is_active(&self, theme: ThemeIdentity) -> bool {
        self.active_theme() == theme
    }

    pub fn condition(&self, theme: ThemeIdentity) -> ThemeCondition {
        ThemeCondition::new(self.active_theme(), theme)
    }

    /// CSS variables for the current state, blended mid-transition
    pub fn css_variables(&self) -> CssVariables {
        CssVariables::from_state(&self.state(), &self.inner.tokens)
    }

    /// Move to `theme` without scroll input
    ///
    /// Starts a transition when a frame loop is available and switches
    /// immediately otherwise. While another transition runs the request is
    /// held until it completes.
    pub fn set_theme(&self, theme: ThemeIdentity) -> Result<()> {
        self.inner.request(theme)
    }

    /// Request the opposite of the current target
    pub fn toggle_theme(&self) -> Result<()> {
        self.set_theme(self.target_theme().other())
    }

    /// Call `callback` with every new state
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&TransitionState) + Send + Sync + 'static,
    {
        self.inner.store.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.store.unsubscribe(id)
    }

    /// Completed switches since mount
    pub fn switch_count(&self) -> u64 {
        lock(&self.inner.machine).switch_count()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }
}

impl std::fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeContext")
            .field("state", &self.state())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

/// Nearest [`ThemeContext`] above `scope`
///
/// Fails with [`ThemeError::NoProvider`] when no provider is mounted in
/// `scope` or any ancestor.
pub fn use_theme(scope: &Scope) -> Result<ThemeContext> {
    let context = scope.consume::<ThemeContext>()?;
    Ok((*context).clone())
}
