//! Property-based tests for the hysteresis machine.
//!
//! 1. Samples confined to the dead zone never change the theme.
//! 2. Rapid noise between 0.36 and 0.39 produces zero transitions.
//! 3. Completed switches never exceed threshold crossings.
//! 4. The machine is deterministic for a given sample sequence.

use proptest::prelude::*;
use veer_theme::{Advance, EngineConfig, HysteresisMachine, ThemeIdentity};

const ENTER: f32 = 0.40;
const EXIT: f32 = 0.35;

// ── Helpers ─────────────────────────────────────────────────────────────

fn machine(initial: ThemeIdentity) -> HysteresisMachine {
    let config = EngineConfig::default().with_initial_theme(initial);
    HysteresisMachine::new(&config).unwrap()
}

fn theme_strategy() -> impl Strategy<Value = ThemeIdentity> {
    prop_oneof![Just(ThemeIdentity::Primary), Just(ThemeIdentity::Secondary)]
}

/// Samples with the time elapsed since the previous one
fn trace_strategy(range: std::ops::RangeInclusive<f32>) -> impl Strategy<Value = Vec<(f32, u64)>> {
    prop::collection::vec((range, 0u64..=120), 1..400)
}

/// Feed every sample, advancing the clock first, then let the last
/// transition finish. Returns the number of transitions started.
fn replay(m: &mut HysteresisMachine, trace: &[(f32, u64)]) -> usize {
    let mut now = 0u64;
    let mut started = 0;
    for &(progress, dt) in trace {
        now += dt;
        if let Advance::Completed { next: Some(_), .. } = m.advance(now) {
            started += 1;
        }
        if matches!(m.observe(progress, now), veer_theme::Observation::Started(_)) {
            started += 1;
        }
    }
    while m.is_transitioning() {
        now += 16;
        if let Advance::Completed { next: Some(_), .. } = m.advance(now) {
            started += 1;
        }
    }
    started
}

fn crossings(trace: &[(f32, u64)]) -> u64 {
    let mut previous = 0.0f32;
    let mut count = 0;
    for &(p, _) in trace {
        if p >= ENTER && previous < ENTER {
            count += 1;
        }
        if p <= EXIT && previous > EXIT {
            count += 1;
        }
        previous = p;
    }
    count
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Dead zone
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dead_zone_never_switches(
        initial in theme_strategy(),
        trace in trace_strategy(0.3501f32..=0.3999),
    ) {
        let mut m = machine(initial);
        let started = replay(&mut m, &trace);
        prop_assert_eq!(started, 0);
        prop_assert_eq!(m.active(), initial);
        prop_assert_eq!(m.switch_count(), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Noise inside the dead zone
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn oscillating_noise_is_ignored(initial in theme_strategy(), len in 1usize..2000) {
        let trace: Vec<(f32, u64)> = (0..len)
            .map(|i| (if i % 2 == 0 { 0.36 } else { 0.39 }, 1))
            .collect();
        let mut m = machine(initial);
        prop_assert_eq!(replay(&mut m, &trace), 0);
        prop_assert_eq!(m.active(), initial);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Switches bounded by crossings
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn switches_bounded_by_crossings(trace in trace_strategy(0.0f32..=1.0)) {
        let mut m = machine(ThemeIdentity::Primary);
        replay(&mut m, &trace);
        prop_assert!(
            m.switch_count() <= crossings(&trace),
            "{} switches for {} crossings",
            m.switch_count(),
            crossings(&trace)
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replay_is_deterministic(trace in trace_strategy(0.0f32..=1.0)) {
        let mut a = machine(ThemeIdentity::Primary);
        let mut b = machine(ThemeIdentity::Primary);
        replay(&mut a, &trace);
        replay(&mut b, &trace);
        prop_assert_eq!(a.state(), b.state());
        prop_assert!(a.history().eq(b.history()));
    }
}
