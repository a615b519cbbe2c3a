//! Time-based tweens
//!
//! A [`Tween`] maps elapsed clock time onto an eased `0..=1` value. It holds
//! no timer of its own; whoever drives frames asks it for the value at the
//! frame timestamp. Progress therefore depends only on elapsed time, never on
//! how often it is sampled.

use crate::easing::Easing;

/// Eased progress between `start_ms` and `start_ms + duration_ms`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl Tween {
    pub fn new(start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            start_ms,
            duration_ms,
            easing,
        }
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Un-eased fraction of the duration elapsed at `now_ms`
    ///
    /// A zero-length tween is complete immediately.
    pub fn linear_at(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        (elapsed as f64 / self.duration_ms as f64).min(1.0) as f32
    }

    /// Eased progress at `now_ms`
    pub fn value_at(&self, now_ms: u64) -> f32 {
        self.easing.apply(self.linear_at(now_ms))
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        now_ms >= self.end_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_tween() {
        let tween = Tween::new(1000, 600, Easing::Linear);
        assert_eq!(tween.value_at(1000), 0.0);
        assert_eq!(tween.value_at(1300), 0.5);
        assert_eq!(tween.value_at(1600), 1.0);
        assert_eq!(tween.value_at(5000), 1.0);
        assert!(!tween.is_finished(1599));
        assert!(tween.is_finished(1600));
    }

    #[test]
    fn test_before_start_is_zero() {
        let tween = Tween::new(1000, 600, Easing::STANDARD);
        assert_eq!(tween.value_at(0), 0.0);
    }

    #[test]
    fn test_zero_duration_completes_at_once() {
        let tween = Tween::new(50, 0, Easing::STANDARD);
        assert_eq!(tween.value_at(50), 1.0);
        assert!(tween.is_finished(50));
    }

    #[test]
    fn test_easing_applies_to_fraction() {
        let tween = Tween::new(0, 100, Easing::EaseInQuad);
        assert_eq!(tween.linear_at(50), 0.5);
        assert_eq!(tween.value_at(50), 0.25);
    }
}
