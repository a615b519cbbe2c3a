//! Transition state snapshots

use crate::identity::ThemeIdentity;
use serde::{Deserialize, Serialize};

/// Everything a consumer needs to render the current theme
///
/// Published as one value: consumers never see `active_theme` from one
/// update paired with `transition_progress` from another.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionState {
    /// Theme in effect; changes when a transition completes
    pub active_theme: ThemeIdentity,
    /// Where a running transition is headed; equals `active_theme` when stable
    pub target_theme: ThemeIdentity,
    pub is_transitioning: bool,
    /// Eased progress of the running transition; 1.0 when stable
    pub transition_progress: f32,
    /// Most recent scroll progress observed
    pub last_scroll_progress: f32,
}

impl TransitionState {
    /// A settled state showing `theme`
    pub fn stable(theme: ThemeIdentity) -> Self {
        Self {
            active_theme: theme,
            target_theme: theme,
            is_transitioning: false,
            transition_progress: 1.0,
            last_scroll_progress: 0.0,
        }
    }

    pub fn is_active(&self, theme: ThemeIdentity) -> bool {
        self.active_theme == theme
    }

    /// Blend factor from `active_theme` toward `target_theme`
    ///
    /// Zero when stable, so consumers blending between the two sets always
    /// land on the active one.
    pub fn blend_factor(&self) -> f32 {
        if self.is_transitioning {
            self.transition_progress
        } else {
            0.0
        }
    }
}

impl Default for TransitionState {
    fn default() -> Self {
        Self::stable(ThemeIdentity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stable_primary() {
        let state = TransitionState::default();
        assert_eq!(state.active_theme, ThemeIdentity::Primary);
        assert!(!state.is_transitioning);
        assert_eq!(state.transition_progress, 1.0);
        assert_eq!(state.blend_factor(), 0.0);
    }
}
