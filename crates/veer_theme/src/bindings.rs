//! Consumer bindings
//!
//! Turns a [`TransitionState`] and the theme tokens into what presentation
//! code consumes: a CSS custom-property map to apply at a root element, and
//! class/condition helpers for components that branch on the theme.

use crate::identity::ThemeIdentity;
use crate::state::TransitionState;
use crate::tokens::{ThemeToken, ThemeTokens};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write as _;

/// Name of the variable carrying the active theme id
pub const CURRENT_THEME_VAR: &str = "--current-theme";
/// Name of the variable carrying the transition progress
pub const TRANSITION_PROGRESS_VAR: &str = "--theme-transition-progress";

/// Ordered CSS custom properties
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CssVariables {
    vars: IndexMap<String, String>,
}

impl CssVariables {
    /// Variables for a settled theme
    pub fn for_theme(tokens: &ThemeTokens, theme: ThemeIdentity) -> Self {
        Self::from_state(&TransitionState::stable(theme), tokens)
    }

    /// Variables for `state`, blended while a transition runs
    ///
    /// Every token goes through the same rule: numbers with matching units
    /// and colors interpolate, everything else switches once progress
    /// passes one half.
    pub fn from_state(state: &TransitionState, tokens: &ThemeTokens) -> Self {
        let from = tokens.resolve(state.active_theme);
        let to = tokens.resolve(state.target_theme);
        let t = state.blend_factor();

        let mut vars = IndexMap::with_capacity(ThemeToken::ALL.len() + 2);
        for token in ThemeToken::ALL {
            let value = if state.is_transitioning {
                from.blend_token(to, token, t)
            } else {
                from.get(token)
            };
            vars.insert(token.css_var().to_string(), value.to_css());
        }
        vars.insert(
            CURRENT_THEME_VAR.to_string(),
            state.active_theme.id().to_string(),
        );
        vars.insert(
            TRANSITION_PROGRESS_VAR.to_string(),
            format!("{:.3}", state.transition_progress),
        );

        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn token(&self, token: ThemeToken) -> Option<&str> {
        self.get(token.css_var())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// `name: value; ...` for a `style` attribute
    pub fn to_inline_style(&self) -> String {
        let mut out = String::new();
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}: {};", name, value);
        }
        out
    }

    /// A stylesheet rule, e.g. `:root { ... }`
    pub fn to_rule(&self, selector: &str) -> String {
        let mut out = format!("{} {{\n", selector);
        for (name, value) in self.iter() {
            let _ = writeln!(out, "  {}: {};", name, value);
        }
        out.push('}');
        out
    }
}

/// `"base base--<theme-id>"`
pub fn theme_class(base: &str, theme: ThemeIdentity) -> String {
    format!("{} {}--{}", base, base, theme.id())
}

/// [`theme_class`] followed by the variant class registered for `theme`, if any
pub fn theme_class_with_variants(
    base: &str,
    theme: ThemeIdentity,
    variants: &[(ThemeIdentity, &str)],
) -> String {
    let mut class = theme_class(base, theme);
    let variant = variants
        .iter()
        .find(|(t, v)| *t == theme && !v.is_empty())
        .map(|(_, v)| *v);
    if let Some(variant) = variant {
        class.push(' ');
        class.push_str(variant);
    }
    class
}

/// Class for the document body: `"theme-<theme-id>"`
pub fn body_class(theme: ThemeIdentity) -> String {
    format!("theme-{}", theme.id())
}

/// Flags for components that branch on the theme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ThemeCondition {
    /// The queried theme is the active one
    pub is_active: bool,
    pub is_primary: bool,
    pub is_secondary: bool,
}

impl ThemeCondition {
    pub fn new(active: ThemeIdentity, queried: ThemeIdentity) -> Self {
        Self {
            is_active: active == queried,
            is_primary: active == ThemeIdentity::Primary,
            is_secondary: active == ThemeIdentity::Secondary,
        }
    }
}
