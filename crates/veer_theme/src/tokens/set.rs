//! Token sets and the CSS variable contract

use super::value::{Dimension, TokenValue};
use serde::{Deserialize, Serialize};
use veer_core::Color;

/// Every key exposed as a CSS custom property
///
/// The variable names are a public contract; renaming one breaks stylesheets.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ThemeToken {
    Primary,
    Secondary,
    Accent,
    Highlight,
    Success,
    Background,
    Text,
    AccentRgb,
    HighlightRgb,
    SuccessRgb,
    FontPrimary,
    FontCode,
    BorderWidth,
    BorderStyle,
    BorderRadius,
    AnimationDuration,
    AnimationEasing,
    ShadowBrutal,
    ShadowSubtle,
    ShadowDouble,
    ShadowTriple,
    ShadowElevated,
    ShadowGlow,
}

impl ThemeToken {
    /// All tokens, in the order they are emitted
    pub const ALL: [ThemeToken; 23] = [
        ThemeToken::Primary,
        ThemeToken::Secondary,
        ThemeToken::Accent,
        ThemeToken::Highlight,
        ThemeToken::Success,
        ThemeToken::Background,
        ThemeToken::Text,
        ThemeToken::AccentRgb,
        ThemeToken::HighlightRgb,
        ThemeToken::SuccessRgb,
        ThemeToken::FontPrimary,
        ThemeToken::FontCode,
        ThemeToken::BorderWidth,
        ThemeToken::BorderStyle,
        ThemeToken::BorderRadius,
        ThemeToken::AnimationDuration,
        ThemeToken::AnimationEasing,
        ThemeToken::ShadowBrutal,
        ThemeToken::ShadowSubtle,
        ThemeToken::ShadowDouble,
        ThemeToken::ShadowTriple,
        ThemeToken::ShadowElevated,
        ThemeToken::ShadowGlow,
    ];

    pub const fn css_var(self) -> &'static str {
        match self {
            ThemeToken::Primary => "--theme-primary",
            ThemeToken::Secondary => "--theme-secondary",
            ThemeToken::Accent => "--theme-accent",
            ThemeToken::Highlight => "--theme-highlight",
            ThemeToken::Success => "--theme-success",
            ThemeToken::Background => "--theme-bg",
            ThemeToken::Text => "--theme-text",
            ThemeToken::AccentRgb => "--theme-accent-rgb",
            ThemeToken::HighlightRgb => "--theme-highlight-rgb",
            ThemeToken::SuccessRgb => "--theme-success-rgb",
            ThemeToken::FontPrimary => "--theme-font-primary",
            ThemeToken::FontCode => "--theme-font-code",
            ThemeToken::BorderWidth => "--theme-border-width",
            ThemeToken::BorderStyle => "--theme-border-style",
            ThemeToken::BorderRadius => "--theme-border-radius",
            ThemeToken::AnimationDuration => "--theme-animation-duration",
            ThemeToken::AnimationEasing => "--theme-animation-easing",
            ThemeToken::ShadowBrutal => "--theme-shadow-brutal",
            ThemeToken::ShadowSubtle => "--theme-shadow-subtle",
            ThemeToken::ShadowDouble => "--theme-shadow-double",
            ThemeToken::ShadowTriple => "--theme-shadow-triple",
            ThemeToken::ShadowElevated => "--theme-shadow-elevated",
            ThemeToken::ShadowGlow => "--theme-shadow-glow",
        }
    }

    /// Color a `*-rgb` token is derived from
    pub const fn rgb_source(self) -> Option<ThemeToken> {
        match self {
            ThemeToken::AccentRgb => Some(ThemeToken::Accent),
            ThemeToken::HighlightRgb => Some(ThemeToken::Highlight),
            ThemeToken::SuccessRgb => Some(ThemeToken::Success),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorTokens {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub highlight: Color,
    pub success: Color,
    pub bg: Color,
    pub text: Color,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypographyTokens {
    pub primary: String,
    pub code: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderTokens {
    pub width: Dimension,
    pub style: String,
    pub radius: Dimension,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationTokens {
    pub duration: Dimension,
    pub easing: String,
}

/// Box shadows; an absent shadow renders as `none`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShadowTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brutal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triple: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow: Option<String>,
}

/// The resolved design values of one theme
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSet {
    pub colors: ColorTokens,
    pub typography: TypographyTokens,
    pub borders: BorderTokens,
    pub animations: AnimationTokens,
    #[serde(default)]
    pub shadows: ShadowTokens,
}

impl TokenSet {
    /// Value of a single token
    pub fn get(&self, token: ThemeToken) -> TokenValue {
        fn shadow(value: &Option<String>) -> TokenValue {
            TokenValue::Text(value.clone().unwrap_or_else(|| "none".to_string()))
        }

        let c = &self.colors;
        match token {
            ThemeToken::Primary => c.primary.into(),
            ThemeToken::Secondary => c.secondary.into(),
            ThemeToken::Accent => c.accent.into(),
            ThemeToken::Highlight => c.highlight.into(),
            ThemeToken::Success => c.success.into(),
            ThemeToken::Background => c.bg.into(),
            ThemeToken::Text => c.text.into(),
            ThemeToken::AccentRgb => TokenValue::Text(c.accent.to_rgb_triplet()),
            ThemeToken::HighlightRgb => TokenValue::Text(c.highlight.to_rgb_triplet()),
            ThemeToken::SuccessRgb => TokenValue::Text(c.success.to_rgb_triplet()),
            ThemeToken::FontPrimary => TokenValue::Text(self.typography.primary.clone()),
            ThemeToken::FontCode => TokenValue::Text(self.typography.code.clone()),
            ThemeToken::BorderWidth => self.borders.width.into(),
            ThemeToken::BorderStyle => TokenValue::Text(self.borders.style.clone()),
            ThemeToken::BorderRadius => self.borders.radius.into(),
            ThemeToken::AnimationDuration => self.animations.duration.into(),
            ThemeToken::AnimationEasing => TokenValue::Text(self.animations.easing.clone()),
            ThemeToken::ShadowBrutal => shadow(&self.shadows.brutal),
            ThemeToken::ShadowSubtle => shadow(&self.shadows.subtle),
            ThemeToken::ShadowDouble => shadow(&self.shadows.double),
            ThemeToken::ShadowTriple => shadow(&self.shadows.triple),
            ThemeToken::ShadowElevated => shadow(&self.shadows.elevated),
            ThemeToken::ShadowGlow => shadow(&self.shadows.glow),
        }
    }

    /// Value of `token` blended from `self` toward `to`
    ///
    /// `*-rgb` tokens follow their blended source color so the triplet and
    /// the hex value never disagree mid-transition.
    pub fn blend_token(&self, to: &TokenSet, token: ThemeToken, t: f32) -> TokenValue {
        if let Some(source) = token.rgb_source() {
            let blended = TokenValue::blend(&self.get(source), &to.get(source), t);
            if let Some(color) = blended.as_color() {
                return TokenValue::Text(color.to_rgb_triplet());
            }
        }
        TokenValue::blend(&self.get(token), &to.get(token), t)
    }
}
