//! Built-in token sets
//!
//! The extreme preset is hard-edged: pure black and white with a signal
//! yellow accent, monospace type, heavy borders and offset block shadows.
//! The refined preset keeps the structure but softens every value.

use crate::tokens::{
    AnimationTokens, BorderTokens, ColorTokens, Dimension, ShadowTokens, TokenSet,
    TypographyTokens,
};
use veer_core::Color;

/// Tokens for [`ThemeIdentity::Primary`](crate::ThemeIdentity::Primary)
pub fn extreme_brutalist() -> TokenSet {
    TokenSet {
        colors: ColorTokens {
            primary: Color::from_hex(0x000000),
            secondary: Color::from_hex(0xFFFFFF),
            accent: Color::from_hex(0xFFFF00),
            highlight: Color::from_hex(0xFF0000),
            success: Color::from_hex(0x00FF00),
            bg: Color::from_hex(0xFFFFFF),
            text: Color::from_hex(0x000000),
        },
        typography: TypographyTokens {
            primary: "\"Space Mono\", \"Courier New\", monospace".to_string(),
            code: "\"JetBrains Mono\", \"Courier New\", monospace".to_string(),
        },
        borders: BorderTokens {
            width: Dimension::px(8.0),
            style: "solid".to_string(),
            radius: Dimension::px(0.0),
        },
        animations: AnimationTokens {
            duration: Dimension::ms(150.0),
            easing: "steps(4, end)".to_string(),
        },
        shadows: ShadowTokens {
            brutal: Some("8px 8px 0px #000000".to_string()),
            subtle: Some("4px 4px 0px #000000".to_string()),
            double: Some("8px 8px 0px #ffff00, 16px 16px 0px #000000".to_string()),
            triple: Some(
                "4px 4px 0px #ff0000, 8px 8px 0px #ffff00, 12px 12px 0px #000000".to_string(),
            ),
            elevated: Some("12px 12px 0px #000000".to_string()),
            glow: None,
        },
    }
}

/// Tokens for [`ThemeIdentity::Secondary`](crate::ThemeIdentity::Secondary)
pub fn refined_brutalist() -> TokenSet {
    TokenSet {
        colors: ColorTokens {
            primary: Color::from_hex(0x111111),
            secondary: Color::from_hex(0xF5F5F0),
            accent: Color::from_hex(0xFF6B35),
            highlight: Color::from_hex(0x00D4FF),
            success: Color::from_hex(0x10B981),
            bg: Color::from_hex(0xFAFAF7),
            text: Color::from_hex(0x1A1A1A),
        },
        typography: TypographyTokens {
            primary: "\"Inter\", \"Helvetica Neue\", sans-serif".to_string(),
            code: "\"JetBrains Mono\", \"Courier New\", monospace".to_string(),
        },
        borders: BorderTokens {
            width: Dimension::px(4.0),
            style: "solid".to_string(),
            radius: Dimension::px(8.0),
        },
        animations: AnimationTokens {
            duration: Dimension::ms(300.0),
            easing: "cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
        },
        shadows: ShadowTokens {
            brutal: Some("6px 6px 0px rgba(0, 0, 0, 0.9)".to_string()),
            subtle: Some("2px 2px 8px rgba(0, 0, 0, 0.15)".to_string()),
            double: Some("4px 4px 0px #ff6b35, 8px 8px 0px #111111".to_string()),
            triple: None,
            elevated: Some("0 12px 32px rgba(0, 0, 0, 0.18)".to_string()),
            glow: Some("0 0 24px rgba(0, 212, 255, 0.45)".to_string()),
        },
    }
}
