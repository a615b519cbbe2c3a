//! RGBA color values
//!
//! Colors are stored as linear `f32` channels in `0.0..=1.0` so they can be
//! blended channel-wise. They parse from and render to CSS hex notation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a CSS color string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color {input:?}: expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ColorParseError {
    pub input: String,
}

/// An RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Linear interpolation between two colors, channel by channel
    pub fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Self {
            r: from.r + (to.r - from.r) * t,
            g: from.g + (to.g - from.g) * t,
            b: from.b + (to.b - from.b) * t,
            a: from.a + (to.a - from.a) * t,
        }
    }

    /// 8-bit channels, rounded
    pub fn to_rgba8(&self) -> [u8; 4] {
        fn channel(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }

    /// CSS representation: `#rrggbb` when opaque, `rgba(r,g,b,a)` otherwise
    pub fn to_css(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        if self.a < 1.0 {
            format!("rgba({},{},{},{})", r, g, b, self.a)
        } else {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        }
    }

    /// Comma-separated 8-bit channels (`"255, 255, 0"`), for `rgba(var(--x), a)` use
    pub fn to_rgb_triplet(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("{}, {}, {}", r, g, b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError {
            input: s.to_string(),
        };
        let digits = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| err())?;
        match digits.len() {
            3 => {
                // #rgb expands each nibble: #f80 == #ff8800
                let r = (value >> 8) & 0xF;
                let g = (value >> 4) & 0xF;
                let b = value & 0xF;
                Ok(Self::from_hex(((r * 0x11) << 16) | ((g * 0x11) << 8) | (b * 0x11)))
            }
            6 => Ok(Self::from_hex(value)),
            8 => Ok(Self::from_hex(value >> 8).with_alpha((value & 0xFF) as f32 / 255.0)),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        if color.a < 1.0 {
            let [r, g, b, a] = color.to_rgba8();
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        } else {
            color.to_css()
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!("#ffff00".parse::<Color>().unwrap(), Color::from_hex(0xFFFF00));
        assert_eq!("#f80".parse::<Color>().unwrap(), Color::from_hex(0xFF8800));
        let translucent: Color = "#00000080".parse().unwrap();
        assert_eq!(translucent.to_rgba8(), [0, 0, 0, 128]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("ffff00".parse::<Color>().is_err());
        assert!("#ggg".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#+12".parse::<Color>().is_err());
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = Color::lerp(&Color::BLACK, &Color::WHITE, 0.5);
        assert_eq!(mid.to_css(), "#808080");
        assert_eq!(Color::lerp(&Color::BLACK, &Color::WHITE, 0.0), Color::BLACK);
        assert_eq!(Color::lerp(&Color::BLACK, &Color::WHITE, 1.0), Color::WHITE);
    }

    #[test]
    fn test_css_output() {
        assert_eq!(Color::from_hex(0x1A2B3C).to_css(), "#1a2b3c");
        assert_eq!(Color::from_hex(0xFFFF00).to_rgb_triplet(), "255, 255, 0");
        assert_eq!(Color::BLACK.with_alpha(0.5).to_css(), "rgba(0,0,0,0.5)");
    }

    #[test]
    fn test_serde_string_form() {
        let json = serde_json::to_string(&Color::from_hex(0xFF0000)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::from_hex(0xFF0000));
    }
}
