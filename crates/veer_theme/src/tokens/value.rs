//! Token values and blending

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use veer_core::Color;

/// CSS unit of a numeric token
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    #[default]
    None,
    Px,
    Rem,
    Em,
    Ms,
    S,
    Percent,
}

impl Unit {
    pub const fn suffix(self) -> &'static str {
        match self {
            Unit::None => "",
            Unit::Px => "px",
            Unit::Rem => "rem",
            Unit::Em => "em",
            Unit::Ms => "ms",
            Unit::S => "s",
            Unit::Percent => "%",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Some(match suffix {
            "" => Unit::None,
            "px" => Unit::Px,
            "rem" => Unit::Rem,
            "em" => Unit::Em,
            "ms" => Unit::Ms,
            "s" => Unit::S,
            "%" => Unit::Percent,
            _ => return None,
        })
    }
}

/// A number with a CSS unit, e.g. `4px` or `0.3s`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dimension {
    pub value: f32,
    pub unit: Unit,
}

impl Dimension {
    pub const fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn px(value: f32) -> Self {
        Self::new(value, Unit::Px)
    }

    pub const fn ms(value: f32) -> Self {
        Self::new(value, Unit::Ms)
    }

    /// Interpolate when units agree; `None` otherwise
    pub fn lerp(&self, to: &Self, t: f32) -> Option<Self> {
        (self.unit == to.unit).then(|| Self::new(self.value + (to.value - self.value) * t, self.unit))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Three decimals is below anything a stylesheet can show
        let rounded = (self.value * 1000.0).round() / 1000.0;
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        write!(f, "{}{}", rounded, self.unit.suffix())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);
        let value: f32 = number
            .parse()
            .map_err(|_| format!("`{}` is not a number", s))?;
        if !value.is_finite() {
            return Err(format!("`{}` is not finite", s));
        }
        let unit = Unit::from_suffix(suffix).ok_or_else(|| format!("unknown unit in `{}`", s))?;
        Ok(Self::new(value, unit))
    }
}

impl TryFrom<String> for Dimension {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dimension> for String {
    fn from(dimension: Dimension) -> Self {
        dimension.to_string()
    }
}

/// A single resolved design value
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    Number(Dimension),
    Color(Color),
    Text(String),
}

impl TokenValue {
    /// Blend between two values at `t` in `[0, 1]`
    ///
    /// Numbers with matching units and colors interpolate linearly. Every
    /// other pairing steps from `from` to `to` once `t > 0.5`.
    pub fn blend(from: &TokenValue, to: &TokenValue, t: f32) -> TokenValue {
        let t = t.clamp(0.0, 1.0);
        match (from, to) {
            (TokenValue::Number(a), TokenValue::Number(b)) => {
                if let Some(mid) = a.lerp(b, t) {
                    return TokenValue::Number(mid);
                }
            }
            (TokenValue::Color(a), TokenValue::Color(b)) => {
                return TokenValue::Color(Color::lerp(a, b, t));
            }
            _ => {}
        }
        if t > 0.5 {
            to.clone()
        } else {
            from.clone()
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            TokenValue::Color(color) => Some(*color),
            _ => None,
        }
    }

    /// CSS text for this value
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Number(dimension) => write!(f, "{}", dimension),
            TokenValue::Color(color) => write!(f, "{}", color),
            TokenValue::Text(text) => f.write_str(text),
        }
    }
}

impl FromStr for TokenValue {
    type Err = std::convert::Infallible;

    /// Colors start with `#`, numbers parse as [`Dimension`]; anything else is text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(color) = trimmed.parse::<Color>() {
            return Ok(TokenValue::Color(color));
        }
        if let Ok(dimension) = trimmed.parse::<Dimension>() {
            return Ok(TokenValue::Number(dimension));
        }
        Ok(TokenValue::Text(trimmed.to_string()))
    }
}

impl From<Dimension> for TokenValue {
    fn from(dimension: Dimension) -> Self {
        TokenValue::Number(dimension)
    }
}

impl From<Color> for TokenValue {
    fn from(color: Color) -> Self {
        TokenValue::Color(color)
    }
}

impl From<&str> for TokenValue {
    fn from(text: &str) -> Self {
        TokenValue::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimension() {
        assert_eq!("4px".parse::<Dimension>().unwrap(), Dimension::px(4.0));
        assert_eq!("0.3s".parse::<Dimension>().unwrap(), Dimension::new(0.3, Unit::S));
        assert_eq!("-2.5rem".parse::<Dimension>().unwrap(), Dimension::new(-2.5, Unit::Rem));
        assert_eq!("50%".parse::<Dimension>().unwrap(), Dimension::new(50.0, Unit::Percent));
        assert_eq!("1.5".parse::<Dimension>().unwrap(), Dimension::new(1.5, Unit::None));
        assert!("4 px".parse::<Dimension>().is_err());
        assert!("px".parse::<Dimension>().is_err());
        assert!("4vw".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(Dimension::px(6.0).to_string(), "6px");
        assert_eq!(Dimension::new(0.25, Unit::S).to_string(), "0.25s");
        assert_eq!(Dimension::px(1.0 / 3.0).to_string(), "0.333px");
        assert_eq!(Dimension::px(-0.0001).to_string(), "0px");
    }

    #[test]
    fn test_token_value_classification() {
        assert!(matches!("#ff0".parse::<TokenValue>().unwrap(), TokenValue::Color(_)));
        assert!(matches!("8px".parse::<TokenValue>().unwrap(), TokenValue::Number(_)));
        assert!(matches!(
            "4px 4px 0px #000".parse::<TokenValue>().unwrap(),
            TokenValue::Text(_)
        ));
        assert!(matches!("solid".parse::<TokenValue>().unwrap(), TokenValue::Text(_)));
    }

    #[test]
    fn test_numeric_blend_is_linear() {
        let from = TokenValue::Number(Dimension::px(8.0));
        let to = TokenValue::Number(Dimension::px(4.0));
        assert_eq!(TokenValue::blend(&from, &to, 0.5), TokenValue::Number(Dimension::px(6.0)));
        assert_eq!(TokenValue::blend(&from, &to, 0.0), from);
        assert_eq!(TokenValue::blend(&from, &to, 1.0), to);
    }

    #[test]
    fn test_color_blend_is_channelwise() {
        let from = TokenValue::Color(Color::BLACK);
        let to = TokenValue::Color(Color::WHITE);
        let mid = TokenValue::blend(&from, &to, 0.5).as_color().unwrap();
        assert_eq!(mid.to_rgba8(), [128, 128, 128, 255]);
    }

    #[test]
    fn test_text_blend_steps_after_half() {
        let from = TokenValue::from("Courier New");
        let to = TokenValue::from("Inter");
        assert_eq!(TokenValue::blend(&from, &to, 0.49), from);
        assert_eq!(TokenValue::blend(&from, &to, 0.5), from);
        assert_eq!(TokenValue::blend(&from, &to, 0.51), to);
    }

    #[test]
    fn test_mismatched_units_step() {
        let from = TokenValue::Number(Dimension::ms(150.0));
        let to = TokenValue::Number(Dimension::new(0.3, Unit::S));
        assert_eq!(TokenValue::blend(&from, &to, 0.4), from);
        assert_eq!(TokenValue::blend(&from, &to, 0.6), to);
    }
}
