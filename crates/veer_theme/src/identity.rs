//! Theme identities

use crate::error::ThemeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two themes the engine blends between
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeIdentity {
    /// Extreme brutalist, shown at the top of the page
    #[default]
    #[serde(rename = "extreme-brutalist")]
    Primary,
    /// Refined brutalist, shown once the reader is past the enter threshold
    #[serde(rename = "refined-brutalist")]
    Secondary,
}

impl ThemeIdentity {
    pub const ALL: [ThemeIdentity; 2] = [ThemeIdentity::Primary, ThemeIdentity::Secondary];

    /// Stable identifier used in class names and CSS variables
    pub const fn id(self) -> &'static str {
        match self {
            ThemeIdentity::Primary => "extreme-brutalist",
            ThemeIdentity::Secondary => "refined-brutalist",
        }
    }

    /// The opposite endpoint
    pub const fn other(self) -> Self {
        match self {
            ThemeIdentity::Primary => ThemeIdentity::Secondary,
            ThemeIdentity::Secondary => ThemeIdentity::Primary,
        }
    }

    pub const fn is_primary(self) -> bool {
        matches!(self, ThemeIdentity::Primary)
    }
}

impl fmt::Display for ThemeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ThemeIdentity {
    type Err = ThemeError;

    /// Accepts the identifier or the short names `primary`/`extreme` and
    /// `secondary`/`refined`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extreme-brutalist" | "extreme" | "primary" => Ok(ThemeIdentity::Primary),
            "refined-brutalist" | "refined" | "secondary" => Ok(ThemeIdentity::Secondary),
            _ => Err(ThemeError::UnknownTheme(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_an_involution() {
        for theme in ThemeIdentity::ALL {
            assert_ne!(theme.other(), theme);
            assert_eq!(theme.other().other(), theme);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("refined".parse::<ThemeIdentity>().unwrap(), ThemeIdentity::Secondary);
        assert_eq!(
            "extreme-brutalist".parse::<ThemeIdentity>().unwrap(),
            ThemeIdentity::Primary
        );
        assert!(matches!(
            "neon".parse::<ThemeIdentity>(),
            Err(ThemeError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_serde_uses_ids() {
        assert_eq!(
            serde_json::to_string(&ThemeIdentity::Secondary).unwrap(),
            "\"refined-brutalist\""
        );
    }
}
