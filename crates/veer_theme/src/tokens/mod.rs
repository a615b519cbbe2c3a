//! Design tokens for theming
//!
//! Each theme identity resolves to one immutable [`TokenSet`]:
//! - Colors (with derived `*-rgb` triplets)
//! - Typography (font stacks)
//! - Borders (width, style, radius)
//! - Animation duration and easing
//! - Shadows
//!
//! Token overrides are TOML tables keyed by theme id and are deep-merged over
//! the built-in presets:
//!
//! ```toml
//! [refined-brutalist.colors]
//! accent = "#ff6b35"
//!
//! [refined-brutalist.borders]
//! radius = "12px"
//! ```

mod set;
mod value;

pub use set::*;
pub use value::*;

use crate::error::{Result, ThemeError};
use crate::identity::ThemeIdentity;
use crate::presets;

/// Token sets for both themes
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeTokens {
    primary: TokenSet,
    secondary: TokenSet,
}

impl ThemeTokens {
    pub fn new(primary: TokenSet, secondary: TokenSet) -> Self {
        Self { primary, secondary }
    }

    /// Token set for a theme
    pub fn resolve(&self, theme: ThemeIdentity) -> &TokenSet {
        match theme {
            ThemeIdentity::Primary => &self.primary,
            ThemeIdentity::Secondary => &self.secondary,
        }
    }

    /// Built-in presets with `source` merged over them
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Self::default().with_overrides(source)
    }

    /// Copy of these tokens with a TOML override document merged in
    pub fn with_overrides(&self, source: &str) -> Result<Self> {
        let document: toml::Table = toml::from_str(source)?;
        let mut primary = self.primary.clone();
        let mut secondary = self.secondary.clone();

        for (key, patch) in &document {
            let theme: ThemeIdentity = key.parse()?;
            let target = match theme {
                ThemeIdentity::Primary => &mut primary,
                ThemeIdentity::Secondary => &mut secondary,
            };
            *target = merge_set(target, patch, key)?;
            tracing::debug!("applied token overrides for {}", theme);
        }

        Ok(Self { primary, secondary })
    }
}

impl Default for ThemeTokens {
    fn default() -> Self {
        Self::new(presets::extreme_brutalist(), presets::refined_brutalist())
    }
}

fn merge_set(base: &TokenSet, patch: &toml::Value, key: &str) -> Result<TokenSet> {
    let mut value = toml::Value::try_from(base)?;
    deep_merge(&mut value, patch);
    value.try_into().map_err(|err: toml::de::Error| ThemeError::InvalidToken {
        key: key.to_string(),
        reason: err.message().to_string(),
    })
}

fn deep_merge(base: &mut toml::Value, patch: &toml::Value) {
    match (base, patch) {
        (toml::Value::Table(base), toml::Value::Table(patch)) => {
            for (key, value) in patch {
                match base.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}
