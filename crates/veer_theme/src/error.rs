//! Theme engine errors

use thiserror::Error;
use veer_animation::EasingParseError;
use veer_core::ContextError;

/// Errors raised while configuring, mounting or consuming the theme engine
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("exit threshold ({exit}) must be strictly below enter threshold ({enter})")]
    InvalidThresholds { enter: f32, exit: f32 },

    #[error("`{field}` must be a finite value in [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("invalid `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid easing: {0}")]
    Easing(#[from] EasingParseError),

    #[error("no theme provider found; mount a ThemeProvider in an enclosing scope")]
    NoProvider,

    #[error("a theme provider is already mounted in this scope")]
    DuplicateProvider,

    #[error("the theme provider has been unmounted")]
    Unmounted,

    #[error("unknown theme `{0}`")]
    UnknownTheme(String),

    #[error("invalid token `{key}`: {reason}")]
    InvalidToken { key: String, reason: String },

    #[error("failed to parse TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("failed to write TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl From<ContextError> for ThemeError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::NotProvided { .. } => ThemeError::NoProvider,
            ContextError::AlreadyProvided { .. } => ThemeError::DuplicateProvider,
        }
    }
}

pub type Result<T> = std::result::Result<T, ThemeError>;
