//! Configuration-time errors.
//!
//! These are programmer mistakes made while declaring options. Mistakes made
//! by the user on the command line are never reported through this type;
//! they end up in [`Parser::errors`](crate::Parser::errors).

use thiserror::Error;

/// Reasons a declaration (or help-trigger change) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Short names are a single ASCII letter or digit.
    #[error("invalid short name '{0}': expected a single character in [A-Za-z0-9]")]
    InvalidShortName(String),

    /// Long names start with a word character followed by word characters or dashes.
    #[error("invalid long name '{0}': expected a word character followed by [A-Za-z0-9_-]")]
    InvalidLongName(String),

    /// The name is taken by the help trigger.
    #[error("'{0}' is reserved for the help trigger")]
    ReservedName(String),

    /// The short or long name is already declared.
    #[error("'{0}' is already declared")]
    DuplicateName(String),

    /// A required option would never use its default.
    #[error("required option '{0}' cannot declare a default value")]
    RequiredWithDefault(String),

    /// Flags take neither a default nor the multi-value mode.
    #[error("flag '{0}' cannot declare a default or accept multiple values")]
    FlagWithValue(String),

    /// A declaration document could not be decoded.
    #[error("invalid declaration document: {0}")]
    InvalidSchema(String),
}

/// Result type for declaration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
