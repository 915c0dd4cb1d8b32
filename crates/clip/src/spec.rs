//! Option and flag declarations, and the values they bind.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Whether a declaration consumes a value token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Takes the following token as its value.
    Option,
    /// Boolean, never takes a value token.
    Flag,
}

/// Caller-supplied conversion applied to every raw value bound to an option.
///
/// An `Err` becomes the option's parse error.
pub type Transform = Arc<dyn Fn(&str) -> Result<String, String> + Send + Sync>;

/// A single declared option or flag.
///
/// Built with [`OptionSpec::option`] or [`OptionSpec::flag`] and the builder
/// methods below, then handed to [`Parser::declare`](crate::Parser::declare).
/// Declarations are immutable once registered.
#[derive(Clone)]
pub struct OptionSpec {
    kind: Kind,
    short: Option<char>,
    long: String,
    description: String,
    default: Option<String>,
    required: bool,
    multi: bool,
    transform: Option<Transform>,
}

impl OptionSpec {
    /// A value-taking option named `long`.
    pub fn option(long: impl Into<String>) -> Self {
        Self::new(Kind::Option, long.into())
    }

    /// A boolean flag named `long`.
    pub fn flag(long: impl Into<String>) -> Self {
        Self::new(Kind::Flag, long.into())
    }

    fn new(kind: Kind, long: String) -> Self {
        Self {
            kind,
            short: None,
            long,
            description: String::new(),
            default: None,
            required: false,
            multi: false,
            transform: None,
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn desc(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Accumulate values into a sequence instead of overwriting a scalar.
    ///
    /// Each token is split on commas, so `--files a,b` and
    /// `--files a --files b` bind the same sequence.
    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    /// Convert each raw value before it is bound.
    ///
    /// The error's `Display` output is recorded as the option's error message.
    pub fn transform<F, E>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<String, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.transform = Some(Arc::new(move |raw| f(raw).map_err(|e| e.to_string())));
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_flag(&self) -> bool {
        self.kind == Kind::Flag
    }

    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    /// The long name as declared.
    pub fn long_name(&self) -> &str {
        &self.long
    }

    /// The long name as shown in help text (`_` rendered as `-`).
    pub fn display_name(&self) -> String {
        self.long.replace('_', "-")
    }

    /// The storage key: the long name with `-` replaced by `_`.
    pub fn key(&self) -> String {
        normalize_key(&self.long)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Run the transform (if any) over one raw value.
    pub(crate) fn convert(&self, raw: &str) -> Result<String, String> {
        match &self.transform {
            Some(f) => f(raw),
            None => Ok(raw.to_string()),
        }
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("kind", &self.kind)
            .field("short", &self.short)
            .field("long", &self.long)
            .field("description", &self.description)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("multi", &self.multi)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// A value bound to a declaration after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    Multi(Vec<String>),
    Flag(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            Self::Multi(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

/// Map a name (long name, token name or accessor argument) to its storage key.
pub(crate) fn normalize_key(name: &str) -> String {
    name.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_and_display_forms_differ_only_in_separator() {
        let spec = OptionSpec::option("exclude-from");
        assert_eq!(spec.key(), "exclude_from");
        assert_eq!(spec.display_name(), "exclude-from");

        let spec = OptionSpec::option("exclude_from");
        assert_eq!(spec.key(), "exclude_from");
        assert_eq!(spec.display_name(), "exclude-from");
    }

    #[test]
    fn transform_errors_become_messages() {
        let spec = OptionSpec::option("port").transform(|raw| raw.parse::<u16>().map(|p| p.to_string()));
        assert_eq!(spec.convert("8080"), Ok("8080".to_string()));
        let err = spec.convert("http").unwrap_err();
        assert!(err.contains("invalid digit"), "unexpected message: {err}");
    }

    #[test]
    fn value_accessors_match_variant() {
        assert_eq!(Value::Scalar("a".into()).as_str(), Some("a"));
        assert_eq!(Value::Scalar("a".into()).as_bool(), None);
        assert_eq!(Value::Flag(true).as_bool(), Some(true));
        let multi = Value::Multi(vec!["a".into(), "b".into()]);
        assert_eq!(multi.as_slice().map(|s| s.len()), Some(2));
    }
}
