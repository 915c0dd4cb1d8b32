//! The parser: declarations, the token pass, and the defaults/required pass.

use indexmap::IndexMap;
use std::fmt;

use crate::args::IntoArgs;
use crate::error::ConfigResult;
use crate::help;
use crate::registry::{HelpTrigger, Registry};
use crate::spec::{OptionSpec, Value, normalize_key};

const TERMINATOR: &str = "--";
const UNRECOGNIZED: &str = "Unrecognized parameter";

/// What a call to [`Parser::parse`] ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every token was consumed and the validation pass ran.
    Parsed,
    /// The help trigger was seen. Carries the rendered usage text; tokens
    /// after the trigger were not examined and validation did not run.
    Help(String),
}

/// A declarative command-line parser.
///
/// Declare options and flags first, then call [`parse`](Self::parse) as
/// many times as needed; each call replaces the values, errors and
/// remainder of the previous one.
#[derive(Debug, Clone)]
pub struct Parser {
    registry: Registry,
    banner: Option<String>,
    state: ParseState,
}

/// Everything derived from one `parse` call.
#[derive(Debug, Clone, Default)]
struct ParseState {
    values: IndexMap<String, Value>,
    errors: IndexMap<String, String>,
    remainder: Vec<String>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            banner: None,
            state: ParseState::default(),
        }
    }

    /// Register a fully built declaration.
    pub fn declare(&mut self, spec: OptionSpec) -> ConfigResult<&mut Self> {
        self.registry.insert(spec)?;
        Ok(self)
    }

    /// Declare an optional value-taking option.
    ///
    /// `configure` receives the bare declaration and returns it with any
    /// description, default, multi-value mode or transform applied.
    pub fn optional<F>(&mut self, short: char, long: &str, configure: F) -> ConfigResult<&mut Self>
    where
        F: FnOnce(OptionSpec) -> OptionSpec,
    {
        self.declare(configure(OptionSpec::option(long).short(short)))
    }

    /// Declare an option that must be given on every parse.
    pub fn required<F>(&mut self, short: char, long: &str, configure: F) -> ConfigResult<&mut Self>
    where
        F: FnOnce(OptionSpec) -> OptionSpec,
    {
        self.declare(configure(OptionSpec::option(long).short(short)).required(true))
    }

    /// Declare a boolean flag.
    pub fn flag<F>(&mut self, short: char, long: &str, configure: F) -> ConfigResult<&mut Self>
    where
        F: FnOnce(OptionSpec) -> OptionSpec,
    {
        self.declare(configure(OptionSpec::flag(long).short(short)).required(false))
    }

    /// Replace the default `Usage:` header.
    pub fn set_banner(&mut self, banner: impl Into<String>) -> &mut Self {
        self.banner = Some(banner.into());
        self
    }

    /// Use `-<short>` / `--<long>` as the help request instead of `-h` / `--help`.
    pub fn set_help_trigger(&mut self, short: char, long: &str) -> ConfigResult<&mut Self> {
        self.registry.set_help_trigger(HelpTrigger::new(short, long)?)?;
        Ok(self)
    }

    /// Treat no token as a help request; `h` and `help` become declarable.
    pub fn clear_help_trigger(&mut self) -> &mut Self {
        self.registry.clear_help_trigger();
        self
    }

    pub fn help_trigger(&self) -> Option<&HelpTrigger> {
        self.registry.help_trigger()
    }

    /// Declarations in declaration order.
    pub fn specs(&self) -> &[OptionSpec] {
        self.registry.specs()
    }

    /// Parse `args`, replacing the state of any previous call.
    ///
    /// User mistakes never fail this call; they are recorded in
    /// [`errors`](Self::errors) and make [`is_valid`](Self::is_valid) false.
    pub fn parse<A: IntoArgs>(&mut self, args: A) -> ParseOutcome {
        let tokens = args.into_args();
        self.state = ParseState::default();
        tracing::debug!(tokens = tokens.len(), "parsing arguments");

        // The option waiting for its value token.
        let mut current: Option<usize> = None;
        let mut tokens = tokens.into_iter();
        while let Some(token) = tokens.next() {
            if self.registry.is_help_token(&token) {
                tracing::debug!(%token, "help requested");
                return ParseOutcome::Help(self.help());
            }

            if token == TERMINATOR {
                self.state.remainder.extend(tokens.by_ref());
                break;
            }

            if let Some(name) = option_name(&token) {
                if let Some(idx) = current.take() {
                    tracing::trace!(
                        option = self.registry.get(idx).map(|s| s.long_name()),
                        "option left without a value"
                    );
                }
                current = self.trigger(name);
                continue;
            }

            match current.take().and_then(|idx| self.registry.get(idx)) {
                Some(spec) => {
                    tracing::trace!(option = spec.long_name(), value = %token, "bound");
                    self.state.bind(spec, &token);
                }
                None => self.state.remainder.push(token),
            }
        }

        self.validate();
        tracing::debug!(
            valid = self.is_valid(),
            errors = self.state.errors.len(),
            remainder = self.state.remainder.len(),
            "parsed arguments"
        );
        ParseOutcome::Parsed
    }

    /// Handle an option/flag token whose dashes are already stripped.
    ///
    /// Returns the option that should take the next token as its value.
    fn trigger(&mut self, name: &str) -> Option<usize> {
        let (name, inline) = match name.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (name, None),
        };
        let key = normalize_key(name);
        let Some(idx) = self.registry.position(&key) else {
            tracing::trace!(%key, "unrecognized");
            self.state.errors.insert(key, UNRECOGNIZED.to_string());
            return None;
        };
        let spec = self.registry.get(idx)?;

        match (spec.is_flag(), inline) {
            (true, None) => {
                self.state.values.insert(spec.key(), Value::Flag(true));
                None
            }
            (true, Some(_)) => {
                self.state
                    .errors
                    .insert(spec.key(), "Flag does not take a value".to_string());
                None
            }
            (false, Some(value)) => {
                self.state.bind(spec, value);
                None
            }
            (false, None) => Some(idx),
        }
    }

    /// Bind defaults and report missing required options.
    fn validate(&mut self) {
        for spec in self.registry.specs() {
            if spec.is_flag() {
                continue;
            }
            let key = spec.key();
            if self.state.values.contains_key(&key) || self.state.errors.contains_key(&key) {
                continue;
            }
            if spec.is_required() {
                self.state.errors.insert(
                    key,
                    format!("Missing required parameter: {}", spec.display_name()),
                );
            } else if let Some(default) = spec.default_value() {
                self.state.bind(spec, default);
            }
        }
    }

    /// `true` when the last parse recorded no errors.
    pub fn is_valid(&self) -> bool {
        self.state.errors.is_empty()
    }

    /// Errors from the last parse, keyed by storage key, in the order they occurred.
    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.state.errors
    }

    /// Tokens the last parse did not consume, in their original order.
    pub fn remainder(&self) -> &[String] {
        self.state.remainder.as_slice()
    }

    /// Every bound value, keyed by storage key.
    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.state.values
    }

    /// The value bound to `name` (long name, dashes or underscores).
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.state.values.get(&normalize_key(name))
    }

    /// The scalar value of a single-valued option.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    /// The accumulated values of a multi-valued option.
    pub fn get_multi(&self, name: &str) -> Option<&[String]> {
        self.value(name).and_then(Value::as_slice)
    }

    /// Whether a flag was given or an option holds a value.
    pub fn is_set(&self, name: &str) -> bool {
        match self.value(name) {
            Some(Value::Flag(on)) => *on,
            Some(_) => true,
            None => false,
        }
    }

    /// The usage block alone.
    pub fn help(&self) -> String {
        help::render(self.banner.as_deref(), self.registry.specs())
    }
}

impl ParseState {
    /// Apply one raw value (from argv or a default) to `spec`.
    fn bind(&mut self, spec: &OptionSpec, raw: &str) {
        let key = spec.key();
        if !spec.is_multi() {
            match spec.convert(raw) {
                Ok(value) => {
                    self.values.insert(key, Value::Scalar(value));
                }
                Err(message) => {
                    self.values.shift_remove(&key);
                    self.errors.insert(key, message);
                }
            }
            return;
        }

        for part in raw.split(',').filter(|p| !p.is_empty()) {
            match spec.convert(part) {
                Ok(value) => match self
                    .values
                    .entry(key.clone())
                    .or_insert_with(|| Value::Multi(Vec::new()))
                {
                    Value::Multi(list) => list.push(value),
                    other => *other = Value::Multi(vec![value]),
                },
                Err(message) => {
                    self.errors.insert(key.clone(), message);
                }
            }
        }
    }
}

/// The name part of an option-looking token: one or two dashes followed by
/// a word character.
pub(crate) fn option_name(token: &str) -> Option<&str> {
    let name = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))?;
    name.chars()
        .next()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|_| name)
}

impl fmt::Display for Parser {
    /// The error block (when the last parse was invalid) followed by the usage block.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            writeln!(f, "Errors:")?;
            for (name, message) in &self.state.errors {
                writeln!(f, "{name}: {message}")?;
            }
            writeln!(f)?;
        }
        f.write_str(&self.help())
    }
}
