//! Declaration-ordered registry of options and flags.

use std::collections::HashMap;

use crate::error::{ConfigError, ConfigResult};
use crate::spec::{OptionSpec, normalize_key};

const DEFAULT_HELP_SHORT: char = 'h';
const DEFAULT_HELP_LONG: &str = "help";

/// The bare tokens (`-h`, `--help` by default) that request usage text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpTrigger {
    short: char,
    long: String,
}

impl HelpTrigger {
    pub fn new(short: char, long: impl Into<String>) -> ConfigResult<Self> {
        let long = long.into();
        check_short(short)?;
        check_long(&long)?;
        Ok(Self { short, long })
    }

    pub fn short(&self) -> char {
        self.short
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    fn matches(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            return long == self.long;
        }
        token
            .strip_prefix('-')
            .is_some_and(|s| s.len() == self.short.len_utf8() && s.starts_with(self.short))
    }

    fn keys(&self) -> [String; 2] {
        [self.short.to_string(), normalize_key(&self.long)]
    }
}

impl Default for HelpTrigger {
    fn default() -> Self {
        Self {
            short: DEFAULT_HELP_SHORT,
            long: DEFAULT_HELP_LONG.to_string(),
        }
    }
}

/// Options and flags keyed by both short and long name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    by_key: HashMap<String, usize>,
    order: Vec<OptionSpec>,
    help: Option<HelpTrigger>,
}

impl Registry {
    /// An empty registry with the default `-h`/`--help` trigger.
    pub fn new() -> Self {
        Self {
            help: Some(HelpTrigger::default()),
            ..Self::default()
        }
    }

    /// Validate `spec` and register it under its short and long keys.
    pub fn insert(&mut self, spec: OptionSpec) -> ConfigResult<()> {
        check_long(spec.long_name())?;
        if let Some(short) = spec.short_name() {
            check_short(short)?;
        }
        if spec.is_flag() && (spec.default_value().is_some() || spec.is_multi()) {
            return Err(ConfigError::FlagWithValue(spec.long_name().to_string()));
        }
        if spec.is_required() && spec.default_value().is_some() {
            return Err(ConfigError::RequiredWithDefault(spec.long_name().to_string()));
        }

        let keys = spec_keys(&spec);
        for key in &keys {
            if self.is_reserved(key) {
                return Err(ConfigError::ReservedName(key.clone()));
            }
            if self.by_key.contains_key(key) {
                return Err(ConfigError::DuplicateName(key.clone()));
            }
        }
        if keys.len() == 2 && keys[0] == keys[1] {
            return Err(ConfigError::DuplicateName(keys[0].clone()));
        }

        tracing::debug!(
            long = spec.long_name(),
            short = ?spec.short_name(),
            kind = ?spec.kind(),
            "declared"
        );
        let idx = self.order.len();
        for key in keys {
            self.by_key.insert(key, idx);
        }
        self.order.push(spec);
        Ok(())
    }

    /// Replace the help trigger. Neither name may already be declared.
    pub fn set_help_trigger(&mut self, trigger: HelpTrigger) -> ConfigResult<()> {
        for key in trigger.keys() {
            if self.by_key.contains_key(&key) {
                return Err(ConfigError::DuplicateName(key));
            }
        }
        self.help = Some(trigger);
        Ok(())
    }

    /// Stop treating any token as a help request.
    pub fn clear_help_trigger(&mut self) {
        self.help = None;
    }

    pub fn help_trigger(&self) -> Option<&HelpTrigger> {
        self.help.as_ref()
    }

    pub fn is_help_token(&self, token: &str) -> bool {
        self.help.as_ref().is_some_and(|h| h.matches(token))
    }

    /// Position in declaration order of the spec registered under `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, idx: usize) -> Option<&OptionSpec> {
        self.order.get(idx)
    }

    /// Declarations in the order they were made.
    pub fn specs(&self) -> &[OptionSpec] {
        self.order.as_slice()
    }

    fn is_reserved(&self, key: &str) -> bool {
        self.help
            .as_ref()
            .is_some_and(|h| h.keys().iter().any(|k| k == key))
    }
}

fn spec_keys(spec: &OptionSpec) -> Vec<String> {
    let mut keys = vec![spec.key()];
    if let Some(short) = spec.short_name() {
        keys.push(short.to_string());
    }
    keys
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `[A-Za-z0-9]`
pub(crate) fn is_valid_short(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// `\w[\w-]*`
pub(crate) fn is_valid_long(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_word_char(first) => chars.all(|c| is_word_char(c) || c == '-'),
        _ => false,
    }
}

fn check_short(c: char) -> ConfigResult<()> {
    if is_valid_short(c) {
        Ok(())
    } else {
        Err(ConfigError::InvalidShortName(c.to_string()))
    }
}

fn check_long(name: &str) -> ConfigResult<()> {
    if is_valid_long(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLongName(name.to_string()))
    }
}
