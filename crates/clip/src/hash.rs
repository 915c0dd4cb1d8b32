//! Undeclared parsing: turn whatever dash-prefixed tokens appear into a map.
//!
//! Each `-x`/`--name` token becomes a declaration on a throwaway [`Parser`].
//! A token followed by a plain value becomes an option (multi-valued when it
//! is given a value more than once); anything else becomes a flag mapped to
//! `true`.

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

use crate::args::IntoArgs;
use crate::parser::{Parser, option_name};
use crate::registry::is_valid_long;
use crate::spec::{OptionSpec, Value, normalize_key};

static LAST: Mutex<Option<ArgMap>> = Mutex::new(None);

/// Values keyed by normalized name, plus the unclaimed tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArgMap {
    values: IndexMap<String, Value>,
    remainder: Vec<String>,
}

impl ArgMap {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(&normalize_key(name))
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn remainder(&self) -> &[String] {
        self.remainder.as_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.remainder.is_empty()
    }
}

/// Build an [`ArgMap`] from `args` without any prior declarations.
pub fn to_map<A: IntoArgs>(args: A) -> ArgMap {
    let tokens = args.into_args();
    let mut parser = Parser::new();
    parser.clear_help_trigger();

    for (key, (long, valued)) in scan(&tokens) {
        let spec = if valued == 0 {
            OptionSpec::flag(long)
        } else {
            OptionSpec::option(long).multi(valued > 1)
        };
        if let Err(err) = parser.declare(spec) {
            tracing::debug!(%key, %err, "skipping derived declaration");
        }
    }

    // No help trigger is set, so this always runs to completion.
    parser.parse(tokens);
    ArgMap {
        values: parser.values().clone(),
        remainder: parser.remainder().to_vec(),
    }
}

/// Like [`to_map`], but computed once per process until [`reset`] is called.
///
/// Later calls return the first result and ignore their `args`.
pub fn cached<A: IntoArgs>(args: A) -> ArgMap {
    let mut last = LAST.lock().unwrap_or_else(PoisonError::into_inner);
    last.get_or_insert_with(|| to_map(args)).clone()
}

/// Forget the result held by [`cached`].
pub fn reset() {
    *LAST.lock().unwrap_or_else(PoisonError::into_inner) = None;
}

/// Option names up to the terminator, with how often each was given a value.
fn scan(tokens: &[String]) -> IndexMap<String, (String, usize)> {
    let mut seen: IndexMap<String, (String, usize)> = IndexMap::new();
    for (i, token) in tokens.iter().enumerate() {
        if token == "--" {
            break;
        }
        let Some(name) = option_name(token) else {
            continue;
        };
        let (name, inline) = match name.split_once('=') {
            Some((name, _)) => (name, true),
            None => (name, false),
        };
        if !is_valid_long(name) {
            continue;
        }
        let valued = inline
            || tokens
                .get(i + 1)
                .is_some_and(|next| next != "--" && option_name(next).is_none());
        let entry = seen
            .entry(normalize_key(name))
            .or_insert_with(|| (name.to_string(), 0));
        if valued {
            entry.1 += 1;
        }
    }
    seen
}
