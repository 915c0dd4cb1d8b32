//! Declaration documents.
//!
//! A parser can be described as data instead of code:
//!
//! ```json
//! {
//!   "banner": "Usage: upload [OPTIONS]",
//!   "help-trigger": { "short": "u", "long": "usage" },
//!   "options": [
//!     { "kind": "flag", "short": "v", "long": "verbose", "desc": "Provide verbose output" },
//!     { "short": "p", "long": "port", "default": 8080 },
//!     { "kind": "required", "short": "f", "long": "files", "multi": true }
//!   ]
//! }
//! ```
//!
//! Every entry goes through the same checks as [`Parser::declare`].

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::parser::Parser;
use crate::spec::OptionSpec;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParserSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    /// Omitted or `true` keeps `-h`/`--help`; `false` disables the trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_trigger: Option<HelpSetting>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HelpSetting {
    Enabled(bool),
    Custom { short: char, long: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclKind {
    #[default]
    Option,
    Required,
    Flag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionDecl {
    #[serde(default)]
    pub kind: DeclKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    pub long: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
    /// Strings are taken as-is; numbers and booleans by their JSON text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub multi: bool,
}

impl OptionDecl {
    fn to_spec(&self) -> OptionSpec {
        let mut spec = match self.kind {
            DeclKind::Flag => OptionSpec::flag(&self.long),
            DeclKind::Option | DeclKind::Required => OptionSpec::option(&self.long),
        }
        .required(self.kind == DeclKind::Required)
        .multi(self.multi)
        .desc(self.desc.as_str());
        if let Some(short) = self.short {
            spec = spec.short(short);
        }
        if let Some(default) = &self.default {
            spec = spec.default(default_text(default));
        }
        spec
    }
}

fn default_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(default_text)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

impl ParserSchema {
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::InvalidSchema(e.to_string()))
    }

    /// Build a parser from this document, failing on the first bad entry.
    pub fn build(&self) -> ConfigResult<Parser> {
        let mut parser = Parser::new();
        match &self.help_trigger {
            None | Some(HelpSetting::Enabled(true)) => {}
            Some(HelpSetting::Enabled(false)) => {
                parser.clear_help_trigger();
            }
            Some(HelpSetting::Custom { short, long }) => {
                parser.set_help_trigger(*short, long)?;
            }
        }
        if let Some(banner) = &self.banner {
            parser.set_banner(banner.as_str());
        }
        for decl in &self.options {
            parser.declare(decl.to_spec())?;
        }
        Ok(parser)
    }
}

impl Parser {
    /// Shorthand for [`ParserSchema::build`].
    pub fn from_schema(schema: &ParserSchema) -> ConfigResult<Self> {
        schema.build()
    }
}
