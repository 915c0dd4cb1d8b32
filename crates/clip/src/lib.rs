//! Declarative command-line option parsing.
//!
//! Declare the options and flags a program accepts, parse an argument list
//! against them, then inspect bound values, errors and leftover tokens, or
//! render aligned usage text.
//!
//! ```
//! use clip::{ParseOutcome, Parser};
//!
//! let mut parser = Parser::new();
//! parser
//!     .flag('v', "verbose", |o| o.desc("Provide verbose output"))?
//!     .optional('p', "port", |o| o.desc("The port number").default("8080"))?
//!     .required('f', "files", |o| o.desc("Files to upload").multi(true))?;
//!
//! assert_eq!(parser.parse("--files foo --files bar extra"), ParseOutcome::Parsed);
//! assert!(parser.is_valid());
//! assert_eq!(parser.get("port"), Some("8080"));
//! assert_eq!(parser.get_multi("files").unwrap(), ["foo", "bar"]);
//! assert_eq!(parser.remainder(), ["extra"]);
//!
//! parser.parse("--port 9");
//! assert!(!parser.is_valid());
//! assert!(parser.errors().contains_key("files"));
//! assert!(parser.to_string().starts_with("Errors:\nfiles: Missing required parameter"));
//! # Ok::<(), clip::ConfigError>(())
//! ```
//!
//! Declaration mistakes (bad names, duplicates, the reserved help names) fail
//! immediately with [`ConfigError`]. Mistakes on the command line never fail
//! [`Parser::parse`]; they are collected in [`Parser::errors`].

pub mod args;
mod error;
pub mod hash;
pub mod help;
mod parser;
mod registry;
pub mod schema;
mod spec;

pub use args::{IntoArgs, split_line};
pub use error::{ConfigError, ConfigResult};
pub use hash::ArgMap;
pub use parser::{ParseOutcome, Parser};
pub use registry::HelpTrigger;
pub use schema::ParserSchema;
pub use spec::{Kind, OptionSpec, Transform, Value};
