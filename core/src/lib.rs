//! Declarative command-line argument binding.
//!
//! A program declares, per parser level, which of its own variables receive
//! which command-line words:
//!
//! - positional arguments, identified by a label (`count`);
//! - flags, identified by `|`-separated aliases (`-v|--verbose`);
//! - at most one subcommand router, whose child schemas are [`Args`]
//!   structs wrapped into a caller-defined sum type.
//!
//! [`Parser::parse`] makes a single left-to-right pass over the words,
//! writes typed values straight into the bound destinations, fills defaults,
//! and reports the first problem found. Schema-authoring mistakes are
//! reported as [`UsageError`] at declaration time; bad user input as
//! [`ParseError`] at parse time. `-h` / `--help` yield [`Error::Help`] with a
//! [`SchemaSummary`] for rendering.
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! let mut file = String::new();
//! let mut level: Option<i32> = None;
//! let mut verbose = false;
//! let mut extra: Vec<String> = Vec::new();
//!
//! let mut parser = Parser::with_config(ParserConfig::new("tool"));
//! parser.add(&mut file, "file").unwrap();
//! parser.add(&mut extra, "extra").unwrap();
//! parser.add(&mut level, "-l|--level").unwrap();
//! parser.add(&mut verbose, "-v|--verbose").unwrap();
//!
//! parser.parse(["-v", "main.rs", "a", "b", "--level", "3"]).unwrap();
//!
//! assert_eq!(file, "main.rs");
//! assert_eq!(extra, ["a", "b"]);
//! assert_eq!(level, Some(3));
//! assert!(verbose);
//! ```

mod args;
mod config;
mod error;
mod field;
mod identifier;
mod matcher;
mod parser;
mod registry;
mod router;
mod summary;

pub use args::{Args, parse_args, parse_env_or_exit};
pub use config::ParserConfig;
pub use error::{Error, ParseError, Result, UsageError};
pub use field::{FieldOptions, FieldValue, Rejection, ScalarValue, Shape, TextValue};
pub use identifier::{HELP_FLAGS, Identifier, is_valid_label};
pub use parser::Parser;
pub use registry::Kind;
pub use router::Subcommands;
pub use summary::{BindingSummary, SchemaSummary, SubcommandSummary};
