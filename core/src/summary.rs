//! Structured schema metadata for help and usage rendering.
//!
//! A [`SchemaSummary`] is a read-only snapshot of one parser level: its
//! bindings in declaration order and its subcommands. Help formatters
//! consume it; the [`Display`](std::fmt::Display) impl is a plain default
//! rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::Shape;
use crate::registry::Kind;

/// Metadata for one declared binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSummary {
    /// Raw declaration string (e.g. `-b|--bar`).
    pub identifier: String,
    pub kind: Kind,
    pub shape: Shape,
    /// Flag aliases, or the positional label.
    pub aliases: Vec<String>,
    /// Absence on the command line is not an error.
    pub has_default: bool,
    /// Boolean flag that takes an explicit `true` / `false`.
    #[serde(default)]
    pub require_value: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl BindingSummary {
    /// Usage-line fragment, e.g. `[-b|--bar <string>]` or `a`.
    pub fn usage_fragment(&self) -> String {
        let core = match self.kind {
            Kind::Positional if self.shape.is_list() => format!("{}...", self.aliases.join("")),
            Kind::Positional => self.aliases.join(""),
            Kind::Flag if self.shape == Shape::Bool && !self.require_value => {
                self.aliases.join("|")
            }
            Kind::Flag => format!("{} {}", self.aliases.join("|"), self.value_hint()),
        };
        if self.has_default {
            format!("[{core}]")
        } else {
            core
        }
    }

    fn value_hint(&self) -> String {
        if self.choices.is_empty() {
            self.shape.metavar().to_string()
        } else {
            format!("{{{}}}", self.choices.join(","))
        }
    }

    fn label(&self) -> String {
        match self.kind {
            Kind::Positional => self.aliases.join(""),
            Kind::Flag => self.aliases.join(", "),
        }
    }
}

/// Metadata for one registered subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcommandSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Snapshot of one parser level.
///
/// # Examples
///
/// ```
/// use argbind_core::{FieldOptions, Parser, ParserConfig, Shape};
///
/// let (mut count, mut verbose) = (0_i32, false);
/// let mut parser = Parser::with_config(ParserConfig::new("tool"));
/// parser.add_with(&mut count, "count", FieldOptions::new().with_help("How many")).unwrap();
/// parser.add(&mut verbose, "-v|--verbose").unwrap();
///
/// let summary = parser.summary();
/// assert_eq!(summary.bindings[0].shape, Shape::Int);
/// assert_eq!(summary.usage_line(), "usage: tool count [-v|--verbose]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSummary {
    /// Program path, e.g. `calc` or `calc add`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bindings: Vec<BindingSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<SubcommandSummary>,
    #[serde(default)]
    pub subcommand_required: bool,
}

impl SchemaSummary {
    /// One-line usage synopsis. Positionals are listed before flags.
    pub fn usage_line(&self) -> String {
        let mut parts = vec!["usage:".to_string()];
        if let Some(program) = &self.program {
            parts.push(program.clone());
        }
        let positionals = self.bindings.iter().filter(|b| b.kind == Kind::Positional);
        let flags = self.bindings.iter().filter(|b| b.kind == Kind::Flag);
        parts.extend(positionals.chain(flags).map(BindingSummary::usage_fragment));
        if !self.subcommands.is_empty() {
            parts.push(if self.subcommand_required {
                "<command> ...".to_string()
            } else {
                "[<command> ...]".to_string()
            });
        }
        parts.join(" ")
    }

    pub fn subcommand_names(&self) -> Vec<&str> {
        self.subcommands.iter().map(|s| s.name.as_str()).collect()
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, label: &str, text: &str) -> fmt::Result {
    if text.is_empty() {
        writeln!(f, "  {label}")
    } else {
        writeln!(f, "  {label:<22} {text}")
    }
}

impl fmt::Display for SchemaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.usage_line())?;
        if let Some(description) = &self.description {
            writeln!(f, "\n{description}")?;
        }

        let positionals: Vec<_> = self
            .bindings
            .iter()
            .filter(|b| b.kind == Kind::Positional)
            .collect();
        if !positionals.is_empty() {
            writeln!(f, "\nArguments:")?;
            for binding in positionals {
                write_row(f, &binding.label(), binding.help.as_deref().unwrap_or(""))?;
            }
        }

        writeln!(f, "\nOptions:")?;
        write_row(f, "-h, --help", "Print this help message")?;
        for binding in self.bindings.iter().filter(|b| b.kind == Kind::Flag) {
            write_row(f, &binding.label(), binding.help.as_deref().unwrap_or(""))?;
        }

        if !self.subcommands.is_empty() {
            writeln!(f, "\nCommands:")?;
            for sub in &self.subcommands {
                write_row(f, &sub.name, sub.description.as_deref().unwrap_or(""))?;
            }
        }
        Ok(())
    }
}
