//! Subcommand routing.
//!
//! A [`Subcommands`] value maps names to child schemas. Each entry knows how
//! to build a fresh child [`Args`] value, parse the remaining words into it
//! and wrap the result into the caller's sum type `S`. The parser holds at
//! most one router per level and hands it the token suffix after the
//! subcommand name.

use std::collections::HashSet;

use crate::args::{Args, parse_words};
use crate::config::ParserConfig;
use crate::error::{Result, UsageError};
use crate::identifier::is_valid_label;
use crate::summary::SubcommandSummary;

type Runner<S> = Box<dyn Fn(ParserConfig, &[String]) -> Result<S>>;

struct Entry<S> {
    name: String,
    description: Option<&'static str>,
    run: Runner<S>,
}

/// The closed set of subcommands for one parser level.
///
/// `S` is the caller's sum type over the child results; each entry is
/// registered with the function that wraps its child type into `S`
/// (usually the enum variant constructor).
///
/// # Examples
///
/// ```
/// use argbind_core::{Args, Parser, ParserConfig, Subcommands, UsageError, parse_args};
///
/// #[derive(Debug, Default)]
/// struct Negate {
///     value: i32,
/// }
///
/// impl Args for Negate {
///     fn build<'a>(&'a mut self, parser: &mut Parser<'a>) -> Result<(), UsageError> {
///         parser.add(&mut self.value, "value")
///     }
/// }
///
/// #[derive(Debug)]
/// enum Command {
///     Negate(Negate),
/// }
///
/// #[derive(Debug, Default)]
/// struct Cli {
///     command: Option<Command>,
/// }
///
/// impl Args for Cli {
///     fn build<'a>(&'a mut self, parser: &mut Parser<'a>) -> Result<(), UsageError> {
///         parser.optional_subcommand(
///             &mut self.command,
///             Subcommands::new().with_command("negate", Command::Negate),
///         )
///     }
/// }
///
/// let cli: Cli = parse_args(ParserConfig::new("calc"), ["negate", "4"]).unwrap();
/// assert!(matches!(cli.command, Some(Command::Negate(Negate { value: 4 }))));
/// ```
pub struct Subcommands<S> {
    entries: Vec<Entry<S>>,
}

impl<S: 'static> Default for Subcommands<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> Subcommands<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers subcommand `name`, whose arguments are parsed into a fresh
    /// `C` and stored as `wrap(C)`.
    pub fn with_command<C, F>(mut self, name: &str, wrap: F) -> Self
    where
        C: Args + 'static,
        F: Fn(C) -> S + 'static,
    {
        self.entries.push(Entry {
            name: name.to_string(),
            description: C::description(),
            run: Box::new(move |config: ParserConfig, words: &[String]| {
                parse_words::<C>(config, words).map(&wrap)
            }),
        });
        self
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), UsageError> {
        if self.entries.is_empty() {
            return Err(UsageError::EmptyRouter);
        }
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !is_valid_label(&entry.name) {
                return Err(UsageError::InvalidSubcommandName(entry.name.clone()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(UsageError::DuplicateSubcommand(entry.name.clone()));
            }
        }
        Ok(())
    }
}

/// Where the selected subcommand's result goes.
pub(crate) enum Target<'a, S> {
    Required(&'a mut S),
    Optional(&'a mut Option<S>),
}

/// Type-erased router held by a parser.
pub(crate) trait Dispatch {
    fn required(&self) -> bool;

    fn names(&self) -> Vec<String>;

    fn summaries(&self) -> Vec<SubcommandSummary>;

    /// Parses `words` with the child schema registered as `name` and stores
    /// the result. `None` when no such subcommand exists.
    fn dispatch(&mut self, name: &str, config: &ParserConfig, words: &[String])
    -> Option<Result<()>>;

    /// Called when parsing finished without selecting a subcommand.
    fn clear(&mut self);
}

pub(crate) struct Router<'a, S> {
    commands: Subcommands<S>,
    target: Target<'a, S>,
}

impl<'a, S> Router<'a, S> {
    pub(crate) fn new(commands: Subcommands<S>, target: Target<'a, S>) -> Self {
        Self { commands, target }
    }
}

impl<S> Dispatch for Router<'_, S> {
    fn required(&self) -> bool {
        matches!(self.target, Target::Required(_))
    }

    fn names(&self) -> Vec<String> {
        self.commands.entries.iter().map(|e| e.name.clone()).collect()
    }

    fn summaries(&self) -> Vec<SubcommandSummary> {
        self.commands
            .entries
            .iter()
            .map(|e| SubcommandSummary {
                name: e.name.clone(),
                description: e.description.map(String::from),
            })
            .collect()
    }

    fn dispatch(
        &mut self,
        name: &str,
        config: &ParserConfig,
        words: &[String],
    ) -> Option<Result<()>> {
        let entry = self.commands.entries.iter().find(|e| e.name == name)?;
        let child_config = config.child(name, entry.description);
        let outcome = (entry.run)(child_config, words).map(|value| match &mut self.target {
            Target::Required(slot) => **slot = value,
            Target::Optional(slot) => **slot = Some(value),
        });
        Some(outcome)
    }

    fn clear(&mut self) {
        if let Target::Optional(slot) = &mut self.target {
            **slot = None;
        }
    }
}
