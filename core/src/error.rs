//! Error types for schema construction and argument parsing.
//!
//! Two disjoint classes:
//!
//! - [`UsageError`] — the schema itself is malformed (bad identifier,
//!   duplicate flag, list positional not last, ...). Raised while the schema
//!   is being declared.
//! - [`ParseError`] — the end user's tokens do not fit the schema (unknown
//!   flag, bad integer, missing value, ...). Raised while parsing.
//!
//! [`Error`] is what a parse returns: either of the above, or the
//! non-failure early exit [`Error::Help`].

use thiserror::Error;

use crate::summary::SchemaSummary;

/// Schema-authoring mistakes.
///
/// These indicate a bug in the program declaring the schema, never bad user
/// input. The `Display` impl names the offending identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// Positional label does not match `[A-Za-z][A-Za-z0-9_-]*`.
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    /// Flag alias is neither `-x` nor `--label`.
    #[error("invalid flag '{0}'")]
    InvalidFlag(String),
    /// `-h` and `--help` are reserved for the built-in help request.
    #[error("cannot use flag '{0}', reserved for printing the help message")]
    ReservedFlag(String),
    /// Flag alias already registered in this schema.
    #[error("duplicate flag '{0}'")]
    DuplicateFlag(String),
    /// Positional label already registered in this schema.
    #[error("duplicate positional argument '{0}'")]
    DuplicatePositional(String),
    /// Boolean destinations can only be bound to flags.
    #[error("boolean field '{0}' must be a flag")]
    BoolPositional(String),
    /// Declared default is not one of the declared choices.
    #[error("invalid default '{default}' for '{identifier}', not one of the given choices")]
    DefaultNotInChoices { identifier: String, default: String },
    /// A plain boolean switch is false unless given, so it takes no default.
    #[error("switch '{0}' cannot take a default, declare it with require_value instead")]
    SwitchDefault(String),
    /// A positional was declared after a string-list positional.
    #[error("positional argument '{0}' follows a string list, which must be the last positional")]
    ListNotLast(String),
    /// A required positional was declared after an optional one.
    #[error("required positional argument '{0}' follows an optional positional")]
    RequiredAfterOptional(String),
    /// String lists and subcommands cannot share a schema.
    #[error("cannot combine string list '{0}' with subcommands")]
    ListWithSubcommand(String),
    /// Optional positionals and subcommands cannot share a schema.
    #[error("cannot combine optional positional argument '{0}' with subcommands")]
    OptionalPositionalWithSubcommand(String),
    /// A schema holds at most one subcommand router.
    #[error("subcommands already declared for this parser")]
    DuplicateRouter,
    /// Two subcommands share a name.
    #[error("duplicate subcommand '{0}'")]
    DuplicateSubcommand(String),
    /// Subcommand name does not match the label grammar.
    #[error("invalid subcommand name '{0}'")]
    InvalidSubcommandName(String),
    /// Router declared without any subcommand.
    #[error("subcommand router declares no subcommands")]
    EmptyRouter,
}

/// End-user input that does not fit the schema.
///
/// Parsing stops at the first of these; `Display` is the single diagnostic
/// line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Flag token with no matching alias.
    #[error("unknown flag '{0}'")]
    UnknownFlag(String),
    /// Flag that takes a value appeared as the last token (or before another
    /// flag, for list flags).
    #[error("expected a value after flag '{0}'")]
    MissingFlagValue(String),
    /// Token could not be coerced into the bound type.
    #[error("invalid {expected} value '{value}' for '{identifier}'")]
    InvalidValue {
        identifier: String,
        value: String,
        expected: &'static str,
    },
    /// Token is not one of the binding's choices.
    #[error("invalid value '{value}' for '{identifier}', valid choices are: {}", .choices.join(", "))]
    InvalidChoice {
        identifier: String,
        value: String,
        choices: Vec<String>,
    },
    /// Required binding never received a value.
    #[error("missing value for '{0}'")]
    MissingValue(String),
    /// Positional token with no positional slot (and no subcommands) left.
    #[error("unexpected extra positional argument '{0}'")]
    ExtraPositional(String),
    /// Process argument that is not valid UTF-8; shown lossily.
    #[error("argument '{0}' is not valid UTF-8")]
    InvalidEncoding(String),
    /// Token stream ended before a required subcommand.
    #[error("missing subcommand, expected one of: {}", .available.join(", "))]
    MissingSubcommand { available: Vec<String> },
    /// Subcommand name not registered with the router.
    #[error("unknown subcommand '{name}', expected one of: {}", .available.join(", "))]
    UnknownSubcommand { name: String, available: Vec<String> },
}

/// Outcome of a failed or interrupted parse.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema is malformed. Can surface during parsing when a
    /// subcommand's schema is built on dispatch.
    #[error("invalid schema: {0}")]
    Usage(#[from] UsageError),
    /// The input does not fit the schema. `summary` describes the level
    /// (top or subcommand) where the failure happened.
    #[error("{error}")]
    Parse {
        error: ParseError,
        summary: Box<SchemaSummary>,
    },
    /// `-h` or `--help` was given. Not a failure.
    #[error("help requested")]
    Help(Box<SchemaSummary>),
}

impl Error {
    /// Returns true for the help early exit.
    pub fn is_help(&self) -> bool {
        matches!(self, Error::Help(_))
    }

    /// The usage summary of the level that stopped, if any.
    pub fn summary(&self) -> Option<&SchemaSummary> {
        match self {
            Error::Usage(_) => None,
            Error::Parse { summary, .. } | Error::Help(summary) => Some(summary),
        }
    }

    /// The end-user failure, if this is one.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Error::Parse { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Conventional process exit code: 0 for help, 2 for bad input, 70 for a
    /// broken schema.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Help(_) => 0,
            Error::Parse { .. } => 2,
            Error::Usage(_) => 70,
        }
    }
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_choice_lists_choices() {
        let err = ParseError::InvalidChoice {
            identifier: "--color".to_string(),
            value: "purple".to_string(),
            choices: vec!["red".into(), "green".into(), "blue".into()],
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'purple' for '--color', valid choices are: red, green, blue"
        );
    }

    #[test]
    fn test_exit_codes() {
        let summary = Box::new(SchemaSummary::default());
        assert_eq!(Error::Help(summary.clone()).exit_code(), 0);
        assert_eq!(
            Error::Parse {
                error: ParseError::MissingValue("a".into()),
                summary,
            }
            .exit_code(),
            2
        );
        assert_eq!(Error::Usage(UsageError::DuplicateRouter).exit_code(), 70);
    }

    #[test]
    fn test_usage_error_wraps_into_error() {
        let err: Error = UsageError::DuplicateFlag("--foo".into()).into();
        assert_eq!(err.to_string(), "invalid schema: duplicate flag '--foo'");
        assert!(err.summary().is_none());
        assert!(!err.is_help());
    }
}
