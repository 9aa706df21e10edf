//! Identifier grammar for binding declarations.
//!
//! A declaration string is either a positional label (`count`, `out-dir`) or
//! a `|`-separated list of flag aliases (`-b|--bar`). Classification happens
//! once, at declaration time; malformed identifiers are [`UsageError`]s.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::UsageError;

/// Aliases reserved for the built-in help request.
pub const HELP_FLAGS: [&str; 2] = ["-h", "--help"];

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("static regex must compile")
});

/// A classified declaration string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Matched by position; holds the label.
    Positional(String),
    /// Matched by any of its aliases, in declaration order.
    Flag(Vec<String>),
}

impl Identifier {
    /// Classifies and validates a declaration string.
    ///
    /// Duplicate detection across a schema is the registry's job; this only
    /// rejects an alias repeated within the same declaration.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::{Identifier, UsageError};
    ///
    /// assert_eq!(
    ///     Identifier::parse("-b|--bar").unwrap(),
    ///     Identifier::Flag(vec!["-b".into(), "--bar".into()])
    /// );
    /// assert_eq!(
    ///     Identifier::parse("count").unwrap(),
    ///     Identifier::Positional("count".into())
    /// );
    /// assert_eq!(
    ///     Identifier::parse("--help"),
    ///     Err(UsageError::ReservedFlag("--help".into()))
    /// );
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UsageError> {
        if !raw.starts_with('-') {
            if !is_valid_label(raw) {
                return Err(UsageError::InvalidIdentifier(raw.to_string()));
            }
            return Ok(Identifier::Positional(raw.to_string()));
        }

        let mut aliases: Vec<String> = Vec::new();
        for alias in raw.split('|') {
            if HELP_FLAGS.contains(&alias) {
                return Err(UsageError::ReservedFlag(alias.to_string()));
            }
            if !is_valid_alias(alias) {
                return Err(UsageError::InvalidFlag(alias.to_string()));
            }
            if aliases.iter().any(|seen| seen == alias) {
                return Err(UsageError::DuplicateFlag(alias.to_string()));
            }
            aliases.push(alias.to_string());
        }
        Ok(Identifier::Flag(aliases))
    }
}

/// Checks `[A-Za-z][A-Za-z0-9_-]*`.
pub fn is_valid_label(label: &str) -> bool {
    LABEL_RE.is_match(label)
}

/// `-x` with an alphabetic `x`, or `--label`.
fn is_valid_alias(alias: &str) -> bool {
    if let Some(long) = alias.strip_prefix("--") {
        return is_valid_label(long);
    }
    let mut chars = alias.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('-'), Some(c), None) if c.is_ascii_alphabetic()
    )
}

/// Whether a token from the word stream is the help request.
pub(crate) fn is_help_token(token: &str) -> bool {
    HELP_FLAGS.contains(&token)
}

/// Whether a token from the word stream is classified as a flag.
pub(crate) fn looks_like_flag(token: &str) -> bool {
    token.starts_with('-')
}
