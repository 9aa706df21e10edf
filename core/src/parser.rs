//! Schema declaration and the parse entry point.

use std::ffi::OsString;

use tracing::debug;

use crate::config::ParserConfig;
use crate::error::{Error, ParseError, Result, UsageError};
use crate::field::{FieldOptions, FieldValue, Shape, TypedSlot};
use crate::identifier::Identifier;
use crate::matcher::{self, Halt};
use crate::registry::{Binding, Kind, Registry};
use crate::router::{Dispatch, Router, Subcommands, Target};
use crate::summary::SchemaSummary;

/// One level of argument schema, bound to caller-owned destinations.
///
/// Bindings are declared with [`add`](Parser::add) /
/// [`add_with`](Parser::add_with); at most one subcommand router with
/// [`subcommand`](Parser::subcommand) or
/// [`optional_subcommand`](Parser::optional_subcommand). A parser is used for
/// exactly one [`parse`](Parser::parse), which consumes it and releases the
/// destinations.
///
/// # Examples
///
/// ```
/// use argbind_core::{FieldOptions, Parser};
///
/// let mut a = 0_i32;
/// let mut b = 0_i32;
/// let mut op = String::new();
///
/// let mut parser = Parser::new();
/// parser.add(&mut a, "a").unwrap();
/// parser.add_with(&mut b, "b", FieldOptions::new().with_default(10)).unwrap();
/// parser
///     .add_with(&mut op, "-o|--op", FieldOptions::new().with_choices(["add", "mul"]))
///     .unwrap();
///
/// parser.parse(["--op", "mul", "4"]).unwrap();
/// assert_eq!((a, b, op.as_str()), (4, 10, "mul"));
/// ```
pub struct Parser<'a> {
    config: ParserConfig,
    registry: Registry<'a>,
    router: Option<Box<dyn Dispatch + 'a>>,
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Parser<'a> {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            registry: Registry::default(),
            router: None,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Binds `output` to `identifier` with no help, default, or choices.
    ///
    /// # Errors
    ///
    /// Any [`UsageError`] from the identifier grammar or the schema ordering
    /// rules.
    pub fn add<T: FieldValue + 'a>(
        &mut self,
        output: &'a mut T,
        identifier: &str,
    ) -> std::result::Result<(), UsageError> {
        self.add_with(output, identifier, FieldOptions::default())
    }

    /// Binds `output` to `identifier` with explicit options.
    ///
    /// `identifier` is a positional label (`count`) or `|`-separated flag
    /// aliases (`-c|--count`). A declared default must be one of the
    /// declared choices.
    pub fn add_with<T: FieldValue + 'a>(
        &mut self,
        output: &'a mut T,
        identifier: &str,
        options: FieldOptions<T>,
    ) -> std::result::Result<(), UsageError> {
        let parsed = Identifier::parse(identifier)?;

        let FieldOptions {
            help,
            default,
            choices,
            require_value,
        } = options;

        if let Some(text) = default.as_ref().and_then(FieldValue::as_text) {
            if !choices.is_empty() && !choices.iter().any(|choice| choice == text) {
                return Err(UsageError::DefaultNotInChoices {
                    identifier: identifier.to_string(),
                    default: text.to_string(),
                });
            }
        }
        if T::SHAPE == Shape::Bool && !require_value && default.is_some() {
            return Err(UsageError::SwitchDefault(identifier.to_string()));
        }

        let has_default =
            default.is_some() || (T::SHAPE.is_implicitly_optional() && !require_value);
        let mut binding = Binding::new(
            identifier,
            parsed,
            T::SHAPE,
            Box::new(TypedSlot::new(output, default)),
        );
        binding.help = help;
        binding.choices = choices;
        binding.require_value = require_value;
        binding.has_default = has_default;

        if self.router.is_some() {
            if binding.shape.is_list() {
                return Err(UsageError::ListWithSubcommand(binding.identifier));
            }
            if binding.kind == Kind::Positional && binding.has_default {
                return Err(UsageError::OptionalPositionalWithSubcommand(
                    binding.identifier,
                ));
            }
        }

        self.registry.register(binding)
    }

    /// Declares the subcommand router; a subcommand must be given.
    pub fn subcommand<S: 'static>(
        &mut self,
        output: &'a mut S,
        commands: Subcommands<S>,
    ) -> std::result::Result<(), UsageError> {
        self.install_router(commands, Target::Required(output))
    }

    /// Declares the subcommand router; `output` stays `None` when no
    /// subcommand is given.
    pub fn optional_subcommand<S: 'static>(
        &mut self,
        output: &'a mut Option<S>,
        commands: Subcommands<S>,
    ) -> std::result::Result<(), UsageError> {
        self.install_router(commands, Target::Optional(output))
    }

    fn install_router<S: 'static>(
        &mut self,
        commands: Subcommands<S>,
        target: Target<'a, S>,
    ) -> std::result::Result<(), UsageError> {
        if self.router.is_some() {
            return Err(UsageError::DuplicateRouter);
        }
        if let Some(list) = self.registry.first_list() {
            return Err(UsageError::ListWithSubcommand(list.identifier.clone()));
        }
        if let Some(optional) = self.registry.first_optional_positional() {
            return Err(UsageError::OptionalPositionalWithSubcommand(
                optional.identifier.clone(),
            ));
        }
        commands.validate()?;
        self.router = Some(Box::new(Router::new(commands, target)));
        Ok(())
    }

    /// Metadata snapshot for help rendering.
    pub fn summary(&self) -> SchemaSummary {
        SchemaSummary {
            program: self.config.program.clone(),
            description: self.config.description.clone(),
            bindings: self.registry.bindings().map(Binding::summary).collect(),
            subcommands: self
                .router
                .as_ref()
                .map(|router| router.summaries())
                .unwrap_or_default(),
            subcommand_required: self.router.as_ref().is_some_and(|router| router.required()),
        }
    }

    /// Parses `words` (the argument vector without the program name) into
    /// the bound destinations.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] for the first input problem, [`Error::Help`] when
    /// `-h`/`--help` is seen, and anything a subcommand's parse returns.
    pub fn parse<I, S>(self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        self.parse_words(&words)
    }

    /// Parses the process arguments, taking the program name from `argv[0]`
    /// when none is configured.
    pub fn parse_env(mut self) -> Result<()> {
        let mut argv = std::env::args_os();
        self.config = self.config.or_program_from(argv.next().as_deref());
        self.parse_os(argv)
    }

    /// Like [`parse`](Parser::parse), for words as the operating system hands
    /// them over.
    ///
    /// # Errors
    ///
    /// A word that is not valid UTF-8 fails with
    /// [`ParseError::InvalidEncoding`] before any binding is touched.
    pub fn parse_os<I, S>(self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        match decode_words(words) {
            Ok(words) => self.parse_words(&words),
            Err(error) => Err(self.failed(error)),
        }
    }

    pub(crate) fn parse_words(mut self, words: &[String]) -> Result<()> {
        let outcome = matcher::run(
            &mut self.registry,
            self.router.as_deref_mut(),
            &self.config,
            words,
        );
        match outcome {
            Ok(()) => Ok(()),
            Err(Halt::Help) => Err(Error::Help(Box::new(self.summary()))),
            Err(Halt::Failed(error)) => Err(self.failed(error)),
            Err(Halt::Nested(error)) => Err(error),
        }
    }

    fn failed(&self, error: ParseError) -> Error {
        debug!(program = ?self.config.program, %error, "Parse failed");
        Error::Parse {
            error,
            summary: Box::new(self.summary()),
        }
    }
}

fn decode_words<I, S>(words: I) -> std::result::Result<Vec<String>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    words
        .into_iter()
        .map(|word| {
            word.into()
                .into_string()
                .map_err(|raw| ParseError::InvalidEncoding(raw.to_string_lossy().into_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error(result: Result<()>) -> ParseError {
        match result {
            Err(Error::Parse { error, .. }) => error,
            other => panic!("expected a parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_positionals_fill_in_order_around_flags() {
        let (mut a, mut b, mut x) = (0_i32, 0_i32, String::new());
        let mut parser = Parser::new();
        parser.add(&mut a, "a").unwrap();
        parser.add(&mut b, "b").unwrap();
        parser.add(&mut x, "--x").unwrap();
        parser.parse(["1", "--x", "v", "2"]).unwrap();
        assert_eq!((a, b, x.as_str()), (1, 2, "v"));
    }

    #[test]
    fn test_default_must_be_a_choice() {
        let mut color = String::new();
        let mut parser = Parser::new();
        let err = parser.add_with(
            &mut color,
            "--color",
            FieldOptions::new()
                .with_choices(["red", "green"])
                .with_default("blue".to_string()),
        );
        assert_eq!(
            err,
            Err(UsageError::DefaultNotInChoices {
                identifier: "--color".into(),
                default: "blue".into(),
            })
        );
    }

    #[test]
    fn test_switch_rejects_default() {
        let mut verbose = false;
        let mut parser = Parser::new();
        assert_eq!(
            parser.add_with(&mut verbose, "-v", FieldOptions::new().with_default(true)),
            Err(UsageError::SwitchDefault("-v".into()))
        );

        let mut color = false;
        let mut parser = Parser::new();
        parser
            .add_with(
                &mut color,
                "--color",
                FieldOptions::new().require_value().with_default(true),
            )
            .unwrap();
        parser.parse(Vec::<String>::new()).unwrap();
        assert!(color);
    }

    #[test]
    fn test_help_token_is_not_taken_as_flag_value() {
        let mut name = String::new();
        let mut parser = Parser::new();
        parser.add(&mut name, "--name").unwrap();
        assert!(parser.parse(["--name", "--help"]).unwrap_err().is_help());
        assert!(name.is_empty());
    }

    #[test]
    fn test_parse_os_accepts_utf8_words() {
        let mut a = 0_i32;
        let mut parser = Parser::new();
        parser.add(&mut a, "a").unwrap();
        parser.parse_os([OsString::from("12")]).unwrap();
        assert_eq!(a, 12);
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_os_rejects_invalid_utf8() {
        use std::os::unix::ffi::OsStringExt;

        let (mut a, mut b) = (0_i32, 0_i32);
        let mut parser = Parser::with_config(ParserConfig::new("calc"));
        parser.add(&mut a, "a").unwrap();
        parser.add(&mut b, "b").unwrap();
        let err = parser
            .parse_os([OsString::from("3"), OsString::from_vec(vec![0xff])])
            .unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::InvalidEncoding("\u{FFFD}".into()))
        );
        assert_eq!(err.exit_code(), 2);
        assert_eq!(a, 0);
    }

    #[test]
    fn test_unknown_flag_and_extra_positional() {
        let mut a = 0_i32;
        let mut parser = Parser::new();
        parser.add(&mut a, "a").unwrap();
        assert_eq!(
            parse_error(parser.parse(["--nope"])),
            ParseError::UnknownFlag("--nope".into())
        );

        let mut a = 0_i32;
        let mut parser = Parser::new();
        parser.add(&mut a, "a").unwrap();
        assert_eq!(
            parse_error(parser.parse(["1", "2"])),
            ParseError::ExtraPositional("2".into())
        );
    }

    #[test]
    fn test_missing_flag_value() {
        let mut name = String::new();
        let mut parser = Parser::new();
        parser.add(&mut name, "-n|--name").unwrap();
        assert_eq!(
            parse_error(parser.parse(["-n"])),
            ParseError::MissingFlagValue("-n".into())
        );
    }

    #[test]
    fn test_flag_value_may_start_with_dash() {
        let mut offset = 0_i32;
        let mut parser = Parser::new();
        parser.add(&mut offset, "--offset").unwrap();
        parser.parse(["--offset", "-3"]).unwrap();
        assert_eq!(offset, -3);
    }

    #[test]
    fn test_switch_and_explicit_bool() {
        let (mut verbose, mut color) = (false, true);
        let mut parser = Parser::new();
        parser.add(&mut verbose, "-v").unwrap();
        parser
            .add_with(&mut color, "--color", FieldOptions::new().require_value())
            .unwrap();
        parser.parse(["-v", "--color", "false"]).unwrap();
        assert!(verbose);
        assert!(!color);
    }

    #[test]
    fn test_explicit_bool_is_required_and_strict() {
        let mut color = false;
        let mut parser = Parser::new();
        parser
            .add_with(&mut color, "--color", FieldOptions::new().require_value())
            .unwrap();
        assert_eq!(
            parse_error(parser.parse(Vec::<String>::new())),
            ParseError::MissingValue("--color".into())
        );

        let mut color = false;
        let mut parser = Parser::new();
        parser
            .add_with(&mut color, "--color", FieldOptions::new().require_value())
            .unwrap();
        assert_eq!(
            parse_error(parser.parse(["--color", "True"])),
            ParseError::InvalidValue {
                identifier: "--color".into(),
                value: "True".into(),
                expected: "boolean",
            }
        );
    }

    #[test]
    fn test_last_flag_occurrence_wins() {
        let mut level = 0_i64;
        let mut parser = Parser::new();
        parser.add(&mut level, "-l|--level").unwrap();
        parser.parse(["-l", "1", "--level", "7"]).unwrap();
        assert_eq!(level, 7);
    }

    #[test]
    fn test_list_flag_needs_a_value() {
        let mut files = Vec::<String>::new();
        let mut parser = Parser::new();
        parser.add(&mut files, "--files").unwrap();
        assert_eq!(
            parse_error(parser.parse(["--files", "-x"])),
            ParseError::MissingFlagValue("--files".into())
        );

        let mut files = Vec::<String>::new();
        let mut verbose = false;
        let mut parser = Parser::new();
        parser.add(&mut files, "--files").unwrap();
        parser.add(&mut verbose, "-v").unwrap();
        parser.parse(["--files", "a", "b", "-v"]).unwrap();
        assert_eq!(files, vec!["a".to_string(), "b".to_string()]);
        assert!(verbose);
    }

    #[test]
    fn test_help_token_short_circuits() {
        let mut a = 0_i32;
        let mut parser = Parser::with_config(ParserConfig::new("tool"));
        parser.add(&mut a, "a").unwrap();
        let err = parser.parse(["oops", "--help"]).unwrap_err();
        assert!(err.is_help());
        assert_eq!(err.summary().unwrap().program.as_deref(), Some("tool"));
    }

    #[test]
    fn test_help_token_after_a_bad_value_reports_the_bad_value() {
        let mut a = 0_i32;
        let mut parser = Parser::new();
        parser.add(&mut a, "a").unwrap();
        assert!(matches!(
            parse_error(parser.parse(["x", "-h"])),
            ParseError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_summary_reflects_declarations() {
        let (mut a, mut fruit) = (0_i32, None::<String>);
        let mut parser = Parser::with_config(ParserConfig::new("basic"));
        parser
            .add_with(&mut a, "a", FieldOptions::new().with_help("First"))
            .unwrap();
        parser
            .add_with(
                &mut fruit,
                "--fruit",
                FieldOptions::new().with_choices(["apple", "pear"]),
            )
            .unwrap();
        let summary = parser.summary();
        assert_eq!(summary.bindings.len(), 2);
        assert_eq!(summary.bindings[0].help.as_deref(), Some("First"));
        assert!(!summary.bindings[0].has_default);
        assert!(summary.bindings[1].has_default);
        assert_eq!(summary.bindings[1].choices, vec!["apple", "pear"]);
        assert!(summary.subcommands.is_empty());
    }
}
