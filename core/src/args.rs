//! Struct-based schema declaration and process entry points.

use std::ffi::OsString;
use std::process;

use tracing::debug;

use crate::config::ParserConfig;
use crate::error::{Error, Result, UsageError};
use crate::parser::Parser;

/// A struct whose fields are the destinations of one parser level.
///
/// `build` binds the fields; it is called on a fresh `Default` value for
/// every parse, including every subcommand dispatch.
///
/// # Examples
///
/// ```
/// use argbind_core::{Args, FieldOptions, Parser, ParserConfig, UsageError, parse_args};
///
/// #[derive(Debug, Default)]
/// struct Calc {
///     a: i32,
///     b: i32,
///     op: String,
/// }
///
/// impl Args for Calc {
///     fn description() -> Option<&'static str> {
///         Some("Combine two numbers")
///     }
///
///     fn build<'a>(&'a mut self, parser: &mut Parser<'a>) -> Result<(), UsageError> {
///         parser.add_with(&mut self.a, "a", FieldOptions::new().with_default(1))?;
///         parser.add_with(&mut self.b, "b", FieldOptions::new().with_default(1))?;
///         parser.add_with(
///             &mut self.op,
///             "--op",
///             FieldOptions::new()
///                 .with_choices(["add", "multiply"])
///                 .with_default("add".to_string()),
///         )
///     }
/// }
///
/// let calc: Calc = parse_args(ParserConfig::new("calc"), ["3", "--op", "multiply"]).unwrap();
/// assert_eq!((calc.a, calc.b, calc.op.as_str()), (3, 1, "multiply"));
/// ```
pub trait Args: Default {
    /// Declares this level's bindings against `parser`.
    fn build<'a>(&'a mut self, parser: &mut Parser<'a>) -> std::result::Result<(), UsageError>;

    /// Text shown under the usage line, and next to the subcommand name in
    /// the parent's summary.
    fn description() -> Option<&'static str> {
        None
    }
}

/// Parses `words` into a fresh `A`.
///
/// # Errors
///
/// See [`Parser::parse`]; schema mistakes in `A::build` surface as
/// [`Error::Usage`].
pub fn parse_args<A, I, S>(config: ParserConfig, words: I) -> Result<A>
where
    A: Args,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let words: Vec<String> = words.into_iter().map(Into::into).collect();
    parse_words(config, &words)
}

pub(crate) fn parse_words<A: Args>(config: ParserConfig, words: &[String]) -> Result<A> {
    build_then(config, |parser| parser.parse_words(words))
}

fn parse_os_words<A, I, S>(config: ParserConfig, words: I) -> Result<A>
where
    A: Args,
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    build_then(config, |parser| parser.parse_os(words))
}

/// Builds a fresh `A` against a parser for `config` and hands the parser to
/// `run`.
fn build_then<A, F>(mut config: ParserConfig, run: F) -> Result<A>
where
    A: Args,
    F: for<'a> FnOnce(Parser<'a>) -> Result<()>,
{
    if config.description.is_none() {
        config.description = A::description().map(String::from);
    }

    let mut args = A::default();
    let mut parser = Parser::with_config(config);
    args.build(&mut parser)?;
    run(parser)?;
    Ok(args)
}

/// Parses the process arguments into a fresh `A`, exiting the process on
/// help or failure.
///
/// Help goes to stdout with status 0. A parse failure (including an
/// argument that is not valid UTF-8) prints one diagnostic line and the
/// usage summary to stderr with status 2; a broken schema prints its message
/// with status 70.
pub fn parse_env_or_exit<A: Args>(config: ParserConfig) -> A {
    let mut argv = std::env::args_os();
    let config = config.or_program_from(argv.next().as_deref());

    match parse_os_words(config, argv) {
        Ok(args) => args,
        Err(err) => {
            report(&err);
            debug!(code = err.exit_code(), "Exiting after argument handling");
            process::exit(err.exit_code());
        }
    }
}

fn report(err: &Error) {
    match err {
        Error::Help(summary) => print!("{summary}"),
        Error::Parse { error, summary } => {
            eprintln!("error: {error}");
            eprint!("{}", render_usage(summary));
        }
        Error::Usage(_) => eprintln!("error: {err}"),
    }
}

fn render_usage(summary: &crate::summary::SchemaSummary) -> String {
    format!("{}\n", summary.usage_line())
}
