//! Subcommand routing into a closed enum of child argument structs.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argbind-demos --bin subcommand -- add 2 3
//! cargo run -p argbind-demos --bin subcommand -- negate 4
//! ```

use argbind_core::{
    Args, FieldOptions, Parser, ParserConfig, Subcommands, UsageError, parse_env_or_exit,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct AddCommand {
    a: i32,
    b: i32,
}

impl Args for AddCommand {
    fn description() -> Option<&'static str> {
        Some("Add two numbers")
    }

    fn build<'a>(&'a mut self, parser: &mut Parser<'a>) -> Result<(), UsageError> {
        parser.add_with(&mut self.a, "a", FieldOptions::new().with_help("First argument"))?;
        parser.add_with(&mut self.b, "b", FieldOptions::new().with_help("Second argument"))
    }
}

#[derive(Debug, Default)]
struct NegateCommand {
    value: i32,
}

impl Args for NegateCommand {
    fn description() -> Option<&'static str> {
        Some("Negate a number")
    }

    fn build<'a>(&'a mut self, parser: &mut Parser<'a>) -> Result<(), UsageError> {
        parser.add_with(&mut self.value, "value", FieldOptions::new().with_help("Argument"))
    }
}

#[derive(Debug)]
enum Command {
    Add(AddCommand),
    Negate(NegateCommand),
}

#[derive(Debug, Default)]
struct CliArgs {
    command: Option<Command>,
}

impl Args for CliArgs {
    fn build<'a>(&'a mut self, parser: &mut Parser<'a>) -> Result<(), UsageError> {
        parser.optional_subcommand(
            &mut self.command,
            Subcommands::new()
                .with_command("add", Command::Add)
                .with_command("negate", Command::Negate),
        )
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: CliArgs = parse_env_or_exit(ParserConfig::default());
    tracing::debug!(?args, "Parsed arguments");

    match args.command {
        Some(Command::Add(add)) => println!("Result: {}", i64::from(add.a) + i64::from(add.b)),
        Some(Command::Negate(negate)) => println!("Result: {}", -i64::from(negate.value)),
        None => println!("No command given, try --help"),
    }
}
