//! Struct-based declaration with [`Args`]: two defaulted numbers and an
//! operation chosen from a fixed set.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argbind-demos --bin calc -- 6 7 --op multiply
//! ```

use std::process;

use argbind_core::{Args, FieldOptions, Parser, ParserConfig, UsageError, parse_env_or_exit};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct CalcArgs {
    a: i64,
    b: i64,
    op: String,
}

impl Args for CalcArgs {
    fn description() -> Option<&'static str> {
        Some("Combine two numbers")
    }

    fn build<'a>(&'a mut self, parser: &mut Parser<'a>) -> Result<(), UsageError> {
        parser.add_with(
            &mut self.a,
            "a",
            FieldOptions::new().with_help("First argument").with_default(0),
        )?;
        parser.add_with(
            &mut self.b,
            "b",
            FieldOptions::new().with_help("Second argument").with_default(0),
        )?;
        parser.add_with(
            &mut self.op,
            "-o|--op",
            FieldOptions::new()
                .with_help("Operation")
                .with_choices(["add", "multiply"])
                .with_default("add".to_string()),
        )
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: CalcArgs = parse_env_or_exit(ParserConfig::default());
    tracing::debug!(?args, "Parsed arguments");

    let result = match args.op.as_str() {
        "multiply" => args.a.checked_mul(args.b),
        _ => args.a.checked_add(args.b),
    };
    match result {
        Some(result) => println!("Result: {result}"),
        None => {
            eprintln!("error: result does not fit in a 64-bit integer");
            process::exit(1);
        }
    }
}
