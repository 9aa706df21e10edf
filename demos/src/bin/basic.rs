//! Direct `Parser` usage: flags with aliases, choices, defaults, an optional
//! flag and a trailing list positional.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argbind-demos --bin basic -- 3 4 extra words --fruit pear
//! ```

use std::process;

use argbind_core::{Error, FieldOptions, Parser, ParserConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Options {
    foo: String,
    bar: String,
    fruit: Option<String>,
    color: String,
    a: i32,
    b: i32,
    other: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut options = Options::default();
    if let Err(err) = parse(&mut options) {
        match &err {
            Error::Help(summary) => print!("{summary}"),
            Error::Parse { error, summary } => {
                eprintln!("error: {error}");
                eprintln!("{}", summary.usage_line());
            }
            Error::Usage(_) => eprintln!("error: {err}"),
        }
        process::exit(err.exit_code());
    }

    println!("foo: {}", options.foo);
    println!("bar: {}", options.bar);
    println!("fruit: {}", options.fruit.as_deref().unwrap_or("<none>"));
    println!("color: {}", options.color);
    println!("a + b: {}", i64::from(options.a) + i64::from(options.b));
    println!("other: [{}]", options.other.join(", "));
}

fn parse(options: &mut Options) -> argbind_core::Result<()> {
    let config = ParserConfig::new("basic").with_description("Demonstrates every binding shape");
    let mut parser = Parser::with_config(config);

    parser.add_with(
        &mut options.foo,
        "--foo",
        FieldOptions::new()
            .with_help("Foo flag")
            .with_default(String::new()),
    )?;
    parser.add_with(
        &mut options.bar,
        "-b|--bar",
        FieldOptions::new().with_default("asdf".to_string()),
    )?;
    parser.add_with(
        &mut options.fruit,
        "--fruit",
        FieldOptions::new()
            .with_choices(["apple", "banana", "pear"])
            .with_help("Fruit flag"),
    )?;
    parser.add_with(
        &mut options.color,
        "--color",
        FieldOptions::new()
            .with_choices(["red", "green", "blue"])
            .with_default("red".to_string()),
    )?;
    parser.add_with(
        &mut options.a,
        "a",
        FieldOptions::new().with_help("First number to add"),
    )?;
    parser.add_with(
        &mut options.b,
        "b",
        FieldOptions::new()
            .with_default(2)
            .with_help("Second number to add"),
    )?;
    parser.add_with(
        &mut options.other,
        "other",
        FieldOptions::new().with_help("Other words to print out"),
    )?;

    parser.parse_env()
}
