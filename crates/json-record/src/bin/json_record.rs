//! `json-record`: decode a JSON object against a schema document and
//! re-encode it.
//!
//! Usage:
//!   json-record --schema <file> --record <name> [--no-overflow] [--verbose]
//!
//! The object is read from stdin; the re-encoded object goes to stdout and
//! logs go to stderr.

use std::io::{self, Read, Write};

use json_record::cli::{read_schema, run, CliArgs, CliError};
use tracing::Level;

fn main() {
    if let Err(e) = try_main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), CliError> {
    let args = CliArgs::parse(std::env::args().skip(1))?;

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if args.verbose { Level::TRACE } else { Level::INFO })
        .init();

    let schema = read_schema(&args)?;
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|source| CliError::Io {
            path: "<stdin>".to_string(),
            source,
        })?;

    let output = run(&args, &schema, input.trim())?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}").map_err(|source| CliError::Io {
        path: "<stdout>".to_string(),
        source,
    })
}
