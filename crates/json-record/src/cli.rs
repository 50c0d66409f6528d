//! `json-record`: decode a JSON object against a schema document and write
//! it back out.
//!
//! Provides the logic behind the binary entry point so it can be tested
//! without a process boundary.

use thiserror::Error;
use tracing::info;

use crate::decoder::Decoder;
use crate::document::SchemaRegistry;
use crate::encoder::Encoder;
use crate::error::RecordError;
use crate::options::CodecOptions;

pub const USAGE: &str =
    "usage: json-record --schema <file> --record <name> [--no-overflow] [--verbose]";

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing argument: {0}\n{usage}", usage = USAGE)]
    MissingArg(&'static str),
    #[error("unexpected argument `{0}`\n{usage}", usage = USAGE)]
    UnexpectedArg(String),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Record(#[from] RecordError),
}

// ── Arguments ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub schema: String,
    pub record: String,
    /// Drop undeclared keys on input and write declared fields only.
    pub no_overflow: bool,
    pub verbose: bool,
}

impl CliArgs {
    /// Parses arguments, program name excluded.
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = None;
        let mut record = None;
        let mut no_overflow = false;
        let mut verbose = false;

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--schema" => {
                    schema = Some(args.next().ok_or(CliError::MissingArg("--schema <file>"))?)
                }
                "--record" => {
                    record = Some(args.next().ok_or(CliError::MissingArg("--record <name>"))?)
                }
                "--no-overflow" => no_overflow = true,
                "--verbose" | "-v" => verbose = true,
                _ => return Err(CliError::UnexpectedArg(arg)),
            }
        }

        Ok(Self {
            schema: schema.ok_or(CliError::MissingArg("--schema <file>"))?,
            record: record.ok_or(CliError::MissingArg("--record <name>"))?,
            no_overflow,
            verbose,
        })
    }

    pub fn codec_options(&self) -> CodecOptions {
        if self.no_overflow {
            CodecOptions::strict()
        } else {
            CodecOptions::default()
        }
    }
}

// ── Run ───────────────────────────────────────────────────────────────────

/// Decodes `input` as the record named in `args` and returns the re-encoded
/// JSON text.
pub fn run(args: &CliArgs, schema_json: &str, input: &str) -> Result<String, CliError> {
    let registry = SchemaRegistry::from_json_str(schema_json)?;
    let table = registry.get(&args.record)?;
    let opts = args.codec_options();

    let record = Decoder::with_options(opts).decode_str(input, table)?;
    for key in record.overflow_keys() {
        info!(target: "json_record::cli", record = table.name(), key, "overflow key");
    }
    Ok(Encoder::with_options(opts).encode_to_string(&record)?)
}

/// Reads the schema file named in `args`.
pub fn read_schema(args: &CliArgs) -> Result<String, CliError> {
    std::fs::read_to_string(&args.schema).map_err(|source| CliError::Io {
        path: args.schema.clone(),
        source,
    })
}
