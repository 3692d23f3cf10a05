//! `run` command: encode or decode a message stream.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::cli::args::{RunArgs, TraceFormat};
use crate::config::ConfigLoader;
use crate::error::EnigmaError;
use crate::observability::trace::{HumanTraceSink, JsonTraceSink, TraceSink};
use crate::session::{Session, SessionOptions};

/// Loads the configuration and drives the input through the machine.
///
/// # Errors
///
/// Returns a configuration error if the machine cannot be built, an I/O
/// error if input or output cannot be opened, or the first session error.
pub fn run(args: &RunArgs) -> Result<(), EnigmaError> {
    tracing::info!(config = %args.config.display(), "loading configuration");
    let config = ConfigLoader::with_defaults().load(&args.config)?.config;

    let mut machine = config.build()?;
    if args.trace {
        machine = machine.with_sink(trace_sink(args.trace_format));
    }

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|e| name_path(path, e))?)),
        None => Box::new(std::io::stdin().lock()),
    };
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| name_path(path, e))?)),
        None => Box::new(std::io::stdout().lock()),
    };

    let options = SessionOptions {
        group_size: args.group_size,
    };
    let summary = Session::new(machine, options).run(reader, writer)?;
    tracing::debug!(?summary, "run finished");
    Ok(())
}

fn trace_sink(format: TraceFormat) -> Box<dyn TraceSink> {
    match format {
        TraceFormat::Human => Box::new(HumanTraceSink::stderr()),
        TraceFormat::Json => Box::new(JsonTraceSink::stderr()),
    }
}

/// Adds the offending path to an open failure.
fn name_path(path: &Path, e: std::io::Error) -> std::io::Error {
    std::io::Error::new(e.kind(), format!("could not open {}: {e}", path.display()))
}
