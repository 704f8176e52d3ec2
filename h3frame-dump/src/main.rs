mod config;
mod input;
mod printer;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use h3frame::{Error, HttpDecoder};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{CliArgs, DumpConfig, LogLevel};
use printer::PrintingVisitor;

fn main() -> Result<()> {
    let cli = CliArgs::parse();

    if cli.print_default_config {
        return config::print_default_config();
    }

    let loaded = config::load_config(&cli)?;
    init_logging(loaded.config.logging.level)?;

    if loaded.missing_file {
        warn!(config_path = %cli.config, "Configuration file not found, using defaults");
    }
    if let Some(level) = &loaded.ignored_log_level {
        warn!(level = %level, "Invalid log level specified, ignoring");
    }

    if cli.validate {
        println!("Configuration is valid");
        return Ok(());
    }

    let data = input::read_input(&cli.input, cli.hex)?;
    info!(
        input = %cli.input,
        bytes = data.len(),
        chunk_size = loaded.config.input.chunk_size,
        "Decoding stream"
    );

    let stdout = io::stdout();
    let report = dump(&data, &loaded.config, stdout.lock())?;

    if let Some(error) = report.error {
        anyhow::bail!(
            "decoding stopped after {} of {} bytes: {} (h3 code {:#06x})",
            report.consumed,
            data.len(),
            error,
            error.code().h3_code()
        );
    }
    if !report.complete {
        warn!(
            consumed = report.consumed,
            "Input ends in the middle of a frame"
        );
    }
    info!(consumed = report.consumed, "Done");
    Ok(())
}

/// Result of feeding a whole capture through the decoder.
#[derive(Debug)]
struct DumpReport {
    consumed: usize,
    /// The input ended on a frame boundary.
    complete: bool,
    error: Option<Error>,
}

/// Feeds `data` to a decoder in `input.chunk_size` pieces, printing events
/// to `out`.
fn dump<W: Write>(data: &[u8], config: &DumpConfig, out: W) -> Result<DumpReport> {
    let chunk_size = config.input.chunk_size;
    let mut printer = PrintingVisitor::new(out);
    let mut decoder = HttpDecoder::with_config(&mut printer, config.decoder.clone());

    let mut consumed = 0;
    while consumed < data.len() {
        let end = data.len().min(consumed + chunk_size);
        consumed += decoder.process_input(&data[consumed..end]);
        if decoder.error().is_error() || decoder.visitor().failed() {
            break;
        }
    }

    let report = DumpReport {
        consumed,
        complete: decoder.at_frame_boundary(),
        error: decoder.last_error().cloned(),
    };

    if let Some(e) = printer.take_io_error() {
        return Err(e).context("Failed to write output");
    }
    Ok(report)
}

fn init_logging(level: LogLevel) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level.to_string())?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")
}
