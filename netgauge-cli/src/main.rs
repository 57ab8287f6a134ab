//! CLI entry point for netgauge.
//!
//! Parses command-line arguments with clap, analyzes every input file,
//! renders the report to stdout, and maps failures to exit codes. A run in
//! which any input failed still renders every result and then exits with a
//! failure status.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use netgauge_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments, run the command, render the report, and flush the
/// output stream. Returns the number of inputs that failed.
fn try_main() -> Result<usize> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render report")?;
    writer.flush().context("failed to flush output")?;
    Ok(summary.failed_count())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!(failed, "one or more inputs could not be analyzed");
            ExitCode::FAILURE
        }
        Err(err) => {
            let (code, load_code) = err
                .downcast_ref::<CliError>()
                .and_then(|cli_error| match cli_error {
                    CliError::Core(core) => Some((Some(core.code()), core.load_code())),
                    _ => None,
                })
                .unwrap_or((None, None));

            let code_field = code.map(|code| field::display(code.as_str()));
            let load_code_field = load_code.map(|code| field::display(code.as_str()));

            error!(
                error = %err,
                code = code_field,
                load_code = load_code_field,
                "command execution failed"
            );
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
