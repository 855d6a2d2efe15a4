//! promptforge: constrained LLM generation from declarative blueprints.
//!
//! This is the main entry point for the `promptforge` CLI. It parses
//! arguments, installs logging, dispatches to the appropriate command
//! handler, and handles errors with proper exit codes.

use promptforge::cli::Cli;
use promptforge::{commands, exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
