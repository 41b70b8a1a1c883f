//! Promptloom: prompt-template rendering engine for LLM-backed features.
//!
//! This is the main entry point for the `promptloom` CLI. It parses
//! arguments, dispatches to the appropriate command handler, and handles
//! errors with proper exit codes.

use promptloom::cli::Cli;
use promptloom::commands;
use promptloom::exit_codes;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Logging goes to stderr so rendered text on stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {err}");

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
