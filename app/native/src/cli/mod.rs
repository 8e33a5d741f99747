//! CLI module for Flamingo.
//!
//! The command-line tool replays scenario files through the engine and
//! prints the resulting deltas, so rule changes can be inspected without a
//! host application.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::CliError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    cli.execute()
}
