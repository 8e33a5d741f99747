//! CLI command definitions using Clap.
//!
//! - `replay` - Run a scenario file through the engine
//! - `schema` - Print the JSON Schema of the config or scenario files
//! - `completions` - Generate shell completions

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::CliError;
use crate::schema::{self, SchemaKind};

pub mod replay;

pub use replay::ReplayArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Flamingo CLI - replay window arrangement scenarios.
#[derive(Parser, Debug)]
#[command(name = "flamingo")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Replay a scenario file.
    ///
    /// Registers the scenario's windows and monitors, dispatches its actions
    /// in order, and prints the deltas each step produced.
    Replay(ReplayArgs),

    /// Output a JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the configuration file
    /// (default) or scenario files. Can be redirected to a file for use with
    /// editors that support JSON Schema validation.
    Schema {
        /// Which document to describe.
        #[arg(long, short, value_enum, default_value_t = SchemaKind::Config)]
        kind: SchemaKind,
    },

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    /// Can be used with eval or redirected to a file.
    ///
    /// Usage:
    ///   eval "$(flamingo completions --shell zsh)"
    ///   flamingo completions --shell fish > ~/.config/fish/completions/flamingo.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), CliError> {
        if let Some(path) = &self.config
            && !path.exists()
        {
            return Err(CliError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        match &self.command {
            Commands::Replay(args) => replay::execute(args, self.config.as_deref()),

            Commands::Schema { kind } => {
                println!("{}", schema::generate_schema_json(*kind));
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "flamingo", &mut io::stdout());
    }
}
