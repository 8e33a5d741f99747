#![allow(clippy::multiple_crate_versions)]

//! Flamingo command-line tool.
//!
//! Logging goes to stderr and is controlled by the `FLAMINGO_LOG`
//! environment variable (`FLAMINGO_LOG=debug flamingo replay ...`).

use flamingo_lib::constants::config::LOG_ENV;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(err) = flamingo_lib::cli::run() {
        eprintln!("flamingo: {err}");
        std::process::exit(1);
    }
}
