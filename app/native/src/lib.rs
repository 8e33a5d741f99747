//! Flamingo - an incremental fact engine for desktop window arrangement.
//!
//! Hosts register windows and monitors, report user actions (open, drag,
//! group, close), and receive per action the exact set of facts that became
//! true or false: final coordinates after snapping, snap anchors, and the
//! grouping button state of each window.
//!
//! This library provides the engine and the `flamingo` command-line tool
//! that replays scripted scenarios through it.

pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod scenario;
pub mod schema;

pub use config::EngineConfig;
pub use engine::{Action, Delta, Fact, Flamingo, SharedFlamingo};
pub use error::{EngineResult, FlamingoError};
