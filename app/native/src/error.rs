//! Error types for Flamingo.
//!
//! Every engine operation reports failures through [`FlamingoError`]. All
//! variants are local and recoverable: validation runs before any state is
//! touched, so an `Err` always means "nothing happened".

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::Oid;
use crate::scenario::ScenarioError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, FlamingoError>;

/// Errors returned by the engine.
///
/// Serializes as `{ "kind": ..., "message": ... }` so hosts can forward it
/// without inspecting the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum FlamingoError {
    /// The action referenced an oid that was never registered.
    #[error("Unknown object: {0}")]
    UnknownObject(Oid),

    /// The action payload was malformed, or targeted the wrong sort of object.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// The target already belongs to a group.
    #[error("Object {0} is already grouped")]
    AlreadyGrouped(Oid),

    /// The target does not belong to any group.
    #[error("Object {0} is not grouped")]
    NotGrouped(Oid),

    /// The window is already open.
    ///
    /// Only surfaced when `strictReopen` is enabled; otherwise re-opening is a
    /// silent no-op.
    #[error("Object {0} is already open")]
    AlreadyOpen(Oid),

    /// The target has no position yet.
    #[error("Object {0} has not been opened")]
    NotOpen(Oid),
}

impl FlamingoError {
    /// Creates an invalid action error with the given reason.
    #[must_use]
    pub fn invalid_action(reason: impl Into<String>) -> Self { Self::InvalidAction(reason.into()) }
}

impl From<serde_json::Error> for FlamingoError {
    fn from(err: serde_json::Error) -> Self { Self::InvalidAction(err.to_string()) }
}

/// Errors surfaced by the command-line tool.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Scenario file could not be loaded.
    #[error("Scenario error: {0}")]
    ScenarioError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<ScenarioError> for CliError {
    fn from(err: ScenarioError) -> Self { Self::ScenarioError(err.to_string()) }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}
