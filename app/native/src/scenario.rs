//! Scenario files: scripted sequences of registrations and actions.
//!
//! A scenario is a JSONC document:
//!
//! ```jsonc
//! {
//!   // Optional engine configuration, same shape as the config file.
//!   "config": { "snapDistance": 20 },
//!   "steps": [
//!     { "type": "Flamingo/Windows", "payload": { "width": 300, "height": 300 } },
//!     { "type": "Flamingo/Open_Window", "payload": { "target": 0 } }
//!   ]
//! }
//! ```
//!
//! Steps run in order. A failing action is reported and the replay goes on,
//! since a failed action never changes the engine.

use std::fs;
use std::io::Read;
use std::path::Path;

use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::constants::protocol::NAMESPACE;
use crate::engine::{Action, Delta, Flamingo, NewObject, Oid};
use crate::error::FlamingoError;

/// Errors raised while reading a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One scenario step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Step {
    /// Register a window or monitor.
    Add(NewObject),
    /// Dispatch an action.
    Dispatch(Action),
}

impl Step {
    /// Short label for reports.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Add(object) => format!("Add {}", object.sort().as_str()),
            Self::Dispatch(action) => format!("{} {}", action.name(), action.target()),
        }
    }
}

/// Dispatches on the `type` field so that a malformed action reports its own
/// error instead of a generic "no variant matched".
impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| D::Error::missing_field("type"))?;
        let is_object =
            matches!(kind.strip_prefix(NAMESPACE).unwrap_or(kind), "Windows" | "Monitors");

        let step = if is_object {
            serde_json::from_value(value).map(Self::Add)
        } else {
            serde_json::from_value(value).map(Self::Dispatch)
        };
        step.map_err(D::Error::custom)
    }
}

/// A scripted session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Scenario {
    /// Engine configuration for this run. Replaces the config file when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,

    /// Steps, in execution order.
    pub steps: Vec<Step>,
}

/// What a single step produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    Added { oid: Oid },
    Applied { deltas: Vec<Delta> },
    Failed { error: FlamingoError },
}

/// A step together with its outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Scenario {
    /// Parse a scenario from a JSONC reader.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::Parse` for invalid JSON or unknown step types.
    pub fn from_reader(reader: impl Read) -> Result<Self, ScenarioError> {
        let reader = json_comments::StripComments::new(reader);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read a scenario file.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::Io` if the file cannot be read and
    /// `ScenarioError::Parse` if its content is invalid.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_reader(fs::File::open(path)?)
    }

    /// Run every step against an engine.
    pub fn run(&self, engine: &mut Flamingo) -> Vec<StepReport> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let outcome = match *step {
                    Step::Add(object) => Outcome::Added { oid: engine.add_object(object) },
                    Step::Dispatch(action) => match engine.dispatch(action) {
                        Ok(deltas) => Outcome::Applied { deltas },
                        Err(error) => {
                            tracing::warn!(index, step = %step.label(), error = %error, "step failed");
                            Outcome::Failed { error }
                        }
                    },
                };
                StepReport { index, step: *step, outcome }
            })
            .collect()
    }
}
