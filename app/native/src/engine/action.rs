//! Action and object payloads as hosts send them.
//!
//! Every payload is a `{ "type": ..., "payload": { ... } }` record. Types may
//! carry the `Flamingo/` namespace or omit it. Unknown payload fields (such as
//! the per-action `oid` some hosts attach) are ignored.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::store::{Attributes, Oid, Sort};
use crate::error::EngineResult;

// ============================================================================
// Actions
// ============================================================================

/// A transaction request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    /// Place a registered window at the origin.
    #[serde(rename = "Flamingo/Open_Window", alias = "Open_Window")]
    OpenWindow { target: Oid },

    /// Translate a window (and its group) by a magnitude, then snap.
    #[serde(rename = "Flamingo/Move", alias = "Move")]
    Move {
        target: Oid,
        #[serde(alias = "delta_x")]
        magnitude_x: i64,
        #[serde(alias = "delta_y")]
        magnitude_y: i64,
    },

    /// Form a group from the target's touching closure, or disband its group.
    #[serde(rename = "Flamingo/Toggle_Grouping", alias = "Toggle_Grouping")]
    ToggleGrouping { target: Oid },

    /// Place a monitor. No snapping is applied.
    #[serde(rename = "Flamingo/Set_Monitor_Bounds", alias = "Set_Monitor_Bounds")]
    SetMonitorBounds { monitor: Oid, monitor_x: i64, monitor_y: i64 },

    /// Remove an open window from the screen. It stays registered.
    #[serde(rename = "Flamingo/Close_Window", alias = "Close_Window")]
    CloseWindow { target: Oid },
}

impl Action {
    #[must_use]
    pub const fn open(target: Oid) -> Self { Self::OpenWindow { target } }

    #[must_use]
    pub const fn move_by(target: Oid, magnitude_x: i64, magnitude_y: i64) -> Self {
        Self::Move { target, magnitude_x, magnitude_y }
    }

    #[must_use]
    pub const fn toggle_grouping(target: Oid) -> Self { Self::ToggleGrouping { target } }

    #[must_use]
    pub const fn set_monitor_bounds(monitor: Oid, x: i64, y: i64) -> Self {
        Self::SetMonitorBounds { monitor, monitor_x: x, monitor_y: y }
    }

    #[must_use]
    pub const fn close(target: Oid) -> Self { Self::CloseWindow { target } }

    /// Short action name, without namespace.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenWindow { .. } => "Open_Window",
            Self::Move { .. } => "Move",
            Self::ToggleGrouping { .. } => "Toggle_Grouping",
            Self::SetMonitorBounds { .. } => "Set_Monitor_Bounds",
            Self::CloseWindow { .. } => "Close_Window",
        }
    }

    /// The object this action is about.
    #[must_use]
    pub const fn target(&self) -> Oid {
        match *self {
            Self::OpenWindow { target }
            | Self::Move { target, .. }
            | Self::ToggleGrouping { target }
            | Self::CloseWindow { target } => target,
            Self::SetMonitorBounds { monitor, .. } => monitor,
        }
    }

    /// Parse an action from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FlamingoError::InvalidAction`] for unknown
    /// types and malformed payloads.
    pub fn from_value(value: serde_json::Value) -> EngineResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse an action from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FlamingoError::InvalidAction`] for unknown
    /// types and malformed payloads.
    pub fn from_json(json: &str) -> EngineResult<Self> { Ok(serde_json::from_str(json)?) }
}

// ============================================================================
// Object registration
// ============================================================================

/// An object registration request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "payload")]
pub enum NewObject {
    #[serde(rename = "Flamingo/Windows", alias = "Windows")]
    Window(Attributes),
    #[serde(rename = "Flamingo/Monitors", alias = "Monitors")]
    Monitor(Attributes),
}

impl NewObject {
    #[must_use]
    pub const fn sort(&self) -> Sort {
        match self {
            Self::Window(_) => Sort::Window,
            Self::Monitor(_) => Sort::Monitor,
        }
    }

    #[must_use]
    pub const fn attributes(&self) -> Attributes {
        match *self {
            Self::Window(attributes) | Self::Monitor(attributes) => attributes,
        }
    }
}
