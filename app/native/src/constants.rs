//! Internal constants for the fact engine.
//!
//! # Organization
//!
//! - `snapping` - Snap and adjacency thresholds
//! - `geometry` - Coordinate range
//! - `protocol` - Names shared with hosts (action namespace, predicate names)
//! - `config` - Configuration file locations

/// Snapping constants.
pub mod snapping {
    /// Default snap distance in pixels.
    ///
    /// Two edges closer than this (inclusive) are pulled flush, and two
    /// windows separated by at most this gap count as touching.
    pub const DEFAULT_SNAP_DISTANCE: i64 = 20;
}

/// Geometry constants.
pub mod geometry {
    /// Largest magnitude any rectangle edge may have.
    ///
    /// Keeps every span length, gap and snap offset well inside `i64`.
    pub const MAX_COORDINATE: i64 = 1 << 48;
}

/// Names that hosts see on the wire.
pub mod protocol {
    /// Namespace prefix hosts put in front of action and object types.
    pub const NAMESPACE: &str = "Flamingo/";

    /// Predicate name for window and monitor coordinates.
    pub const FINAL_COORDINATE: &str = "final_coordinate";

    /// Predicate name for snap results.
    pub const SNAPPED: &str = "snapped";

    /// Predicate name for the grouping button state.
    pub const GROUP_ICON: &str = "group_icon";
}

/// Configuration file constants.
pub mod config {
    /// Application directory name under the user's config directory.
    pub const APP_DIR: &str = "flamingo";

    /// Configuration file names to search for (in priority order).
    pub const FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

    /// Environment variable holding the log filter for the CLI.
    pub const LOG_ENV: &str = "FLAMINGO_LOG";
}
