//! Incremental fact engine for window arrangement.
//!
//! The engine keeps a small object model (windows and monitors), accepts
//! discrete actions, and reports for each action exactly which derived facts
//! became true or false.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ Flamingo                                                  │
//! │   add() ──► ObjectStore                                   │
//! │   dispatch(Action)                                        │
//! │      │                                                    │
//! │      ▼                                                    │
//! │   processor ──► SnapResolver / Connectivity / GroupTable  │
//! │      │                                                    │
//! │      ▼ snapshot, mutate WorldState, snapshot, diff        │
//! │   Vec<Delta> ──► Subscribers                              │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use flamingo_lib::engine::{Action, Flamingo, Sort};
//!
//! let mut engine = Flamingo::new();
//! let big = engine.add(Sort::Window, 300, 300);
//! let small = engine.add(Sort::Window, 100, 100);
//! engine.dispatch(Action::open(big)).unwrap();
//! engine.dispatch(Action::open(small)).unwrap();
//!
//! // Dropped 10px right of `big`: pulled flush against its edge.
//! engine.dispatch(Action::move_by(small, 310, 100)).unwrap();
//! assert_eq!(engine.position(small).map(|p| (p.x, p.y)), Some((300, 100)));
//! ```

pub mod action;
pub mod facts;
pub mod geometry;
pub mod grouping;
pub mod handle;
pub mod processor;
pub mod snap;
pub mod state;
pub mod store;
pub mod subscriber;

use std::collections::BTreeSet;

pub use action::{Action, NewObject};
pub use facts::{Delta, Fact, FactSet, GroupIcon, Predicate, Sign};
pub use geometry::{Axis, Point, Rect};
pub use handle::SharedFlamingo;
pub use state::WorldState;
pub use store::{Attributes, Object, Oid, Sort};
pub use subscriber::SubscriptionId;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use grouping::Connectivity;
use subscriber::Subscribers;

/// One engine instance.
#[derive(Debug, Default)]
pub struct Flamingo {
    config: EngineConfig,
    state: WorldState,
    subscribers: Subscribers,
}

impl Flamingo {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Create an engine with the given configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig { &self.config }

    // ========================================================================
    // Registration & dispatch
    // ========================================================================

    /// Register an object and return its oid. Emits no facts.
    pub fn add(&mut self, sort: Sort, width: i64, height: i64) -> Oid {
        self.state.store.register(sort, width, height)
    }

    /// Register an object from its host payload.
    pub fn add_object(&mut self, object: NewObject) -> Oid {
        let attributes = object.attributes();
        self.add(object.sort(), attributes.width, attributes.height)
    }

    /// Apply an action and return its deltas in order.
    ///
    /// Subscribers are notified before this returns.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the action; the state is unchanged
    /// and no subscriber is called.
    pub fn dispatch(&mut self, action: Action) -> EngineResult<Vec<Delta>> {
        let deltas = processor::apply(&mut self.state, &self.config, &action)?;
        self.subscribers.notify(&deltas);
        Ok(deltas)
    }

    /// Parse and apply an action given as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FlamingoError::InvalidAction`] for a malformed
    /// payload, otherwise the same errors as [`Self::dispatch`].
    pub fn dispatch_json(&mut self, value: serde_json::Value) -> EngineResult<Vec<Delta>> {
        self.dispatch(Action::from_value(value)?)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Call `handler` for every future delta of `predicate`.
    pub fn subscribe(
        &mut self,
        predicate: Predicate,
        handler: impl FnMut(&Delta) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(predicate, Box::new(handler))
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool { self.subscribers.unsubscribe(id) }

    /// Discard every object, position, group, snap result and subscription.
    ///
    /// The next registered object gets oid 0 again. The configuration is
    /// kept.
    pub fn stop(&mut self) {
        tracing::debug!(objects = self.state.store.len(), "stopping engine");
        self.state = WorldState::new();
        self.subscribers.clear();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Look up a registered object.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FlamingoError::UnknownObject`] for unknown oids.
    pub fn object(&self, oid: Oid) -> EngineResult<&Object> { self.state.store.get(oid) }

    /// Every registered object in ascending oid order.
    pub fn objects(&self) -> impl Iterator<Item = &Object> { self.state.store.iter() }

    /// Current position of an object, if it has one.
    #[must_use]
    pub fn position(&self, oid: Oid) -> Option<Point> { self.state.position(oid) }

    /// Current rectangle of an object, if it has a position.
    #[must_use]
    pub fn rect(&self, oid: Oid) -> Option<Rect> { self.state.rect(oid) }

    /// Members of the group containing `oid`.
    #[must_use]
    pub fn group_members(&self, oid: Oid) -> Option<&BTreeSet<Oid>> {
        self.state.groups.members_of(oid)
    }

    /// Windows currently touching `oid`.
    #[must_use]
    pub fn touching_set(&self, oid: Oid) -> BTreeSet<Oid> { self.connectivity().touching_set(oid) }

    /// Grouping button status of a window.
    #[must_use]
    pub fn group_icon(&self, oid: Oid) -> GroupIcon {
        if self.state.placed(oid).is_some_and(|placed| placed.is_window()) {
            self.connectivity().group_icon_for(oid)
        } else {
            GroupIcon::NoIcon
        }
    }

    /// Every fact that is currently true.
    #[must_use]
    pub fn facts(&self) -> FactSet { processor::all_facts(&self.state, self.config.snap_distance) }

    /// Read-only view of the underlying world state.
    #[must_use]
    pub const fn state(&self) -> &WorldState { &self.state }

    fn connectivity(&self) -> Connectivity<'_> {
        Connectivity::new(&self.state, self.config.snap_distance)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::error::FlamingoError;

    #[test]
    fn test_add_object_from_payload() {
        let mut engine = Flamingo::new();
        let object: NewObject = serde_json::from_value(json!({
            "type": "Flamingo/Monitors",
            "payload": { "width": 1920, "height": 1080 }
        }))
        .unwrap();

        let oid = engine.add_object(object);
        assert_eq!(engine.object(oid).unwrap().sort, Sort::Monitor);
    }

    #[test]
    fn test_dispatch_json() {
        let mut engine = Flamingo::new();
        let oid = engine.add(Sort::Window, 50, 50);

        let deltas = engine
            .dispatch_json(json!({ "type": "Flamingo/Open_Window", "payload": { "target": oid } }))
            .unwrap();
        assert_eq!(deltas.len(), 2);

        let err = engine.dispatch_json(json!({ "type": "Flamingo/Open_Window" })).unwrap_err();
        assert!(matches!(err, FlamingoError::InvalidAction(_)));
    }

    #[test]
    fn test_subscribers_see_dispatched_deltas() {
        let mut engine = Flamingo::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.subscribe(Predicate::FinalCoordinate, move |delta| sink.lock().push(*delta));

        let oid = engine.add(Sort::Window, 10, 10);
        let deltas = engine.dispatch(Action::open(oid)).unwrap();

        assert_eq!(*seen.lock(), deltas);
    }

    #[test]
    fn test_failed_dispatch_notifies_nobody() {
        let mut engine = Flamingo::new();
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        engine.subscribe(Predicate::FinalCoordinate, move |_| *counter.lock() += 1);

        assert!(engine.dispatch(Action::open(99)).is_err());
        assert_eq!(*calls.lock(), 0);
    }

    #[test]
    fn test_stop_resets_everything() {
        let mut engine = Flamingo::with_config(EngineConfig { snap_distance: 5, ..Default::default() });
        let oid = engine.add(Sort::Window, 10, 10);
        engine.dispatch(Action::open(oid)).unwrap();
        engine.subscribe(Predicate::Snapped, |_| {});

        engine.stop();

        assert!(engine.facts().is_empty());
        assert_eq!(engine.objects().count(), 0);
        assert_eq!(engine.add(Sort::Window, 10, 10), 0);
        assert_eq!(engine.config().snap_distance, 5);
    }

    #[test]
    fn test_monitor_never_shows_icon() {
        let mut engine = Flamingo::new();
        let window = engine.add(Sort::Window, 100, 100);
        let monitor = engine.add(Sort::Monitor, 800, 600);
        engine.dispatch(Action::open(window)).unwrap();
        engine.dispatch(Action::set_monitor_bounds(monitor, 100, 0)).unwrap();

        assert_eq!(engine.group_icon(monitor), GroupIcon::NoIcon);
        assert_eq!(engine.group_icon(window), GroupIcon::NoIcon);
    }
}
