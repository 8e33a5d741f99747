//! Shared handle to an engine.
//!
//! `SharedFlamingo` is cheap to clone and can be shared across threads. The
//! lock is held for exactly one call, so every `dispatch` is atomic with
//! respect to other callers. Subscription handlers run under the lock and
//! must not call back into the handle.

use std::sync::Arc;

use parking_lot::Mutex;

use super::Flamingo;
use super::action::{Action, NewObject};
use super::facts::{Delta, FactSet, Predicate};
use super::geometry::Point;
use super::store::{Oid, Sort};
use super::subscriber::SubscriptionId;
use crate::config::EngineConfig;
use crate::error::EngineResult;

/// Thread-safe, cloneable handle to one engine instance.
#[derive(Clone, Debug, Default)]
pub struct SharedFlamingo {
    inner: Arc<Mutex<Flamingo>>,
}

impl SharedFlamingo {
    #[must_use]
    pub fn new(engine: Flamingo) -> Self { Self { inner: Arc::new(Mutex::new(engine)) } }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self { Self::new(Flamingo::with_config(config)) }

    /// See [`Flamingo::add`].
    pub fn add(&self, sort: Sort, width: i64, height: i64) -> Oid {
        self.inner.lock().add(sort, width, height)
    }

    /// See [`Flamingo::add_object`].
    pub fn add_object(&self, object: NewObject) -> Oid { self.inner.lock().add_object(object) }

    /// See [`Flamingo::dispatch`].
    ///
    /// # Errors
    ///
    /// Returns the engine error of the action; the state is unchanged.
    pub fn dispatch(&self, action: Action) -> EngineResult<Vec<Delta>> {
        self.inner.lock().dispatch(action)
    }

    /// See [`Flamingo::subscribe`].
    pub fn subscribe(
        &self,
        predicate: Predicate,
        handler: impl FnMut(&Delta) + Send + 'static,
    ) -> SubscriptionId {
        self.inner.lock().subscribe(predicate, handler)
    }

    /// See [`Flamingo::unsubscribe`].
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool { self.inner.lock().unsubscribe(id) }

    /// See [`Flamingo::stop`].
    pub fn stop(&self) { self.inner.lock().stop(); }

    /// See [`Flamingo::position`].
    #[must_use]
    pub fn position(&self, oid: Oid) -> Option<Point> { self.inner.lock().position(oid) }

    /// See [`Flamingo::facts`].
    #[must_use]
    pub fn facts(&self) -> FactSet { self.inner.lock().facts() }

    /// Run a closure with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut Flamingo) -> R) -> R { f(&mut self.inner.lock()) }
}
