//! Delta subscriptions.
//!
//! A thin observer layer over the delta-returning core. Handlers register
//! for one predicate and are called synchronously, in delta order, once per
//! emitted delta of that predicate.
//!
//! ```text
//! dispatch(action) ──► processor ──► Vec<Delta> ──► Subscribers::notify
//!                                        │                 │
//!                                        ▼                 ▼
//!                                     caller        handler(&Delta)
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::facts::{Delta, Predicate};

/// Subscription handle returned by `subscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// The raw id.
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// A delta handler.
pub type Handler = Box<dyn FnMut(&Delta) + Send>;

struct Subscription {
    predicate: Predicate,
    handler: Handler,
}

/// Registered handlers, called in registration order.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
}

impl Subscribers {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Register a handler for one predicate.
    pub fn subscribe(&mut self, predicate: Predicate, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(id, Subscription { predicate, handler });
        tracing::trace!(id = id.get(), predicate = predicate.as_str(), "subscribed");
        id
    }

    /// Remove a handler. Returns `false` if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Deliver deltas to matching handlers.
    ///
    /// Deltas are delivered in order; for each delta every matching handler
    /// runs before the next delta is delivered.
    pub fn notify(&mut self, deltas: &[Delta]) {
        if self.subscriptions.is_empty() {
            return;
        }
        for delta in deltas {
            for subscription in self.subscriptions.values_mut() {
                if subscription.predicate == delta.predicate() {
                    (subscription.handler)(delta);
                }
            }
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize { self.subscriptions.len() }

    /// Check if there are no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.subscriptions.is_empty() }

    /// Drop every subscription and restart ids.
    pub fn clear(&mut self) { *self = Self::default(); }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("next_id", &self.next_id)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
