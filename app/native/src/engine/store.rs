//! Object store: every registered window and monitor with its static size.
//!
//! The store owns the oid counter, so several engines can live side by side
//! without handing out colliding ids.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{EngineResult, FlamingoError};

/// Object identifier.
pub type Oid = u64;

/// The kind of a registered object.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Sort {
    /// A movable window.
    #[serde(rename = "Windows", alias = "Window")]
    Window,
    /// A monitor; an anchor that windows snap against but that never moves
    /// with them.
    #[serde(rename = "Monitors", alias = "Monitor")]
    Monitor,
}

impl Sort {
    /// Returns the sort name as hosts spell it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Window => "Windows",
            Self::Monitor => "Monitors",
        }
    }
}

/// Immutable size attributes of an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Attributes {
    pub width: i64,
    pub height: i64,
}

/// A registered object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Object {
    pub oid: Oid,
    pub sort: Sort,
    pub attributes: Attributes,
}

impl Object {
    /// Check if this object is a window.
    #[must_use]
    pub fn is_window(&self) -> bool { self.sort == Sort::Window }
}

/// Registry of all objects known to one engine instance.
#[derive(Debug, Default)]
pub struct ObjectStore {
    next_oid: Oid,
    objects: BTreeMap<Oid, Object>,
}

impl ObjectStore {
    /// Create an empty store whose first oid is 0.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Register a new object and return its oid.
    pub fn register(&mut self, sort: Sort, width: i64, height: i64) -> Oid {
        let oid = self.next_oid;
        self.next_oid += 1;
        self.objects.insert(oid, Object {
            oid,
            sort,
            attributes: Attributes { width, height },
        });
        tracing::trace!(oid, sort = sort.as_str(), width, height, "registered object");
        oid
    }

    /// Look up an object.
    ///
    /// # Errors
    ///
    /// Returns [`FlamingoError::UnknownObject`] if the oid was never registered.
    pub fn get(&self, oid: Oid) -> EngineResult<&Object> {
        self.objects.get(&oid).ok_or(FlamingoError::UnknownObject(oid))
    }

    /// Look up an object's size.
    ///
    /// # Errors
    ///
    /// Returns [`FlamingoError::UnknownObject`] if the oid was never registered.
    pub fn attributes(&self, oid: Oid) -> EngineResult<Attributes> {
        self.get(oid).map(|object| object.attributes)
    }

    /// Look up an object's sort.
    ///
    /// # Errors
    ///
    /// Returns [`FlamingoError::UnknownObject`] if the oid was never registered.
    pub fn sort(&self, oid: Oid) -> EngineResult<Sort> { self.get(oid).map(|object| object.sort) }

    /// Number of registered objects.
    #[must_use]
    pub fn len(&self) -> usize { self.objects.len() }

    /// Check if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.objects.is_empty() }

    /// Iterate over all objects in ascending oid order.
    pub fn iter(&self) -> impl Iterator<Item = &Object> { self.objects.values() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_sequential_oids() {
        let mut store = ObjectStore::new();
        assert!(store.is_empty());

        let a = store.register(Sort::Window, 100, 100);
        let b = store.register(Sort::Monitor, 800, 600);

        assert_eq!((a, b), (0, 1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.sort(b).unwrap(), Sort::Monitor);
    }

    #[test]
    fn test_attributes_of_registered_object() {
        let mut store = ObjectStore::new();
        let oid = store.register(Sort::Window, 300, 200);

        let attrs = store.attributes(oid).unwrap();
        assert_eq!(attrs, Attributes { width: 300, height: 200 });
    }

    #[test]
    fn test_unknown_object() {
        let store = ObjectStore::new();
        assert_eq!(store.attributes(9), Err(FlamingoError::UnknownObject(9)));
    }

    #[test]
    fn test_separate_stores_do_not_share_counters() {
        let mut first = ObjectStore::new();
        let mut second = ObjectStore::new();

        first.register(Sort::Window, 1, 1);
        first.register(Sort::Window, 1, 1);

        assert_eq!(second.register(Sort::Window, 1, 1), 0);
    }

    #[test]
    fn test_sort_serializes_with_host_names() {
        assert_eq!(serde_json::to_string(&Sort::Window).unwrap(), "\"Windows\"");
        let sort: Sort = serde_json::from_str("\"Monitor\"").unwrap();
        assert_eq!(sort, Sort::Monitor);
    }
}
