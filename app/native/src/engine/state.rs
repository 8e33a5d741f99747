//! Mutable world state: positions, groups and snap results.
//!
//! Facts are never stored here. The processor derives them from this state
//! on demand, before and after each mutation.

use std::collections::{BTreeMap, BTreeSet};

use super::geometry::{Point, Rect};
use super::grouping::GroupTable;
use super::store::{ObjectStore, Oid, Sort};
use crate::error::{EngineResult, FlamingoError};

/// A positioned object: what the snap resolver and the touching relation
/// look at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placed {
    pub oid: Oid,
    pub sort: Sort,
    pub rect: Rect,
}

impl Placed {
    /// Check if this object is a window.
    #[must_use]
    pub fn is_window(&self) -> bool { self.sort == Sort::Window }

    /// Check if this object is a monitor.
    #[must_use]
    pub fn is_monitor(&self) -> bool { self.sort == Sort::Monitor }
}

/// Everything a transaction can read or change.
#[derive(Debug, Default)]
pub struct WorldState {
    pub store: ObjectStore,
    pub groups: GroupTable,
    positions: BTreeMap<Oid, Point>,
    /// mover -> anchors of its latest move.
    snapped: BTreeMap<Oid, BTreeSet<Oid>>,
}

impl WorldState {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Current position, if the object has been opened or placed.
    #[must_use]
    pub fn position(&self, oid: Oid) -> Option<Point> { self.positions.get(&oid).copied() }

    /// Check if the object has a position.
    #[must_use]
    pub fn is_positioned(&self, oid: Oid) -> bool { self.positions.contains_key(&oid) }

    /// Current rectangle, if positioned.
    #[must_use]
    pub fn rect(&self, oid: Oid) -> Option<Rect> {
        let origin = self.position(oid)?;
        let object = self.store.get(oid).ok()?;
        Some(Rect::at(origin, object.attributes.width, object.attributes.height))
    }

    /// Current rectangle of an object that must be positioned.
    ///
    /// # Errors
    ///
    /// Returns [`FlamingoError::UnknownObject`] for unregistered oids and
    /// [`FlamingoError::NotOpen`] for objects without a position.
    pub fn require_rect(&self, oid: Oid) -> EngineResult<Rect> {
        self.store.get(oid)?;
        self.rect(oid).ok_or(FlamingoError::NotOpen(oid))
    }

    /// The positioned view of one object.
    #[must_use]
    pub fn placed(&self, oid: Oid) -> Option<Placed> {
        let object = self.store.get(oid).ok()?;
        let rect = self.rect(oid)?;
        Some(Placed { oid, sort: object.sort, rect })
    }

    /// Every positioned object in ascending oid order.
    pub fn placed_objects(&self) -> impl Iterator<Item = Placed> + '_ {
        self.positions.keys().filter_map(|&oid| self.placed(oid))
    }

    /// Every positioned window in ascending oid order.
    pub fn placed_windows(&self) -> impl Iterator<Item = Placed> + '_ {
        self.placed_objects().filter(Placed::is_window)
    }

    pub fn set_position(&mut self, oid: Oid, position: Point) {
        self.positions.insert(oid, position);
    }

    pub fn clear_position(&mut self, oid: Oid) { self.positions.remove(&oid); }

    // ========================================================================
    // Snap results
    // ========================================================================

    /// Anchors the object snapped against in its latest move.
    #[must_use]
    pub fn anchors_of(&self, mover: Oid) -> Option<&BTreeSet<Oid>> { self.snapped.get(&mover) }

    /// Objects whose latest move ended flush against `anchor`.
    #[must_use]
    pub fn snappers_of(&self, anchor: Oid) -> BTreeSet<Oid> {
        self.snapped
            .iter()
            .filter(|(_, anchors)| anchors.contains(&anchor))
            .map(|(&mover, _)| mover)
            .collect()
    }

    /// Replace the snap result of a mover.
    pub fn set_snapped(&mut self, mover: Oid, anchors: BTreeSet<Oid>) {
        if anchors.is_empty() {
            self.snapped.remove(&mover);
        } else {
            self.snapped.insert(mover, anchors);
        }
    }

    /// Drop every snap result that mentions `oid`, as mover or as anchor.
    pub fn forget_snaps(&mut self, oid: Oid) {
        self.snapped.remove(&oid);
        self.snapped.retain(|_, anchors| {
            anchors.remove(&oid);
            !anchors.is_empty()
        });
    }
}
