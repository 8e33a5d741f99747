//! Connectivity and grouping.
//!
//! Two positioned windows touch when they do not overlap, the gap between
//! them on one axis is within the snap distance, and their projections on
//! the other axis overlap. Monitors are anchors: they never touch anything
//! and never join a group.
//!
//! Groups are formed from the transitive closure of the touching relation at
//! the time of grouping and are sticky afterwards. Moving a group never grows
//! or shrinks it.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::facts::GroupIcon;
use super::geometry::{Axis, Rect};
use super::state::WorldState;
use super::store::Oid;
use crate::error::{EngineResult, FlamingoError};

/// Group identifier. Internal only; hosts address groups through members.
pub type GroupId = u64;

/// Check if two window rectangles touch.
#[must_use]
pub fn touches(a: &Rect, b: &Rect, snap_distance: i64) -> bool {
    if a.intersects(b) {
        return false;
    }
    Axis::ALL.into_iter().any(|axis| {
        let gap = a.span(axis).gap(b.span(axis));
        let perpendicular = axis.perpendicular();
        (0..=snap_distance).contains(&gap)
            && a.span(perpendicular).overlap(b.span(perpendicular)) > 0
    })
}

// ============================================================================
// Group table
// ============================================================================

/// Group membership. An object belongs to at most one group.
#[derive(Debug, Default)]
pub struct GroupTable {
    next_id: GroupId,
    groups: BTreeMap<GroupId, BTreeSet<Oid>>,
    membership: BTreeMap<Oid, GroupId>,
}

impl GroupTable {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Install a new group.
    ///
    /// # Errors
    ///
    /// Returns [`FlamingoError::AlreadyGrouped`] naming the first member that
    /// already belongs to a group. Nothing is installed in that case.
    pub fn install(&mut self, members: BTreeSet<Oid>) -> EngineResult<GroupId> {
        if let Some(&grouped) = members.iter().find(|oid| self.membership.contains_key(oid)) {
            return Err(FlamingoError::AlreadyGrouped(grouped));
        }

        let id = self.next_id;
        self.next_id += 1;
        for &oid in &members {
            self.membership.insert(oid, id);
        }
        tracing::trace!(group = id, size = members.len(), "installed group");
        self.groups.insert(id, members);
        Ok(id)
    }

    /// Disband the group containing `oid` and return its former members.
    ///
    /// # Errors
    ///
    /// Returns [`FlamingoError::NotGrouped`] if `oid` is not in a group.
    pub fn disband(&mut self, oid: Oid) -> EngineResult<BTreeSet<Oid>> {
        let id = self.membership.get(&oid).copied().ok_or(FlamingoError::NotGrouped(oid))?;
        let members = self.groups.remove(&id).unwrap_or_default();
        for member in &members {
            self.membership.remove(member);
        }
        tracing::trace!(group = id, size = members.len(), "disbanded group");
        Ok(members)
    }

    /// Members of the group containing `oid`.
    #[must_use]
    pub fn members_of(&self, oid: Oid) -> Option<&BTreeSet<Oid>> {
        self.membership.get(&oid).and_then(|id| self.groups.get(id))
    }

    /// Check if `oid` belongs to a group.
    #[must_use]
    pub fn is_grouped(&self, oid: Oid) -> bool { self.membership.contains_key(&oid) }

    /// Remove a single member. A group left empty is dropped.
    pub fn remove_member(&mut self, oid: Oid) {
        let Some(id) = self.membership.remove(&oid) else {
            return;
        };
        if let Some(members) = self.groups.get_mut(&id) {
            members.remove(&oid);
            if members.is_empty() {
                self.groups.remove(&id);
            }
        }
    }

    /// Number of live groups.
    #[must_use]
    pub fn len(&self) -> usize { self.groups.len() }

    /// Check if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.groups.is_empty() }
}

// ============================================================================
// Connectivity queries
// ============================================================================

/// Read-only adjacency queries over a world state.
#[derive(Clone, Copy)]
pub struct Connectivity<'a> {
    state: &'a WorldState,
    snap_distance: i64,
}

impl<'a> Connectivity<'a> {
    #[must_use]
    pub const fn new(state: &'a WorldState, snap_distance: i64) -> Self {
        Self { state, snap_distance }
    }

    /// Positioned windows touching `oid`. Empty for monitors and for objects
    /// without a position.
    #[must_use]
    pub fn touching_set(&self, oid: Oid) -> BTreeSet<Oid> {
        match self.state.placed(oid) {
            Some(placed) if placed.is_window() => {
                self.windows_touching(&placed.rect, &BTreeSet::from([oid]))
            }
            _ => BTreeSet::new(),
        }
    }

    /// Positioned windows touching an arbitrary rectangle, skipping `exclude`.
    #[must_use]
    pub fn windows_touching(&self, rect: &Rect, exclude: &BTreeSet<Oid>) -> BTreeSet<Oid> {
        self.state
            .placed_windows()
            .filter(|other| !exclude.contains(&other.oid))
            .filter(|other| touches(rect, &other.rect, self.snap_distance))
            .map(|other| other.oid)
            .collect()
    }

    /// Grouping button status for a window.
    #[must_use]
    pub fn group_icon_for(&self, oid: Oid) -> GroupIcon {
        if self.state.groups.is_grouped(oid) {
            GroupIcon::Disband
        } else if self.touching_set(oid).is_empty() {
            GroupIcon::NoIcon
        } else {
            GroupIcon::Form
        }
    }

    /// Breadth-first closure of the touching relation starting at `target`.
    ///
    /// Windows that already belong to a group are neither included nor
    /// traversed.
    #[must_use]
    pub fn closure(&self, target: Oid) -> BTreeSet<Oid> {
        let mut members = BTreeSet::from([target]);
        let mut queue = VecDeque::from([target]);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.touching_set(current) {
                if self.state.groups.is_grouped(neighbor) || !members.insert(neighbor) {
                    continue;
                }
                queue.push_back(neighbor);
            }
        }

        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::Point;
    use crate::engine::store::Sort;

    const SNAP: i64 = 20;

    fn world(windows: &[(i64, i64, i64, i64)]) -> WorldState {
        let mut state = WorldState::new();
        for &(x, y, width, height) in windows {
            let oid = state.store.register(Sort::Window, width, height);
            state.set_position(oid, Point::new(x, y));
        }
        state
    }

    #[test]
    fn test_touches_requires_perpendicular_overlap() {
        let a = Rect::new(0, 0, 100, 100);
        assert!(touches(&a, &Rect::new(100, 50, 100, 100), SNAP));
        assert!(touches(&a, &Rect::new(119, 0, 10, 10), SNAP));
        assert!(!touches(&a, &Rect::new(121, 0, 10, 10), SNAP));
        // Diagonal neighbours only share a corner.
        assert!(!touches(&a, &Rect::new(100, 100, 10, 10), SNAP));
        // Overlapping windows never touch.
        assert!(!touches(&a, &Rect::new(50, 50, 100, 100), SNAP));
    }

    #[test]
    fn test_touching_set_ignores_monitors() {
        let mut state = world(&[(0, 0, 100, 100)]);
        let monitor = state.store.register(Sort::Monitor, 800, 600);
        state.set_position(monitor, Point::new(100, 0));

        let connectivity = Connectivity::new(&state, SNAP);
        assert!(connectivity.touching_set(0).is_empty());
        assert!(connectivity.touching_set(monitor).is_empty());
    }

    #[test]
    fn test_closure_is_transitive() {
        // 0 | 1 | 2 in a row, 3 far away.
        let state = world(&[
            (0, 0, 100, 100),
            (100, 0, 100, 100),
            (200, 0, 100, 100),
            (900, 900, 10, 10),
        ]);

        let connectivity = Connectivity::new(&state, SNAP);
        assert_eq!(connectivity.closure(0), BTreeSet::from([0, 1, 2]));
        assert_eq!(connectivity.closure(3), BTreeSet::from([3]));
    }

    #[test]
    fn test_closure_skips_grouped_windows() {
        let mut state = world(&[(0, 0, 100, 100), (100, 0, 100, 100), (200, 0, 100, 100)]);
        state.groups.install(BTreeSet::from([1])).unwrap();

        let connectivity = Connectivity::new(&state, SNAP);
        assert_eq!(connectivity.closure(0), BTreeSet::from([0]));
    }

    #[test]
    fn test_group_icon_for() {
        let mut state = world(&[(0, 0, 100, 100), (105, 0, 100, 100), (500, 500, 10, 10)]);
        {
            let connectivity = Connectivity::new(&state, SNAP);
            assert_eq!(connectivity.group_icon_for(0), GroupIcon::Form);
            assert_eq!(connectivity.group_icon_for(2), GroupIcon::NoIcon);
        }

        state.groups.install(BTreeSet::from([0, 1])).unwrap();
        let connectivity = Connectivity::new(&state, SNAP);
        assert_eq!(connectivity.group_icon_for(1), GroupIcon::Disband);
    }

    #[test]
    fn test_group_table_lifecycle() {
        let mut table = GroupTable::new();
        table.install(BTreeSet::from([1, 2])).unwrap();

        assert_eq!(table.install(BTreeSet::from([2, 3])), Err(FlamingoError::AlreadyGrouped(2)));
        assert!(!table.is_grouped(3));
        assert_eq!(table.members_of(1), Some(&BTreeSet::from([1, 2])));

        assert_eq!(table.disband(2).unwrap(), BTreeSet::from([1, 2]));
        assert_eq!(table.disband(2), Err(FlamingoError::NotGrouped(2)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_remove_member_drops_empty_groups() {
        let mut table = GroupTable::new();
        table.install(BTreeSet::from([4, 5])).unwrap();

        table.remove_member(4);
        assert_eq!(table.members_of(5), Some(&BTreeSet::from([5])));
        assert_eq!(table.len(), 1);

        table.remove_member(5);
        assert!(table.is_empty());
    }
}
