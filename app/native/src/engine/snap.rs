//! Snap resolution.
//!
//! Given a proposed rectangle and the positioned objects around it, find
//! for each axis the smallest correction that makes an edge flush with a
//! neighbour. Resolution is a pure function of its inputs.
//!
//! # Edge pairs
//!
//! For a monitor that contains the proposed rectangle, the inner edges are
//! offered (`start↔start`, `end↔end`) and the corrected rectangle must stay
//! inside the monitor.
//!
//! For every other candidate:
//!
//! - flush pairs (`moving.start↔candidate.end`, `moving.end↔candidate.start`)
//!   when the projections on the perpendicular axis overlap,
//! - corner-alignment pairs (`start↔start`, `end↔end`) when the rectangles
//!   are separated on the perpendicular axis by at most the snap distance,
//! - and the corrected rectangle must not overlap the candidate.
//!
//! # Tie-breaking
//!
//! Smallest absolute offset wins. Candidates are examined in ascending oid
//! and a later pair only replaces the current best when strictly closer.

use std::collections::BTreeSet;

use super::geometry::{Axis, Rect};
use super::state::Placed;
use super::store::Oid;

/// Correction found on one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisSnap {
    /// The candidate the edge was made flush with.
    pub anchor: Oid,
    /// Signed correction added to the proposed coordinate.
    pub offset: i64,
    /// Corrected coordinate on this axis.
    pub coordinate: i64,
}

/// Result of resolving one proposed rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnapResolution {
    pub x: Option<AxisSnap>,
    pub y: Option<AxisSnap>,
}

impl SnapResolution {
    /// Correction on the given axis.
    #[must_use]
    pub const fn axis(&self, axis: Axis) -> Option<AxisSnap> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Check if no axis was corrected.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.x.is_none() && self.y.is_none() }

    /// Candidates snapped against on any axis.
    #[must_use]
    pub fn snapped_with(&self) -> BTreeSet<Oid> {
        [self.x, self.y].into_iter().flatten().map(|snap| snap.anchor).collect()
    }

    /// Apply the corrections to a rectangle.
    #[must_use]
    pub fn apply(&self, rect: &Rect) -> Rect {
        let dx = self.x.map_or(0, |snap| snap.offset);
        let dy = self.y.map_or(0, |snap| snap.offset);
        rect.translated(dx, dy)
    }
}

/// Snap resolver for a fixed snap distance.
#[derive(Clone, Copy, Debug)]
pub struct SnapResolver {
    snap_distance: i64,
}

impl SnapResolver {
    #[must_use]
    pub const fn new(snap_distance: i64) -> Self { Self { snap_distance } }

    /// Check if a proposed rectangle overlaps a candidate.
    ///
    /// A rectangle that lies entirely inside a monitor does not overlap it.
    #[must_use]
    pub fn overlaps(proposed: &Rect, candidate: &Placed) -> bool {
        proposed.intersects(&candidate.rect)
            && !(candidate.is_monitor() && candidate.rect.contains(proposed))
    }

    /// Check if a proposed rectangle overlaps any candidate.
    #[must_use]
    pub fn overlaps_any(proposed: &Rect, candidates: &[Placed]) -> bool {
        candidates.iter().any(|candidate| Self::overlaps(proposed, candidate))
    }

    /// Resolve a proposed rectangle against its candidates.
    ///
    /// Candidates must be sorted by ascending oid. When the proposed
    /// rectangle overlaps any candidate, nothing is corrected.
    #[must_use]
    pub fn resolve(&self, proposed: &Rect, candidates: &[Placed]) -> SnapResolution {
        if Self::overlaps_any(proposed, candidates) {
            return SnapResolution::default();
        }
        SnapResolution {
            x: self.resolve_axis(proposed, candidates, Axis::X),
            y: self.resolve_axis(proposed, candidates, Axis::Y),
        }
    }

    fn resolve_axis(&self, proposed: &Rect, candidates: &[Placed], axis: Axis) -> Option<AxisSnap> {
        let mut best: Option<AxisSnap> = None;

        for candidate in candidates {
            for offset in self.pair_offsets(proposed, candidate, axis) {
                if best.is_some_and(|current| current.offset.abs() <= offset.abs()) {
                    continue;
                }
                best = Some(AxisSnap {
                    anchor: candidate.oid,
                    offset,
                    coordinate: proposed.span(axis).start + offset,
                });
            }
        }

        best
    }

    /// Offsets of every qualifying edge pair, in examination order.
    fn pair_offsets(&self, proposed: &Rect, candidate: &Placed, axis: Axis) -> Vec<i64> {
        let moving = proposed.span(axis);
        let anchor = candidate.rect.span(axis);

        if candidate.is_monitor() && candidate.rect.contains(proposed) {
            return [anchor.start - moving.start, anchor.end - moving.end]
                .into_iter()
                .filter(|offset| offset.abs() <= self.snap_distance)
                .filter(|&offset| candidate.rect.contains(&proposed.shifted(axis, offset)))
                .collect();
        }

        let perpendicular = axis.perpendicular();
        let perpendicular_gap = proposed.span(perpendicular).gap(candidate.rect.span(perpendicular));

        let mut offsets = Vec::with_capacity(2);
        if perpendicular_gap < 0 {
            offsets.extend([anchor.end - moving.start, anchor.start - moving.end]);
        }
        if (0..=self.snap_distance).contains(&perpendicular_gap) {
            offsets.extend([anchor.start - moving.start, anchor.end - moving.end]);
        }

        offsets.retain(|&offset| {
            offset.abs() <= self.snap_distance
                && !proposed.shifted(axis, offset).intersects(&candidate.rect)
        });
        offsets
    }
}
