//! Integer geometry used by the snap resolver and the touching relation.
//!
//! Screen coordinates: x grows to the right, y grows downward. An object at
//! `(x, y)` with size `width × height` covers `[x, x + width) × [y, y + height)`.

use serde::{Deserialize, Serialize};

use crate::constants::geometry::MAX_COORDINATE;

// ============================================================================
// Axis
// ============================================================================

/// One of the two screen axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes, X first.
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    /// Returns the other axis.
    #[must_use]
    pub const fn perpendicular(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Returns the axis name as it appears in facts (`"X"` / `"Y"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
        }
    }
}

// ============================================================================
// Span
// ============================================================================

/// A half-open interval `[start, end)` on one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    /// Length of the overlap between two spans; zero or negative when they
    /// do not overlap.
    #[must_use]
    pub fn overlap(self, other: Self) -> i64 { self.end.min(other.end) - self.start.max(other.start) }

    /// Distance between two spans; negative when they overlap.
    #[must_use]
    pub fn gap(self, other: Self) -> i64 { -self.overlap(other) }

    /// Check if `other` lies entirely inside this span.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

// ============================================================================
// Point & Rect
// ============================================================================

/// A position on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self { Self { x, y } }

    /// The origin, where freshly opened windows land.
    #[must_use]
    pub const fn origin() -> Self { Self::new(0, 0) }

    /// Coordinate on the given axis.
    #[must_use]
    pub const fn get(self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Translate by a per-axis offset.
    #[must_use]
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// An axis-aligned rectangle with integer position and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle of the given size at a point.
    #[must_use]
    pub const fn at(origin: Point, width: i64, height: i64) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point { Point::new(self.x, self.y) }

    /// Projection of the rectangle on one axis.
    #[must_use]
    pub const fn span(&self, axis: Axis) -> Span {
        match axis {
            Axis::X => Span { start: self.x, end: self.x.saturating_add(self.width) },
            Axis::Y => Span { start: self.y, end: self.y.saturating_add(self.height) },
        }
    }

    /// Translate the rectangle.
    #[must_use]
    pub const fn translated(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.width, self.height)
    }

    /// Translate the rectangle, or `None` if any edge would leave the
    /// coordinate range.
    #[must_use]
    pub fn checked_translated(&self, dx: i64, dy: i64) -> Option<Self> {
        let moved = Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?, self.width, self.height);
        moved.in_range().then_some(moved)
    }

    /// Check if every edge lies within `±MAX_COORDINATE`.
    #[must_use]
    pub fn in_range(&self) -> bool {
        let range = -MAX_COORDINATE..=MAX_COORDINATE;
        [(self.x, self.width), (self.y, self.height)].into_iter().all(|(start, length)| {
            start
                .checked_add(length)
                .is_some_and(|end| range.contains(&start) && range.contains(&end))
        })
    }

    /// Translate the rectangle along a single axis.
    #[must_use]
    pub const fn shifted(&self, axis: Axis, delta: i64) -> Self {
        match axis {
            Axis::X => self.translated(delta, 0),
            Axis::Y => self.translated(0, delta),
        }
    }

    /// Check if the two rectangles share a positive area.
    ///
    /// Rectangles that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.span(Axis::X).overlap(other.span(Axis::X)) > 0
            && self.span(Axis::Y).overlap(other.span(Axis::Y)) > 0
    }

    /// Check if `other` lies entirely inside this rectangle.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.span(Axis::X).contains(other.span(Axis::X))
            && self.span(Axis::Y).contains(other.span(Axis::Y))
    }
}
