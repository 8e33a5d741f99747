//! Facts and deltas.
//!
//! A [`Fact`] is a predicate applied to a tuple of values. The engine never
//! stores facts: they are derived from positions, groups and snap results.
//! Each transaction reports the facts that became true (`+1`) or ceased to be
//! true (`-1`) as an ordered list of [`Delta`]s.
//!
//! # Ordering
//!
//! Deltas are sorted by predicate (`final_coordinate`, `snapped`,
//! `group_icon`), then retractions before insertions, then by value tuple
//! (subject oid first). Hosts that apply deltas in order never see two
//! coordinates for the same axis at once.

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use smallvec::{SmallVec, smallvec};

use super::geometry::Axis;
use super::store::Oid;
use crate::constants::protocol;

// ============================================================================
// Predicates
// ============================================================================

/// The predicates the engine derives.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// `final_coordinate(oid, axis, coord)`
    FinalCoordinate,
    /// `snapped(mover, anchor)`
    Snapped,
    /// `group_icon(oid, status)`
    GroupIcon,
}

impl Predicate {
    /// All predicates in delta order.
    pub const ALL: [Self; 3] = [Self::FinalCoordinate, Self::Snapped, Self::GroupIcon];

    /// Returns the predicate name hosts subscribe to.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FinalCoordinate => protocol::FINAL_COORDINATE,
            Self::Snapped => protocol::SNAPPED,
            Self::GroupIcon => protocol::GROUP_ICON,
        }
    }

    /// Looks up a predicate by its host-facing name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> { Self::ALL.into_iter().find(|p| p.as_str() == name) }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ============================================================================
// Group icon status
// ============================================================================

/// The grouping button a window should show.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
pub enum GroupIcon {
    /// Nothing to group with. Carries no fact.
    #[default]
    NoIcon,
    /// Touching at least one window; grouping is possible.
    Form,
    /// Member of a group; the button disbands it.
    Disband,
}

impl GroupIcon {
    /// Returns the status name as it appears in facts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoIcon => "NoIcon",
            Self::Form => "Form",
            Self::Disband => "Disband",
        }
    }
}

// ============================================================================
// Facts
// ============================================================================

/// A single value inside a fact tuple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Oid(Oid),
    Int(i64),
    Axis(Axis),
    Icon(GroupIcon),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oid(oid) => write!(f, "{oid}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Axis(axis) => f.write_str(axis.as_str()),
            Self::Icon(icon) => f.write_str(icon.as_str()),
        }
    }
}

/// Value tuple of a fact. Never longer than three.
pub type Values = SmallVec<[Value; 3]>;

/// A derived fact.
///
/// Variant order matches [`Predicate`] order, so the derived `Ord` sorts by
/// predicate first and subject oid second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fact {
    FinalCoordinate { oid: Oid, axis: Axis, coord: i64 },
    Snapped { mover: Oid, anchor: Oid },
    GroupIcon { oid: Oid, icon: GroupIcon },
}

impl Fact {
    /// The predicate this fact belongs to.
    #[must_use]
    pub const fn predicate(&self) -> Predicate {
        match self {
            Self::FinalCoordinate { .. } => Predicate::FinalCoordinate,
            Self::Snapped { .. } => Predicate::Snapped,
            Self::GroupIcon { .. } => Predicate::GroupIcon,
        }
    }

    /// The object the fact is about (first value of the tuple).
    #[must_use]
    pub const fn subject(&self) -> Oid {
        match *self {
            Self::FinalCoordinate { oid, .. } | Self::GroupIcon { oid, .. } => oid,
            Self::Snapped { mover, .. } => mover,
        }
    }

    /// The value tuple, in predicate argument order.
    #[must_use]
    pub fn values(&self) -> Values {
        match *self {
            Self::FinalCoordinate { oid, axis, coord } => {
                smallvec![Value::Oid(oid), Value::Axis(axis), Value::Int(coord)]
            }
            Self::Snapped { mover, anchor } => smallvec![Value::Oid(mover), Value::Oid(anchor)],
            Self::GroupIcon { oid, icon } => smallvec![Value::Oid(oid), Value::Icon(icon)],
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.predicate())?;
        for (i, value) in self.values().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}

// ============================================================================
// Deltas
// ============================================================================

/// Whether a fact became true or false.
///
/// `Retract` sorts before `Insert`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    Retract,
    Insert,
}

impl Sign {
    /// `+1` for insertions, `-1` for retractions.
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::Retract => -1,
            Self::Insert => 1,
        }
    }
}

impl Serialize for Sign {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

/// A signed fact emitted by one transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Delta {
    pub fact: Fact,
    pub sign: Sign,
}

impl Delta {
    /// A fact that became true.
    #[must_use]
    pub const fn insert(fact: Fact) -> Self { Self { fact, sign: Sign::Insert } }

    /// A fact that ceased to be true.
    #[must_use]
    pub const fn retract(fact: Fact) -> Self { Self { fact, sign: Sign::Retract } }

    /// The predicate of the underlying fact.
    #[must_use]
    pub const fn predicate(&self) -> Predicate { self.fact.predicate() }

    /// Check if this delta is an insertion.
    #[must_use]
    pub fn is_insertion(&self) -> bool { self.sign == Sign::Insert }

    fn sort_key(&self) -> (Predicate, Sign, Fact) { (self.predicate(), self.sign, self.fact) }
}

/// Wire shape: `{ "type": "final_coordinate", "value": [1, "X", 0], "op": 1 }`.
impl Serialize for Delta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("Delta", 3)?;
        record.serialize_field("type", self.predicate().as_str())?;
        record.serialize_field("value", &self.fact.values())?;
        record.serialize_field("op", &self.sign)?;
        record.end()
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.sign {
            Sign::Insert => '+',
            Sign::Retract => '-',
        };
        write!(f, "{sign}{}", self.fact)
    }
}

// ============================================================================
// Fact sets
// ============================================================================

/// An ordered set of facts: a truth snapshot, or a host's applied view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FactSet(BTreeSet<Fact>);

impl FactSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Add a fact. Returns `false` if it was already present.
    pub fn insert(&mut self, fact: Fact) -> bool { self.0.insert(fact) }

    /// Check if a fact is present.
    #[must_use]
    pub fn contains(&self, fact: &Fact) -> bool { self.0.contains(fact) }

    /// Number of facts.
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Iterate in fact order.
    pub fn iter(&self) -> impl Iterator<Item = &Fact> { self.0.iter() }

    /// Iterate over the facts of one predicate.
    pub fn of(&self, predicate: Predicate) -> impl Iterator<Item = &Fact> {
        self.0.iter().filter(move |fact| fact.predicate() == predicate)
    }

    /// Apply one delta to this set.
    ///
    /// Returns `false` when the delta is inconsistent with the set: inserting a
    /// fact that is already true, or retracting one that is not.
    pub fn apply(&mut self, delta: &Delta) -> bool {
        match delta.sign {
            Sign::Insert => self.0.insert(delta.fact),
            Sign::Retract => self.0.remove(&delta.fact),
        }
    }

    /// Compute the ordered deltas that turn `before` into `after`.
    #[must_use]
    pub fn diff(before: &Self, after: &Self) -> Vec<Delta> {
        let mut deltas: Vec<Delta> = before
            .0
            .difference(&after.0)
            .map(|fact| Delta::retract(*fact))
            .chain(after.0.difference(&before.0).map(|fact| Delta::insert(*fact)))
            .collect();
        deltas.sort_by_key(Delta::sort_key);
        deltas
    }
}

impl FromIterator<Fact> for FactSet {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

impl Extend<Fact> for FactSet {
    fn extend<I: IntoIterator<Item = Fact>>(&mut self, iter: I) { self.0.extend(iter); }
}
