//! Shared helpers for engine integration tests.
//!
//! [`Session`] wraps an engine and mirrors every delta into a host-side
//! [`FactSet`], the way a real host would. Each dispatch checks that:
//!
//! - every delta is consistent with the mirrored view (no double insert, no
//!   retraction of an absent fact),
//! - no object gets two coordinates on one axis,
//! - the mirrored view equals the engine's own fact set.

#![allow(dead_code)]

use std::collections::BTreeMap;

use flamingo_lib::EngineConfig;
use flamingo_lib::engine::{
    Action, Axis, Delta, Fact, FactSet, Flamingo, GroupIcon, Oid, Predicate, Sort,
};
use flamingo_lib::error::EngineResult;

pub struct Session {
    pub engine: Flamingo,
    pub view: FactSet,
}

impl Session {
    pub fn new() -> Self { Self::with_config(EngineConfig::default()) }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { engine: Flamingo::with_config(config), view: FactSet::new() }
    }

    pub fn window(&mut self, width: i64, height: i64) -> Oid {
        self.engine.add(Sort::Window, width, height)
    }

    pub fn monitor(&mut self, width: i64, height: i64) -> Oid {
        self.engine.add(Sort::Monitor, width, height)
    }

    /// Register and open a window.
    pub fn open_window(&mut self, width: i64, height: i64) -> Oid {
        let oid = self.window(width, height);
        self.dispatch(Action::open(oid));
        oid
    }

    /// Register a monitor and place it.
    pub fn place_monitor(&mut self, width: i64, height: i64, x: i64, y: i64) -> Oid {
        let oid = self.monitor(width, height);
        self.dispatch(Action::set_monitor_bounds(oid, x, y));
        oid
    }

    /// Dispatch an action that must succeed.
    pub fn dispatch(&mut self, action: Action) -> Vec<Delta> {
        match self.try_dispatch(action) {
            Ok(deltas) => deltas,
            Err(err) => panic!("{} failed: {err}", action.name()),
        }
    }

    /// Dispatch an action; on success mirror and check its deltas.
    pub fn try_dispatch(&mut self, action: Action) -> EngineResult<Vec<Delta>> {
        let before = self.engine.facts();
        let result = self.engine.dispatch(action);

        match &result {
            Ok(deltas) => self.mirror(deltas),
            Err(_) => assert_eq!(self.engine.facts(), before, "failed action changed facts"),
        }
        result
    }

    pub fn position(&self, oid: Oid) -> (i64, i64) {
        let point = self.engine.position(oid).unwrap_or_else(|| panic!("{oid} has no position"));
        (point.x, point.y)
    }

    fn mirror(&mut self, deltas: &[Delta]) {
        let mut inserted: BTreeMap<(Oid, Axis), usize> = BTreeMap::new();
        for delta in deltas {
            assert!(self.view.apply(delta), "inconsistent delta {delta}");
            if let Fact::FinalCoordinate { oid, axis, .. } = delta.fact
                && delta.is_insertion()
            {
                *inserted.entry((oid, axis)).or_default() += 1;
            }
        }
        for ((oid, axis), count) in inserted {
            assert_eq!(count, 1, "{count} coordinates inserted for {oid} on {axis:?}");
        }

        assert_one_coordinate_per_axis(&self.view);
        assert_eq!(self.view, self.engine.facts(), "mirrored view diverged from engine");
    }
}

pub fn assert_one_coordinate_per_axis(view: &FactSet) {
    let mut seen: BTreeMap<(Oid, Axis), i64> = BTreeMap::new();
    for fact in view.of(Predicate::FinalCoordinate) {
        if let Fact::FinalCoordinate { oid, axis, coord } = *fact
            && let Some(previous) = seen.insert((oid, axis), coord)
        {
            panic!("object {oid} has coordinates {previous} and {coord} on {axis:?}");
        }
    }
}

/// Assert that every expected delta is present.
#[track_caller]
pub fn assert_includes(deltas: &[Delta], expected: &[Delta]) {
    for delta in expected {
        assert!(deltas.contains(delta), "missing {delta} in {}", render(deltas));
    }
}

/// Assert that no delta touches the given predicate for `oid`.
#[track_caller]
pub fn assert_no_coordinate(deltas: &[Delta], oid: Oid) {
    assert!(
        !deltas
            .iter()
            .any(|delta| matches!(delta.fact, Fact::FinalCoordinate { oid: o, .. } if o == oid)),
        "unexpected coordinate change for {oid} in {}",
        render(deltas)
    );
}

pub fn render(deltas: &[Delta]) -> String {
    deltas.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

pub const fn coord(oid: Oid, axis: Axis, coord: i64) -> Delta {
    Delta::insert(Fact::FinalCoordinate { oid, axis, coord })
}

pub const fn snapped(mover: Oid, anchor: Oid) -> Delta {
    Delta::insert(Fact::Snapped { mover, anchor })
}

pub const fn icon(oid: Oid, icon: GroupIcon) -> Delta { Delta::insert(Fact::GroupIcon { oid, icon }) }
