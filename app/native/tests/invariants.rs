//! Randomized action sweeps.
//!
//! Every dispatch goes through [`Session::try_dispatch`], which checks delta
//! consistency against a mirrored fact view. On top of that, each sweep checks
//! that groups move rigidly and that only windows carry snaps or icons.

mod common;

use std::collections::BTreeMap;

use common::Session;
use flamingo_lib::engine::{Action, Fact, Oid, Predicate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WINDOWS: usize = 6;
const STEPS: usize = 400;

fn random_action(rng: &mut StdRng, windows: &[Oid], monitor: Oid) -> Action {
    let target = windows[rng.random_range(0..windows.len())];
    match rng.random_range(0..10) {
        0 => Action::open(target),
        1 => Action::close(target),
        2 => Action::toggle_grouping(target),
        3 => Action::set_monitor_bounds(monitor, rng.random_range(-50..50), rng.random_range(-50..50)),
        _ => Action::move_by(target, rng.random_range(-150..150), rng.random_range(-150..150)),
    }
}

/// Offsets of every other group member relative to `oid`.
fn group_offsets(session: &Session, oid: Oid) -> BTreeMap<Oid, (i64, i64)> {
    let Some(origin) = session.engine.position(oid) else {
        return BTreeMap::new();
    };
    session
        .engine
        .group_members(oid)
        .into_iter()
        .flatten()
        .filter_map(|&member| {
            let point = session.engine.position(member)?;
            Some((member, (point.x - origin.x, point.y - origin.y)))
        })
        .collect()
}

fn sweep(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = Session::new();

    let monitor = session.place_monitor(1280, 800, 0, 0);
    let windows: Vec<Oid> = (0..WINDOWS)
        .map(|_| session.window(rng.random_range(40..300), rng.random_range(40..300)))
        .collect();

    for _ in 0..STEPS {
        let action = random_action(&mut rng, &windows, monitor);
        let rigid = match action {
            Action::Move { target, .. } => Some((target, group_offsets(&session, target))),
            _ => None,
        };

        if session.try_dispatch(action).is_err() {
            continue;
        }

        if let Some((target, before)) = rigid {
            assert_eq!(group_offsets(&session, target), before, "seed {seed}: group deformed by {action:?}");
        }

        for fact in session.engine.facts().iter() {
            match *fact {
                Fact::Snapped { mover, .. } => {
                    assert!(windows.contains(&mover), "seed {seed}: monitor {mover} snapped");
                }
                Fact::GroupIcon { oid, .. } => {
                    assert!(windows.contains(&oid), "seed {seed}: monitor {oid} has an icon");
                }
                Fact::FinalCoordinate { .. } => {}
            }
        }
    }

    // Closing everything leaves only the monitor's coordinates.
    for &oid in &windows {
        if session.engine.position(oid).is_some() {
            session.dispatch(Action::close(oid));
        }
    }
    let facts = session.engine.facts();
    assert_eq!(facts.len(), 2, "seed {seed}");
    assert!(facts.of(Predicate::Snapped).next().is_none());
    assert!(facts.of(Predicate::GroupIcon).next().is_none());
}

#[test]
fn test_random_sweeps_keep_views_consistent() {
    for seed in 0..16 {
        sweep(seed);
    }
}
