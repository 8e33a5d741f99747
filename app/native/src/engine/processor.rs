//! Transaction processor.
//!
//! Each action is validated first, then applied through [`commit`]: the
//! derived facts of every affected object are snapshotted, the state is
//! mutated, the facts are snapshotted again and the two snapshots are
//! diffed. Only affected objects are examined, so the cost of a transaction
//! does not grow with the number of untouched windows.
//!
//! An action that fails validation returns an error and leaves the state
//! exactly as it was.

use std::collections::{BTreeMap, BTreeSet};

use super::action::Action;
use super::facts::{Delta, Fact, FactSet, GroupIcon};
use super::geometry::{Axis, Point, Rect};
use super::grouping::Connectivity;
use super::snap::{SnapResolution, SnapResolver};
use super::state::{Placed, WorldState};
use super::store::{Oid, Sort};
use crate::config::EngineConfig;
use crate::error::{EngineResult, FlamingoError};

/// Apply one action to the state and return its ordered deltas.
///
/// # Errors
///
/// Returns the validation error of the action. The state is untouched in
/// that case.
pub fn apply(
    state: &mut WorldState,
    config: &EngineConfig,
    action: &Action,
) -> EngineResult<Vec<Delta>> {
    let result = match *action {
        Action::OpenWindow { target } => open_window(state, config, target),
        Action::Move { target, magnitude_x, magnitude_y } => {
            move_window(state, config, target, magnitude_x, magnitude_y)
        }
        Action::ToggleGrouping { target } => toggle_grouping(state, config, target),
        Action::SetMonitorBounds { monitor, monitor_x, monitor_y } => {
            set_monitor_bounds(state, config, monitor, Point::new(monitor_x, monitor_y))
        }
        Action::CloseWindow { target } => close_window(state, config, target),
    };

    match &result {
        Ok(deltas) => tracing::debug!(
            action = action.name(),
            target = action.target(),
            deltas = deltas.len(),
            "applied action"
        ),
        Err(err) => tracing::debug!(
            action = action.name(),
            target = action.target(),
            error = %err,
            "rejected action"
        ),
    }

    result
}

// ============================================================================
// Fact derivation
// ============================================================================

/// Derive every fact about the given objects from the current state.
#[must_use]
pub fn snapshot(state: &WorldState, snap_distance: i64, oids: &BTreeSet<Oid>) -> FactSet {
    let connectivity = Connectivity::new(state, snap_distance);
    let mut facts = FactSet::new();

    for &oid in oids {
        let Some(placed) = state.placed(oid) else {
            continue;
        };

        let origin = placed.rect.origin();
        facts.extend(Axis::ALL.map(|axis| Fact::FinalCoordinate {
            oid,
            axis,
            coord: origin.get(axis),
        }));

        if let Some(anchors) = state.anchors_of(oid) {
            facts.extend(anchors.iter().map(|&anchor| Fact::Snapped { mover: oid, anchor }));
        }

        if placed.is_window() {
            let icon = connectivity.group_icon_for(oid);
            if icon != GroupIcon::NoIcon {
                facts.insert(Fact::GroupIcon { oid, icon });
            }
        }
    }

    facts
}

/// Every fact currently derivable from the state.
#[must_use]
pub fn all_facts(state: &WorldState, snap_distance: i64) -> FactSet {
    let oids: BTreeSet<Oid> = state.placed_objects().map(|placed| placed.oid).collect();
    snapshot(state, snap_distance, &oids)
}

/// Mutate the state and return the deltas observed on `affected`.
///
/// `mutate` must only change facts of objects listed in `affected`.
fn commit(
    state: &mut WorldState,
    snap_distance: i64,
    affected: &BTreeSet<Oid>,
    mutate: impl FnOnce(&mut WorldState) -> EngineResult<()>,
) -> EngineResult<Vec<Delta>> {
    let before = snapshot(state, snap_distance, affected);
    mutate(state)?;
    let after = snapshot(state, snap_distance, affected);
    Ok(FactSet::diff(&before, &after))
}

/// Check that `oid` is a registered object of the given sort.
fn expect_sort(state: &WorldState, oid: Oid, sort: Sort, action: &str) -> EngineResult<()> {
    let actual = state.store.sort(oid)?;
    if actual == sort {
        Ok(())
    } else {
        Err(FlamingoError::invalid_action(format!(
            "{action} expects {}, but object {oid} is {}",
            sort.as_str(),
            actual.as_str()
        )))
    }
}

fn out_of_range(action: &str, oid: Oid) -> FlamingoError {
    FlamingoError::invalid_action(format!(
        "{action} would take object {oid} outside the coordinate range"
    ))
}

/// Validate an open window and return its rectangle.
fn open_window_rect(state: &WorldState, oid: Oid, action: &str) -> EngineResult<Rect> {
    expect_sort(state, oid, Sort::Window, action)?;
    state.require_rect(oid)
}

// ============================================================================
// Actions
// ============================================================================

fn open_window(
    state: &mut WorldState,
    config: &EngineConfig,
    target: Oid,
) -> EngineResult<Vec<Delta>> {
    expect_sort(state, target, Sort::Window, "Open_Window")?;

    if state.is_positioned(target) {
        if config.strict_reopen {
            return Err(FlamingoError::AlreadyOpen(target));
        }
        tracing::debug!(oid = target, "window already open, ignoring");
        return Ok(Vec::new());
    }

    let attributes = state.store.attributes(target)?;
    let rect = Rect::at(Point::origin(), attributes.width, attributes.height);
    if !rect.in_range() {
        return Err(out_of_range("Open_Window", target));
    }

    let target_only = BTreeSet::from([target]);
    let mut affected =
        Connectivity::new(state, config.snap_distance).windows_touching(&rect, &target_only);
    affected.insert(target);

    commit(state, config.snap_distance, &affected, |state| {
        state.set_position(target, Point::origin());
        Ok(())
    })
}

fn set_monitor_bounds(
    state: &mut WorldState,
    config: &EngineConfig,
    monitor: Oid,
    position: Point,
) -> EngineResult<Vec<Delta>> {
    expect_sort(state, monitor, Sort::Monitor, "Set_Monitor_Bounds")?;
    let attributes = state.store.attributes(monitor)?;
    if !Rect::at(position, attributes.width, attributes.height).in_range() {
        return Err(out_of_range("Set_Monitor_Bounds", monitor));
    }

    commit(state, config.snap_distance, &BTreeSet::from([monitor]), |state| {
        state.set_position(monitor, position);
        Ok(())
    })
}

fn move_window(
    state: &mut WorldState,
    config: &EngineConfig,
    target: Oid,
    magnitude_x: i64,
    magnitude_y: i64,
) -> EngineResult<Vec<Delta>> {
    open_window_rect(state, target, "Move")?;

    if magnitude_x == 0 && magnitude_y == 0 {
        return Ok(Vec::new());
    }

    let participants =
        state.groups.members_of(target).cloned().unwrap_or_else(|| BTreeSet::from([target]));

    let plan = plan_move(state, config.snap_distance, &participants, magnitude_x, magnitude_y)?;

    let connectivity = Connectivity::new(state, config.snap_distance);
    let mut affected = participants.clone();
    for &participant in &participants {
        affected.extend(connectivity.touching_set(participant));
    }
    for rect in plan.rects.values() {
        affected.extend(connectivity.windows_touching(rect, &participants));
    }

    tracing::trace!(
        oid = target,
        participants = participants.len(),
        blocked = plan.blocked,
        "planned move"
    );

    commit(state, config.snap_distance, &affected, |state| {
        for (&oid, rect) in &plan.rects {
            state.set_position(oid, rect.origin());
        }
        for (oid, anchors) in plan.snapped {
            state.set_snapped(oid, anchors);
        }
        Ok(())
    })
}

/// Final rectangles and snap results of a move.
struct MovePlan {
    rects: BTreeMap<Oid, Rect>,
    snapped: BTreeMap<Oid, BTreeSet<Oid>>,
    blocked: bool,
}

fn plan_move(
    state: &WorldState,
    snap_distance: i64,
    participants: &BTreeSet<Oid>,
    magnitude_x: i64,
    magnitude_y: i64,
) -> EngineResult<MovePlan> {
    let mut proposed = BTreeMap::new();
    for &oid in participants {
        let rect = state
            .require_rect(oid)?
            .checked_translated(magnitude_x, magnitude_y)
            .ok_or_else(|| out_of_range("Move", oid))?;
        proposed.insert(oid, rect);
    }

    let obstacles: Vec<Placed> =
        state.placed_objects().filter(|placed| !participants.contains(&placed.oid)).collect();

    let blocked = proposed.values().any(|rect| SnapResolver::overlaps_any(rect, &obstacles));

    let resolver = SnapResolver::new(snap_distance);
    let resolutions: BTreeMap<Oid, SnapResolution> = if blocked {
        BTreeMap::new()
    } else {
        proposed.iter().map(|(&oid, rect)| (oid, resolver.resolve(rect, &obstacles))).collect()
    };

    // A correction is only usable if no participant ends up overlapping an
    // obstacle once the whole group is shifted by it.
    let clear = |dx: i64, dy: i64| {
        proposed.values().all(|rect| {
            rect.checked_translated(dx, dy)
                .is_some_and(|moved| !SnapResolver::overlaps_any(&moved, &obstacles))
        })
    };

    // The first participant (ascending oid) with a usable correction on an
    // axis fixes the whole group's adjustment on that axis. Y is chosen with
    // the X adjustment already applied.
    let adopted = |axis: Axis, other: i64| {
        resolutions
            .values()
            .filter_map(|resolution| resolution.axis(axis))
            .map(|snap| snap.offset)
            .find(|&offset| match axis {
                Axis::X => clear(offset, other),
                Axis::Y => clear(other, offset),
            })
    };
    let adopted_x = adopted(Axis::X, 0);
    let adopted_y = adopted(Axis::Y, adopted_x.unwrap_or(0));

    let mut rects = BTreeMap::new();
    for (&oid, rect) in &proposed {
        let rect = rect
            .checked_translated(adopted_x.unwrap_or(0), adopted_y.unwrap_or(0))
            .ok_or_else(|| out_of_range("Move", oid))?;
        rects.insert(oid, rect);
    }

    let snapped = participants
        .iter()
        .map(|&oid| {
            let anchors = resolutions
                .get(&oid)
                .map(|resolution| {
                    [(resolution.x, adopted_x), (resolution.y, adopted_y)]
                        .into_iter()
                        .filter_map(|(own, adopted)| {
                            own.filter(|snap| Some(snap.offset) == adopted).map(|snap| snap.anchor)
                        })
                        .collect()
                })
                .unwrap_or_default();
            (oid, anchors)
        })
        .collect();

    Ok(MovePlan { rects, snapped, blocked })
}

fn toggle_grouping(
    state: &mut WorldState,
    config: &EngineConfig,
    target: Oid,
) -> EngineResult<Vec<Delta>> {
    open_window_rect(state, target, "Toggle_Grouping")?;

    if let Some(members) = state.groups.members_of(target).cloned() {
        return commit(state, config.snap_distance, &members, |state| {
            state.groups.disband(target).map(drop)
        });
    }

    let members = Connectivity::new(state, config.snap_distance).closure(target);
    tracing::trace!(oid = target, size = members.len(), "forming group");

    let affected = members.clone();
    commit(state, config.snap_distance, &affected, |state| {
        state.groups.install(members).map(drop)
    })
}

fn close_window(
    state: &mut WorldState,
    config: &EngineConfig,
    target: Oid,
) -> EngineResult<Vec<Delta>> {
    open_window_rect(state, target, "Close_Window")?;

    let mut affected = BTreeSet::from([target]);
    affected.extend(Connectivity::new(state, config.snap_distance).touching_set(target));
    affected.extend(state.snappers_of(target));

    commit(state, config.snap_distance, &affected, |state| {
        state.clear_position(target);
        state.forget_snaps(target);
        state.groups.remove_member(target);
        Ok(())
    })
}
