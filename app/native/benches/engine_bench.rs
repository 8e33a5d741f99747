//! Benchmarks for the engine's hot paths.
//!
//! Run with: `cargo bench -p flamingo`
//!
//! Results are saved to `target/criterion/` with HTML reports.
//!
//! ## Benchmark Groups
//!
//! - `snap`: Snap resolution against growing candidate lists
//! - `dispatch`: Full transactions (move, group toggle) on tiled desktops
//! - `facts`: Fact snapshots and diffs

use std::collections::BTreeSet;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flamingo_lib::engine::processor::all_facts;
use flamingo_lib::engine::snap::SnapResolver;
use flamingo_lib::engine::state::Placed;
use flamingo_lib::engine::{Action, FactSet, Flamingo, Oid, Rect, Sort};

// ============================================================================
// Test Data
// ============================================================================

/// A row of `count` 100×100 windows, 200px apart.
fn window_row(count: usize) -> Vec<Placed> {
    (0..count)
        .map(|i| Placed {
            oid: i as Oid,
            sort: Sort::Window,
            rect: Rect::new(i as i64 * 200, 0, 100, 100),
        })
        .collect()
}

/// An engine with a 1920×1080 monitor and `count` open windows laid out on a
/// grid, every second column touching its neighbor.
fn tiled_desktop(count: usize) -> (Flamingo, Vec<Oid>) {
    let mut engine = Flamingo::new();
    let monitor = engine.add(Sort::Monitor, 1920, 1080);
    let _ = engine.dispatch(Action::set_monitor_bounds(monitor, 0, 0));

    let windows: Vec<Oid> = (0..count)
        .map(|i| {
            let oid = engine.add(Sort::Window, 100, 100);
            let _ = engine.dispatch(Action::open(oid));
            let column = (i % 8) as i64;
            let row = (i / 8) as i64;
            let x = column * 100 + (column / 2) * 100;
            let _ = engine.dispatch(Action::move_by(oid, x, row * 150));
            oid
        })
        .collect();

    (engine, windows)
}

// ============================================================================
// Snap Resolution
// ============================================================================

fn bench_snap(c: &mut Criterion) {
    let mut group = c.benchmark_group("snap");
    let resolver = SnapResolver::new(20);

    for count in [4, 16, 64, 256] {
        let candidates = window_row(count);
        // Just right of the last window: snaps on both axes.
        let proposed = Rect::new(count as i64 * 200 - 90, 5, 100, 100);

        group.bench_with_input(BenchmarkId::new("resolve", count), &count, |b, _| {
            b.iter(|| resolver.resolve(black_box(&proposed), black_box(&candidates)));
        });

        group.bench_with_input(BenchmarkId::new("overlaps_any", count), &count, |b, _| {
            b.iter(|| SnapResolver::overlaps_any(black_box(&proposed), black_box(&candidates)));
        });
    }

    group.finish();
}

// ============================================================================
// Transactions
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for count in [8, 32, 64] {
        group.bench_with_input(BenchmarkId::new("move", count), &count, |b, &count| {
            let (mut engine, windows) = tiled_desktop(count);
            let target = windows[count / 2];
            let mut step = 7;
            b.iter(|| {
                step = -step;
                engine.dispatch(black_box(Action::move_by(target, step, 0)))
            });
        });

        group.bench_with_input(BenchmarkId::new("toggle_grouping", count), &count, |b, &count| {
            let (mut engine, windows) = tiled_desktop(count);
            let target = windows[0];
            b.iter(|| engine.dispatch(black_box(Action::toggle_grouping(target))));
        });
    }

    group.finish();
}

// ============================================================================
// Facts
// ============================================================================

fn bench_facts(c: &mut Criterion) {
    let mut group = c.benchmark_group("facts");

    for count in [8, 64] {
        let (engine, _) = tiled_desktop(count);
        let before = engine.facts();
        let after: FactSet = before.iter().skip(1).copied().collect();

        group.bench_with_input(BenchmarkId::new("snapshot", count), &count, |b, _| {
            b.iter(|| engine.facts());
        });

        group.bench_with_input(BenchmarkId::new("diff", count), &count, |b, _| {
            b.iter(|| FactSet::diff(black_box(&before), black_box(&after)));
        });
    }

    let (engine, windows) = tiled_desktop(64);
    let half: BTreeSet<Oid> = windows.iter().copied().step_by(2).collect();
    group.bench_function("snapshot_subset", |b| {
        b.iter(|| {
            flamingo_lib::engine::processor::snapshot(
                engine.state(),
                engine.config().snap_distance,
                black_box(&half),
            )
        });
    });
    group.bench_function("all_facts", |b| {
        b.iter(|| all_facts(engine.state(), engine.config().snap_distance));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_snap, bench_dispatch, bench_facts);

criterion_main!(benches);
