//! Benchmarks for movement range and shortest path searches
//!
//! Run with: cargo bench --bench pathfinding_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grid_tactics::core::types::{GridPos, UnitId};
use grid_tactics::tactics::{reachable_set, shortest_path, Grid, TerrainKind, TraversalPolicy, Unit};

/// Open map with a comb of walls every fourth column, gaps alternating top and bottom
fn comb_grid(size: u32) -> Grid {
    let mut terrain = vec![TerrainKind::None; (size * size) as usize];
    for col in (2..size).step_by(4) {
        let gap_row = if (col / 4) % 2 == 0 { size - 1 } else { 0 };
        for row in 0..size {
            if row != gap_row {
                terrain[(row * size + col) as usize] = TerrainKind::Impassable;
            }
        }
    }
    Grid::new(size, size, terrain).expect("valid grid")
}

fn bench_shortest_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_path");

    for size in [16u32, 32, 64].iter() {
        let grid = comb_grid(*size);
        let start = GridPos::new(0, 0);
        let goal = GridPos::new(*size as i32 - 1, *size as i32 - 1);
        let unit = Unit::new(UnitId::new(0), "Bench", start, TraversalPolicy::Ground);

        group.bench_with_input(BenchmarkId::from_parameter(format!("{}x{}", size, size)), size, |b, _| {
            b.iter(|| {
                let path = shortest_path(black_box(start), black_box(goal), &unit, &grid);
                black_box(path)
            });
        });
    }

    group.finish();
}

fn bench_reachable_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("reachable_set");
    let grid = Grid::filled(64, 64, TerrainKind::None).expect("valid grid");

    for range in [3u32, 6, 12].iter() {
        let unit = Unit::new(UnitId::new(0), "Bench", GridPos::new(32, 32), TraversalPolicy::Ground)
            .with_move_range(*range);

        group.bench_with_input(BenchmarkId::from_parameter(format!("range_{}", range)), range, |b, _| {
            b.iter(|| black_box(reachable_set(black_box(&unit), &grid)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_shortest_path, bench_reachable_set);
criterion_main!(benches);
