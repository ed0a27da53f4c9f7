//! Shared reference implementations for conformance tests.
//!
//! The reference Dijkstra here is deliberately naive: a linear minimum scan
//! over a dense distance table, no heaps, no arenas, no shared code with
//! the engine under test. Slow but obviously correct on the small volumes
//! the tests use.

use axon_search::cost::CostModel;
use axon_volume::Volume;

/// All 26 lattice neighbor offsets.
#[must_use]
pub fn neighbor_offsets() -> Vec<(i32, i32, i32)> {
    let mut offsets = Vec::with_capacity(26);
    for dz in -1i32..=1 {
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if (dx, dy, dz) != (0, 0, 0) {
                    offsets.push((dx, dy, dz));
                }
            }
        }
    }
    offsets
}

/// Brute-force multi-source Dijkstra over the whole volume. Returns one
/// entry per voxel in the volume's linear index order; unreachable voxels
/// hold `f64::INFINITY`.
///
/// # Panics
///
/// Panics if a seed lies outside the volume. Reference inputs are fixed by
/// the tests.
#[must_use]
pub fn reference_distances<C: CostModel>(
    volume: &Volume,
    cost: &C,
    seeds: &[(u32, u32, u32)],
    minimum_cost: f64,
) -> Vec<f64> {
    let count = volume.voxel_count();
    let mut distance = vec![f64::INFINITY; count];
    let mut settled = vec![false; count];
    for &(x, y, z) in seeds {
        assert!(volume.contains(x, y, z), "seed outside volume");
        distance[volume.index_of(x, y, z)] = 0.0;
    }
    let offsets = neighbor_offsets();
    let cal = volume.calibration();
    loop {
        let mut best: Option<(usize, f64)> = None;
        for (index, &d) in distance.iter().enumerate() {
            if !settled[index] && d.is_finite() && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((index, d));
            }
        }
        let Some((index, d)) = best else {
            break;
        };
        settled[index] = true;
        let width = volume.width() as usize;
        let height = volume.height() as usize;
        let x = (index % width) as i64;
        let y = ((index / width) % height) as i64;
        let z = (index / (width * height)) as i64;
        for &(dx, dy, dz) in &offsets {
            let (nx, ny, nz) = (x + i64::from(dx), y + i64::from(dy), z + i64::from(dz));
            if nx < 0
                || ny < 0
                || nz < 0
                || nx >= i64::from(volume.width())
                || ny >= i64::from(volume.height())
                || nz >= i64::from(volume.depth())
            {
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (nx, ny, nz) = (nx as u32, ny as u32, nz as u32);
            let move_cost = cost.cost_of_entering(volume, nx, ny, nz).max(minimum_cost);
            let candidate = d + cal.step_length(dx, dy, dz) * move_cost;
            let slot = &mut distance[volume.index_of(nx, ny, nz)];
            if candidate < *slot {
                *slot = candidate;
            }
        }
    }
    distance
}

/// Accumulated cost of a returned path, recomputed from its lattice points
/// the same way relaxation charges steps: each step pays the physical step
/// length times the cost of the voxel being entered, floored.
#[must_use]
pub fn path_cost<C: CostModel>(volume: &Volume, cost: &C, path: &axon_search::path::Path) -> f64 {
    let floor = cost.minimum_cost_per_unit_distance();
    let lattice = path.lattice_points(volume);
    let cal = volume.calibration();
    lattice
        .windows(2)
        .map(|w| {
            let (ax, ay, az) = w[0];
            let (bx, by, bz) = w[1];
            let step = cal.distance_between(ax, ay, az, bx, by, bz);
            step * cost.cost_of_entering(volume, bx, by, bz).max(floor)
        })
        .sum()
}

/// Reference single-pair shortest path cost.
///
/// # Panics
///
/// Panics if either endpoint lies outside the volume.
#[must_use]
pub fn reference_shortest_cost<C: CostModel>(
    volume: &Volume,
    cost: &C,
    start: (u32, u32, u32),
    goal: (u32, u32, u32),
) -> f64 {
    assert!(volume.contains(goal.0, goal.1, goal.2), "goal outside volume");
    let distances = reference_distances(volume, cost, &[start], cost.minimum_cost_per_unit_distance());
    distances[volume.index_of(goal.0, goal.1, goal.2)]
}
