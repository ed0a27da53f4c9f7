//! Shared helpers for axon benchmark suites.

use std::sync::Arc;

use axon_search::cost::ReciprocalCost;
use axon_search::engine::EngineConfig;
use axon_search::fill::{FillMetric, FillSearch};
use axon_search::trace::TraceSearch;
use axon_tracer::volumes::{bright_tube, uniform_cube};
use axon_volume::Volume;

/// A uniform bright cube shared by the throughput benchmarks.
///
/// # Panics
///
/// Panics if the volume cannot be built. Benchmark setup failures are fatal.
#[must_use]
pub fn bench_cube(side: u32) -> Arc<Volume> {
    Arc::new(uniform_cube(side, 200).expect("bench cube"))
}

/// A corner-to-corner trace through a uniform cube.
///
/// # Panics
///
/// Panics if the endpoints are rejected. Benchmark setup failures are fatal.
#[must_use]
pub fn corner_trace(volume: Arc<Volume>) -> TraceSearch<ReciprocalCost> {
    let far = volume.width() - 1;
    TraceSearch::new(
        volume,
        (0, 0, 0),
        (far, far, far),
        ReciprocalCost::with_floor(ReciprocalCost::ADMISSIBLE_FLOOR),
        EngineConfig::default(),
    )
    .expect("corner trace")
}

/// A trace along a bright tube through dark background.
///
/// # Panics
///
/// Panics if setup fails. Benchmark setup failures are fatal.
#[must_use]
pub fn tube_trace(length: u32) -> TraceSearch<ReciprocalCost> {
    let volume = Arc::new(bright_tube(length, 9, 9, 4, 4, 10, 250).expect("tube volume"));
    TraceSearch::new(
        volume,
        (0, 4, 4),
        (length - 1, 4, 4),
        ReciprocalCost::with_floor(ReciprocalCost::ADMISSIBLE_FLOOR),
        EngineConfig::default(),
    )
    .expect("tube trace")
}

/// A single-seed fill over a uniform cube, ready to run to exhaustion.
///
/// # Panics
///
/// Panics if setup fails. Benchmark setup failures are fatal.
#[must_use]
pub fn center_fill(volume: Arc<Volume>) -> FillSearch<ReciprocalCost> {
    let center = volume.width() / 2;
    let mut fill = FillSearch::new(
        volume,
        ReciprocalCost::new(),
        FillMetric::ReciprocalIntensity,
        0.1,
        EngineConfig::default(),
    );
    fill.seed_voxel(center, center, center).expect("center seed");
    fill
}
