//! Fill conformance: threshold-ball selection, frontier monotonicity,
//! multi-seed distances against reference Dijkstra, and artifact
//! round-trips through the persistence layer.

use std::sync::Arc;

use axon_search::control::Control;
use axon_search::cost::{ReciprocalCost, UniformCost};
use axon_search::engine::{EngineConfig, ExitReason};
use axon_search::fill::{FillMetric, FillSearch};
use axon_search::path::{Path, PathPoint};
use axon_tracer::fill_io::{read_fill, write_fill};
use axon_tracer::runner::spawn_fill;
use axon_tracer::transcript::{Transcript, TranscriptEvent};
use axon_tracer::volumes::{bright_tube, uniform_cube};
use axon_volume::Volume;
use conformance_tests::reference_distances;

fn run_to_exhaustion<C: axon_search::cost::CostModel>(fill: &mut FillSearch<C>) {
    let control = Control::new(false);
    let outcome = fill.run(&control, &[]);
    assert_eq!(outcome.reason, ExitReason::PointsExhausted);
}

#[test]
fn threshold_selects_exactly_the_cost_weighted_ball() {
    // Uniform unit cost: settled distance is lattice path length. With
    // threshold 2.0 the selected set must coincide with the Euclidean ball
    // of radius 2 around the seed.
    let volume = Arc::new(uniform_cube(9, 255).unwrap());
    let mut fill = FillSearch::new(
        Arc::clone(&volume),
        UniformCost { cost: 1.0 },
        FillMetric::ReciprocalIntensity,
        2.0,
        EngineConfig::default(),
    );
    fill.seed_voxel(4, 4, 4).unwrap();
    run_to_exhaustion(&mut fill);

    let artifact = fill.to_fill();
    let mut selected: Vec<(u32, u32, u32)> = artifact
        .voxels_within_threshold()
        .map(|n| (n.x, n.y, n.z))
        .collect();
    selected.sort_unstable();

    let mut expected = Vec::new();
    for z in 0..9u32 {
        for y in 0..9u32 {
            for x in 0..9u32 {
                let dx = f64::from(x) - 4.0;
                let dy = f64::from(y) - 4.0;
                let dz = f64::from(z) - 4.0;
                if (dx * dx + dy * dy + dz * dz).sqrt() <= 2.0 + 1e-9 {
                    expected.push((x, y, z));
                }
            }
        }
    }
    expected.sort_unstable();
    assert_eq!(selected, expected);
}

#[test]
fn multi_seed_distances_match_reference_dijkstra() {
    let volume = Arc::new(bright_tube(9, 5, 3, 2, 1, 25, 230).unwrap());
    let cost = ReciprocalCost::new();
    let seeds = [(0, 2, 1), (8, 2, 1), (4, 0, 0)];
    let mut fill = FillSearch::new(
        Arc::clone(&volume),
        cost,
        FillMetric::ReciprocalIntensity,
        0.5,
        EngineConfig::default(),
    );
    for &(x, y, z) in &seeds {
        fill.seed_voxel(x, y, z).unwrap();
    }
    run_to_exhaustion(&mut fill);

    let reference = reference_distances(&volume, &cost, &seeds, 0.0);
    for z in 0..volume.depth() {
        for y in 0..volume.height() {
            for x in 0..volume.width() {
                let settled = f64::from(fill.distance_at(x, y, z).expect("voxel unreached"));
                let expected = reference[volume.index_of(x, y, z)];
                assert!(
                    (settled - expected).abs() < 1e-5,
                    "distance mismatch at ({x},{y},{z}): {settled} vs {expected}"
                );
            }
        }
    }
}

#[test]
fn frontier_distance_reports_are_monotone() {
    let volume = Arc::new(uniform_cube(9, 255).unwrap());
    let mut fill = FillSearch::new(
        volume,
        UniformCost { cost: 1.0 },
        FillMetric::ReciprocalIntensity,
        1.0,
        EngineConfig {
            report_interval: 1,
            ..EngineConfig::default()
        },
    );
    fill.seed_voxel(4, 4, 4).unwrap();
    let transcript = Transcript::new();
    let control = Control::new(false);
    fill.run(&control, &[transcript.clone()]);

    let distances: Vec<f32> = transcript
        .events()
        .iter()
        .filter_map(|e| match e {
            TranscriptEvent::FrontierAdvanced { distance } => Some(*distance),
            _ => None,
        })
        .collect();
    assert!(!distances.is_empty(), "no frontier reports recorded");
    for pair in distances.windows(2) {
        assert!(
            pair[1] >= pair[0] - f32::EPSILON,
            "frontier went backwards: {} then {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn fill_artifact_round_trips_through_disk_and_resumes() {
    let volume = Arc::new(uniform_cube(5, 255).unwrap());
    let mut fill = FillSearch::new(
        Arc::clone(&volume),
        UniformCost { cost: 1.0 },
        FillMetric::ReciprocalIntensity,
        1.5,
        EngineConfig::default(),
    );
    let seed_path = Path::new(
        11,
        vec![
            PathPoint { x: 2.0, y: 2.0, z: 2.0 },
            PathPoint { x: 3.0, y: 2.0, z: 2.0 },
        ],
        "µm",
    );
    fill.seed_from_paths(std::slice::from_ref(&seed_path)).unwrap();
    run_to_exhaustion(&mut fill);

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("fill.json");
    write_fill(&file, &fill.to_fill()).unwrap();
    let reloaded_artifact = read_fill(&file).unwrap();
    assert_eq!(reloaded_artifact.source_paths, vec![11]);

    let mut resumed = FillSearch::from_fill(
        Arc::clone(&volume),
        UniformCost { cost: 1.0 },
        &reloaded_artifact,
        EngineConfig::default(),
    )
    .unwrap();
    run_to_exhaustion(&mut resumed);
    for z in 0..5 {
        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(
                    resumed.distance_at(x, y, z),
                    fill.distance_at(x, y, z),
                    "resumed distance differs at ({x},{y},{z})"
                );
            }
        }
    }
}

#[test]
fn threshold_moves_mid_run_through_the_handle() {
    let volume: Arc<Volume> = Arc::new(uniform_cube(6, 255).unwrap());
    let mut fill = FillSearch::new(
        volume,
        UniformCost { cost: 1.0 },
        FillMetric::ReciprocalIntensity,
        0.5,
        EngineConfig::default(),
    );
    fill.seed_voxel(0, 0, 0).unwrap();
    let handle = spawn_fill(fill, true, Vec::new());
    handle.set_threshold(4.0);
    handle.unpause();
    let (fill, outcome) = handle.join().unwrap();
    assert_eq!(outcome.reason, ExitReason::PointsExhausted);
    let artifact = fill.to_fill();
    assert!((artifact.threshold - 4.0).abs() < f32::EPSILON);
    assert!(artifact.voxels_within_threshold().count() > 1);
}
