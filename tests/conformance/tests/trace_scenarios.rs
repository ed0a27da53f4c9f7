//! Point-to-point conformance: exact costs on hand-checkable volumes,
//! admissibility against reference Dijkstra, bidirectional equivalence.

use std::sync::Arc;

use axon_search::control::Control;
use axon_search::cost::{ChannelCost, CostModel, ReciprocalCost, UniformCost};
use axon_search::engine::{AlternateSides, EngineConfig, ExitReason};
use axon_search::trace::TraceSearch;
use axon_tracer::volumes::{axial_gradient, bright_tube, uniform_cube};
use axon_volume::{Calibration, SampleBuffer, Volume};
use conformance_tests::{path_cost, reference_shortest_cost};

fn run_trace<C: CostModel>(trace: &mut TraceSearch<C>) -> axon_search::engine::SearchOutcome {
    let control = Control::new(false);
    trace.run(&control, &[])
}

fn cube_with_spacing(side: u32, spacing: (f64, f64, f64)) -> Arc<Volume> {
    let count = side as usize * side as usize * side as usize;
    Arc::new(
        Volume::new(
            side,
            side,
            side,
            SampleBuffer::U8(vec![255; count]),
            Calibration::new(spacing.0, spacing.1, spacing.2, "µm").unwrap(),
        )
        .unwrap(),
    )
}

#[test]
fn isotropic_cube_diagonal_costs_four_root_three() {
    let mut trace = TraceSearch::new(
        Arc::new(uniform_cube(5, 255).unwrap()),
        (0, 0, 0),
        (4, 4, 4),
        UniformCost { cost: 1.0 },
        EngineConfig::default(),
    )
    .unwrap();
    let outcome = run_trace(&mut trace);
    assert_eq!(outcome.reason, ExitReason::Success);
    let path = outcome.path.expect("success carries a path");
    assert_eq!(path.len(), 5, "four diagonal steps visit five voxels");
    let expected = 4.0 * 3.0_f64.sqrt();
    assert!(
        (path.physical_length() - expected).abs() < 1e-6,
        "diagonal cost {} != {expected}",
        path.physical_length()
    );
}

#[test]
fn anisotropic_spacing_changes_the_optimal_cost() {
    // Spacing (1,1,2): a full diagonal step costs sqrt(1+1+4) = sqrt(6),
    // still cheaper than splitting the z move off (sqrt(2) + 2), so the
    // optimum stays four full diagonals.
    let volume = cube_with_spacing(5, (1.0, 1.0, 2.0));
    let cost = UniformCost { cost: 1.0 };
    let mut trace = TraceSearch::new(
        Arc::clone(&volume),
        (0, 0, 0),
        (4, 4, 4),
        cost,
        EngineConfig::default(),
    )
    .unwrap();
    let outcome = run_trace(&mut trace);
    assert_eq!(outcome.reason, ExitReason::Success);
    let path = outcome.path.expect("success carries a path");
    let expected = 4.0 * 6.0_f64.sqrt();
    let actual = path_cost(&volume, &cost, &path);
    assert!(
        (actual - expected).abs() < 1e-6,
        "anisotropic cost {actual} != {expected}"
    );
    let reference = reference_shortest_cost(&volume, &cost, (0, 0, 0), (4, 4, 4));
    assert!((actual - reference).abs() < 1e-6);
}

#[test]
fn traced_cost_matches_reference_dijkstra_on_a_heterogeneous_volume() {
    // Bright tube with dark background: cheap corridor, expensive bulk.
    let volume = Arc::new(bright_tube(9, 5, 5, 2, 2, 20, 240).unwrap());
    let cost = ReciprocalCost::with_floor(ReciprocalCost::ADMISSIBLE_FLOOR);
    let start = (0, 4, 4);
    let goal = (8, 0, 0);
    // Forward-only A* with an admissible heuristic is provably optimal,
    // which is what makes the exact comparison against the reference fair.
    let mut trace = TraceSearch::new(
        Arc::clone(&volume),
        start,
        goal,
        cost,
        EngineConfig {
            bidirectional: false,
            ..EngineConfig::default()
        },
    )
    .unwrap();
    let outcome = run_trace(&mut trace);
    assert_eq!(outcome.reason, ExitReason::Success);
    let path = outcome.path.expect("success carries a path");
    let actual = path_cost(&volume, &cost, &path);
    let reference = reference_shortest_cost(&volume, &cost, start, goal);
    assert!(
        (actual - reference).abs() < 1e-6,
        "traced cost {actual} is not optimal, reference found {reference}"
    );
}

#[test]
fn sixteen_bit_normalization_matches_reference() {
    let volume = Arc::new(axial_gradient(6, 200, 4000).unwrap());
    let cost = ReciprocalCost::new();
    let start = (0, 0, 0);
    let goal = (5, 5, 5);
    let mut trace = TraceSearch::new(
        Arc::clone(&volume),
        start,
        goal,
        cost,
        EngineConfig {
            bidirectional: false,
            ..EngineConfig::default()
        },
    )
    .unwrap();
    let outcome = run_trace(&mut trace);
    assert_eq!(outcome.reason, ExitReason::Success);
    let path = outcome.path.expect("success carries a path");
    let actual = path_cost(&volume, &cost, &path);
    let reference = reference_shortest_cost(&volume, &cost, start, goal);
    assert!((actual - reference).abs() < 1e-6);
}

#[test]
fn bidirectional_and_unidirectional_costs_agree() {
    let volume = Arc::new(bright_tube(8, 4, 4, 1, 1, 30, 250).unwrap());
    let cost = ReciprocalCost::with_floor(ReciprocalCost::ADMISSIBLE_FLOOR);
    let costs: Vec<f64> = [true, false]
        .into_iter()
        .map(|bidirectional| {
            let mut trace = TraceSearch::new(
                Arc::clone(&volume),
                (0, 1, 1),
                (7, 2, 2),
                cost,
                EngineConfig {
                    bidirectional,
                    ..EngineConfig::default()
                },
            )
            .unwrap();
            let outcome = run_trace(&mut trace);
            assert_eq!(outcome.reason, ExitReason::Success);
            path_cost(&volume, &cost, &outcome.path.expect("path"))
        })
        .collect();
    assert!(
        (costs[0] - costs[1]).abs() < 1e-6,
        "bidirectional {} != unidirectional {}",
        costs[0],
        costs[1]
    );
}

#[test]
fn direction_policy_changes_expansion_order_not_cost() {
    let volume = Arc::new(uniform_cube(6, 255).unwrap());
    let cost = UniformCost { cost: 1.0 };
    let mut default_policy = TraceSearch::new(
        Arc::clone(&volume),
        (0, 0, 0),
        (5, 5, 5),
        cost,
        EngineConfig::default(),
    )
    .unwrap();
    let mut alternating = TraceSearch::new(
        Arc::clone(&volume),
        (0, 0, 0),
        (5, 5, 5),
        cost,
        EngineConfig::default(),
    )
    .unwrap();
    alternating.set_direction_policy(Box::new(AlternateSides));
    let a = run_trace(&mut default_policy);
    let b = run_trace(&mut alternating);
    assert_eq!(a.reason, ExitReason::Success);
    assert_eq!(b.reason, ExitReason::Success);
    let ca = path_cost(&volume, &cost, &a.path.expect("path"));
    let cb = path_cost(&volume, &cost, &b.path.expect("path"));
    assert!((ca - cb).abs() < 1e-6, "policy changed path cost: {ca} vs {cb}");
}

#[test]
fn zero_valued_voxels_are_expensive_but_traversable() {
    // An all-zero volume: every step pays the fallback cost, never NaN.
    let volume = Arc::new(uniform_cube(4, 0).unwrap());
    let cost = ReciprocalCost::new();
    let mut trace = TraceSearch::new(
        Arc::clone(&volume),
        (0, 0, 0),
        (3, 3, 3),
        cost,
        EngineConfig::default(),
    )
    .unwrap();
    let outcome = run_trace(&mut trace);
    assert_eq!(outcome.reason, ExitReason::Success);
    let path = outcome.path.expect("success carries a path");
    let actual = path_cost(&volume, &cost, &path);
    assert!(actual.is_finite());
    // Three diagonal steps, each at the fallback cost of 2.0.
    let expected = 3.0 * 3.0_f64.sqrt() * 2.0;
    assert!((actual - expected).abs() < 1e-6);
}

#[test]
fn timeout_is_reported_not_thrown() {
    let mut trace = TraceSearch::with_timeout(
        Arc::new(uniform_cube(12, 255).unwrap()),
        (0, 0, 0),
        (11, 11, 11),
        UniformCost { cost: 1.0 },
        std::time::Duration::ZERO,
    )
    .unwrap();
    let control = Control::new(false);
    let outcome = trace.run(&control, &[]);
    assert_eq!(outcome.reason, ExitReason::TimedOut);
    assert!(outcome.path.is_none());
}

#[test]
fn secondary_channel_steers_the_trace() {
    // Flat raw intensity, so only the tubeness channel distinguishes the
    // corridor at (y, z) = (2, 2) from the bulk.
    let volume = Arc::new(uniform_cube(5, 10).unwrap());
    let mut channel = vec![5.0_f32; volume.voxel_count()];
    for x in 0..5 {
        channel[volume.index_of(x, 2, 2)] = 250.0;
    }
    let cost = ChannelCost::new(&volume, channel, 4.0).unwrap();
    let start = (0, 2, 2);
    let goal = (4, 2, 2);
    let mut trace = TraceSearch::new(
        Arc::clone(&volume),
        start,
        goal,
        cost.clone(),
        EngineConfig {
            bidirectional: false,
            ..EngineConfig::default()
        },
    )
    .unwrap();
    let outcome = run_trace(&mut trace);
    assert_eq!(outcome.reason, ExitReason::Success);
    let path = outcome.path.expect("success carries a path");
    for point in path.points() {
        assert!(
            (point.y - 2.0).abs() < 1e-9 && (point.z - 2.0).abs() < 1e-9,
            "trace left the bright channel corridor at {point:?}"
        );
    }
    let actual = path_cost(&volume, &cost, &path);
    let reference = reference_shortest_cost(&volume, &cost, start, goal);
    assert!((actual - reference).abs() < 1e-6);
}
