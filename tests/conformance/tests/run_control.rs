//! Run-control conformance: the pause/resume/stop protocol observed from
//! outside the worker thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axon_search::control::RunState;
use axon_search::cost::UniformCost;
use axon_search::engine::{EngineConfig, ExitReason};
use axon_search::trace::TraceSearch;
use axon_tracer::runner::spawn_trace;
use axon_tracer::transcript::{Transcript, TranscriptEvent};
use axon_tracer::volumes::uniform_cube;

fn corner_trace(side: u32) -> TraceSearch<UniformCost> {
    let far = side - 1;
    TraceSearch::new(
        Arc::new(uniform_cube(side, 255).unwrap()),
        (0, 0, 0),
        (far, far, far),
        UniformCost { cost: 1.0 },
        EngineConfig::default(),
    )
    .unwrap()
}

#[test]
fn stop_while_paused_unblocks_within_bounded_time() {
    let transcript = Transcript::new();
    let handle = spawn_trace(corner_trace(16), true, vec![transcript.clone()]);
    // Give the worker time to park on the paused control.
    std::thread::sleep(Duration::from_millis(30));
    assert!(!handle.is_finished(), "paused worker exited on its own");

    let stop_requested = Instant::now();
    let (trace, outcome) = handle.stop_and_join().unwrap();
    assert!(
        stop_requested.elapsed() < Duration::from_secs(2),
        "stop took {:?} to be observed",
        stop_requested.elapsed()
    );
    assert_eq!(outcome.reason, ExitReason::Cancelled);
    assert_eq!(trace.closed_count(), 0, "a paused worker expanded nodes");
    assert_eq!(transcript.finished_reason(), Some(ExitReason::Cancelled));
}

#[test]
fn pause_halts_expansion_and_unpause_resumes_it() {
    let handle = spawn_trace(corner_trace(24), true, Vec::new());
    std::thread::sleep(Duration::from_millis(20));
    // Still paused from spawn: nothing can have been expanded. Resume and
    // let it finish.
    handle.unpause();
    let (_, outcome) = handle.join().unwrap();
    assert_eq!(outcome.reason, ExitReason::Success);
    assert!(outcome.path.is_some());
}

#[test]
fn no_callback_follows_the_terminal_report() {
    let transcript = Transcript::new();
    let handle = spawn_trace(corner_trace(10), false, vec![transcript.clone()]);
    let (_, outcome) = handle.join().unwrap();
    assert_eq!(outcome.reason, ExitReason::Success);

    let events = transcript.events();
    let terminal = events
        .iter()
        .position(|e| matches!(e, TranscriptEvent::Finished { .. }))
        .expect("no terminal report");
    assert_eq!(terminal, events.len() - 1, "events recorded after finish");
}

#[test]
fn paused_spawn_reports_the_paused_status_first() {
    let transcript = Transcript::new();
    let handle = spawn_trace(corner_trace(8), true, vec![transcript.clone()]);
    std::thread::sleep(Duration::from_millis(20));
    handle.unpause();
    let (_, outcome) = handle.join().unwrap();
    assert_eq!(outcome.reason, ExitReason::Success);

    let states: Vec<RunState> = transcript
        .events()
        .iter()
        .filter_map(|e| match e {
            TranscriptEvent::StatusChanged { state } => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(states.first(), Some(&RunState::Paused));
    assert!(states.contains(&RunState::Running));
}

#[test]
fn stop_during_a_running_search_cancels_promptly() {
    // Large enough that the run cannot finish before the stop arrives.
    let handle = spawn_trace(corner_trace(48), false, Vec::new());
    std::thread::sleep(Duration::from_millis(5));
    let (_, outcome) = handle.stop_and_join().unwrap();
    // Either the stop landed mid-run or the trace won the race; both are
    // legal, but nothing else is.
    assert!(
        matches!(outcome.reason, ExitReason::Cancelled | ExitReason::Success),
        "unexpected exit reason {:?}",
        outcome.reason
    );
}
