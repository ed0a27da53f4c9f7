//! Run transcripts: a listener that records every callback it receives.
//!
//! The engine is authoritative; the transcript is a derived view of one
//! run, kept for diagnostics and for asserting listener contracts in tests
//! (exactly one terminal report, nothing after it). It renders to JSON with
//! deterministically ordered keys so two identical runs produce identical
//! bytes.

use std::sync::{Arc, Mutex, MutexGuard};

use axon_search::control::{RunState, SearchListener};
use axon_search::engine::ExitReason;

/// One recorded callback, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranscriptEvent {
    StatusChanged { state: RunState },
    Progress { open: usize, closed: usize },
    FrontierAdvanced { distance: f32 },
    Finished { reason: ExitReason },
}

/// Records listener callbacks from the worker thread.
#[derive(Debug, Default)]
pub struct Transcript {
    events: Mutex<Vec<TranscriptEvent>>,
}

fn state_label(state: RunState) -> &'static str {
    match state {
        RunState::Paused => "PAUSED",
        RunState::Running => "RUNNING",
        RunState::Stopping => "STOPPING",
    }
}

impl Transcript {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn events_guard(&self) -> MutexGuard<'_, Vec<TranscriptEvent>> {
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<TranscriptEvent> {
        self.events_guard().clone()
    }

    /// The terminal reason, if the run has finished.
    #[must_use]
    pub fn finished_reason(&self) -> Option<ExitReason> {
        self.events_guard().iter().rev().find_map(|e| match e {
            TranscriptEvent::Finished { reason } => Some(*reason),
            _ => None,
        })
    }

    /// Render the transcript as JSON bytes with sorted keys.
    #[must_use]
    pub fn to_json_bytes(&self) -> Vec<u8> {
        let entries: Vec<serde_json::Value> = self
            .events_guard()
            .iter()
            .map(|event| match event {
                TranscriptEvent::StatusChanged { state } => serde_json::json!({
                    "kind": "status",
                    "state": state_label(*state),
                }),
                TranscriptEvent::Progress { open, closed } => serde_json::json!({
                    "closed": closed,
                    "kind": "progress",
                    "open": open,
                }),
                TranscriptEvent::FrontierAdvanced { distance } => serde_json::json!({
                    "distance": f64::from(*distance),
                    "kind": "frontier",
                }),
                TranscriptEvent::Finished { reason } => serde_json::json!({
                    "kind": "finished",
                    "reason": reason.as_str(),
                }),
            })
            .collect();
        let entry_count = entries.len();
        let transcript = serde_json::json!({
            "entries": entries,
            "entry_count": entry_count,
            "schema_version": "search_transcript.v1",
        });
        transcript.to_string().into_bytes()
    }
}

impl SearchListener for Transcript {
    fn points_in_search(&self, open: usize, closed: usize) {
        self.events_guard()
            .push(TranscriptEvent::Progress { open, closed });
    }

    fn status_changed(&self, state: RunState) {
        self.events_guard()
            .push(TranscriptEvent::StatusChanged { state });
    }

    fn finished(&self, reason: ExitReason) {
        self.events_guard()
            .push(TranscriptEvent::Finished { reason });
    }

    fn frontier_advanced(&self, distance: f32) {
        self.events_guard()
            .push(TranscriptEvent::FrontierAdvanced { distance });
    }
}
