//! Cooperative run control: pause, resume, stop.
//!
//! Each search instance shares exactly one `Control` with its worker. The
//! state machine is PAUSED ⇄ RUNNING → STOPPING, with STOPPING terminal --
//! a stopped search object must not be reused. Requests arrive from any
//! thread; the worker observes them between relaxation steps, so
//! cancellation is cooperative, never preemptive. A paused worker parks on
//! the condition variable and is woken explicitly by any state change.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::engine::ExitReason;

/// Worker lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// The run loop has not started yet, or is parked between checks.
    Paused,
    /// The run loop is expanding nodes.
    Running,
    /// Terminal: the worker exits at its next state check.
    Stopping,
}

/// Shared pause/resume/stop cell: one mutex-guarded state plus a condvar
/// wake. All methods are safe to call from any thread.
#[derive(Debug)]
pub struct Control {
    state: Mutex<RunState>,
    wake: Condvar,
}

impl Control {
    #[must_use]
    pub fn new(start_paused: bool) -> Self {
        Self {
            state: Mutex::new(if start_paused {
                RunState::Paused
            } else {
                RunState::Running
            }),
            wake: Condvar::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        *self.lock()
    }

    /// Move unconditionally to STOPPING and wake a parked worker.
    pub fn request_stop(&self) {
        let mut state = self.lock();
        *state = RunState::Stopping;
        self.wake.notify_all();
    }

    /// RUNNING → PAUSED. Ignored once stopping.
    pub fn pause(&self) {
        let mut state = self.lock();
        if *state == RunState::Running {
            *state = RunState::Paused;
            self.wake.notify_all();
        }
    }

    /// PAUSED → RUNNING. Ignored once stopping.
    pub fn unpause(&self) {
        let mut state = self.lock();
        if *state == RunState::Paused {
            *state = RunState::Running;
            self.wake.notify_all();
        }
    }

    /// Toggle PAUSED ⇄ RUNNING. Ignored once stopping.
    pub fn toggle_pause(&self) {
        let mut state = self.lock();
        match *state {
            RunState::Paused => *state = RunState::Running,
            RunState::Running => *state = RunState::Paused,
            RunState::Stopping => return,
        }
        self.wake.notify_all();
    }

    /// Park for at most `max_wait` while paused, returning the state seen on
    /// wake. The bounded wait guarantees a stop request is observed within a
    /// bounded number of scheduler ticks even if a wakeup is missed.
    pub(crate) fn wait_while_paused(&self, max_wait: Duration) -> RunState {
        let state = self.lock();
        if *state != RunState::Paused {
            return *state;
        }
        match self
            .wake
            .wait_timeout_while(state, max_wait, |s| *s == RunState::Paused)
        {
            Ok((state, _)) => *state,
            Err(poisoned) => *poisoned.into_inner().0,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RunState> {
        // A poisoned control means a sibling thread panicked mid-transition;
        // the state itself is a plain enum and still meaningful.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Progress/finish callbacks, invoked from the worker thread.
///
/// Implementations must hand off to their own serialization mechanism before
/// touching UI state. The engine guarantees no callback fires after the
/// finish report, but makes no ordering promise relative to a concurrently
/// issued stop request.
pub trait SearchListener: Send + Sync {
    /// Periodic open/closed totals across both directions.
    fn points_in_search(&self, open: usize, closed: usize) {
        let _ = (open, closed);
    }

    /// The worker observed a state transition.
    fn status_changed(&self, state: RunState) {
        let _ = state;
    }

    /// Terminal report, exactly once per run.
    fn finished(&self, reason: ExitReason) {
        let _ = reason;
    }

    /// Fill only: the minimum `g` still open -- the radius within which the
    /// fill is guaranteed fully explored. Non-decreasing across a run.
    fn frontier_advanced(&self, distance: f32) {
        let _ = distance;
    }
}
