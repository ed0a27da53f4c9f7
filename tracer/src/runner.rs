//! Worker-thread orchestration for searches.
//!
//! Each search instance owns exactly one dedicated worker thread; no search
//! state is shared between concurrently running searches. The spawning
//! caller keeps a handle carrying the shared [`Control`] (and, for fills,
//! the shared threshold cell), so pause/unpause/stop/set-threshold are safe
//! from any thread while the worker runs. Joining the handle returns the
//! search object together with its outcome, so a finished fill can be
//! extracted into an artifact and a finished trace inspected.
//!
//! A worker panic is contained at the thread boundary and surfaced as
//! [`RunError::WorkerPanicked`], never propagated into the caller.

use std::sync::Arc;
use std::thread::JoinHandle;

use axon_search::control::{Control, SearchListener};
use axon_search::cost::CostModel;
use axon_search::engine::SearchOutcome;
use axon_search::fill::{FillSearch, ThresholdCell};
use axon_search::trace::TraceSearch;

/// Error from the runner layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunError {
    /// The worker thread panicked; its search state is gone.
    WorkerPanicked,
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkerPanicked => write!(f, "search worker thread panicked"),
        }
    }
}

impl std::error::Error for RunError {}

/// Handle to a search running on its own worker thread.
///
/// `T` is the search object itself, handed back by [`SearchHandle::join`]
/// once the worker finishes.
pub struct SearchHandle<T: Send + 'static> {
    control: Arc<Control>,
    worker: Option<JoinHandle<(T, SearchOutcome)>>,
}

impl<T: Send + 'static> SearchHandle<T> {
    fn spawn<F>(start_paused: bool, run: F) -> Self
    where
        F: FnOnce(&Control) -> (T, SearchOutcome) + Send + 'static,
    {
        let control = Arc::new(Control::new(start_paused));
        let worker_control = Arc::clone(&control);
        let worker = std::thread::spawn(move || run(&worker_control));
        Self {
            control,
            worker: Some(worker),
        }
    }

    /// The shared control cell, for callers that want to hold their own
    /// reference to it.
    #[must_use]
    pub fn control(&self) -> Arc<Control> {
        Arc::clone(&self.control)
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn unpause(&self) {
        self.control.unpause();
    }

    /// Request a cooperative stop. The worker observes it within one
    /// relaxation step, or on its next wake if it is parked paused.
    pub fn request_stop(&self) {
        self.control.request_stop();
    }

    /// Whether the worker has exited. Non-blocking.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the worker and take back the search with its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::WorkerPanicked`] if the worker thread panicked.
    pub fn join(mut self) -> Result<(T, SearchOutcome), RunError> {
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| RunError::WorkerPanicked),
            None => Err(RunError::WorkerPanicked),
        }
    }

    /// Request a stop and wait for the worker to exit.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::WorkerPanicked`] if the worker thread panicked.
    pub fn stop_and_join(self) -> Result<(T, SearchOutcome), RunError> {
        self.request_stop();
        self.join()
    }
}

/// Start a point-to-point trace on its own worker thread.
#[must_use]
pub fn spawn_trace<C>(
    mut trace: TraceSearch<C>,
    start_paused: bool,
    listeners: Vec<Arc<dyn SearchListener>>,
) -> SearchHandle<TraceSearch<C>>
where
    C: CostModel + Send + 'static,
{
    SearchHandle::spawn(start_paused, move |control| {
        let outcome = trace.run(control, &listeners);
        (trace, outcome)
    })
}

/// Handle to a running fill: the generic handle plus the shared threshold.
pub struct FillHandle<C: CostModel + Send + 'static> {
    handle: SearchHandle<FillSearch<C>>,
    threshold: Arc<ThresholdCell>,
}

impl<C: CostModel + Send + 'static> FillHandle<C> {
    #[must_use]
    pub fn control(&self) -> Arc<Control> {
        self.handle.control()
    }

    pub fn pause(&self) {
        self.handle.pause();
    }

    pub fn unpause(&self) {
        self.handle.unpause();
    }

    pub fn request_stop(&self) {
        self.handle.request_stop();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Move the fill's selection threshold while the worker runs.
    pub fn set_threshold(&self, value: f32) {
        self.threshold.set(value);
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold.get()
    }

    /// Wait for the worker and take back the fill with its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::WorkerPanicked`] if the worker thread panicked.
    pub fn join(self) -> Result<(FillSearch<C>, SearchOutcome), RunError> {
        self.handle.join()
    }

    /// Request a stop and wait for the worker to exit.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::WorkerPanicked`] if the worker thread panicked.
    pub fn stop_and_join(self) -> Result<(FillSearch<C>, SearchOutcome), RunError> {
        self.handle.stop_and_join()
    }
}

/// Start a threshold fill on its own worker thread.
#[must_use]
pub fn spawn_fill<C>(
    mut fill: FillSearch<C>,
    start_paused: bool,
    listeners: Vec<Arc<dyn SearchListener>>,
) -> FillHandle<C>
where
    C: CostModel + Send + 'static,
{
    let threshold = fill.threshold_cell();
    let handle = SearchHandle::spawn(start_paused, move |control| {
        let outcome = fill.run(control, &listeners);
        (fill, outcome)
    });
    FillHandle { handle, threshold }
}
