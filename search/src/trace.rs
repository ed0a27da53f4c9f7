//! Point-to-point tracing: A* between two voxels.
//!
//! Wraps the generic engine with an [`Endpoints`] guide. The heuristic is
//! the calibrated straight-line distance to the opposite endpoint scaled by
//! the cost model's per-unit-distance floor; since no path can cover that
//! distance cheaper than the floor allows, the estimate never overestimates
//! and the first meeting of the frontiers is cost-optimal. A floor of zero
//! degrades gracefully to bidirectional Dijkstra.

use std::sync::Arc;
use std::time::Duration;

use axon_volume::{Calibration, Volume};

use crate::control::{Control, SearchListener};
use crate::cost::CostModel;
use crate::engine::{EngineConfig, Guide, SearchEngine, SearchOutcome};
use crate::error::SearchError;
use crate::node::Direction;

/// Guide for a two-endpoint search: admissible distance heuristic plus the
/// goal test used when running single-frontier.
#[derive(Debug, Clone)]
pub struct Endpoints {
    start: (u32, u32, u32),
    goal: (u32, u32, u32),
    calibration: Calibration,
    /// Lower bound on cost per unit of calibrated distance. Zero disables
    /// the heuristic.
    cost_floor: f64,
}

impl Endpoints {
    #[must_use]
    pub fn start(&self) -> (u32, u32, u32) {
        self.start
    }

    #[must_use]
    pub fn goal(&self) -> (u32, u32, u32) {
        self.goal
    }

    fn target_of(&self, direction: Direction) -> (u32, u32, u32) {
        match direction {
            Direction::FromStart => self.goal,
            Direction::FromGoal => self.start,
        }
    }
}

impl Guide for Endpoints {
    #[allow(clippy::cast_possible_truncation)]
    fn heuristic(&self, x: u32, y: u32, z: u32, direction: Direction) -> f32 {
        if self.cost_floor <= 0.0 {
            return 0.0;
        }
        let (tx, ty, tz) = self.target_of(direction);
        let distance = self.calibration.distance_between(x, y, z, tx, ty, tz);
        (distance * self.cost_floor) as f32
    }

    fn is_goal(&self, x: u32, y: u32, z: u32, direction: Direction) -> bool {
        (x, y, z) == self.target_of(direction)
    }
}

/// A configured point-to-point search, ready to run on a worker thread.
pub struct TraceSearch<C: CostModel> {
    engine: SearchEngine<C, Endpoints>,
}

impl<C: CostModel> std::fmt::Debug for TraceSearch<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceSearch").finish_non_exhaustive()
    }
}

impl<C: CostModel> TraceSearch<C> {
    /// Build a trace from `start` to `goal`, seeding both frontiers.
    ///
    /// # Errors
    ///
    /// - [`SearchError::CoordinateOutOfBounds`] if either endpoint lies
    ///   outside the volume
    /// - [`SearchError::AllocationFailed`] if the initial seeds cannot be
    ///   stored
    pub fn new(
        volume: Arc<Volume>,
        start: (u32, u32, u32),
        goal: (u32, u32, u32),
        cost: C,
        config: EngineConfig,
    ) -> Result<Self, SearchError> {
        for (x, y, z) in [start, goal] {
            if !volume.contains(x, y, z) {
                return Err(SearchError::CoordinateOutOfBounds {
                    x,
                    y,
                    z,
                    width: volume.width(),
                    height: volume.height(),
                    depth: volume.depth(),
                });
            }
        }
        let bidirectional = config.bidirectional;
        let guide = Endpoints {
            start,
            goal,
            calibration: volume.calibration().clone(),
            cost_floor: cost.minimum_cost_per_unit_distance(),
        };
        let mut engine = SearchEngine::new(volume, cost, guide, config);
        engine.add_seed(Direction::FromStart, start.0, start.1, start.2, 0.0)?;
        if bidirectional {
            engine.add_seed(Direction::FromGoal, goal.0, goal.1, goal.2, 0.0)?;
        }
        Ok(Self { engine })
    }

    /// Convenience constructor with a wall-clock budget.
    ///
    /// # Errors
    ///
    /// Same as [`TraceSearch::new`].
    pub fn with_timeout(
        volume: Arc<Volume>,
        start: (u32, u32, u32),
        goal: (u32, u32, u32),
        cost: C,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let config = EngineConfig {
            timeout: Some(timeout),
            ..EngineConfig::default()
        };
        Self::new(volume, start, goal, cost, config)
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        self.engine.guide()
    }

    /// Swap in a different frontier-selection policy.
    /// See [`SearchEngine::set_direction_policy`].
    pub fn set_direction_policy(&mut self, policy: Box<dyn crate::engine::DirectionPolicy>) {
        self.engine.set_direction_policy(policy);
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.engine.open_count()
    }

    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.engine.closed_count()
    }

    /// Run to completion. See [`SearchEngine::run`] for the control and
    /// listener contract.
    pub fn run(&mut self, control: &Control, listeners: &[Arc<dyn SearchListener>]) -> SearchOutcome {
        self.engine.run(control, listeners)
    }
}
