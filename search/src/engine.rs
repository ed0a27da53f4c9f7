//! The bidirectional best-first core.
//!
//! One concrete engine runs both specializations: point-to-point tracing
//! injects a [`Guide`] with a Euclidean heuristic and a goal test,
//! threshold fill runs the default guide (Dijkstra: `h = 0`, no goal) over
//! a single frontier. Per direction the engine keeps an indexed open
//! frontier, a dense voxel → node lookup, and a closed count; all nodes of
//! both directions live in one flat arena.
//!
//! # Run loop contract
//!
//! Every iteration observes the shared [`Control`] state first: STOPPING
//! exits with `Cancelled` before the next relaxation, PAUSED parks on the
//! control's condvar. Timeout and progress reporting happen on a coarse
//! iteration cadence, not per relaxation, to bound synchronization overhead
//! on large volumes. Allocation failure while growing search state is
//! reported as `OutOfMemory` through the normal finish path instead of
//! taking the host process down.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axon_volume::Volume;

use crate::control::{Control, RunState, SearchListener};
use crate::cost::CostModel;
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::grid::VoxelGrid;
use crate::node::{AllocError, Direction, NodeArena, NodeId, SearchNode};
use crate::path::{Path, PathPoint};

/// How long a paused worker parks before re-checking its control state.
const PAUSE_WAIT: Duration = Duration::from_millis(100);

/// Why a run ended. Mutually exclusive; reported exactly once per run via
/// [`SearchListener::finished`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Goal reached or frontiers met; the outcome carries a path in
    /// point-to-point mode.
    Success,
    /// An external stop request was observed.
    Cancelled,
    /// The wall-clock timeout elapsed.
    TimedOut,
    /// Both frontiers emptied without success. For a fill this means the
    /// reachable volume is fully explored; for a trace it signals a seeding
    /// or connectivity bug.
    PointsExhausted,
    /// Allocation failed while growing search state.
    OutOfMemory,
}

impl ExitReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Cancelled => "CANCELLED",
            Self::TimedOut => "TIMED_OUT",
            Self::PointsExhausted => "POINTS_EXHAUSTED",
            Self::OutOfMemory => "OUT_OF_MEMORY",
        }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct SearchOutcome {
    pub reason: ExitReason,
    /// The spliced start→goal path; only ever present with
    /// [`ExitReason::Success`] in point-to-point mode.
    pub path: Option<Path>,
}

impl SearchOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.reason == ExitReason::Success
    }
}

/// Search strategy injected into the engine: heuristic and goal test.
///
/// The default methods give Dijkstra (zero heuristic, no goal), which is
/// exactly what the fill specialization needs.
pub trait Guide {
    /// Estimated remaining cost from a voxel to the *other* side of the
    /// `direction` it is being explored from. Must never overestimate.
    fn heuristic(&self, x: u32, y: u32, z: u32, direction: Direction) -> f32 {
        let _ = (x, y, z, direction);
        0.0
    }

    /// Whether popping this voxel in `direction` completes the search.
    fn is_goal(&self, x: u32, y: u32, z: u32, direction: Direction) -> bool {
        let _ = (x, y, z, direction);
        false
    }
}

/// The zero guide: plain Dijkstra with no defined goal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraGuide;

impl Guide for DijkstraGuide {}

/// Which frontier to expand next in bidirectional mode.
///
/// The selection rule is a load-balancing heuristic with no proven optimal
/// choice, so it is pluggable rather than hard-coded.
pub trait DirectionPolicy: Send {
    fn choose(&mut self, open_from_start: usize, open_from_goal: usize, iteration: u64)
        -> Direction;
}

/// Default policy: expand the side whose open set currently holds more
/// nodes, keeping both frontiers growing at comparable rates rather than
/// letting one balloon while the other starves.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargerOpenSide;

impl DirectionPolicy for LargerOpenSide {
    fn choose(
        &mut self,
        open_from_start: usize,
        open_from_goal: usize,
        _iteration: u64,
    ) -> Direction {
        if open_from_goal > open_from_start {
            Direction::FromGoal
        } else {
            Direction::FromStart
        }
    }
}

/// Strict round-robin between the two sides. Mostly useful to demonstrate
/// that the policy seam changes expansion order without changing path cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternateSides;

impl DirectionPolicy for AlternateSides {
    fn choose(
        &mut self,
        _open_from_start: usize,
        _open_from_goal: usize,
        iteration: u64,
    ) -> Direction {
        if iteration % 2 == 0 {
            Direction::FromStart
        } else {
            Direction::FromGoal
        }
    }
}

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Two frontiers meeting in the middle, or a single start-side frontier.
    pub bidirectional: bool,
    /// Wall-clock budget; `None` disables the check entirely.
    pub timeout: Option<Duration>,
    /// Iterations between coarse-grained timeout checks and progress
    /// reports.
    pub report_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bidirectional: true,
            timeout: None,
            report_interval: 1000,
        }
    }
}

/// One relaxation step's observable result.
enum Step {
    Continue,
    Exhausted,
    Found(Path),
}

/// The generic engine. `C` supplies per-voxel costs, `G` the heuristic and
/// goal test; both are resolved statically so the 26-neighbor inner loop
/// pays no dispatch.
pub struct SearchEngine<C: CostModel, G: Guide> {
    volume: Arc<Volume>,
    cost: C,
    guide: G,
    config: EngineConfig,
    policy: Box<dyn DirectionPolicy>,
    arena: NodeArena,
    open: [Frontier; 2],
    grids: [VoxelGrid; 2],
    closed: [usize; 2],
    iterations: u64,
    minimum_cost: f64,
}

impl<C: CostModel, G: Guide> SearchEngine<C, G> {
    #[must_use]
    pub fn new(volume: Arc<Volume>, cost: C, guide: G, config: EngineConfig) -> Self {
        let (w, h, d) = (volume.width(), volume.height(), volume.depth());
        let minimum_cost = cost.minimum_cost_per_unit_distance();
        Self {
            volume,
            cost,
            guide,
            config,
            policy: Box::new(LargerOpenSide),
            arena: NodeArena::new(),
            open: [Frontier::new(), Frontier::new()],
            grids: [VoxelGrid::new(w, h, d), VoxelGrid::new(w, h, d)],
            closed: [0, 0],
            iterations: 0,
            minimum_cost,
        }
    }

    /// Swap in a different frontier-selection policy.
    pub fn set_direction_policy(&mut self, policy: Box<dyn DirectionPolicy>) {
        self.policy = policy;
    }

    #[must_use]
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    #[must_use]
    pub fn guide(&self) -> &G {
        &self.guide
    }

    /// Insert a seed voxel as OPEN in the given direction with origin cost
    /// `g`. Duplicate seeds at the same voxel are ignored.
    ///
    /// # Errors
    ///
    /// - [`SearchError::CoordinateOutOfBounds`] for a seed outside the
    ///   volume
    /// - [`SearchError::AllocationFailed`] if search state cannot grow
    pub fn add_seed(&mut self, direction: Direction, x: u32, y: u32, z: u32, g: f32)
        -> Result<(), SearchError> {
        if !self.volume.contains(x, y, z) {
            return Err(SearchError::CoordinateOutOfBounds {
                x,
                y,
                z,
                width: self.volume.width(),
                height: self.volume.height(),
                depth: self.volume.depth(),
            });
        }
        if self.grids[direction.side()].get(x, y, z).is_some() {
            return Ok(());
        }
        let h = self.guide.heuristic(x, y, z, direction);
        let node = SearchNode::new(x, y, z, g, h, None);
        self.insert_node(node, direction, true)
            .map_err(|AllocError| SearchError::AllocationFailed)?;
        Ok(())
    }

    /// Arena-level insert used by seeding and fill rehydration: registers
    /// the node in the dense lookup and either the open frontier or the
    /// closed count.
    pub(crate) fn insert_node(
        &mut self,
        mut node: SearchNode,
        direction: Direction,
        open: bool,
    ) -> Result<NodeId, AllocError> {
        node.status = if open {
            direction.open_status()
        } else {
            direction.closed_status()
        };
        let (x, y, z) = (node.x, node.y, node.z);
        let id = self.arena.try_push(node)?;
        self.grids[direction.side()].set(x, y, z, id)?;
        if open {
            self.open[direction.side()].push(&self.arena, id)?;
        } else {
            self.closed[direction.side()] += 1;
        }
        Ok(id)
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open[0].len() + self.open[1].len()
    }

    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.closed[0] + self.closed[1]
    }

    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// The node tracked at a voxel in one direction, if any.
    #[must_use]
    pub fn node_at(&self, direction: Direction, x: u32, y: u32, z: u32) -> Option<&SearchNode> {
        if !self.volume.contains(x, y, z) {
            return None;
        }
        self.grids[direction.side()]
            .get(x, y, z)
            .map(|id| self.arena.get(id))
    }

    /// Minimum `g` among open nodes of the start direction -- the fill's
    /// "fully explored up to here" radius. `None` once the frontier empties.
    #[must_use]
    pub fn frontier_distance(&self) -> Option<f32> {
        self.open[0].peek_min_g(&self.arena)
    }

    pub(crate) fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub(crate) fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// Run to completion, observing `control` between relaxation steps.
    ///
    /// A stop request is honored within one relaxation step; a paused run
    /// parks on the control and re-checks on wake. Listener callbacks are
    /// invoked on the calling (worker) thread; the terminal
    /// [`SearchListener::finished`] fires exactly once and nothing follows
    /// it.
    pub fn run(&mut self, control: &Control, listeners: &[Arc<dyn SearchListener>]) -> SearchOutcome {
        let started = Instant::now();
        let mut last_state = None;
        loop {
            let state = control.state();
            if last_state != Some(state) {
                for listener in listeners {
                    listener.status_changed(state);
                }
                last_state = Some(state);
            }
            match state {
                RunState::Stopping => {
                    return self.finish(ExitReason::Cancelled, None, listeners);
                }
                RunState::Paused => {
                    control.wait_while_paused(PAUSE_WAIT);
                    continue;
                }
                RunState::Running => {}
            }

            // Coarse-grained: timeout and reporting are checked every
            // `report_interval` iterations, not per relaxation.
            if self.iterations % self.config.report_interval == 0 {
                if let Some(timeout) = self.config.timeout {
                    if started.elapsed() > timeout {
                        return self.finish(ExitReason::TimedOut, None, listeners);
                    }
                }
                for listener in listeners {
                    listener.points_in_search(self.open_count(), self.closed_count());
                }
                if !self.config.bidirectional {
                    if let Some(distance) = self.frontier_distance() {
                        for listener in listeners {
                            listener.frontier_advanced(distance);
                        }
                    }
                }
            }
            self.iterations += 1;

            match self.step() {
                Ok(Step::Continue) => {}
                Ok(Step::Exhausted) => {
                    return self.finish(ExitReason::PointsExhausted, None, listeners);
                }
                Ok(Step::Found(path)) => {
                    return self.finish(ExitReason::Success, Some(path), listeners);
                }
                Err(AllocError) => {
                    return self.finish(ExitReason::OutOfMemory, None, listeners);
                }
            }
        }
    }

    fn finish(
        &self,
        reason: ExitReason,
        path: Option<Path>,
        listeners: &[Arc<dyn SearchListener>],
    ) -> SearchOutcome {
        for listener in listeners {
            listener.finished(reason);
        }
        SearchOutcome { reason, path }
    }

    fn choose_direction(&mut self) -> Option<Direction> {
        if !self.config.bidirectional {
            return (!self.open[0].is_empty()).then_some(Direction::FromStart);
        }
        let preferred = self
            .policy
            .choose(self.open[0].len(), self.open[1].len(), self.iterations);
        [preferred, preferred.opposite()]
            .into_iter()
            .find(|d| !self.open[d.side()].is_empty())
    }

    /// Pop the best open node of the selected direction and relax its 26
    /// neighbors.
    #[allow(clippy::cast_possible_truncation)]
    fn step(&mut self) -> Result<Step, AllocError> {
        let Some(direction) = self.choose_direction() else {
            return Ok(Step::Exhausted);
        };
        let Some(p_id) = self.open[direction.side()].pop_min(&self.arena) else {
            return Ok(Step::Exhausted);
        };
        let (px, py, pz, pg) = {
            let p = self.arena.get(p_id);
            (p.x, p.y, p.z, p.g)
        };

        if self.guide.is_goal(px, py, pz, direction) {
            return Ok(Step::Found(self.single_direction_path(p_id, direction)));
        }

        self.arena.get_mut(p_id).status = direction.closed_status();
        self.closed[direction.side()] += 1;

        let cal = self.volume.calibration().clone();
        for dz in -1i32..=1 {
            let nz = i64::from(pz) + i64::from(dz);
            if nz < 0 || nz >= i64::from(self.volume.depth()) {
                continue;
            }
            for dx in -1i32..=1 {
                let nx = i64::from(px) + i64::from(dx);
                if nx < 0 || nx >= i64::from(self.volume.width()) {
                    continue;
                }
                for dy in -1i32..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    let ny = i64::from(py) + i64::from(dy);
                    if ny < 0 || ny >= i64::from(self.volume.height()) {
                        continue;
                    }
                    let (nx, ny, nz) = (nx as u32, ny as u32, nz as u32);

                    let mut move_cost = self.cost.cost_of_entering(&self.volume, nx, ny, nz);
                    if move_cost < self.minimum_cost {
                        move_cost = self.minimum_cost;
                    }
                    let g_new = pg + (cal.step_length(dx, dy, dz) * move_cost) as f32;
                    let h_new = self.guide.heuristic(nx, ny, nz, direction);
                    let f_new = g_new + h_new;

                    match self.grids[direction.side()].get(nx, ny, nz) {
                        None => {
                            let node = SearchNode::new(nx, ny, nz, g_new, h_new, Some(p_id));
                            self.insert_node(node, direction, true)?;
                        }
                        Some(existing) => {
                            // Strictly better f: improve in place. A CLOSED
                            // node moves back to OPEN -- leaving it closed
                            // with a stale g would break closure finality.
                            if f_new < self.arena.get(existing).f() {
                                let was_closed = self.arena.get(existing).status.is_closed();
                                let node = self.arena.get_mut(existing);
                                node.g = g_new;
                                node.h = h_new;
                                node.predecessor = Some(p_id);
                                node.status = direction.open_status();
                                if was_closed {
                                    self.closed[direction.side()] -= 1;
                                    self.open[direction.side()].push(&self.arena, existing)?;
                                } else {
                                    self.open[direction.side()]
                                        .reprioritize(&self.arena, existing);
                                }
                            }
                        }
                    }

                    if self.config.bidirectional {
                        if let Some(other) = self.grids[direction.opposite().side()].get(nx, ny, nz)
                        {
                            if self.arena.get(other).status.is_closed() {
                                return Ok(Step::Found(self.spliced_path(
                                    p_id, other, direction,
                                )));
                            }
                        }
                    }
                }
            }
        }
        Ok(Step::Continue)
    }

    /// Predecessor chain from `id` back to its frontier origin, in
    /// node→origin order.
    fn chain_to_origin(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.arena.get(node_id).predecessor;
        }
        chain
    }

    fn calibrated_point(&self, id: NodeId) -> PathPoint {
        let node = self.arena.get(id);
        let cal = self.volume.calibration();
        PathPoint {
            x: f64::from(node.x) * cal.x_spacing(),
            y: f64::from(node.y) * cal.y_spacing(),
            z: f64::from(node.z) * cal.z_spacing(),
        }
    }

    fn path_from_ids(&self, ids: impl Iterator<Item = NodeId>) -> Path {
        let points = ids.map(|id| self.calibrated_point(id)).collect();
        Path::new(0, points, self.volume.calibration().unit())
    }

    /// Path for a goal reached by a single frontier. A start-direction chain
    /// is reversed into start→goal order; a goal-direction chain already
    /// runs from the goal test's location back to the goal seed.
    fn single_direction_path(&self, id: NodeId, direction: Direction) -> Path {
        let chain = self.chain_to_origin(id);
        match direction {
            Direction::FromStart => self.path_from_ids(chain.into_iter().rev()),
            Direction::FromGoal => self.path_from_ids(chain.into_iter()),
        }
    }

    /// Splice the two frontiers' chains where they met: the popped node `p`
    /// (in `direction`) is adjacent to `other`, a closed node of the
    /// opposite direction. The result always runs start→goal.
    fn spliced_path(&self, p: NodeId, other: NodeId, direction: Direction) -> Path {
        let (start_side, goal_side) = match direction {
            Direction::FromStart => (p, other),
            Direction::FromGoal => (other, p),
        };
        let ids = self
            .chain_to_origin(start_side)
            .into_iter()
            .rev()
            .chain(self.chain_to_origin(goal_side));
        self.path_from_ids(ids)
    }
}
