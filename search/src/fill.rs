//! Threshold fill: multi-source Dijkstra from seed paths.
//!
//! A fill grows a single frontier outward from every voxel of one or more
//! already-traced paths at once, settling each reachable voxel at its
//! cheapest distance from the seed set. There is no goal; the run ends when
//! the frontier empties, which for a fill is normal completion rather than
//! a failure. The `threshold` is a selection radius, not a stopping rule:
//! it marks which settled voxels count as inside the fill, and an operator
//! may move it while the search is still running.
//!
//! The whole exploration state round-trips through the [`Fill`] value
//! object, so a long fill can be persisted and resumed exactly where it
//! left off.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axon_volume::Volume;

use crate::control::{Control, SearchListener};
use crate::cost::CostModel;
use crate::engine::{DijkstraGuide, EngineConfig, SearchEngine, SearchOutcome};
use crate::error::SearchError;
use crate::node::{AllocError, Direction, NodeId, SearchNode};
use crate::path::Path;

/// A mutable `f32` shared between the worker and its controller.
///
/// The worker only ever reads it and controllers only ever write it, so a
/// relaxed atomic over the bit pattern is all the synchronization needed.
#[derive(Debug)]
pub struct ThresholdCell {
    bits: AtomicU32,
}

impl ThresholdCell {
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    #[must_use]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    pub fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Which cost-model variant produced the fill's distances. Recorded in the
/// artifact so a reloaded fill knows how to interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMetric {
    /// Distances accumulated under the reciprocal-of-intensity cost.
    ReciprocalIntensity,
    /// Distances accumulated under the `256 - intensity` cost.
    InverseIntensity,
}

impl FillMetric {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReciprocalIntensity => "reciprocal-intensity",
            Self::InverseIntensity => "256-minus-intensity",
        }
    }

    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "reciprocal-intensity" => Some(Self::ReciprocalIntensity),
            "256-minus-intensity" => Some(Self::InverseIntensity),
            _ => None,
        }
    }
}

/// One serialized search node. `predecessor` indexes into the owning
/// [`Fill`]'s node list, never into live search state.
#[derive(Debug, Clone, PartialEq)]
pub struct FillNode {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub distance: f32,
    pub predecessor: Option<usize>,
    pub open: bool,
}

/// The persistable fill artifact: every explored voxel with its settled or
/// tentative distance, closed entries first, then the still-open frontier.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub nodes: Vec<FillNode>,
    pub threshold: f32,
    pub metric: FillMetric,
    /// Ids of the paths whose points seeded this fill.
    pub source_paths: Vec<u64>,
    pub spacing: (f64, f64, f64),
    pub unit: String,
}

impl Fill {
    /// Settled voxels within the recorded threshold, in list order.
    pub fn voxels_within_threshold(&self) -> impl Iterator<Item = &FillNode> {
        self.nodes
            .iter()
            .filter(|n| !n.open && n.distance <= self.threshold)
    }
}

/// A configured threshold-fill search.
pub struct FillSearch<C: CostModel> {
    engine: SearchEngine<C, DijkstraGuide>,
    threshold: Arc<ThresholdCell>,
    metric: FillMetric,
    source_paths: Vec<u64>,
}

impl<C: CostModel> std::fmt::Debug for FillSearch<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FillSearch").finish_non_exhaustive()
    }
}

impl<C: CostModel> FillSearch<C> {
    /// A fill always runs a single frontier; `config.bidirectional` is
    /// overridden.
    #[must_use]
    pub fn new(
        volume: Arc<Volume>,
        cost: C,
        metric: FillMetric,
        initial_threshold: f32,
        config: EngineConfig,
    ) -> Self {
        let config = EngineConfig {
            bidirectional: false,
            ..config
        };
        Self {
            engine: SearchEngine::new(volume, cost, DijkstraGuide, config),
            threshold: Arc::new(ThresholdCell::new(initial_threshold)),
            metric,
            source_paths: Vec::new(),
        }
    }

    /// Shared handle to the threshold, safe to write from any thread while
    /// the worker runs.
    #[must_use]
    pub fn threshold_cell(&self) -> Arc<ThresholdCell> {
        Arc::clone(&self.threshold)
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold.get()
    }

    pub fn set_threshold(&self, value: f32) {
        self.threshold.set(value);
    }

    #[must_use]
    pub fn metric(&self) -> FillMetric {
        self.metric
    }

    #[must_use]
    pub fn source_paths(&self) -> &[u64] {
        &self.source_paths
    }

    /// Seed a single voxel at distance zero.
    ///
    /// # Errors
    ///
    /// See [`SearchEngine::add_seed`].
    pub fn seed_voxel(&mut self, x: u32, y: u32, z: u32) -> Result<(), SearchError> {
        self.engine.add_seed(Direction::FromStart, x, y, z, 0.0)
    }

    /// Seed every lattice point along the given paths. The frontier then
    /// grows outward from the union of all of them at once, so the cheapest
    /// seed wins at every later voxel.
    ///
    /// # Errors
    ///
    /// - [`SearchError::NoSeedPoints`] if the paths contribute no voxels
    /// - [`SearchError::AllocationFailed`] if seeds cannot be stored
    pub fn seed_from_paths(&mut self, paths: &[Path]) -> Result<(), SearchError> {
        let mut seeded = false;
        for path in paths {
            for (x, y, z) in path.lattice_points(self.engine.volume()) {
                self.engine.add_seed(Direction::FromStart, x, y, z, 0.0)?;
                seeded = true;
            }
            self.source_paths.push(path.id());
        }
        if !seeded {
            return Err(SearchError::NoSeedPoints);
        }
        Ok(())
    }

    /// The accumulated distance at a voxel if the search has reached it.
    /// A `None` is "unreached"; an open node's distance is still tentative.
    #[must_use]
    pub fn distance_at(&self, x: u32, y: u32, z: u32) -> Option<f32> {
        self.engine
            .node_at(Direction::FromStart, x, y, z)
            .map(|n| n.g)
    }

    /// Minimum `g` among open nodes: the radius within which the fill is
    /// guaranteed fully explored. `None` once the frontier empties.
    #[must_use]
    pub fn frontier_distance(&self) -> Option<f32> {
        self.engine.frontier_distance()
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.engine.open_count()
    }

    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.engine.closed_count()
    }

    /// Run until the frontier empties or the run is stopped. A fill has no
    /// goal, so `PointsExhausted` is its normal completion and carries the
    /// fully explored state, not a failure.
    pub fn run(&mut self, control: &Control, listeners: &[Arc<dyn SearchListener>]) -> SearchOutcome {
        self.engine.run(control, listeners)
    }

    /// Snapshot the exploration state: closed nodes first, then open, with
    /// predecessor links rewritten as list indices. The ordering lets a
    /// reload split settled from still-exploring without re-running.
    #[must_use]
    pub fn to_fill(&self) -> Fill {
        let arena = self.engine.arena();
        let mut ordered: Vec<NodeId> = Vec::with_capacity(arena.len());
        ordered.extend(
            arena
                .iter()
                .filter(|(_, n)| n.status.is_closed())
                .map(|(id, _)| id),
        );
        ordered.extend(
            arena
                .iter()
                .filter(|(_, n)| n.status.is_open())
                .map(|(id, _)| id),
        );
        let mut index_of = vec![0usize; arena.len()];
        for (index, id) in ordered.iter().enumerate() {
            index_of[id.index()] = index;
        }
        let nodes = ordered
            .iter()
            .map(|&id| {
                let n = arena.get(id);
                FillNode {
                    x: n.x,
                    y: n.y,
                    z: n.z,
                    distance: n.g,
                    predecessor: n.predecessor.map(|p| index_of[p.index()]),
                    open: n.status.is_open(),
                }
            })
            .collect();
        let cal = self.engine.volume().calibration();
        Fill {
            nodes,
            threshold: self.threshold.get(),
            metric: self.metric,
            source_paths: self.source_paths.clone(),
            spacing: (cal.x_spacing(), cal.y_spacing(), cal.z_spacing()),
            unit: cal.unit().to_string(),
        }
    }

    /// Rehydrate a previously extracted fill into a live search that can
    /// resume from exactly where it left off.
    ///
    /// # Errors
    ///
    /// - [`SearchError::CoordinateOutOfBounds`] if an entry lies outside
    ///   `volume`
    /// - [`SearchError::FillPredecessorOutOfRange`] for a dangling
    ///   predecessor index
    /// - [`SearchError::AllocationFailed`] if the state cannot be rebuilt
    pub fn from_fill(
        volume: Arc<Volume>,
        cost: C,
        fill: &Fill,
        config: EngineConfig,
    ) -> Result<Self, SearchError> {
        let mut search = Self::new(volume, cost, fill.metric, fill.threshold, config);
        search.source_paths = fill.source_paths.clone();

        let mut ids: Vec<NodeId> = Vec::with_capacity(fill.nodes.len());
        for entry in &fill.nodes {
            if !search.engine.volume().contains(entry.x, entry.y, entry.z) {
                return Err(SearchError::CoordinateOutOfBounds {
                    x: entry.x,
                    y: entry.y,
                    z: entry.z,
                    width: search.engine.volume().width(),
                    height: search.engine.volume().height(),
                    depth: search.engine.volume().depth(),
                });
            }
            let node = SearchNode::new(entry.x, entry.y, entry.z, entry.distance, 0.0, None);
            let id = search
                .engine
                .insert_node(node, Direction::FromStart, entry.open)
                .map_err(|AllocError| SearchError::AllocationFailed)?;
            ids.push(id);
        }
        // Predecessors can point forward in the list, so they are linked in
        // a second pass once every id exists.
        for (index, entry) in fill.nodes.iter().enumerate() {
            if let Some(pred) = entry.predecessor {
                let Some(&pred_id) = ids.get(pred) else {
                    return Err(SearchError::FillPredecessorOutOfRange {
                        node: index,
                        predecessor: pred,
                        count: fill.nodes.len(),
                    });
                };
                search.engine.arena_mut().get_mut(ids[index]).predecessor = Some(pred_id);
            }
        }
        Ok(search)
    }
}
