//! Search nodes and the flat node arena.
//!
//! Every voxel the search touches gets one `SearchNode` per direction. Nodes
//! live in a flat arena and refer to their predecessor by arena index, so
//! relaxation is an index rewrite: no aliasing, no cycles to worry about,
//! and the arena serializes directly into a fill result.

/// Arena index of a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The frontier a node belongs to. Start-direction and goal-direction
/// bookkeeping are fully independent; the same voxel may hold one live node
/// in each, which is exactly how the meeting of two frontiers is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    FromStart,
    FromGoal,
}

impl Direction {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::FromStart => Self::FromGoal,
            Self::FromGoal => Self::FromStart,
        }
    }

    /// Index into per-direction engine state (`[start, goal]` pairs).
    #[must_use]
    pub fn side(self) -> usize {
        match self {
            Self::FromStart => 0,
            Self::FromGoal => 1,
        }
    }

    #[must_use]
    pub fn open_status(self) -> NodeStatus {
        match self {
            Self::FromStart => NodeStatus::OpenFromStart,
            Self::FromGoal => NodeStatus::OpenFromGoal,
        }
    }

    #[must_use]
    pub fn closed_status(self) -> NodeStatus {
        match self {
            Self::FromStart => NodeStatus::ClosedFromStart,
            Self::FromGoal => NodeStatus::ClosedFromGoal,
        }
    }
}

/// Node lifecycle tag. `Free` is the just-created state before a node is
/// entered into any frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Free,
    OpenFromStart,
    ClosedFromStart,
    OpenFromGoal,
    ClosedFromGoal,
}

impl NodeStatus {
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::OpenFromStart | Self::OpenFromGoal)
    }

    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::ClosedFromStart | Self::ClosedFromGoal)
    }
}

/// The per-voxel search record.
///
/// `g` accumulates from the node's own frontier origin (start or goal); `h`
/// estimates the remaining cost to the other side (zero in Dijkstra mode).
/// `f = g + h` exists only as the priority ordering and is always derived.
#[derive(Debug, Clone, Copy)]
pub struct SearchNode {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub g: f32,
    pub h: f32,
    pub predecessor: Option<NodeId>,
    pub status: NodeStatus,
}

impl SearchNode {
    #[must_use]
    pub fn new(x: u32, y: u32, z: u32, g: f32, h: f32, predecessor: Option<NodeId>) -> Self {
        Self {
            x,
            y,
            z,
            g,
            h,
            predecessor,
            status: NodeStatus::Free,
        }
    }

    /// Priority value: `g + h`. Lower is expanded first.
    #[must_use]
    pub fn f(&self) -> f32 {
        self.g + self.h
    }
}

/// Allocation failure while growing a search structure.
///
/// Surfaced to the run loop as `ExitReason::OutOfMemory` instead of letting
/// an infallible allocation abort the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl std::fmt::Display for AllocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "allocation failed while growing search state")
    }
}

impl std::error::Error for AllocError {}

/// Flat arena of every node the run has discovered. Nodes are never removed;
/// the whole arena is dropped with the search object.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node, reporting allocation failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the backing storage cannot grow.
    pub fn try_push(&mut self, node: SearchNode) -> Result<NodeId, AllocError> {
        if self.nodes.len() == self.nodes.capacity() {
            self.nodes
                .try_reserve(self.nodes.len().max(64))
                .map_err(|_| AllocError)?;
        }
        let id = u32::try_from(self.nodes.len()).map_err(|_| AllocError)?;
        self.nodes.push(node);
        Ok(NodeId(id))
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate `(id, node)` in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| {
            #[allow(clippy::cast_possible_truncation)]
            let id = NodeId(i as u32);
            (id, n)
        })
    }
}
