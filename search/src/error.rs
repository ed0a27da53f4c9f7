//! Typed search errors.
//!
//! `SearchError` covers configuration failures only: they are detected at
//! construction time and surfaced synchronously to the caller. Runtime
//! terminations (timeout, cancellation, exhausted frontiers, allocation
//! failure) are expressed via [`crate::engine::ExitReason`] on the finish
//! report, never thrown mid-run.

/// Typed failure for search configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// A start, goal, or seed coordinate lies outside the volume.
    CoordinateOutOfBounds {
        x: u32,
        y: u32,
        z: u32,
        width: u32,
        height: u32,
        depth: u32,
    },
    /// A fill search was started with no seed voxels.
    NoSeedPoints,
    /// A secondary cost channel's length does not match the volume.
    ChannelLengthMismatch { expected: usize, actual: usize },
    /// The cost-scaling multiplier must be positive and finite.
    InvalidMultiplier { value: f64 },
    /// Allocation failed while seeding the search state.
    AllocationFailed,
    /// A fill entry's predecessor index does not refer to another entry.
    FillPredecessorOutOfRange {
        node: usize,
        predecessor: usize,
        count: usize,
    },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CoordinateOutOfBounds {
                x,
                y,
                z,
                width,
                height,
                depth,
            } => write!(
                f,
                "coordinate ({x},{y},{z}) outside volume {width}x{height}x{depth}"
            ),
            Self::NoSeedPoints => write!(f, "fill search needs at least one seed voxel"),
            Self::ChannelLengthMismatch { expected, actual } => write!(
                f,
                "cost channel has {actual} values but the volume has {expected} voxels"
            ),
            Self::InvalidMultiplier { value } => {
                write!(f, "cost multiplier must be positive and finite, got {value}")
            }
            Self::AllocationFailed => write!(f, "allocation failed while seeding search state"),
            Self::FillPredecessorOutOfRange {
                node,
                predecessor,
                count,
            } => write!(
                f,
                "fill entry {node} names predecessor {predecessor} but the fill has {count} entries"
            ),
        }
    }
}

impl std::error::Error for SearchError {}
