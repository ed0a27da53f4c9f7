//! `Path`: an ordered, physically-calibrated point sequence.
//!
//! Built once from the final predecessor chains and independent of the
//! search engine afterward. Editing, circle fitting and join bookkeeping
//! belong to the consuming path manager, not here.

use axon_volume::Volume;

/// A single calibrated point: lattice position times per-axis spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Ordered calibrated point list with the spacing unit it was traced in.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    id: u64,
    points: Vec<PathPoint>,
    unit: String,
}

impl Path {
    #[must_use]
    pub fn new(id: u64, points: Vec<PathPoint>, unit: impl Into<String>) -> Self {
        Self {
            id,
            points,
            unit: unit.into(),
        }
    }

    /// Identifier assigned by the consuming path manager; fills reference
    /// their seed paths by it.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Total physical length along the point sequence.
    #[must_use]
    pub fn physical_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| {
                let dx = w[1].x - w[0].x;
                let dy = w[1].y - w[0].y;
                let dz = w[1].z - w[0].z;
                (dx * dx + dy * dy + dz * dz).sqrt()
            })
            .sum()
    }

    /// Map every point back onto the lattice, clamped to volume bounds.
    ///
    /// Calibrated points divided by spacing can round one voxel outside the
    /// volume at a face; clamping is the documented behavior for coordinates
    /// derived from floating-point path positions.
    #[must_use]
    pub fn lattice_points(&self, volume: &Volume) -> Vec<(u32, u32, u32)> {
        let cal = volume.calibration();
        self.points
            .iter()
            .map(|p| {
                volume.clamp_to_bounds(
                    p.x / cal.x_spacing(),
                    p.y / cal.y_spacing(),
                    p.z / cal.z_spacing(),
                )
            })
            .collect()
    }
}
