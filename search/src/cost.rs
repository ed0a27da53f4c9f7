//! Cost models: raw sample value → per-step traversal cost.
//!
//! The engine multiplies the returned cost by the physical length of the
//! lattice step, so a model only judges how traversable a voxel is, not how
//! far away it is. Bright voxels (likely neurite) must be cheap, dark voxels
//! expensive but never impassable -- a zero-valued voxel gets a fixed
//! fallback cost rather than a division by zero.

use axon_volume::sample::BitDepth;
use axon_volume::Volume;

use crate::error::SearchError;

/// Cost charged for entering a voxel whose (normalized) value is zero.
/// Keeps zero-valued voxels traversable but expensive, and keeps the
/// reciprocal finite.
pub const ZERO_VALUE_FALLBACK_COST: f64 = 2.0;

/// Converts a voxel into a positive per-unit-distance traversal cost.
pub trait CostModel {
    /// Cost of entering the voxel at `(x, y, z)`. Always positive and finite.
    fn cost_of_entering(&self, volume: &Volume, x: u32, y: u32, z: u32) -> f64;

    /// Lower bound on the cost per unit distance of any step.
    ///
    /// The engine floors every per-voxel cost at this value, and the
    /// point-to-point heuristic scales straight-line distance by it -- a
    /// positive floor is what makes that heuristic admissible. The default
    /// of zero degenerates A* to Dijkstra.
    fn minimum_cost_per_unit_distance(&self) -> f64 {
        0.0
    }
}

/// The default model: reciprocal of the 0-255 sample value.
///
/// 8-bit samples are used as-is; 16- and 32-bit samples are first normalized
/// into 0-255 using the whole-volume minimum and maximum captured at volume
/// construction.
#[derive(Debug, Clone, Copy)]
pub struct ReciprocalCost {
    minimum_cost: f64,
}

impl ReciprocalCost {
    /// The floor matching the reciprocal rule: no voxel can be cheaper than
    /// `1/255` per unit distance once its value is normalized into 0-255.
    pub const ADMISSIBLE_FLOOR: f64 = 1.0 / 255.0;

    #[must_use]
    pub fn new() -> Self {
        Self { minimum_cost: 0.0 }
    }

    /// Reciprocal cost with an explicit minimum-cost floor.
    #[must_use]
    pub fn with_floor(minimum_cost: f64) -> Self {
        Self { minimum_cost }
    }

    /// Normalize a raw sample into 0-255 according to bit depth.
    fn normalized_value(volume: &Volume, x: u32, y: u32, z: u32) -> f64 {
        let raw = volume.sample_at(x, y, z);
        match volume.bit_depth() {
            BitDepth::Eight => raw,
            BitDepth::Sixteen | BitDepth::ThirtyTwo => {
                let range = volume.stack_max() - volume.stack_min();
                if range <= 0.0 {
                    // Constant volume: every voxel normalizes to zero and
                    // pays the fallback cost.
                    0.0
                } else {
                    255.0 * (raw - volume.stack_min()) / range
                }
            }
        }
    }
}

impl Default for ReciprocalCost {
    fn default() -> Self {
        Self::new()
    }
}

impl CostModel for ReciprocalCost {
    fn cost_of_entering(&self, volume: &Volume, x: u32, y: u32, z: u32) -> f64 {
        let value = Self::normalized_value(volume, x, y, z);
        if value <= 0.0 {
            ZERO_VALUE_FALLBACK_COST
        } else {
            1.0 / value
        }
    }

    fn minimum_cost_per_unit_distance(&self) -> f64 {
        self.minimum_cost
    }
}

/// Cost from a precomputed secondary channel (e.g. a tubeness/vesselness
/// map), substituted for raw intensity when available. The channel is laid
/// out exactly like the volume's samples and scaled by a positive
/// `multiplier` before the reciprocal.
#[derive(Debug, Clone)]
pub struct ChannelCost {
    channel: Vec<f32>,
    multiplier: f64,
    minimum_cost: f64,
}

impl ChannelCost {
    /// Wrap a secondary cost channel.
    ///
    /// # Errors
    ///
    /// - [`SearchError::ChannelLengthMismatch`] if the channel is not one
    ///   value per voxel
    /// - [`SearchError::InvalidMultiplier`] if `multiplier` is not positive
    ///   and finite
    pub fn new(volume: &Volume, channel: Vec<f32>, multiplier: f64) -> Result<Self, SearchError> {
        if channel.len() != volume.voxel_count() {
            return Err(SearchError::ChannelLengthMismatch {
                expected: volume.voxel_count(),
                actual: channel.len(),
            });
        }
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(SearchError::InvalidMultiplier { value: multiplier });
        }
        Ok(Self {
            channel,
            multiplier,
            // Channel values act like 0-255 intensities after scaling, so
            // the same reciprocal bound applies, shrunk by the multiplier.
            minimum_cost: 1.0 / (256.0 * multiplier),
        })
    }
}

impl CostModel for ChannelCost {
    fn cost_of_entering(&self, volume: &Volume, x: u32, y: u32, z: u32) -> f64 {
        let value = self.multiplier * f64::from(self.channel[volume.index_of(x, y, z)]);
        if value <= 0.0 {
            ZERO_VALUE_FALLBACK_COST
        } else {
            1.0 / value
        }
    }

    fn minimum_cost_per_unit_distance(&self) -> f64 {
        self.minimum_cost
    }
}

/// Constant-cost model. Used by tests and benches where the expected path
/// cost must be computable by hand.
#[derive(Debug, Clone, Copy)]
pub struct UniformCost {
    pub cost: f64,
}

impl CostModel for UniformCost {
    fn cost_of_entering(&self, _volume: &Volume, _x: u32, _y: u32, _z: u32) -> f64 {
        self.cost
    }

    fn minimum_cost_per_unit_distance(&self) -> f64 {
        self.cost
    }
}
