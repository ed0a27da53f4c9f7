//! `Volume`: a calibrated 3D image stack.
//!
//! Owns the samples, the dimensions, the physical calibration, and the
//! whole-volume sample range (computed once at construction -- 16/32-bit
//! cost normalization depends on it). The search engine only ever reads.

use crate::calibration::Calibration;
use crate::error::VolumeError;
use crate::sample::{BitDepth, SampleBuffer};

/// A read-only calibrated voxel volume.
#[derive(Debug, Clone)]
pub struct Volume {
    width: u32,
    height: u32,
    depth: u32,
    samples: SampleBuffer,
    calibration: Calibration,
    stack_min: f64,
    stack_max: f64,
}

impl Volume {
    /// Build a volume, validating dimensions against the sample count and
    /// capturing the whole-volume sample range.
    ///
    /// # Errors
    ///
    /// - [`VolumeError::EmptyDimension`] if any dimension is zero
    /// - [`VolumeError::SampleCountMismatch`] if the buffer length is not
    ///   `width * height * depth`
    /// - [`VolumeError::NonFiniteSample`] if a 32-bit buffer holds NaN/inf
    pub fn new(
        width: u32,
        height: u32,
        depth: u32,
        samples: SampleBuffer,
        calibration: Calibration,
    ) -> Result<Self, VolumeError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(VolumeError::EmptyDimension {
                width,
                height,
                depth,
            });
        }
        let expected = width as usize * height as usize * depth as usize;
        if samples.len() != expected {
            return Err(VolumeError::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }
        if let SampleBuffer::F32(values) = &samples {
            if let Some(index) = values.iter().position(|v| !v.is_finite()) {
                return Err(VolumeError::NonFiniteSample { index });
            }
        }
        let (stack_min, stack_max) = samples.sample_range();
        Ok(Self {
            width,
            height,
            depth,
            samples,
            calibration,
            stack_min,
            stack_max,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    #[must_use]
    pub fn bit_depth(&self) -> BitDepth {
        self.samples.bit_depth()
    }

    /// Whole-volume minimum sample value.
    #[must_use]
    pub fn stack_min(&self) -> f64 {
        self.stack_min
    }

    /// Whole-volume maximum sample value.
    #[must_use]
    pub fn stack_max(&self) -> f64 {
        self.stack_max
    }

    /// Number of voxels in the volume.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    #[must_use]
    pub fn contains(&self, x: u32, y: u32, z: u32) -> bool {
        x < self.width && y < self.height && z < self.depth
    }

    /// Linear index of a lattice coordinate (x-fastest order).
    #[must_use]
    pub fn index_of(&self, x: u32, y: u32, z: u32) -> usize {
        debug_assert!(self.contains(x, y, z));
        (z as usize * self.height as usize + y as usize) * self.width as usize + x as usize
    }

    /// Raw sample at a lattice coordinate, widened to `f64`.
    #[must_use]
    pub fn sample_at(&self, x: u32, y: u32, z: u32) -> f64 {
        self.samples.value_at(self.index_of(x, y, z))
    }

    /// Clamp physical-space-derived floating coordinates to lattice bounds.
    ///
    /// This is the one place coordinates are silently clamped rather than
    /// rejected: path points carry calibrated float positions, and rounding
    /// at a volume face may land one voxel outside.
    #[must_use]
    pub fn clamp_to_bounds(&self, fx: f64, fy: f64, fz: f64) -> (u32, u32, u32) {
        let clamp_axis = |v: f64, limit: u32| -> u32 {
            if v.is_nan() || v < 0.0 {
                return 0;
            }
            let rounded = v.round();
            let max = f64::from(limit - 1);
            if rounded > max {
                limit - 1
            } else {
                // rounded is non-negative and <= u32::MAX here
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    rounded as u32
                }
            }
        };
        (
            clamp_axis(fx, self.width),
            clamp_axis(fy, self.height),
            clamp_axis(fz, self.depth),
        )
    }
}
