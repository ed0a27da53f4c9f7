//! Synthetic volumes for tests and benchmarks.
//!
//! Small, hand-checkable stacks: a uniform cube for exact-cost assertions,
//! a bright tube through dark background for "the trace must follow the
//! bright structure" assertions, and an axial gradient for normalization
//! checks on wider sample ranges.

use axon_volume::{Calibration, SampleBuffer, Volume, VolumeError};

/// A `side³` cube where every voxel holds `value`, unit isotropic spacing.
///
/// # Errors
///
/// Returns [`VolumeError`] if `side` is zero.
pub fn uniform_cube(side: u32, value: u8) -> Result<Volume, VolumeError> {
    let count = side as usize * side as usize * side as usize;
    Volume::new(
        side,
        side,
        side,
        SampleBuffer::U8(vec![value; count]),
        Calibration::unit_isotropic()?,
    )
}

/// A dark volume with one bright voxel row along the x axis at `(y, z)`.
///
/// # Errors
///
/// Returns [`VolumeError`] for empty dimensions.
pub fn bright_tube(
    width: u32,
    height: u32,
    depth: u32,
    y: u32,
    z: u32,
    background: u8,
    foreground: u8,
) -> Result<Volume, VolumeError> {
    let count = width as usize * height as usize * depth as usize;
    let mut samples = vec![background; count];
    let row_start = (z as usize * height as usize + y as usize) * width as usize;
    for x in 0..width as usize {
        samples[row_start + x] = foreground;
    }
    Volume::new(
        width,
        height,
        depth,
        SampleBuffer::U8(samples),
        Calibration::unit_isotropic()?,
    )
}

/// A 16-bit cube whose value grows linearly along x from `low` to `high`.
/// Exercises the whole-volume min/max normalization of wide sample ranges.
///
/// # Errors
///
/// Returns [`VolumeError`] if `side` is zero.
pub fn axial_gradient(side: u32, low: u16, high: u16) -> Result<Volume, VolumeError> {
    let count = side as usize * side as usize * side as usize;
    let mut samples = vec![0u16; count];
    let span = f64::from(high) - f64::from(low);
    let denominator = f64::from(side.saturating_sub(1).max(1));
    for (index, sample) in samples.iter_mut().enumerate() {
        let x = index % side as usize;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value =
            (f64::from(low) + span * (x as f64) / denominator).round() as u16;
        *sample = value;
    }
    Volume::new(
        side,
        side,
        side,
        SampleBuffer::U16(samples),
        Calibration::unit_isotropic()?,
    )
}
