//! Typed construction errors for volumes and calibrations.
//!
//! All variants are configuration errors in the sense of the tracing
//! engine's error taxonomy: they are detected synchronously at construction
//! time and never deferred to the search loop.

/// Typed failure for volume/calibration construction.
#[derive(Debug, Clone, PartialEq)]
pub enum VolumeError {
    /// A physical spacing component was zero, negative, or non-finite.
    InvalidSpacing { axis: char, value: f64 },
    /// One of the volume dimensions was zero.
    EmptyDimension { width: u32, height: u32, depth: u32 },
    /// The sample buffer length does not match `width * height * depth`.
    SampleCountMismatch { expected: usize, actual: usize },
    /// A 32-bit volume contained a non-finite sample.
    NonFiniteSample { index: usize },
}

impl std::fmt::Display for VolumeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSpacing { axis, value } => {
                write!(f, "{axis}-spacing must be positive and finite, got {value}")
            }
            Self::EmptyDimension {
                width,
                height,
                depth,
            } => {
                write!(f, "volume dimensions must be non-zero, got {width}x{height}x{depth}")
            }
            Self::SampleCountMismatch { expected, actual } => {
                write!(f, "expected {expected} samples for the stated dimensions, got {actual}")
            }
            Self::NonFiniteSample { index } => {
                write!(f, "non-finite sample at linear index {index}")
            }
        }
    }
}

impl std::error::Error for VolumeError {}
