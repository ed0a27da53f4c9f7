//! `SampleBuffer`: raw voxel samples at one of three bit depths.
//!
//! The engine treats every depth as `f64` at the read boundary; the cost
//! model decides how (and whether) to normalize. The variants correspond to
//! the 8-bit, 16-bit and 32-bit grayscale stacks the tracer accepts.

/// Raw voxel samples in x-fastest, z-slowest linear order.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleBuffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
}

/// The bit depth of a sample buffer, used by cost models to decide whether
/// range normalization is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// 8-bit samples are already in the 0-255 range.
    Eight,
    /// 16-bit samples are normalized with the whole-volume min/max.
    Sixteen,
    /// 32-bit float samples are normalized with the whole-volume min/max.
    ThirtyTwo,
}

impl SampleBuffer {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::F32(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn bit_depth(&self) -> BitDepth {
        match self {
            Self::U8(_) => BitDepth::Eight,
            Self::U16(_) => BitDepth::Sixteen,
            Self::F32(_) => BitDepth::ThirtyTwo,
        }
    }

    /// Raw sample at a linear index, widened to `f64`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; callers index through
    /// [`crate::Volume`], which bounds-checks lattice coordinates first.
    #[must_use]
    pub fn value_at(&self, index: usize) -> f64 {
        match self {
            Self::U8(v) => f64::from(v[index]),
            Self::U16(v) => f64::from(v[index]),
            Self::F32(v) => f64::from(v[index]),
        }
    }

    /// Whole-buffer `(min, max)` over all samples, widened to `f64`.
    ///
    /// Returns `(0.0, 0.0)` for an empty buffer; `Volume` construction
    /// rejects empty buffers before this matters.
    #[must_use]
    pub fn sample_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for i in 0..self.len() {
            let v = self.value_at(i);
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        if min > max {
            (0.0, 0.0)
        } else {
            (min, max)
        }
    }
}
