//! Physical calibration: per-axis voxel spacing and the spacing unit.
//!
//! All costs and heuristics in the search engine are expressed in physical
//! units, so diagonal lattice steps cost more than axial steps in proportion
//! to the spacing. Zero or negative spacing is rejected at construction --
//! it would make step lengths meaningless and the A* heuristic inadmissible.

use crate::error::VolumeError;

/// Per-axis physical voxel spacing plus a unit label (e.g. `"µm"`).
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    x_spacing: f64,
    y_spacing: f64,
    z_spacing: f64,
    unit: String,
}

impl Calibration {
    /// Build a calibration, validating every spacing component.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidSpacing`] if any component is zero,
    /// negative, or non-finite.
    pub fn new(
        x_spacing: f64,
        y_spacing: f64,
        z_spacing: f64,
        unit: impl Into<String>,
    ) -> Result<Self, VolumeError> {
        for (axis, value) in [('x', x_spacing), ('y', y_spacing), ('z', z_spacing)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(VolumeError::InvalidSpacing { axis, value });
            }
        }
        Ok(Self {
            x_spacing,
            y_spacing,
            z_spacing,
            unit: unit.into(),
        })
    }

    /// Isotropic unit spacing with an empty unit label. Used by tests.
    ///
    /// # Errors
    ///
    /// Never fails; present for signature symmetry with [`Calibration::new`].
    pub fn unit_isotropic() -> Result<Self, VolumeError> {
        Self::new(1.0, 1.0, 1.0, "")
    }

    #[must_use]
    pub fn x_spacing(&self) -> f64 {
        self.x_spacing
    }

    #[must_use]
    pub fn y_spacing(&self) -> f64 {
        self.y_spacing
    }

    #[must_use]
    pub fn z_spacing(&self) -> f64 {
        self.z_spacing
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Physical length of a lattice step of `(dx, dy, dz)` voxels.
    #[must_use]
    pub fn step_length(&self, dx: i32, dy: i32, dz: i32) -> f64 {
        let px = f64::from(dx) * self.x_spacing;
        let py = f64::from(dy) * self.y_spacing;
        let pz = f64::from(dz) * self.z_spacing;
        (px * px + py * py + pz * pz).sqrt()
    }

    /// Physical Euclidean distance between two lattice coordinates.
    #[must_use]
    pub fn distance_between(
        &self,
        ax: u32,
        ay: u32,
        az: u32,
        bx: u32,
        by: u32,
        bz: u32,
    ) -> f64 {
        let dx = (f64::from(ax) - f64::from(bx)) * self.x_spacing;
        let dy = (f64::from(ay) - f64::from(by)) * self.y_spacing;
        let dz = (f64::from(az) - f64::from(bz)) * self.z_spacing;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Smallest spacing component across the three axes.
    #[must_use]
    pub fn min_spacing(&self) -> f64 {
        self.x_spacing.min(self.y_spacing).min(self.z_spacing)
    }
}
