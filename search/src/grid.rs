//! Dense per-voxel node lookup.
//!
//! One grid per search direction answers "is this voxel already tracked
//! here?" in O(1). Slices are allocated lazily the first time the search
//! reaches their z-plane, which matters on volumes with hundreds of millions
//! of voxels where a trace may only ever touch a thin slab.

use crate::node::{AllocError, NodeId};

/// Lazily-allocated `voxel → NodeId` map for one search direction.
#[derive(Debug)]
pub struct VoxelGrid {
    width: u32,
    height: u32,
    slices: Vec<Option<Box<[Option<NodeId>]>>>,
}

impl VoxelGrid {
    /// Create an empty grid; no per-slice storage is allocated yet. The
    /// slice table itself is one pointer per z-plane.
    #[must_use]
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        let mut slices = Vec::new();
        slices.resize_with(depth as usize, || None);
        Self {
            width,
            height,
            slices,
        }
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32, z: u32) -> Option<NodeId> {
        let slice = self.slices[z as usize].as_ref()?;
        slice[(y as usize) * self.width as usize + x as usize]
    }

    /// Record the node tracked at a voxel, allocating its slice on demand.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the slice allocation fails.
    pub fn set(&mut self, x: u32, y: u32, z: u32, id: NodeId) -> Result<(), AllocError> {
        let index = z as usize;
        if self.slices[index].is_none() {
            let len = self.width as usize * self.height as usize;
            let mut v: Vec<Option<NodeId>> = Vec::new();
            v.try_reserve_exact(len).map_err(|_| AllocError)?;
            v.resize(len, None);
            self.slices[index] = Some(v.into_boxed_slice());
        }
        if let Some(slice) = &mut self.slices[index] {
            slice[(y as usize) * self.width as usize + x as usize] = Some(id);
        }
        Ok(())
    }

    /// Number of z-slices that have been materialized so far.
    #[must_use]
    pub fn allocated_slices(&self) -> usize {
        self.slices.iter().filter(|s| s.is_some()).count()
    }
}
