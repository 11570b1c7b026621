//! Display grid selection for a set of volumes under comparison.
//!
//! All loaded volumes are resampled onto one shared grid so that a single
//! cursor coordinate addresses every image. The viewer offers three
//! strategies, reproduced here: a world-space bounding box over all
//! volumes at the finest voxel resolution, the native grid of a chosen
//! volume, and an affine-ignoring "fit" grid for images with broken
//! header transforms.
use crate::affine::{self, Affine4};
use crate::error::{Result, VoxviewError};
use crate::volume::Volume;
use log::debug;
use nalgebra::Vector3;
use num_complex::Complex;

/// A target affine and shape shared by all volumes being displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGrid {
    /// Voxel-to-world affine of the display grid.
    pub affine: Affine4,
    /// Extents of the display grid.
    pub shape: [usize; 3],
}

impl DisplayGrid {
    /// Adopt the native grid of one volume.
    pub fn from_volume(volume: &Volume) -> DisplayGrid {
        DisplayGrid {
            affine: *volume.affine(),
            shape: volume.original_dim(),
        }
    }

    /// Build an axis-aligned grid covering the world-space bounding box of
    /// all volumes.
    ///
    /// The voxel edge is the finest resolution found in any volume (the
    /// smallest eigenvalue magnitude of its linear part), divided by the
    /// oversampling ratio. The grid origin sits at the lower bound of the
    /// union box and the shape is padded by one voxel so no extent can be
    /// zero.
    ///
    /// # Errors
    ///
    /// - `VoxviewError::NoVolumeData` when `volumes` is empty.
    /// - `VoxviewError::NonInvertibleAffine` for a singular volume affine.
    pub fn from_world_bounds(volumes: &[&Volume], oversampling: f32) -> Result<DisplayGrid> {
        if volumes.is_empty() {
            return Err(VoxviewError::NoVolumeData);
        }
        let edge = finest_voxel_edge(volumes) / oversampling;

        let mut bounds = volumes[0].world_bounds();
        for volume in &volumes[1..] {
            for (axis, (low, high)) in volume.world_bounds().iter().enumerate() {
                bounds[axis].0 = bounds[axis].0.min(*low);
                bounds[axis].1 = bounds[axis].1.max(*high);
            }
        }

        let mut grid_affine = Affine4::identity() * edge;
        grid_affine[(3, 3)] = 1.0;
        for axis in 0..3 {
            grid_affine[(axis, 3)] = bounds[axis].0;
        }

        let (linear, _) = affine::get_affine_and_translation(&grid_affine);
        let inverse = linear
            .try_inverse()
            .ok_or(VoxviewError::NonInvertibleAffine)?;
        let extent = Vector3::new(
            (bounds[0].1 - bounds[0].0).ceil(),
            (bounds[1].1 - bounds[1].0).ceil(),
            (bounds[2].1 - bounds[2].0).ceil(),
        );
        let dims = inverse * extent;
        // +1 keeps every extent positive even for flat bounding boxes
        let shape = [
            (dims[0].ceil() + 1.0) as usize,
            (dims[1].ceil() + 1.0) as usize,
            (dims[2].ceil() + 1.0) as usize,
        ];
        debug!("world-bounds grid: edge {}, shape {:?}", edge, shape);
        Ok(DisplayGrid {
            affine: grid_affine,
            shape,
        })
    }

    /// Build the affine-ignoring grid: identity affine, componentwise
    /// maximum shape over all volumes.
    pub fn fit(volumes: &[&Volume]) -> DisplayGrid {
        let mut shape = [1usize; 3];
        for volume in volumes {
            let dim = volume.original_dim();
            for axis in 0..3 {
                shape[axis] = shape[axis].max(dim[axis]);
            }
        }
        debug!("fit grid: shape {:?}", shape);
        DisplayGrid {
            affine: Affine4::identity(),
            shape,
        }
    }

    /// The scaling affine a volume assumes under the fit grid, stretching
    /// its own extents onto the grid's.
    pub fn fit_override(&self, volume: &Volume) -> Affine4 {
        let dim = volume.original_dim();
        let mut over = Affine4::identity();
        for axis in 0..3 {
            over[(axis, axis)] = self.shape[axis] as f32 / dim[axis] as f32;
        }
        over
    }
}

/// The finest voxel resolution over all volumes: the smallest eigenvalue
/// magnitude of any volume's linear affine part.
fn finest_voxel_edge(volumes: &[&Volume]) -> f32 {
    let mut finest = f32::INFINITY;
    for volume in volumes {
        let (linear, _) = affine::get_affine_and_translation(volume.affine());
        let eigenvalues: Vector3<Complex<f32>> = linear.complex_eigenvalues();
        for eigenvalue in eigenvalues.iter() {
            let magnitude = eigenvalue.norm();
            if magnitude < finest {
                finest = magnitude;
            }
        }
    }
    finest
}
