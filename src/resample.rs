//! Affine resampling of voxel volumes onto a target grid.
//!
//! The resampler takes a source 3D array and a voxel-to-voxel mapping (see
//! [`compose_mapping`]) and reconstructs the volume on a dense target grid
//! of the requested shape. For each target index `o`, the source is sampled
//! at `A * o + b` where `[A|b]` is the mapping. Samples falling outside the
//! source grid read as zero, so a volume resampled onto a larger display
//! grid is padded with background.
//!
//! Only two interpolation orders exist in the viewer: nearest-neighbor and
//! trilinear. Higher spline orders are never requested.
//!
//! [`compose_mapping`]: ../affine/fn.compose_mapping.html
use crate::affine::{get_affine_and_translation, Affine4};
use crate::error::{Result, VoxviewError};
use log::debug;
use ndarray::{Array3, ArrayView3};
use nalgebra::Vector3;

/// The interpolation kind used when sampling the source volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Order 0: round to the nearest source voxel.
    Nearest,
    /// Order 1: trilinear blend of the 8 surrounding voxels.
    Linear,
}

impl Interpolation {
    /// Interpret a numeric interpolation order (0 = nearest, 1 = linear).
    pub fn from_order(order: u8) -> Option<Interpolation> {
        match order {
            0 => Some(Interpolation::Nearest),
            1 => Some(Interpolation::Linear),
            _ => None,
        }
    }
}

impl Default for Interpolation {
    fn default() -> Interpolation {
        Interpolation::Nearest
    }
}

/// Resample a volume onto a target grid through an affine voxel mapping.
///
/// `mapping` takes target voxel indices to source voxel indices. The output
/// is always a dense array of exactly `shape`.
///
/// # Errors
///
/// - `VoxviewError::InvalidShape` if any extent of `shape` is zero.
pub fn resample(
    source: ArrayView3<f32>,
    mapping: &Affine4,
    shape: [usize; 3],
    interpolation: Interpolation,
) -> Result<Array3<f32>> {
    if shape.iter().any(|&extent| extent == 0) {
        return Err(VoxviewError::InvalidShape(shape));
    }
    let (linear, offset) = get_affine_and_translation(mapping);
    debug!(
        "resampling {:?} -> {:?} ({:?})",
        source.dim(),
        shape,
        interpolation
    );

    let mut output = Array3::zeros(shape);
    for ((i, j, k), voxel) in output.indexed_iter_mut() {
        let p = linear * Vector3::new(i as f32, j as f32, k as f32) + offset;
        *voxel = match interpolation {
            Interpolation::Nearest => sample_nearest(&source, &p),
            Interpolation::Linear => sample_linear(&source, &p),
        };
    }
    Ok(output)
}

fn sample_nearest(source: &ArrayView3<f32>, p: &Vector3<f32>) -> f32 {
    let (da, db, dc) = source.dim();
    let dims = [da, db, dc];
    let mut index = [0usize; 3];
    for axis in 0..3 {
        let rounded = (p[axis] + 0.5).floor();
        if rounded < 0.0 || rounded >= dims[axis] as f32 {
            return 0.0;
        }
        index[axis] = rounded as usize;
    }
    source[index]
}

fn sample_linear(source: &ArrayView3<f32>, p: &Vector3<f32>) -> f32 {
    let (da, db, dc) = source.dim();
    let dims = [da as isize, db as isize, dc as isize];
    let mut base = [0isize; 3];
    let mut frac = [0f32; 3];
    for axis in 0..3 {
        let floor = p[axis].floor();
        base[axis] = floor as isize;
        frac[axis] = p[axis] - floor;
    }

    let mut value = 0.0;
    for corner in 0..8u8 {
        let mut weight = 1.0;
        let mut index = [0usize; 3];
        let mut inside = true;
        for axis in 0..3 {
            let step = isize::from((corner >> axis) & 1);
            let c = base[axis] + step;
            weight *= if step == 1 {
                frac[axis]
            } else {
                1.0 - frac[axis]
            };
            if c < 0 || c >= dims[axis] {
                inside = false;
            } else {
                index[axis] = c as usize;
            }
        }
        // neighbors beyond the grid contribute the zero background
        if inside {
            value += weight * source[index];
        }
    }
    value
}
