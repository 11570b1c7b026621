//! Affine transform helpers for voxel-to-world mappings.
//!
//! Every volume carries a 4x4 affine mapping homogeneous voxel indices to
//! world (scanner) coordinates. Resampling composes two of these into a
//! single voxel-to-voxel mapping, so the operations here are the split into
//! linear part and translation, checked inversion, and the corner-box world
//! bounds used to build a shared display grid.
use crate::error::{Result, VoxviewError};
use nalgebra::{Matrix3, Matrix4, Scalar, Vector3, Vector4};

/// A 3x3 single precision matrix, the linear part of an affine.
pub type Affine3 = Matrix3<f32>;
/// A 4x4 single precision affine transform in homogeneous coordinates.
pub type Affine4 = Matrix4<f32>;

/// Separate a 4x4 affine into its 3x3 linear and translation components.
pub fn get_affine_and_translation<T>(affine: &Matrix4<T>) -> (Matrix3<T>, Vector3<T>)
where
    T: Scalar + Copy,
{
    let translation = Vector3::new(affine[12], affine[13], affine[14]);
    let affine = affine.fixed_view::<3, 3>(0, 0).into_owned();
    (affine, translation)
}

/// Get the affine implied by the given shape and voxel spacing.
///
/// The translation puts the world origin at the center of the grid. This is
/// the fall-back transform for volumes whose header carries no usable
/// affine, with the first axis flipped as in the NIfTI convention.
pub fn shape_zoom_affine(shape: &[usize; 3], spacing: &[f32; 3]) -> Affine4 {
    let origin = Vector3::new(
        (shape[0] as f32 - 1.0) / 2.0,
        (shape[1] as f32 - 1.0) / 2.0,
        (shape[2] as f32 - 1.0) / 2.0,
    );
    let spacing = [-spacing[0], spacing[1], spacing[2]];
    Affine4::new(
        spacing[0], 0.0, 0.0, -origin[0] * spacing[0],
        0.0, spacing[1], 0.0, -origin[1] * spacing[1],
        0.0, 0.0, spacing[2], -origin[2] * spacing[2],
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Invert an affine, failing when its linear part is singular.
///
/// # Errors
///
/// - `VoxviewError::NonInvertibleAffine` if no inverse exists.
pub fn invert(affine: &Affine4) -> Result<Affine4> {
    affine
        .try_inverse()
        .ok_or(VoxviewError::NonInvertibleAffine)
}

/// Compose the voxel-to-voxel mapping used for resampling.
///
/// The result takes indices of the target (display) grid to indices of the
/// source grid: `inverse(source_affine) * target_affine`.
pub fn compose_mapping(source_affine: &Affine4, target_affine: &Affine4) -> Result<Affine4> {
    Ok(invert(source_affine)? * target_affine)
}

/// Apply an affine to a 3-coordinate in homogeneous form.
pub fn apply(affine: &Affine4, coords: [f32; 3]) -> Vector3<f32> {
    let v = affine * Vector4::new(coords[0], coords[1], coords[2], 1.0);
    Vector3::new(v[0], v[1], v[2])
}

/// Compute the world-space bounding interval of a voxel grid, per axis.
///
/// The 8 corner vertices of the grid are mapped through the affine and the
/// componentwise minimum and maximum are taken.
pub fn world_bounds(affine: &Affine4, shape: &[usize; 3]) -> [(f32, f32); 3] {
    let a = (shape[0] - 1) as f32;
    let b = (shape[1] - 1) as f32;
    let c = (shape[2] - 1) as f32;
    let corners = [
        [0.0, 0.0, 0.0],
        [a, 0.0, 0.0],
        [0.0, b, 0.0],
        [0.0, 0.0, c],
        [a, b, 0.0],
        [a, 0.0, c],
        [0.0, b, c],
        [a, b, c],
    ];
    let mut bounds = [(f32::INFINITY, f32::NEG_INFINITY); 3];
    for corner in &corners {
        let w = apply(affine, *corner);
        for axis in 0..3 {
            if w[axis] < bounds[axis].0 {
                bounds[axis].0 = w[axis];
            }
            if w[axis] > bounds[axis].1 {
                bounds[axis].1 = w[axis];
            }
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn affine_translation_split() {
        let affine = Affine4::new(
            2.0, 0.0, 0.0, -90.0,
            0.0, 2.0, 0.0, -126.0,
            0.0, 0.0, 2.0, -72.0,
            0.0, 0.0, 0.0, 1.0,
        );
        let (linear, translation) = get_affine_and_translation(&affine);
        assert_eq!(linear, Affine3::from_diagonal(&Vector3::new(2.0, 2.0, 2.0)));
        assert_eq!(translation, Vector3::new(-90.0, -126.0, -72.0));
    }

    #[test]
    fn invert_identity() {
        let inv = invert(&Affine4::identity()).unwrap();
        assert_eq!(inv, Affine4::identity());
    }

    #[test]
    fn invert_singular() {
        let mut affine = Affine4::identity();
        affine[(1, 1)] = 0.0;
        assert_eq!(invert(&affine), Err(VoxviewError::NonInvertibleAffine));
    }

    #[test]
    fn bounds_of_unit_grid() {
        let bounds = world_bounds(&Affine4::identity(), &[3, 4, 5]);
        assert_eq!(bounds, [(0.0, 2.0), (0.0, 3.0), (0.0, 4.0)]);
    }

    #[test]
    fn bounds_flip() {
        let affine = shape_zoom_affine(&[3, 3, 3], &[1.0, 1.0, 1.0]);
        let bounds = world_bounds(&affine, &[3, 3, 3]);
        assert_relative_eq!(bounds[0].0, -1.0);
        assert_relative_eq!(bounds[0].1, 1.0);
    }
}
