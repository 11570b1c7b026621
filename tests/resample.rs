//! Contract tests for the affine resampler.
use ndarray::{Array3, ArrayD, IxDyn};
use pretty_assertions::assert_eq;
use voxview::affine::{compose_mapping, Affine4};
use voxview::{resample, DisplayGrid, Interpolation, Volume, VoxviewError};

#[test]
fn identity_affines_and_equal_shape_are_the_identity() {
    let source = Array3::from_shape_fn((3, 4, 5), |(i, j, k)| (i * 100 + j * 10 + k) as f32);
    let mapping = compose_mapping(&Affine4::identity(), &Affine4::identity()).unwrap();
    for &interp in &[Interpolation::Nearest, Interpolation::Linear] {
        let out = resample(source.view(), &mapping, [3, 4, 5], interp).unwrap();
        assert_eq!(out, source);
    }
}

#[test]
#[rustfmt::skip]
fn nearest_reproduces_values_at_coincident_sample_points() {
    let source = Array3::from_shape_fn((6, 6, 6), |(i, j, k)| (i * 36 + j * 6 + k) as f32);
    // every second voxel of the source maps exactly onto a target center
    let mapping = Affine4::new(
        2.0, 0.0, 0.0, 0.0,
        0.0, 2.0, 0.0, 0.0,
        0.0, 0.0, 2.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    let out = resample(source.view(), &mapping, [3, 3, 3], Interpolation::Nearest).unwrap();
    for ((i, j, k), &value) in out.indexed_iter() {
        assert_eq!(value, source[[2 * i, 2 * j, 2 * k]]);
    }
}

#[test]
#[rustfmt::skip]
fn constant_volume_downsampled_by_two_stays_constant() {
    let source = Array3::from_elem((4, 4, 4), 1.0f32);
    let mapping = Affine4::new(
        2.0, 0.0, 0.0, 0.0,
        0.0, 2.0, 0.0, 0.0,
        0.0, 0.0, 2.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    let out = resample(source.view(), &mapping, [2, 2, 2], Interpolation::Nearest).unwrap();
    assert_eq!(out, Array3::from_elem((2, 2, 2), 1.0));
}

#[test]
fn round_trip_to_own_grid_is_exact() {
    let data = ArrayD::from_shape_fn(IxDyn(&[5, 4, 3]), |ix| {
        (ix[0] * 31 + ix[1] * 7 + ix[2]) as f32
    });
    let mut affine = Affine4::identity();
    affine[(0, 0)] = 1.5;
    affine[(1, 3)] = -12.0;
    let mut volume = Volume::new(data, affine).unwrap();
    volume.resample_to(&DisplayGrid::from_volume(&volume)).unwrap();
    assert_eq!(volume.resampled().unwrap(), volume.frame_data());
}

#[test]
fn zero_extent_shapes_are_rejected() {
    let source = Array3::<f32>::zeros((4, 4, 4));
    for shape in &[[0, 4, 4], [4, 0, 4], [4, 4, 0]] {
        let got = resample(
            source.view(),
            &Affine4::identity(),
            *shape,
            Interpolation::Linear,
        );
        assert_eq!(got, Err(VoxviewError::InvalidShape(*shape)));
    }
}

#[test]
fn singular_affines_fail_to_compose() {
    let mut degenerate = Affine4::identity();
    degenerate[(2, 2)] = 0.0;
    assert_eq!(
        compose_mapping(&degenerate, &Affine4::identity()),
        Err(VoxviewError::NonInvertibleAffine)
    );

    let data = ArrayD::<f32>::zeros(IxDyn(&[2, 2, 2]));
    let mut volume = Volume::new(data, degenerate).unwrap();
    let grid = DisplayGrid {
        affine: Affine4::identity(),
        shape: [2, 2, 2],
    };
    assert_eq!(
        volume.resample_to(&grid),
        Err(VoxviewError::NonInvertibleAffine)
    );
}

#[test]
fn linear_downsampling_averages_neighbors() {
    // a ramp along the first axis, shifted sampling hits midpoints
    let source = Array3::from_shape_fn((4, 1, 1), |(i, _, _)| i as f32);
    let mut mapping = Affine4::identity();
    mapping[(0, 3)] = 0.5;
    let out = resample(source.view(), &mapping, [3, 1, 1], Interpolation::Linear).unwrap();
    assert_eq!(out[[0, 0, 0]], 0.5);
    assert_eq!(out[[1, 0, 0]], 1.5);
    assert_eq!(out[[2, 0, 0]], 2.5);
}
