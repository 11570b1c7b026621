//! The volume model: voxel data, affine, frames and resampled state.
//!
//! A [`Volume`] owns an immutable 3D or 4D voxel array together with its
//! voxel-to-world affine. At most one time frame is current at a time, and
//! the volume keeps the single resampled rendition of that frame produced
//! by the last display grid it was resampled onto. Changing the frame or
//! the interpolation order recomputes the resampled data eagerly, so a
//! stale rendition is never observable; before the first resample all
//! accessors that need one fail with `NoVolumeData`.
//!
//! [`Volume`]: ./struct.Volume.html
use crate::affine::{self, Affine4};
use crate::error::{Result, VoxviewError};
use crate::grid::DisplayGrid;
use crate::resample::{resample, Interpolation};
use nalgebra::Vector3;
use ndarray::{Array1, Array3, ArrayD, ArrayView3, Axis, Ix3};

/// The global intensity extrema of a volume, over all frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    /// Smallest intensity.
    pub min: f32,
    /// Largest intensity.
    pub max: f32,
}

#[derive(Debug, Clone)]
struct Resampled {
    data: Array3<f32>,
    /// Mapping from display voxel indices to source voxel indices.
    mapping: Affine4,
    shape: [usize; 3],
}

/// A loaded 3D or 4D image with its affine and display state.
#[derive(Debug, Clone)]
pub struct Volume {
    data: ArrayD<f32>,
    affine: Affine4,
    frame: usize,
    time_dim: usize,
    interpolation: Interpolation,
    extrema: Extrema,
    resampled: Option<Resampled>,
}

impl Volume {
    /// Create a volume from a voxel array and its voxel-to-world affine.
    ///
    /// Rank 2 input is promoted to a single-slice 3D array, as the viewer
    /// does for 2D images. NaN intensities are replaced by zero.
    ///
    /// # Errors
    ///
    /// - `VoxviewError::InconsistentRank` if the array rank is not 2 to 4.
    pub fn new(data: ArrayD<f32>, affine: Affine4) -> Result<Volume> {
        let mut data = match data.ndim() {
            2 => data.insert_axis(Axis(2)),
            3 | 4 => data,
            rank => return Err(VoxviewError::InconsistentRank(rank)),
        };
        for v in data.iter_mut() {
            if v.is_nan() {
                *v = 0.0;
            }
        }
        let time_dim = if data.ndim() == 4 { data.shape()[3] } else { 1 };
        let extrema = data.iter().fold(
            Extrema {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |e, &v| Extrema {
                min: e.min.min(v),
                max: e.max.max(v),
            },
        );
        Ok(Volume {
            data,
            affine,
            frame: 0,
            time_dim,
            interpolation: Interpolation::default(),
            extrema,
            resampled: None,
        })
    }

    /// Create a volume whose header carries no usable affine.
    ///
    /// The transform is derived from the voxel spacing alone, with the
    /// world origin at the center of the grid and the first axis flipped.
    ///
    /// # Errors
    ///
    /// - `VoxviewError::InconsistentRank` if the array rank is not 2 to 4.
    pub fn with_spacing(data: ArrayD<f32>, spacing: [f32; 3]) -> Result<Volume> {
        let mut volume = Volume::new(data, Affine4::identity())?;
        volume.affine = affine::shape_zoom_affine(&volume.original_dim(), &spacing);
        Ok(volume)
    }

    /// The voxel-to-world affine from the image header.
    pub fn affine(&self) -> &Affine4 {
        &self.affine
    }

    /// Spatial dimensions of the original voxel grid.
    pub fn original_dim(&self) -> [usize; 3] {
        let shape = self.data.shape();
        [shape[0], shape[1], shape[2]]
    }

    /// Number of time frames (1 for 3D volumes).
    pub fn time_dim(&self) -> usize {
        self.time_dim
    }

    /// The current time frame.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The current interpolation order.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// The intensity extrema over the whole series.
    pub fn extrema(&self) -> Extrema {
        self.extrema
    }

    /// World-space bounding interval of the original grid, per axis.
    pub fn world_bounds(&self) -> [(f32, f32); 3] {
        affine::world_bounds(&self.affine, &self.original_dim())
    }

    /// View of the current frame in the original grid.
    pub fn frame_data(&self) -> ArrayView3<f32> {
        if self.data.ndim() == 4 {
            self.data.index_axis(Axis(3), self.frame)
        } else {
            self.data.view()
        }
        .into_dimensionality::<Ix3>()
        .expect("spatial data is 3-dimensional")
    }

    /// Select the current time frame, re-resampling if a grid is applied.
    ///
    /// # Errors
    ///
    /// - `VoxviewError::FrameOutOfRange` for a frame beyond the series.
    pub fn set_frame(&mut self, frame: usize) -> Result<()> {
        if frame >= self.time_dim {
            return Err(VoxviewError::FrameOutOfRange(frame, self.time_dim));
        }
        if frame != self.frame {
            self.frame = frame;
            self.reresample()?;
        }
        Ok(())
    }

    /// Change the interpolation order, re-resampling if a grid is applied.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) -> Result<()> {
        if interpolation != self.interpolation {
            self.interpolation = interpolation;
            self.reresample()?;
        }
        Ok(())
    }

    /// Resample the current frame onto a display grid.
    ///
    /// The voxel mapping is `inverse(own affine) * grid affine`.
    pub fn resample_to(&mut self, grid: &DisplayGrid) -> Result<()> {
        let mapping = affine::compose_mapping(&self.affine, &grid.affine)?;
        self.apply_mapping(mapping, grid.shape)
    }

    /// Resample pretending the volume's affine were `over_affine`.
    ///
    /// Used by the affine-ignoring "fit" grid, where every volume is given
    /// a pure scaling transform instead of its header affine.
    pub fn resample_with_override(
        &mut self,
        grid: &DisplayGrid,
        over_affine: &Affine4,
    ) -> Result<()> {
        let mapping = affine::invert(over_affine)? * grid.affine;
        self.apply_mapping(mapping, grid.shape)
    }

    fn apply_mapping(&mut self, mapping: Affine4, shape: [usize; 3]) -> Result<()> {
        let data = resample(self.frame_data(), &mapping, shape, self.interpolation)?;
        self.resampled = Some(Resampled {
            data,
            mapping,
            shape,
        });
        Ok(())
    }

    fn reresample(&mut self) -> Result<()> {
        if let Some(resampled) = &self.resampled {
            let mapping = resampled.mapping;
            let shape = resampled.shape;
            self.apply_mapping(mapping, shape)?;
        }
        Ok(())
    }

    /// View of the resampled rendition of the current frame.
    ///
    /// # Errors
    ///
    /// - `VoxviewError::NoVolumeData` before the first resample.
    pub fn resampled(&self) -> Result<ArrayView3<f32>> {
        self.resampled
            .as_ref()
            .map(|r| r.data.view())
            .ok_or(VoxviewError::NoVolumeData)
    }

    /// Shape of the resampled rendition, if any.
    pub fn resampled_dim(&self) -> Option<[usize; 3]> {
        self.resampled.as_ref().map(|r| r.shape)
    }

    /// The display-to-source voxel mapping of the last resample.
    pub fn mapping(&self) -> Option<&Affine4> {
        self.resampled.as_ref().map(|r| &r.mapping)
    }

    /// Intensity of the resampled data at a display coordinate.
    ///
    /// # Errors
    ///
    /// - `VoxviewError::NoVolumeData` before the first resample.
    /// - `VoxviewError::OutOfBounds` outside the resampled grid.
    pub fn value_at(&self, coords: [usize; 3]) -> Result<f32> {
        let resampled = self.resampled.as_ref().ok_or(VoxviewError::NoVolumeData)?;
        resampled
            .data
            .get(coords)
            .copied()
            .ok_or(VoxviewError::OutOfBounds(coords))
    }

    /// Map a display coordinate back to original voxel coordinates.
    ///
    /// # Errors
    ///
    /// - `VoxviewError::NoVolumeData` before the first resample.
    pub fn voxel_coords(&self, coords: [usize; 3]) -> Result<Vector3<f32>> {
        let resampled = self.resampled.as_ref().ok_or(VoxviewError::NoVolumeData)?;
        Ok(affine::apply(
            &resampled.mapping,
            [coords[0] as f32, coords[1] as f32, coords[2] as f32],
        ))
    }

    /// The frame series at the source voxel under a display coordinate.
    ///
    /// The coordinate is mapped through the resampling affine and truncated
    /// to a source voxel. When it lands outside the source grid an all-zero
    /// series is returned, matching the viewer's time plot behavior.
    ///
    /// # Errors
    ///
    /// - `VoxviewError::NoVolumeData` before the first resample.
    pub fn time_course(&self, coords: [usize; 3]) -> Result<Array1<f32>> {
        let source = self.voxel_coords(coords)?;
        let dim = self.original_dim();
        let inside = (0..3).all(|axis| {
            let c = source[axis] as isize;
            c >= 0 && (c as usize) < dim[axis]
        });
        if !inside {
            return Ok(Array1::zeros(self.time_dim));
        }
        let (a, b, c) = (
            source[0] as usize,
            source[1] as usize,
            source[2] as usize,
        );
        if self.data.ndim() == 4 {
            Ok(self
                .data
                .index_axis(Axis(0), a)
                .index_axis(Axis(0), b)
                .index_axis(Axis(0), c)
                .to_owned()
                .into_dimensionality()
                .expect("time axis is one-dimensional"))
        } else {
            Ok(Array1::from(vec![self.data[[a, b, c]]]))
        }
    }
}
