//! Volumetric resampling and slicing engine for MRI/fMRI viewers.
//!
//! This crate implements the display pipeline sitting between an image
//! loader and a rendering front end: loaded 3D/4D volumes are resampled
//! onto a shared display grid through their affine transforms, cut along
//! the three orthogonal planes at a cursor coordinate, and mapped through
//! dual threshold-windowed colormaps into RGBA pixel planes. Supporting
//! pieces cover display grid selection over multiple volumes, histogram
//! and local-extremum queries, and trial averaging of fMRI time courses.
//!
//! File format decoding and all GUI concerns are out of scope; volumes
//! enter as `ndarray` arrays plus a `nalgebra` 4x4 affine and leave as
//! `rgb` pixel buffers.
//!
//! # Example
//!
//! ```
//! use ndarray::ArrayD;
//! use voxview::affine::Affine4;
//! use voxview::colormap::{ColorGradient, GradientPreset, LookupTable, LutOptions};
//! use voxview::{DisplayGrid, SliceStyle, ThresholdPair, Volume};
//!
//! # fn main() -> voxview::Result<()> {
//! let data = ArrayD::from_elem(ndarray::IxDyn(&[8, 8, 8]), 1.0f32);
//! let mut volume = Volume::new(data, Affine4::identity())?;
//! volume.resample_to(&DisplayGrid::from_volume(&volume))?;
//!
//! let lut = LookupTable::build(
//!     &ColorGradient::preset(GradientPreset::Grey),
//!     LutOptions::default(),
//! );
//! let style = SliceStyle::single(&lut, ThresholdPair::default_positive(volume.extrema()));
//! let planes = voxview::slice_volume(volume.resampled()?, [4, 4, 4], &style);
//! assert_eq!(planes.transverse.dim(), (8, 8));
//! # Ok(())
//! # }
//! ```
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts)]

pub mod affine;
pub mod colormap;
pub mod error;
pub mod grid;
pub mod resample;
pub mod slice;
pub mod stats;
pub mod threshold;
pub mod timeseries;
pub mod volume;

pub use crate::colormap::{ColorGradient, GradientPreset, LookupTable, LutOptions};
pub use crate::error::{Result, VoxviewError};
pub use crate::grid::DisplayGrid;
pub use crate::resample::{resample, Interpolation};
pub use crate::slice::{mosaic_slice, slice_volume, Plane, SliceSet, SliceStyle};
pub use crate::threshold::ThresholdPair;
pub use crate::volume::{Extrema, Volume};
