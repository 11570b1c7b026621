//! Error types for the resampling and slicing engine.
use quick_error::quick_error;

quick_error! {
    /// The main error type of this crate.
    #[derive(Debug, Clone, PartialEq)]
    pub enum VoxviewError {
        /// A requested target shape has a zero extent.
        InvalidShape(shape: [usize; 3]) {
            display("invalid target shape {:?}, all extents must be positive", shape)
        }
        /// The linear part of an affine transform is singular where an
        /// inverse is required.
        NonInvertibleAffine {
            display("affine transform has a non-invertible linear part")
        }
        /// Attempted to read a voxel outside the resampled grid.
        OutOfBounds(coords: [usize; 3]) {
            display("out of bounds access to volume at {:?}", coords)
        }
        /// No resampled data is available yet.
        NoVolumeData {
            display("no resampled volume data available")
        }
        /// The given voxel array is not 2, 3 or 4 dimensional.
        InconsistentRank(rank: usize) {
            display("volume must be 2 to 4 dimensional, got rank {}", rank)
        }
        /// A time frame index beyond the volume's time dimension.
        FrameOutOfRange(frame: usize, time_dim: usize) {
            display("frame {} out of range for a series of {} frames", frame, time_dim)
        }
        /// Too many distinct intensities for a discrete colormap.
        TooManyValues(count: usize) {
            display("discrete colormap supports at most 256 distinct values, got {}", count)
        }
    }
}

/// Alias for a `Result` with the error type fixed to [`VoxviewError`].
///
/// [`VoxviewError`]: ./enum.VoxviewError.html
pub type Result<T> = ::std::result::Result<T, VoxviewError>;
