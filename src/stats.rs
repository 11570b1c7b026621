//! Summary statistics over resampled volumes.
//!
//! These back the viewer's histogram threshold widget and the "jump to
//! local extremum" cursor actions.
use crate::threshold::ThresholdPair;
use crate::volume::Extrema;
use ndarray::ArrayView3;

/// Number of histogram edge points used by the threshold widget.
pub const HISTOGRAM_POINTS: usize = 500;

/// An intensity histogram as left bin edges plus counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Left edge of each bin.
    pub edges: Vec<f32>,
    /// Number of voxels falling into each bin.
    pub counts: Vec<u32>,
}

/// Histogram of a volume over `[min, max]` with `points` evenly spaced
/// edges (`points - 1` bins). Zero-valued voxels are excluded, since the
/// resampled background would otherwise dwarf every other bin.
pub fn histogram(data: ArrayView3<f32>, extrema: Extrema, points: usize) -> Histogram {
    let bins = points.saturating_sub(1).max(1);
    let span = extrema.max - extrema.min;
    let step = span / bins as f32;
    let edges = (0..bins).map(|i| extrema.min + i as f32 * step).collect();
    let mut counts = vec![0u32; bins];
    for &value in data.iter() {
        if value == 0.0 || value < extrema.min || value > extrema.max {
            continue;
        }
        let index = if span <= 0.0 {
            0
        } else {
            (((value - extrema.min) / span * bins as f32) as usize).min(bins - 1)
        };
        counts[index] += 1;
    }
    Histogram { edges, counts }
}

/// A count range that scales a histogram plot reasonably: the min and max
/// count over bins whose edge lies strictly inside the positive threshold
/// window, falling back to the global count range when none does.
pub fn plot_range(histogram: &Histogram, window: ThresholdPair) -> (u32, u32) {
    let valid: Vec<u32> = histogram
        .edges
        .iter()
        .zip(&histogram.counts)
        .filter(|(edge, _)| **edge > window.low && **edge < window.high)
        .map(|(_, count)| *count)
        .collect();
    let pool = if valid.is_empty() {
        &histogram.counts
    } else {
        &valid
    };
    let min = pool.iter().min().copied().unwrap_or(0);
    let max = pool.iter().max().copied().unwrap_or(0);
    (min, max)
}

fn search_cube(
    data: &ArrayView3<f32>,
    center: [usize; 3],
    radius: usize,
) -> ([usize; 3], [usize; 3]) {
    let (da, db, dc) = data.dim();
    let dims = [da, db, dc];
    if radius == 0 {
        return ([0, 0, 0], dims);
    }
    let mut lo = [0usize; 3];
    let mut hi = [0usize; 3];
    for axis in 0..3 {
        // a cursor past the grid clamps like slicing does
        let c = center[axis].min(dims[axis] - 1);
        lo[axis] = c.saturating_sub(radius);
        hi[axis] = (c + radius).min(dims[axis]);
    }
    (lo, hi)
}

fn extremum_coord<F>(
    data: ArrayView3<f32>,
    center: [usize; 3],
    radius: usize,
    better: F,
) -> [usize; 3]
where
    F: Fn(f32, f32) -> bool,
{
    let (lo, hi) = search_cube(&data, center, radius);
    let mut best = data[[lo[0], lo[1], lo[2]]];
    let mut coord = lo;
    for a in lo[0]..hi[0] {
        for b in lo[1]..hi[1] {
            for c in lo[2]..hi[2] {
                let value = data[[a, b, c]];
                if better(value, best) {
                    best = value;
                    coord = [a, b, c];
                }
            }
        }
    }
    coord
}

/// Coordinate of the largest intensity within a cube of the given radius
/// around `center` (the whole volume when `radius` is 0).
pub fn max_coord(data: ArrayView3<f32>, center: [usize; 3], radius: usize) -> [usize; 3] {
    extremum_coord(data, center, radius, |v, best| v > best)
}

/// Coordinate of the smallest intensity within a cube of the given radius
/// around `center` (the whole volume when `radius` is 0).
pub fn min_coord(data: ArrayView3<f32>, center: [usize; 3], radius: usize) -> [usize; 3] {
    extremum_coord(data, center, radius, |v, best| v < best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn histogram_excludes_zeros() {
        let mut data = Array3::<f32>::zeros((2, 2, 2));
        data[[0, 0, 0]] = 1.0;
        data[[0, 0, 1]] = 9.0;
        let hist = histogram(
            data.view(),
            Extrema {
                min: 0.0,
                max: 10.0,
            },
            HISTOGRAM_POINTS,
        );
        assert_eq!(hist.edges.len(), 499);
        assert_eq!(hist.counts.iter().sum::<u32>(), 2);
    }

    #[test]
    fn plot_range_falls_back_when_window_is_empty() {
        let hist = Histogram {
            edges: vec![0.0, 1.0, 2.0],
            counts: vec![5, 2, 9],
        };
        assert_eq!(plot_range(&hist, ThresholdPair::new(0.5, 1.5)), (2, 2));
        assert_eq!(plot_range(&hist, ThresholdPair::new(10.0, 20.0)), (2, 9));
    }

    #[test]
    fn local_extremum_search() {
        let mut data = Array3::<f32>::zeros((5, 5, 5));
        data[[0, 0, 0]] = 10.0;
        data[[3, 3, 3]] = 5.0;
        data[[4, 4, 4]] = -2.0;
        assert_eq!(max_coord(data.view(), [0, 0, 0], 0), [0, 0, 0]);
        // a radius-2 cube around the center misses the global maximum
        assert_eq!(max_coord(data.view(), [3, 3, 3], 2), [3, 3, 3]);
        assert_eq!(min_coord(data.view(), [0, 0, 0], 0), [4, 4, 4]);
    }

    #[test]
    fn cursor_past_the_grid_clamps_the_search_cube() {
        let mut data = Array3::<f32>::zeros((5, 5, 5));
        data[[4, 0, 0]] = 3.0;
        data[[0, 0, 0]] = 9.0;
        // center clamps to [4, 0, 0]; the radius-2 cube misses the maximum
        // at the far corner
        assert_eq!(max_coord(data.view(), [10, 0, 0], 2), [4, 0, 0]);
    }
}
