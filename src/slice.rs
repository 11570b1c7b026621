//! Plane extraction and colormap application.
//!
//! A resampled volume is cut along the three orthogonal planes at a cursor
//! coordinate and each scalar plane is pushed through a windowed lookup
//! table to yield RGBA pixels. When a negative colormap is active and its
//! window is non-degenerate, a second layer is produced and the two are
//! added channel-wise. The addition wraps per channel, exactly like the
//! unsigned byte addition of the original viewer, rather than performing
//! over-compositing.
use crate::colormap::LookupTable;
use crate::threshold::ThresholdPair;
use ndarray::{s, Array2, ArrayView2, ArrayView3};
use rgb::RGBA8;

/// One of the three orthogonal viewing planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Fixes the first voxel axis.
    Sagittal,
    /// Fixes the second voxel axis.
    Coronal,
    /// Fixes the third voxel axis.
    Transverse,
}

impl Plane {
    /// The voxel axis this plane fixes.
    pub fn axis(self) -> usize {
        match self {
            Plane::Sagittal => 0,
            Plane::Coronal => 1,
            Plane::Transverse => 2,
        }
    }
}

/// Colormap and threshold state applied while slicing.
#[derive(Debug, Clone, Copy)]
pub struct SliceStyle<'a> {
    /// Lookup table for the positive window.
    pub pos_lut: &'a LookupTable,
    /// Positive threshold window.
    pub pos_window: ThresholdPair,
    /// Lookup table for the negative window; `None` disables dual mode.
    pub neg_lut: Option<&'a LookupTable>,
    /// Negative threshold window.
    pub neg_window: ThresholdPair,
}

impl<'a> SliceStyle<'a> {
    /// Single-colormap style.
    pub fn single(pos_lut: &'a LookupTable, pos_window: ThresholdPair) -> SliceStyle<'a> {
        SliceStyle {
            pos_lut,
            pos_window,
            neg_lut: None,
            neg_window: ThresholdPair::new(0.0, 0.0),
        }
    }

    /// Dual-colormap style.
    pub fn dual(
        pos_lut: &'a LookupTable,
        pos_window: ThresholdPair,
        neg_lut: &'a LookupTable,
        neg_window: ThresholdPair,
    ) -> SliceStyle<'a> {
        SliceStyle {
            pos_lut,
            pos_window,
            neg_lut: Some(neg_lut),
            neg_window,
        }
    }

    fn negative_layer(&self) -> Option<&'a LookupTable> {
        match self.neg_lut {
            Some(lut) if !self.neg_window.is_degenerate() => Some(lut),
            _ => None,
        }
    }
}

/// The three RGBA cross-sections produced for a cursor coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceSet {
    /// Plane fixing the first axis.
    pub sagittal: Array2<RGBA8>,
    /// Plane fixing the second axis.
    pub coronal: Array2<RGBA8>,
    /// Plane fixing the third axis.
    pub transverse: Array2<RGBA8>,
}

/// Map a scalar plane through a windowed lookup table.
///
/// Values are rescaled so that the window `[low, high]` spans the whole
/// table and truncated to entry indices; indices outside the table clamp to
/// its first or last entry. A degenerate window sends values at or below
/// `low` to the first entry and everything above to the last.
pub fn map_colors(
    plane: ArrayView2<f32>,
    lut: &LookupTable,
    window: ThresholdPair,
) -> Array2<RGBA8> {
    let len = lut.len() as isize;
    let span = window.high - window.low;
    plane.map(|&value| {
        let index = if span == 0.0 {
            if value > window.low {
                len - 1
            } else {
                0
            }
        } else {
            let scaled = (value - window.low) * (len - 1) as f32 / span;
            scaled as isize
        };
        lut.entry_clamped(index)
    })
}

/// Clamp a cursor coordinate into the volume, per axis.
pub fn clamp_coord(shape: (usize, usize, usize), coord: [usize; 3]) -> [usize; 3] {
    [
        coord[0].min(shape.0 - 1),
        coord[1].min(shape.1 - 1),
        coord[2].min(shape.2 - 1),
    ]
}

fn extract_plane(volume: ArrayView3<'_, f32>, plane: Plane, index: usize) -> ArrayView2<'_, f32> {
    match plane {
        Plane::Sagittal => volume.slice_move(s![index, .., ..]),
        Plane::Coronal => volume.slice_move(s![.., index, ..]),
        Plane::Transverse => volume.slice_move(s![.., .., index]),
    }
}

fn add_layers(positive: &mut Array2<RGBA8>, negative: &Array2<RGBA8>) {
    for (p, n) in positive.iter_mut().zip(negative.iter()) {
        p.r = p.r.wrapping_add(n.r);
        p.g = p.g.wrapping_add(n.g);
        p.b = p.b.wrapping_add(n.b);
        p.a = p.a.wrapping_add(n.a);
    }
}

fn colorize(plane: ArrayView2<f32>, style: &SliceStyle<'_>) -> Array2<RGBA8> {
    let mut layer = map_colors(plane, style.pos_lut, style.pos_window);
    if let Some(neg_lut) = style.negative_layer() {
        let negative = map_colors(plane, neg_lut, style.neg_window);
        add_layers(&mut layer, &negative);
    }
    layer
}

/// Cut the three orthogonal planes at a cursor coordinate and colorize.
///
/// The coordinate is clamped into the volume, never an error.
pub fn slice_volume(
    volume: ArrayView3<f32>,
    coord: [usize; 3],
    style: &SliceStyle<'_>,
) -> SliceSet {
    let coord = clamp_coord(volume.dim(), coord);
    SliceSet {
        sagittal: colorize(extract_plane(volume, Plane::Sagittal, coord[0]), style),
        coronal: colorize(extract_plane(volume, Plane::Coronal, coord[1]), style),
        transverse: colorize(extract_plane(volume, Plane::Transverse, coord[2]), style),
    }
}

/// Cut and colorize a single plane, as used by the mosaic view.
pub fn mosaic_slice(
    volume: ArrayView3<f32>,
    plane: Plane,
    index: usize,
    style: &SliceStyle<'_>,
) -> Array2<RGBA8> {
    let shape = volume.dim();
    let limit = [shape.0, shape.1, shape.2][plane.axis()];
    colorize(extract_plane(volume, plane, index.min(limit - 1)), style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::{ColorGradient, GradientPreset, LookupTable, LutOptions};
    use ndarray::{arr3, s};

    fn grey_lut() -> LookupTable {
        LookupTable::build(
            &ColorGradient::preset(GradientPreset::Grey),
            LutOptions::default(),
        )
    }

    #[test]
    fn window_ends_map_to_table_ends() {
        let lut = grey_lut();
        let volume = arr3(&[[[-1.0f32, 0.0], [5.0, 10.0]]]);
        let colors = map_colors(
            volume.slice(s![0, .., ..]),
            &lut,
            ThresholdPair::new(0.0, 10.0),
        );
        assert_eq!(colors[[0, 0]].r, 0); // below window clamps low
        assert_eq!(colors[[0, 1]].r, 0);
        assert_eq!(colors[[1, 1]].r, 255);
    }

    #[test]
    fn coordinates_clamp_instead_of_failing() {
        let lut = grey_lut();
        let style = SliceStyle::single(&lut, ThresholdPair::new(0.0, 1.0));
        let volume = arr3(&[[[0.0f32, 1.0], [0.5, 0.25]]]);
        let inside = slice_volume(volume.view(), [0, 1, 1], &style);
        let outside = slice_volume(volume.view(), [7, 9, 1], &style);
        assert_eq!(inside, outside);
    }

    #[test]
    fn degenerate_negative_window_disables_layer() {
        let pos = grey_lut();
        let neg = LookupTable::build(
            &ColorGradient::preset(GradientPreset::Grey),
            LutOptions::negative(1.0, false, false),
        );
        let volume = arr3(&[[[-2.0f32, 3.0], [0.0, 1.0]]]);
        let window = ThresholdPair::new(0.0, 3.0);
        let dual = SliceStyle::dual(&pos, window, &neg, ThresholdPair::new(-1.0, -1.0));
        let single = SliceStyle::single(&pos, window);
        assert_eq!(
            slice_volume(volume.view(), [0, 0, 0], &dual),
            slice_volume(volume.view(), [0, 0, 0], &single)
        );
    }

    #[test]
    fn dual_layers_add_with_wrap_around() {
        let pos = grey_lut();
        let neg = LookupTable::build(
            &ColorGradient::preset(GradientPreset::Grey),
            LutOptions::negative(1.0, false, false),
        );
        let volume = arr3(&[[[-5.0f32]]]);
        let style = SliceStyle::dual(
            &pos,
            ThresholdPair::new(0.0, 1.0),
            &neg,
            ThresholdPair::new(-10.0, -0.0000001),
        );
        let set = slice_volume(volume.view(), [0, 0, 0], &style);
        let pixel = set.sagittal[[0, 0]];
        // positive layer gives black at full alpha, negative layer mid-grey
        // at full alpha; the alpha channel wraps past 255
        assert_eq!(pixel.a, 254u8);
        assert!(pixel.r > 0);
    }

    #[test]
    fn planes_outlive_the_sliced_view() {
        let lut = grey_lut();
        let style = SliceStyle::single(&lut, ThresholdPair::new(0.0, 1.0));
        let volume = arr3(&[[[0.0f32, 1.0], [0.5, 0.25]]]);
        let set = {
            let view = volume.view();
            slice_volume(view, [0, 0, 0], &style)
        };
        assert_eq!(set.sagittal.dim(), (2, 2));
        assert_eq!(set.sagittal[[0, 1]].r, 255);
    }

    #[test]
    fn mosaic_matches_slice_plane() {
        let lut = grey_lut();
        let style = SliceStyle::single(&lut, ThresholdPair::new(0.0, 1.0));
        let volume = arr3(&[
            [[0.0f32, 0.2], [0.4, 0.6]],
            [[0.1, 0.3], [0.5, 0.7]],
        ]);
        let set = slice_volume(volume.view(), [1, 0, 0], &style);
        let mosaic = mosaic_slice(volume.view(), Plane::Sagittal, 1, &style);
        assert_eq!(mosaic, set.sagittal);
    }
}
