//! Color gradients and RGBA lookup tables.
//!
//! Intensities are mapped to colors through a fixed-size lookup table
//! sampled from a gradient. The viewer's gradient presets are reproduced
//! here, together with the table post-processing it performs: a global
//! alpha written into every entry, reversal for negative maps, and
//! transparent guard entries at either end so that out-of-window values
//! can clip to transparent instead of saturating to the extreme color.
use crate::error::{Result, VoxviewError};
use rgb::RGBA8;

/// Number of gradient samples in a built lookup table, before guards.
pub const LUT_SIZE: usize = 512;

/// The gradient presets offered by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientPreset {
    /// Black to white.
    Grey,
    /// Black body radiation.
    Thermal,
    /// Blue through magenta and yellow to white.
    Flame,
    /// Dark violet through yellow to white.
    Yellowy,
    /// Cyan-blue-black-red-yellow, for signed data.
    Bipolar,
    /// Grey with the top percent marked in red.
    GreyClip,
}

/// A color gradient as an ordered sequence of position/color stops.
///
/// Positions are in `[0, 1]`. Sampling between stops interpolates each
/// RGBA channel linearly; sampling beyond the ends clamps to the end stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGradient {
    stops: Vec<(f32, RGBA8)>,
}

fn stop(position: f32, r: u8, g: u8, b: u8) -> (f32, RGBA8) {
    (position, RGBA8::new(r, g, b, 255))
}

impl ColorGradient {
    /// Build one of the viewer's preset gradients.
    pub fn preset(preset: GradientPreset) -> ColorGradient {
        let stops = match preset {
            GradientPreset::Grey => vec![stop(0.0, 0, 0, 0), stop(1.0, 255, 255, 255)],
            GradientPreset::Thermal => vec![
                stop(0.0, 0, 0, 0),
                stop(1.0 / 3.0, 185, 0, 0),
                stop(2.0 / 3.0, 255, 220, 0),
                stop(1.0, 255, 255, 255),
            ],
            GradientPreset::Flame => vec![
                stop(0.0, 20, 5, 0),
                stop(0.2, 7, 0, 220),
                stop(0.5, 236, 0, 134),
                stop(0.8, 246, 246, 0),
                stop(1.0, 255, 255, 255),
            ],
            GradientPreset::Yellowy => vec![
                stop(0.0, 0, 0, 0),
                stop(0.23288638, 32, 0, 129),
                stop(0.52575865, 115, 15, 255),
                stop(0.83627382, 255, 255, 0),
                stop(1.0, 255, 255, 255),
            ],
            GradientPreset::Bipolar => vec![
                stop(0.0, 0, 255, 255),
                stop(0.25, 0, 0, 255),
                stop(0.5, 0, 0, 0),
                stop(0.75, 255, 0, 0),
                stop(1.0, 255, 255, 0),
            ],
            GradientPreset::GreyClip => vec![
                stop(0.0, 0, 0, 0),
                stop(0.99, 255, 255, 255),
                stop(1.0, 255, 0, 0),
            ],
        };
        ColorGradient { stops }
    }

    /// Build a gradient from arbitrary stops.
    ///
    /// Stops are sorted by position; at least two are required.
    pub fn from_stops(mut stops: Vec<(f32, RGBA8)>) -> Option<ColorGradient> {
        if stops.len() < 2 {
            return None;
        }
        stops.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("stop positions must be ordered"));
        Some(ColorGradient { stops })
    }

    /// Derive a gradient for a label volume with discrete intensities.
    ///
    /// Each distinct value gets its own hue, evenly walked around the color
    /// circle, placed at the value's normalized position so that windowing
    /// over the full intensity range lands each value on its color.
    ///
    /// # Errors
    ///
    /// - `VoxviewError::TooManyValues` for more than 256 distinct values.
    /// - `VoxviewError::NoVolumeData` for an empty value set.
    pub fn discrete(values: &[f32]) -> Result<ColorGradient> {
        if values.is_empty() {
            return Err(VoxviewError::NoVolumeData);
        }
        let mut sorted: Vec<f32> = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("intensities must not be NaN"));
        sorted.dedup();
        if sorted.len() > 256 {
            return Err(VoxviewError::TooManyValues(sorted.len()));
        }
        let first = sorted[0];
        let span = sorted[sorted.len() - 1] - first;
        let count = sorted.len();
        let stops = sorted
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let position = if span == 0.0 { 0.0 } else { (v - first) / span };
                let hue = i as f32 * 255.0 / count as f32;
                let (r, g, b) = hsv_to_rgb(hue, 200, 255);
                (position, RGBA8::new(r, g, b, 255))
            })
            .collect();
        Ok(ColorGradient { stops })
    }

    /// Sample the gradient at a position in `[0, 1]`.
    pub fn color_at(&self, position: f32) -> RGBA8 {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if position <= first.0 {
            return first.1;
        }
        if position >= last.0 {
            return last.1;
        }
        for window in self.stops.windows(2) {
            let (p0, c0) = window[0];
            let (p1, c1) = window[1];
            if position <= p1 {
                if p1 == p0 {
                    return c1;
                }
                let t = (position - p0) / (p1 - p0);
                return RGBA8::new(
                    lerp_u8(c0.r, c1.r, t),
                    lerp_u8(c0.g, c1.g, t),
                    lerp_u8(c0.b, c1.b, t),
                    lerp_u8(c0.a, c1.a, t),
                );
            }
        }
        last.1
    }

    /// Sample `n` evenly spaced colors over the whole gradient.
    pub fn lookup_table(&self, n: usize) -> Vec<RGBA8> {
        (0..n)
            .map(|i| self.color_at(i as f32 / (n - 1) as f32))
            .collect()
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
}

/// HSV to RGB with hue in degrees modulo 360 and s, v in `0..=255`.
fn hsv_to_rgb(hue: f32, s: u8, v: u8) -> (u8, u8, u8) {
    let s = f32::from(s) / 255.0;
    let v = f32::from(v) / 255.0;
    let h = hue.rem_euclid(360.0) / 60.0;
    let i = h.floor();
    let f = h - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match i as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    (
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

/// Post-processing applied when a gradient is turned into a lookup table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LutOptions {
    /// Global alpha in `[0, 1]` written into every table entry.
    pub alpha: f32,
    /// Reverse the table, as done for negative colormaps.
    pub reverse: bool,
    /// Prepend a fully transparent entry so below-window values vanish.
    pub clip_low: bool,
    /// Append a fully transparent entry so above-window values vanish.
    pub clip_high: bool,
}

impl Default for LutOptions {
    fn default() -> LutOptions {
        LutOptions {
            alpha: 1.0,
            reverse: false,
            clip_low: false,
            clip_high: false,
        }
    }
}

impl LutOptions {
    /// Options for a negative colormap: reversed, same clipping knobs.
    pub fn negative(alpha: f32, clip_low: bool, clip_high: bool) -> LutOptions {
        LutOptions {
            alpha,
            reverse: true,
            clip_low,
            clip_high,
        }
    }
}

/// A finished RGBA lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    entries: Vec<RGBA8>,
}

impl LookupTable {
    /// Build a table of [`LUT_SIZE`] samples plus any guard entries.
    ///
    /// [`LUT_SIZE`]: ./constant.LUT_SIZE.html
    pub fn build(gradient: &ColorGradient, options: LutOptions) -> LookupTable {
        let alpha = (255.0 * options.alpha) as u8;
        let mut entries = gradient.lookup_table(LUT_SIZE);
        for entry in &mut entries {
            entry.a = alpha;
        }
        if options.reverse {
            entries.reverse();
        }
        let transparent = RGBA8::new(0, 0, 0, 0);
        if options.clip_low {
            entries.insert(0, transparent);
        }
        if options.clip_high {
            entries.push(transparent);
        }
        LookupTable { entries }
    }

    /// Build a table from raw entries.
    pub fn from_entries(entries: Vec<RGBA8>) -> LookupTable {
        LookupTable { entries }
    }

    /// The number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The table entries in order.
    pub fn entries(&self) -> &[RGBA8] {
        &self.entries
    }

    /// Fetch an entry, clamping the index into the table.
    pub fn entry_clamped(&self, index: isize) -> RGBA8 {
        let clamped = index.max(0).min(self.entries.len() as isize - 1);
        self.entries[clamped as usize]
    }
}
