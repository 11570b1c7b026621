//! Threshold intervals mapped onto colormap domains.
use crate::volume::Extrema;

/// Margin keeping zero-valued voxels out of the negative colormap
/// (otherwise background would render in the strongest negative color).
pub const DEADZONE: f32 = 1e-7;

/// A `[low, high]` intensity interval spanning a colormap's domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPair {
    /// Lower edge of the interval.
    pub low: f32,
    /// Upper edge of the interval.
    pub high: f32,
}

impl ThresholdPair {
    /// Create a threshold interval.
    pub fn new(low: f32, high: f32) -> ThresholdPair {
        ThresholdPair { low, high }
    }

    /// Whether the interval has zero width.
    ///
    /// A degenerate negative interval disables the negative layer when
    /// slicing.
    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }

    /// The default positive window for a volume: zero up to the maximum
    /// intensity, or collapsed when the volume is entirely negative.
    pub fn default_positive(extrema: Extrema) -> ThresholdPair {
        if extrema.max < 0.0 {
            ThresholdPair::new(0.0, 0.0)
        } else {
            ThresholdPair::new(0.0, extrema.max)
        }
    }

    /// The default negative window: the minimum intensity up to just below
    /// zero, or collapsed when the volume is entirely non-negative.
    pub fn default_negative(extrema: Extrema) -> ThresholdPair {
        if extrema.min >= 0.0 {
            ThresholdPair::new(-DEADZONE, -DEADZONE)
        } else {
            ThresholdPair::new(extrema.min, -DEADZONE)
        }
    }
}
