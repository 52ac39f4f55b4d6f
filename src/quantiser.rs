use crate::error::{Result, VoxelError};
use crate::validate;
use serde::{Deserialize, Serialize};

/// A bijection between an integer level in `[0, levels)` and a physical
/// value in `[lo, hi]`. `levels` must be a power of two; `levels == 1`
/// collapses the axis to the single value `lo` and carries zero bits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantisationAxis {
    pub levels: u32,
    pub lo: f64,
    pub hi: f64,
}

impl QuantisationAxis {
    pub fn new(levels: u32, lo: f64, hi: f64) -> Result<Self> {
        validate::validate_power_of_two(levels)?;
        validate::validate_range(lo, hi)?;
        Ok(Self { levels, lo, hi })
    }

    /// Number of bits this axis contributes to a voxel: `log2(levels)`.
    pub fn bits(&self) -> u32 {
        self.levels.trailing_zeros()
    }

    pub fn level_to_physical(&self, level: u32) -> f64 {
        if self.levels == 1 {
            return self.lo;
        }
        self.lo + (level as f64) * (self.hi - self.lo) / ((self.levels - 1) as f64)
    }

    pub fn physical_to_level(&self, value: f64) -> u32 {
        if self.levels == 1 {
            return 0;
        }
        let t = (value - self.lo) / (self.hi - self.lo) * ((self.levels - 1) as f64);
        let rounded = round_half_away_from_zero(t);
        rounded.clamp(0.0, (self.levels - 1) as f64) as u32
    }
}

/// Rounds half-away-from-zero, as opposed to `f64::round_ties_even` (banker's
/// rounding), which would bias quantisation near detector saturation.
fn round_half_away_from_zero(t: f64) -> f64 {
    if t >= 0.0 {
        (t + 0.5).floor()
    } else {
        (t - 0.5).ceil()
    }
}
