//! Centralized predicates shared by the writer and the reader, so that
//! write-time and read-time invariant checking can never silently drift
//! apart.

use crate::error::{Result, VoxelError};

pub const MAX_PAYLOAD_BYTES: usize = 1 << 20;
pub const MAX_GRID_AXIS: u32 = 10_000;

pub fn validate_bytes(data: &[u8]) -> Result<()> {
    if data.len() > MAX_PAYLOAD_BYTES {
        return Err(VoxelError::InvalidParameter(format!(
            "payload of {} bytes exceeds the {} byte cap",
            data.len(),
            MAX_PAYLOAD_BYTES
        )));
    }
    Ok(())
}

pub fn validate_grid(nx: u32, ny: u32, nz: u32) -> Result<()> {
    for (axis, n) in [("nx", nx), ("ny", ny), ("nz", nz)] {
        if n == 0 {
            return Err(VoxelError::InvalidParameter(format!(
                "grid axis {axis} must be positive"
            )));
        }
        if n > MAX_GRID_AXIS {
            return Err(VoxelError::InvalidParameter(format!(
                "grid axis {axis}={n} exceeds the cap of {MAX_GRID_AXIS}"
            )));
        }
    }
    Ok(())
}

pub fn validate_range(lo: f64, hi: f64) -> Result<()> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(VoxelError::InvalidParameter(format!(
            "range ({lo}, {hi}) must be finite"
        )));
    }
    if !(lo < hi) {
        return Err(VoxelError::InvalidParameter(format!(
            "range must be strictly ordered, got ({lo}, {hi})"
        )));
    }
    Ok(())
}

pub fn validate_power_of_two(levels: u32) -> Result<()> {
    if levels == 0 || (levels & (levels - 1)) != 0 {
        return Err(VoxelError::InvalidParameter(format!(
            "level count must be a positive power of two, got {levels}"
        )));
    }
    Ok(())
}

pub fn validate_finite(v: f64, label: &str) -> Result<()> {
    if !v.is_finite() {
        return Err(VoxelError::InvalidParameter(format!(
            "{label} must be finite, got {v}"
        )));
    }
    Ok(())
}

pub fn validate_pitch(px: f64, py: f64, pz: f64) -> Result<()> {
    for (axis, v) in [("px", px), ("py", py), ("pz", pz)] {
        validate_finite(v, axis)?;
        if v <= 0.0 {
            return Err(VoxelError::InvalidParameter(format!(
                "voxel pitch {axis}={v} must be positive"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversize_payload() {
        let data = vec![0u8; MAX_PAYLOAD_BYTES + 1];
        assert!(validate_bytes(&data).is_err());
    }

    #[test]
    fn accepts_cap_sized_payload() {
        let data = vec![0u8; MAX_PAYLOAD_BYTES];
        assert!(validate_bytes(&data).is_ok());
    }

    #[test]
    fn rejects_zero_or_oversize_grid_axes() {
        assert!(validate_grid(0, 1, 1).is_err());
        assert!(validate_grid(1, 1, MAX_GRID_AXIS + 1).is_err());
        assert!(validate_grid(1, 1, 1).is_ok());
        assert!(validate_grid(MAX_GRID_AXIS, MAX_GRID_AXIS, MAX_GRID_AXIS).is_ok());
    }

    #[test]
    fn rejects_non_power_of_two() {
        assert!(validate_power_of_two(0).is_err());
        assert!(validate_power_of_two(3).is_err());
        for n in [1u32, 2, 4, 8, 16, 1024] {
            assert!(validate_power_of_two(n).is_ok());
        }
    }

    #[test]
    fn rejects_non_positive_or_non_finite_pitch() {
        assert!(validate_pitch(1.0, 1.0, 1.0).is_ok());
        assert!(validate_pitch(0.0, 1.0, 1.0).is_err());
        assert!(validate_pitch(-1.0, 1.0, 1.0).is_err());
        assert!(validate_pitch(f64::NAN, 1.0, 1.0).is_err());
        assert!(validate_pitch(1.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn rejects_non_finite_or_ill_ordered_range() {
        assert!(validate_range(f64::NAN, 1.0).is_err());
        assert!(validate_range(0.0, f64::INFINITY).is_err());
        assert!(validate_range(1.0, 1.0).is_err());
        assert!(validate_range(1.0, 0.0).is_err());
        assert!(validate_range(0.0, 1.0).is_ok());
    }
}
