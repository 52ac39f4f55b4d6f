use crate::error::{Result, VoxelError};
use serde::{Deserialize, Serialize};

/// A single addressable lattice cell. Immutable once constructed: a NaN or
/// infinite intensity/polarization is rejected at the door rather than
/// tolerated downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voxel {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub intensity: f64,
    pub polarization: f64,
}

impl Voxel {
    pub fn new(x: u32, y: u32, z: u32, intensity: f64, polarization: f64) -> Result<Self> {
        if !intensity.is_finite() {
            return Err(VoxelError::InvalidParameter(format!(
                "intensity must be finite, got {intensity}"
            )));
        }
        if !polarization.is_finite() {
            return Err(VoxelError::InvalidParameter(format!(
                "polarization must be finite, got {polarization}"
            )));
        }
        Ok(Self {
            x,
            y,
            z,
            intensity,
            polarization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_finite_fields() {
        assert!(matches!(
            Voxel::new(0, 0, 0, f64::NAN, 0.0),
            Err(VoxelError::InvalidParameter(_))
        ));
        assert!(matches!(
            Voxel::new(0, 0, 0, f64::INFINITY, 0.0),
            Err(VoxelError::InvalidParameter(_))
        ));
        assert!(matches!(
            Voxel::new(0, 0, 0, 0.0, f64::NEG_INFINITY),
            Err(VoxelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn accepts_finite_fields() {
        let v = Voxel::new(1, 2, 3, 0.5, -0.5).unwrap();
        assert_eq!((v.x, v.y, v.z), (1, 2, 3));
    }
}
