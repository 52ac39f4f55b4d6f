//! Byte/bit conversion, MSB-first throughout.

use crate::error::{Result, VoxelError};
use bitvec::prelude::*;

pub type BitString = BitVec<u8, Msb0>;

/// Bit 7 of byte 0 becomes bit 0 of the output; bit 0 of byte 0 becomes bit 7, etc.
pub fn bytes_to_bits(bytes: &[u8]) -> BitString {
    BitVec::from_slice(bytes)
}

/// Inverse of [`bytes_to_bits`]. `bits.len()` must be a multiple of 8.
pub fn bits_to_bytes(bits: &BitSlice<u8, Msb0>) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(VoxelError::InvalidLength(format!(
            "bit length {} is not a multiple of 8",
            bits.len()
        )));
    }
    Ok(bits.to_bitvec().into_vec())
}

/// Packs `level` into `width` bits, MSB-first. Used to split a voxel's
/// intensity/polarization level into its sub-field of the voxel payload.
pub fn level_to_bits(level: u32, width: u32) -> BitString {
    let mut out = BitString::with_capacity(width as usize);
    for i in (0..width).rev() {
        out.push((level >> i) & 1 != 0);
    }
    out
}

/// Inverse of [`level_to_bits`]: interprets `bits` as an unsigned integer,
/// MSB-first.
pub fn bits_to_level(bits: &BitSlice<u8, Msb0>) -> u32 {
    bits.iter().by_vals().fold(0u32, |acc, bit| (acc << 1) | bit as u32)
}
