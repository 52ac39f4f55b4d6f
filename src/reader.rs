//! The reader (C7): voxel list → quantised levels → bitstream →
//! ECC-decoded bits → truncated bytes + diagnostics.

use crate::bits::{bits_to_bytes, level_to_bits};
use crate::ecc;
use crate::error::{Result, VoxelError};
use crate::lattice::index_to_coords;
use crate::pattern::StoragePattern;
use bitvec::prelude::*;
use rayon::prelude::*;

/// The outcome of reading a [`StoragePattern`] back to bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadResult {
    pub payload: Vec<u8>,
    pub corrected_errors: usize,
    pub detected_uncorrectable: usize,
    pub voxels_processed: usize,
}

/// Revalidates `pattern`, measures every voxel, and recovers the original
/// payload. `pattern` may have been perturbed (by a noise model) between
/// write and read; only its coordinates and ECC name are trusted without
/// re-derivation.
pub fn read(pattern: &StoragePattern) -> Result<ReadResult> {
    pattern.validate()?;

    let (nx, ny, _nz) = pattern.grid_size;
    let ecc = ecc::registry().get(&pattern.ecc_name)?;
    let intensity_width = pattern.intensity_axis.bits();
    let polarization_width = pattern.polarization_axis.bits();

    log::debug!(
        "reading {} voxels ({} bits/voxel, ecc={})",
        pattern.voxels.len(),
        pattern.bits_per_voxel(),
        pattern.ecc_name
    );

    let per_voxel_bits: Vec<crate::bits::BitString> = pattern
        .voxels
        .par_iter()
        .enumerate()
        .map(|(i, voxel)| {
            let (x, y, z) = index_to_coords(i, nx, ny);
            if (voxel.x, voxel.y, voxel.z) != (x, y, z) {
                return Err(VoxelError::CorruptPattern(format!(
                    "voxel {i} reports coordinates ({}, {}, {}), expected ({x}, {y}, {z})",
                    voxel.x, voxel.y, voxel.z
                )));
            }
            let intensity_level = pattern.intensity_axis.physical_to_level(voxel.intensity);
            let polarization_level = pattern.polarization_axis.physical_to_level(voxel.polarization);
            log::trace!(
                "voxel {i} ({x},{y},{z}) -> intensity_level={intensity_level} polarization_level={polarization_level}"
            );
            let mut bits = level_to_bits(intensity_level, intensity_width);
            bits.extend_from_bitslice(&level_to_bits(polarization_level, polarization_width));
            Ok(bits)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut padded = crate::bits::BitString::with_capacity(pattern.voxels.len() * pattern.bits_per_voxel() as usize);
    for bits in &per_voxel_bits {
        padded.extend_from_bitslice(bits);
    }

    if padded.len() < pattern.encoded_bit_length {
        return Err(VoxelError::CorruptPattern(format!(
            "padded bitstream ({} bits) is shorter than encoded_bit_length ({})",
            padded.len(),
            pattern.encoded_bit_length
        )));
    }
    let encoded: &BitSlice<u8, Msb0> = &padded[..pattern.encoded_bit_length];

    let decoding = ecc.decode(encoded).map_err(|e| {
        VoxelError::CorruptPattern(format!("ECC decode failed on a revalidated pattern: {e}"))
    })?;

    if decoding.detected_uncorrectable > 0 {
        log::warn!(
            "{} uncorrectable block(s) detected while reading",
            decoding.detected_uncorrectable
        );
    }

    let want_bits = pattern.data_length_bytes * 8;
    if decoding.bits.len() < want_bits {
        return Err(VoxelError::CorruptPattern(format!(
            "decoded bitstream ({} bits) is shorter than data_length_bytes*8 ({want_bits})",
            decoding.bits.len()
        )));
    }
    let payload = bits_to_bytes(&decoding.bits[..want_bits])?;

    Ok(ReadResult {
        payload,
        corrected_errors: decoding.corrected_errors,
        detected_uncorrectable: decoding.detected_uncorrectable,
        voxels_processed: pattern.voxels.len(),
    })
}
