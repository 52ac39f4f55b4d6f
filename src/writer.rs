//! The writer (C6): bytes → bits → ECC-encoded bits → padded bitstream →
//! quantised levels → voxel list. A pure function of its inputs.

use crate::bits::{bits_to_level, bytes_to_bits};
use crate::ecc::{self, Ecc};
use crate::error::{Result, VoxelError};
use crate::lattice::index_to_coords;
use crate::pattern::{GridSize, StoragePattern, VoxelPitch};
use crate::quantiser::QuantisationAxis;
use crate::validate;
use crate::voxel::Voxel;
use rayon::prelude::*;

/// Encodes `data` into a [`StoragePattern`] over the given grid and
/// quantisation, using `ecc` for forward error correction. Fails with
/// `CapacityExceeded` when the grid is too small to hold the encoded
/// bitstream. Per §4.5, the writer's input is an already-resolved ECC
/// instance, not a name — resolving a name against the registry is the
/// caller's job (see [`write_named`]), so this function can never fail with
/// `UnknownEcc` (§7 reserves that Kind for the reader, C7).
pub fn write(
    data: &[u8],
    grid_size: GridSize,
    voxel_pitch: VoxelPitch,
    intensity_axis: QuantisationAxis,
    polarization_axis: QuantisationAxis,
    ecc: &dyn Ecc,
) -> Result<StoragePattern> {
    validate::validate_bytes(data)?;
    let (nx, ny, nz) = grid_size;
    validate::validate_grid(nx, ny, nz)?;

    let bits_per_voxel = intensity_axis.bits() + polarization_axis.bits();
    if bits_per_voxel == 0 {
        return Err(VoxelError::InvalidParameter(
            "at least one axis must carry information (bits_per_voxel must be >= 1)".to_string(),
        ));
    }

    let raw_bits = data.len() * 8;
    let encoded_bits = ecc.encoded_len(raw_bits);
    let voxel_count = encoded_bits.div_ceil(bits_per_voxel as usize);
    let grid_volume = (nx as u64) * (ny as u64) * (nz as u64);

    if voxel_count as u64 > grid_volume {
        return Err(VoxelError::CapacityExceeded(format!(
            "{voxel_count} voxels required but grid only holds {grid_volume} ({nx}x{ny}x{nz})"
        )));
    }

    log::debug!(
        "writing {} bytes as {voxel_count} voxels ({bits_per_voxel} bits/voxel, ecc={})",
        data.len(),
        ecc.name()
    );

    let padding_bits = voxel_count * bits_per_voxel as usize - encoded_bits;

    let raw = bytes_to_bits(data);
    let mut bitstream = ecc.encode(&raw)?;
    bitstream.resize(bitstream.len() + padding_bits, false);

    let intensity_width = intensity_axis.bits();
    let polarization_width = polarization_axis.bits();

    let voxels: Vec<Voxel> = (0..voxel_count)
        .into_par_iter()
        .map(|i| {
            let start = i * bits_per_voxel as usize;
            let slice = &bitstream[start..start + bits_per_voxel as usize];
            let (intensity_bits, polarization_bits) = slice.split_at(intensity_width as usize);
            debug_assert_eq!(polarization_bits.len(), polarization_width as usize);

            let intensity_level = bits_to_level(intensity_bits);
            let polarization_level = bits_to_level(polarization_bits);
            let intensity = intensity_axis.level_to_physical(intensity_level);
            let polarization = polarization_axis.level_to_physical(polarization_level);

            let (x, y, z) = index_to_coords(i, nx, ny);
            log::trace!("voxel {i} -> ({x},{y},{z}) intensity={intensity} polarization={polarization}");
            Voxel::new(x, y, z, intensity, polarization)
        })
        .collect::<Result<Vec<_>>>()?;

    StoragePattern::new(
        voxels,
        grid_size,
        voxel_pitch,
        intensity_axis,
        polarization_axis,
        ecc,
        data.len(),
        encoded_bits,
        padding_bits,
    )
}

/// Convenience wrapper that resolves `ecc_name` through [`ecc::registry`]
/// before delegating to [`write`]. Unlike `write`, this *can* fail with
/// `UnknownEcc` — the lookup happens here, at the call site, not inside the
/// writer itself.
pub fn write_named(
    data: &[u8],
    grid_size: GridSize,
    voxel_pitch: VoxelPitch,
    intensity_axis: QuantisationAxis,
    polarization_axis: QuantisationAxis,
    ecc_name: &str,
) -> Result<StoragePattern> {
    let ecc = ecc::registry().get(ecc_name)?;
    write(data, grid_size, voxel_pitch, intensity_axis, polarization_axis, &*ecc)
}
