//! The storage pattern: the self-describing metadata bundle a writer
//! produces and a reader later consumes. Binds every write-time parameter
//! (geometry, quantisation, ECC) to the voxel list so that a reader never
//! has to guess how a pattern was produced.

use crate::ecc::{self, Ecc};
use crate::error::{Result, VoxelError};
use crate::quantiser::QuantisationAxis;
use crate::validate;
use crate::voxel::Voxel;
use serde::{Deserialize, Serialize};

/// `(nx, ny, nz)`, each positive and at most [`validate::MAX_GRID_AXIS`].
pub type GridSize = (u32, u32, u32);

/// `(px, py, pz)`: purely descriptive metadata, never consulted by the codec.
pub type VoxelPitch = (f64, f64, f64);

/// The complete, self-describing record produced by the writer and consumed
/// by the reader. Structurally equal, construct-time validated, no setters.
#[derive(Debug, Clone, PartialEq)]
pub struct StoragePattern {
    pub voxels: Vec<Voxel>,
    pub grid_size: GridSize,
    pub voxel_pitch: VoxelPitch,
    pub intensity_axis: QuantisationAxis,
    pub polarization_axis: QuantisationAxis,
    pub ecc_name: String,
    pub data_length_bytes: usize,
    pub encoded_bit_length: usize,
    pub padding_bits: usize,
}

impl StoragePattern {
    /// Assembles a pattern from its parts and checks invariants 1-5 from §3
    /// against the shape alone, plus invariant 6 against `ecc` directly.
    /// Used by the writer (C6), which already holds a resolved [`Ecc`]
    /// instance — this constructor never touches the ECC registry, so it
    /// can never fail with `UnknownEcc` (§7 reserves that Kind for C7).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        voxels: Vec<Voxel>,
        grid_size: GridSize,
        voxel_pitch: VoxelPitch,
        intensity_axis: QuantisationAxis,
        polarization_axis: QuantisationAxis,
        ecc: &dyn Ecc,
        data_length_bytes: usize,
        encoded_bit_length: usize,
        padding_bits: usize,
    ) -> Result<Self> {
        let pattern = Self {
            voxels,
            grid_size,
            voxel_pitch,
            intensity_axis,
            polarization_axis,
            ecc_name: ecc.name().to_string(),
            data_length_bytes,
            encoded_bit_length,
            padding_bits,
        };
        pattern.validate_structure()?;
        pattern.validate_against(ecc)?;
        Ok(pattern)
    }

    pub fn bits_per_voxel(&self) -> u32 {
        self.intensity_axis.bits() + self.polarization_axis.bits()
    }

    pub fn capacity_bits(&self) -> u64 {
        let (nx, ny, nz) = self.grid_size;
        (nx as u64) * (ny as u64) * (nz as u64) * (self.bits_per_voxel() as u64)
    }

    pub fn voxel_count(&self) -> usize {
        self.encoded_bit_length.div_ceil(self.bits_per_voxel().max(1) as usize)
    }

    /// Invariants 1-5 from §3: grid shape, pitch, bits-per-voxel, the
    /// padding arithmetic, voxel-count-vs-volume, and per-voxel coordinate
    /// bounds. Never resolves `ecc_name`, so it never raises `UnknownEcc`.
    fn validate_structure(&self) -> Result<()> {
        validate::validate_grid(self.grid_size.0, self.grid_size.1, self.grid_size.2)?;
        validate::validate_pitch(self.voxel_pitch.0, self.voxel_pitch.1, self.voxel_pitch.2)?;

        let bits_per_voxel = self.bits_per_voxel();
        if bits_per_voxel == 0 {
            return Err(VoxelError::CorruptPattern(
                "bits_per_voxel must be at least 1: both axes carry zero bits".to_string(),
            ));
        }

        let voxel_count = self.voxel_count();
        if self.encoded_bit_length + self.padding_bits != voxel_count * bits_per_voxel as usize {
            return Err(VoxelError::CorruptPattern(format!(
                "encoded_bit_length ({}) + padding_bits ({}) must equal voxel_count ({}) * bits_per_voxel ({})",
                self.encoded_bit_length, self.padding_bits, voxel_count, bits_per_voxel
            )));
        }

        let (nx, ny, nz) = self.grid_size;
        let grid_volume = (nx as u64) * (ny as u64) * (nz as u64);
        if voxel_count as u64 > grid_volume {
            return Err(VoxelError::CorruptPattern(format!(
                "voxel_count ({voxel_count}) exceeds grid volume ({grid_volume})"
            )));
        }

        if self.voxels.len() != voxel_count {
            return Err(VoxelError::CorruptPattern(format!(
                "pattern carries {} voxels, expected {voxel_count}",
                self.voxels.len()
            )));
        }

        for voxel in &self.voxels {
            if voxel.x >= nx || voxel.y >= ny || voxel.z >= nz {
                return Err(VoxelError::CorruptPattern(format!(
                    "voxel ({}, {}, {}) lies outside the grid box ({nx}, {ny}, {nz})",
                    voxel.x, voxel.y, voxel.z
                )));
            }
        }

        Ok(())
    }

    /// Invariant 6 from §3, checked against an already-resolved `ecc`.
    fn validate_against(&self, ecc: &dyn Ecc) -> Result<()> {
        let raw_capacity = ecc.raw_capacity(self.encoded_bit_length);
        if self.data_length_bytes * 8 > raw_capacity {
            return Err(VoxelError::CorruptPattern(format!(
                "data_length_bytes ({}) * 8 exceeds the ECC raw capacity ({raw_capacity}) of encoded_bit_length ({})",
                self.data_length_bytes, self.encoded_bit_length
            )));
        }
        Ok(())
    }

    /// Re-checks every invariant from §3, resolving `ecc_name` through the
    /// registry. Called by the reader (C7) before trusting a pattern that
    /// may have been perturbed, and by [`PatternDict`] reconstruction, which
    /// only has a name string to work with. `UnknownEcc` can surface here.
    pub fn validate(&self) -> Result<()> {
        self.validate_structure()?;
        let ecc = ecc::registry().get(&self.ecc_name)?;
        self.validate_against(&*ecc)
    }
}

/// The structural dictionary projection of a [`StoragePattern`] (§6),
/// handed off to the out-of-scope persistence collaborator. The library
/// only defines the shape and the two conversions; materializing it as
/// JSON (or anything else) is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDict {
    pub grid_size: [u32; 3],
    pub voxel_pitch: [f64; 3],
    pub intensity_range: [f64; 2],
    pub polarization_range: [f64; 2],
    pub intensity_levels: u32,
    pub polarization_states: u32,
    pub error_correction: String,
    pub data_length_bytes: usize,
    pub encoded_bit_length: usize,
    pub padding_bits: usize,
    pub voxels: Vec<[f64; 5]>,
}

impl From<&StoragePattern> for PatternDict {
    fn from(p: &StoragePattern) -> Self {
        Self {
            grid_size: [p.grid_size.0, p.grid_size.1, p.grid_size.2],
            voxel_pitch: [p.voxel_pitch.0, p.voxel_pitch.1, p.voxel_pitch.2],
            intensity_range: [p.intensity_axis.lo, p.intensity_axis.hi],
            polarization_range: [p.polarization_axis.lo, p.polarization_axis.hi],
            intensity_levels: p.intensity_axis.levels,
            polarization_states: p.polarization_axis.levels,
            error_correction: p.ecc_name.clone(),
            data_length_bytes: p.data_length_bytes,
            encoded_bit_length: p.encoded_bit_length,
            padding_bits: p.padding_bits,
            voxels: p
                .voxels
                .iter()
                .map(|v| [v.x as f64, v.y as f64, v.z as f64, v.intensity, v.polarization])
                .collect(),
        }
    }
}

impl TryFrom<PatternDict> for StoragePattern {
    type Error = VoxelError;

    fn try_from(d: PatternDict) -> Result<Self> {
        let intensity_axis =
            QuantisationAxis::new(d.intensity_levels, d.intensity_range[0], d.intensity_range[1])?;
        let polarization_axis = QuantisationAxis::new(
            d.polarization_states,
            d.polarization_range[0],
            d.polarization_range[1],
        )?;
        let voxels = d
            .voxels
            .into_iter()
            .map(|[x, y, z, intensity, polarization]| {
                Voxel::new(x as u32, y as u32, z as u32, intensity, polarization)
            })
            .collect::<Result<Vec<_>>>()?;
        // Only a name string survives the dictionary projection, so
        // reconstruction resolves it through the registry via `validate()`
        // rather than through `StoragePattern::new`'s direct-`Ecc` path.
        let pattern = StoragePattern {
            voxels,
            grid_size: (d.grid_size[0], d.grid_size[1], d.grid_size[2]),
            voxel_pitch: (d.voxel_pitch[0], d.voxel_pitch[1], d.voxel_pitch[2]),
            intensity_axis,
            polarization_axis,
            ecc_name: d.error_correction,
            data_length_bytes: d.data_length_bytes,
            encoded_bit_length: d.encoded_bit_length,
            padding_bits: d.padding_bits,
        };
        pattern.validate()?;
        Ok(pattern)
    }
}

impl StoragePattern {
    pub fn to_dict(&self) -> PatternDict {
        PatternDict::from(self)
    }

    pub fn from_dict(dict: PatternDict) -> Result<Self> {
        StoragePattern::try_from(dict)
    }
}
