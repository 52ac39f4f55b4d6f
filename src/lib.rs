//! Codec for a five-dimensional optical voxel storage channel: a payload of
//! opaque bytes round-trips through a lattice of intensity/polarization
//! voxels, tolerating bounded measurement error via pluggable forward error
//! correction.
//!
//! The write path is [`writer::write`]; the read path is [`reader::read`].
//! Both operate on a [`pattern::StoragePattern`], the self-describing
//! metadata bundle that binds write-time parameters to read-time
//! reconstruction.

pub mod bits;
pub mod ecc;
pub mod error;
pub mod lattice;
pub mod noise;
pub mod pattern;
pub mod quantiser;
pub mod reader;
pub mod validate;
pub mod voxel;
pub mod writer;

pub use crate::error::{Result, VoxelError};
pub use crate::pattern::{GridSize, PatternDict, StoragePattern, VoxelPitch};
pub use crate::quantiser::QuantisationAxis;
pub use crate::reader::{read, ReadResult};
pub use crate::voxel::Voxel;
pub use crate::writer::{write, write_named};
