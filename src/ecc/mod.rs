//! Pluggable forward-error-correction layer. Every scheme is a stateless
//! capability set (`name`, `encode`, `decode`, `encoded_len`, `raw_capacity`)
//! resolved through a name registry rather than a class hierarchy, mirroring
//! the codec-registry idiom used for name-to-format tables elsewhere in this
//! corpus.

pub mod hamming74;
pub mod identity;
pub mod parity8;

use crate::bits::BitString;
use crate::error::{Result, VoxelError};
use bitvec::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Outcome of decoding an ECC-encoded bitstream.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodingResult {
    pub bits: BitString,
    pub corrected_errors: usize,
    pub detected_uncorrectable: usize,
}

pub trait Ecc: Send + Sync {
    /// Stable identifier, e.g. `"hamming74"`.
    fn name(&self) -> &'static str;

    fn encode(&self, bits: &BitSlice<u8, Msb0>) -> Result<BitString>;

    fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<DecodingResult>;

    /// Encoded bit count for `raw_bits` raw bits. A pure function of
    /// `raw_bits`, used by the writer for sizing before it ever touches a
    /// bit.
    fn encoded_len(&self, raw_bits: usize) -> usize;

    /// Inverse of [`Ecc::encoded_len`]: the largest raw bit count that fits
    /// in `encoded_bits` encoded bits. Used to check invariant 6 of the
    /// storage pattern (the payload must fit after removing ECC overhead).
    fn raw_capacity(&self, encoded_bits: usize) -> usize;
}

/// A name → factory registry for [`Ecc`] implementations, populated once at
/// first use with the three built-ins. Additional schemes plug in by
/// implementing [`Ecc`] and registering a unique name.
pub struct EccRegistry {
    schemes: HashMap<&'static str, Arc<dyn Ecc>>,
}

impl EccRegistry {
    fn new() -> Self {
        let mut schemes: HashMap<&'static str, Arc<dyn Ecc>> = HashMap::new();
        let identity: Arc<dyn Ecc> = Arc::new(identity::Identity::new());
        let hamming: Arc<dyn Ecc> = Arc::new(hamming74::Hamming74::new());
        let parity: Arc<dyn Ecc> = Arc::new(parity8::Parity8::new());
        schemes.insert(identity.name(), identity);
        schemes.insert(hamming.name(), hamming);
        schemes.insert(parity.name(), parity);
        Self { schemes }
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Ecc>> {
        self.schemes
            .get(name)
            .cloned()
            .ok_or_else(|| VoxelError::UnknownEcc(name.to_string()))
    }
}

pub fn registry() -> &'static EccRegistry {
    static REGISTRY: OnceLock<EccRegistry> = OnceLock::new();
    REGISTRY.get_or_init(EccRegistry::new)
}
