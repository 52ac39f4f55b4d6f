use super::{DecodingResult, Ecc};
use crate::bits::BitString;
use crate::error::Result;
use bitvec::prelude::*;

/// The `none` scheme: bits pass through unchanged, no redundancy added.
pub struct Identity;

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl Identity {
    pub fn new() -> Self {
        Self
    }
}

impl Ecc for Identity {
    fn name(&self) -> &'static str {
        "none"
    }

    fn encode(&self, bits: &BitSlice<u8, Msb0>) -> Result<BitString> {
        Ok(bits.to_bitvec())
    }

    fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<DecodingResult> {
        Ok(DecodingResult {
            bits: bits.to_bitvec(),
            corrected_errors: 0,
            detected_uncorrectable: 0,
        })
    }

    fn encoded_len(&self, raw_bits: usize) -> usize {
        raw_bits
    }

    fn raw_capacity(&self, encoded_bits: usize) -> usize {
        encoded_bits
    }
}
