use super::{DecodingResult, Ecc};
use crate::bits::BitString;
use crate::error::{Result, VoxelError};
use bitvec::prelude::*;

/// Single parity bit per byte: 8 raw bits become a 9-bit codeword with one
/// even-parity bit appended. Detects any single-bit error but cannot
/// correct it — the bad block is passed through unchanged and the failure
/// is surfaced only via `detected_uncorrectable`.
pub struct Parity8;

impl Default for Parity8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Parity8 {
    pub fn new() -> Self {
        Self
    }
}

const RAW_BLOCK: usize = 8;
const ENCODED_BLOCK: usize = 9;

impl Ecc for Parity8 {
    fn name(&self) -> &'static str {
        "parity8"
    }

    fn encode(&self, bits: &BitSlice<u8, Msb0>) -> Result<BitString> {
        if bits.len() % RAW_BLOCK != 0 {
            return Err(VoxelError::InvalidLength(format!(
                "parity8 encode input must be a multiple of {RAW_BLOCK} bits, got {}",
                bits.len()
            )));
        }
        let mut out = BitString::with_capacity(bits.len() / RAW_BLOCK * ENCODED_BLOCK);
        for chunk in bits.chunks(RAW_BLOCK) {
            let parity = chunk.count_ones() % 2 != 0;
            out.extend_from_bitslice(chunk);
            out.push(parity);
        }
        Ok(out)
    }

    fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<DecodingResult> {
        if bits.len() % ENCODED_BLOCK != 0 {
            return Err(VoxelError::InvalidLength(format!(
                "parity8 decode input must be a multiple of {ENCODED_BLOCK} bits, got {}",
                bits.len()
            )));
        }
        let mut out = BitString::with_capacity(bits.len() / ENCODED_BLOCK * RAW_BLOCK);
        let mut detected_uncorrectable = 0;
        for chunk in bits.chunks(ENCODED_BLOCK) {
            let data = &chunk[..RAW_BLOCK];
            let parity_bit = chunk[RAW_BLOCK];
            let expected_parity = data.count_ones() % 2 != 0;
            if parity_bit != expected_parity {
                detected_uncorrectable += 1;
                log::warn!("parity8 detected an uncorrectable error in one codeword");
            }
            out.extend_from_bitslice(data);
        }
        Ok(DecodingResult {
            bits: out,
            corrected_errors: 0,
            detected_uncorrectable,
        })
    }

    fn encoded_len(&self, raw_bits: usize) -> usize {
        raw_bits.div_ceil(RAW_BLOCK) * ENCODED_BLOCK
    }

    fn raw_capacity(&self, encoded_bits: usize) -> usize {
        encoded_bits / ENCODED_BLOCK * RAW_BLOCK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::bytes_to_bits;

    #[test]
    fn round_trips_noise_free() {
        let ecc = Parity8::new();
        let raw = bytes_to_bits(b"0123456789abcdef");
        let encoded = ecc.encode(&raw).unwrap();
        assert_eq!(encoded.len(), raw.len() / RAW_BLOCK * ENCODED_BLOCK);
        let decoded = ecc.decode(&encoded).unwrap();
        assert_eq!(decoded.bits, raw);
        assert_eq!(decoded.detected_uncorrectable, 0);
    }

    #[test]
    fn detects_every_single_bit_flip_without_correcting() {
        let ecc = Parity8::new();
        let raw = bytes_to_bits(&[0b1011_0010]);
        let encoded = ecc.encode(&raw).unwrap();
        for flip in 0..ENCODED_BLOCK {
            let mut noisy = encoded.clone();
            let bit = *noisy.get(flip).unwrap();
            noisy.set(flip, !bit);
            let decoded = ecc.decode(&noisy).unwrap();
            assert_eq!(decoded.detected_uncorrectable, 1, "flip {flip}");
            assert_eq!(decoded.corrected_errors, 0);
            if flip < RAW_BLOCK {
                assert_ne!(decoded.bits, raw, "data flip {flip} must be visible, uncorrected");
            }
        }
    }

    #[test]
    fn rejects_misaligned_lengths() {
        let ecc = Parity8::new();
        let mut raw = bytes_to_bits(&[0u8]);
        raw.pop();
        assert!(matches!(
            ecc.encode(&raw),
            Err(VoxelError::InvalidLength(_))
        ));
        let short = bitvec![u8, Msb0; 0, 1, 1];
        assert!(matches!(
            ecc.decode(&short),
            Err(VoxelError::InvalidLength(_))
        ));
    }

    #[test]
    fn sizing_matches_block_ratio() {
        let ecc = Parity8::new();
        assert_eq!(ecc.encoded_len(16), 18);
        assert_eq!(ecc.raw_capacity(18), 16);
    }
}
