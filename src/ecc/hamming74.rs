use super::{DecodingResult, Ecc};
use crate::bits::BitString;
use crate::error::{Result, VoxelError};
use bitvec::prelude::*;

/// Hamming(7,4): 4 raw bits become a 7-bit codeword that can correct any
/// single-bit error. Parity positions are 1, 2, 4 (1-indexed); data
/// occupies positions 3, 5, 6, 7. Double-bit errors are not reliably
/// corrected — Hamming(7,4) can't distinguish them from a single error on a
/// different bit and may silently miscorrect.
pub struct Hamming74;

impl Default for Hamming74 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hamming74 {
    pub fn new() -> Self {
        Self
    }
}

const RAW_BLOCK: usize = 4;
const ENCODED_BLOCK: usize = 7;

/// Builds the 7-bit codeword (positions 1..=7, index 0 = position 1) from 4
/// data bits occupying positions 3, 5, 6, 7.
fn encode_block(d: [bool; 4]) -> [bool; 7] {
    let [d0, d1, d2, d3] = d;
    let p1 = d0 ^ d1 ^ d3; // covers positions 1,3,5,7
    let p2 = d0 ^ d2 ^ d3; // covers positions 2,3,6,7
    let p4 = d1 ^ d2 ^ d3; // covers positions 4,5,6,7
    [p1, p2, d0, p4, d1, d2, d3]
}

/// Corrects at most a single-bit error in a 7-bit codeword and returns the
/// 4 recovered data bits plus whether a correction was made.
fn decode_block(mut c: [bool; 7]) -> ([bool; 4], bool) {
    let c1 = c[0] ^ c[2] ^ c[4] ^ c[6]; // positions 1,3,5,7
    let c2 = c[1] ^ c[2] ^ c[5] ^ c[6]; // positions 2,3,6,7
    let c4 = c[3] ^ c[4] ^ c[5] ^ c[6]; // positions 4,5,6,7
    let syndrome = (c1 as u8) | ((c2 as u8) << 1) | ((c4 as u8) << 2);
    let corrected = syndrome != 0 && syndrome as usize <= ENCODED_BLOCK;
    if corrected {
        c[syndrome as usize - 1] = !c[syndrome as usize - 1];
    }
    ([c[2], c[4], c[5], c[6]], corrected)
}

impl Ecc for Hamming74 {
    fn name(&self) -> &'static str {
        "hamming74"
    }

    fn encode(&self, bits: &BitSlice<u8, Msb0>) -> Result<BitString> {
        if bits.len() % RAW_BLOCK != 0 {
            return Err(VoxelError::InvalidLength(format!(
                "hamming74 encode input must be a multiple of {RAW_BLOCK} bits, got {}",
                bits.len()
            )));
        }
        let mut out = BitString::with_capacity(bits.len() / RAW_BLOCK * ENCODED_BLOCK);
        for chunk in bits.chunks(RAW_BLOCK) {
            let d = [chunk[0], chunk[1], chunk[2], chunk[3]];
            for bit in encode_block(d) {
                out.push(bit);
            }
        }
        Ok(out)
    }

    fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<DecodingResult> {
        if bits.len() % ENCODED_BLOCK != 0 {
            return Err(VoxelError::InvalidLength(format!(
                "hamming74 decode input must be a multiple of {ENCODED_BLOCK} bits, got {}",
                bits.len()
            )));
        }
        let mut out = BitString::with_capacity(bits.len() / ENCODED_BLOCK * RAW_BLOCK);
        let mut corrected_errors = 0;
        for chunk in bits.chunks(ENCODED_BLOCK) {
            let c = [
                chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6],
            ];
            let (data, corrected) = decode_block(c);
            if corrected {
                corrected_errors += 1;
                log::warn!("hamming74 corrected a single-bit error in one codeword");
            }
            for bit in data {
                out.push(bit);
            }
        }
        Ok(DecodingResult {
            bits: out,
            corrected_errors,
            detected_uncorrectable: 0,
        })
    }

    fn encoded_len(&self, raw_bits: usize) -> usize {
        raw_bits.div_ceil(RAW_BLOCK) * ENCODED_BLOCK
    }

    fn raw_capacity(&self, encoded_bits: usize) -> usize {
        encoded_bits / ENCODED_BLOCK * RAW_BLOCK
    }
}
