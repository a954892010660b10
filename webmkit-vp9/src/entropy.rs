//! Boolean entropy coding for VP9.
//!
//! VP9 entropy-codes its compressed header and coefficient data with a
//! boolean arithmetic coder. This module provides the bool decoder and the
//! probability context with its four frame-context save slots.

use crate::error::{Result, Vp9Error};
use webmkit_core::BitReader;

/// VP9 boolean decoder for arithmetic coding.
///
/// The decoder reads its bits from the underlying [`BitReader`], so the
/// cursor keeps advancing through the same frame buffer that the
/// uncompressed header was parsed from. The bit budget is fixed at
/// construction: `8 * size_in_bytes` bits, of which the first eight seed
/// the value register.
#[derive(Debug)]
pub struct BoolDecoder<'r, 'a> {
    reader: &'r mut BitReader<'a>,
    value: u32,
    range: u32,
    max_bits: usize,
}

impl<'r, 'a> BoolDecoder<'r, 'a> {
    /// Initialize the decoder over `size_in_bytes` bytes of the stream.
    ///
    /// Consumes the mandatory marker bit, which must be zero.
    pub fn new(reader: &'r mut BitReader<'a>, size_in_bytes: usize) -> Result<Self> {
        if size_in_bytes < 1 {
            return Err(Vp9Error::BoolInvalidSize(size_in_bytes));
        }

        let value = reader.read_bits(8)?;
        let mut decoder = Self {
            reader,
            value,
            range: 255,
            max_bits: 8 * size_in_bytes - 8,
        };

        if decoder.read_bool(128)? {
            return Err(Vp9Error::BoolMarkerNonZero);
        }
        Ok(decoder)
    }

    /// Decode one boolean with the given probability (0..=255) of being zero.
    pub fn read_bool(&mut self, probability: u8) -> Result<bool> {
        let split = 1 + (((self.range - 1) * probability as u32) >> 8);

        let result = if self.value < split {
            self.range = split;
            false
        } else {
            self.range -= split;
            self.value -= split;
            true
        };

        while self.range < 128 {
            if self.max_bits == 0 {
                return Err(Vp9Error::BoolOutOfBits);
            }
            let new_bit = self.reader.read_bit()? as u32;
            self.max_bits -= 1;
            self.range *= 2;
            self.value = (self.value << 1) + new_bit;
        }

        Ok(result)
    }

    /// Decode `n` uniform bits, MSB first.
    pub fn read_literal(&mut self, n: usize) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..n {
            value = (value << 1) + self.read_bool(128)? as u32;
        }
        Ok(value)
    }

    /// Bits left in the decoder's budget.
    pub fn bits_remaining(&self) -> usize {
        self.max_bits
    }

    /// Consume the remaining budget as padding, which must be all zero.
    pub fn exit(mut self) -> Result<()> {
        while self.max_bits > 0 {
            if self.reader.read_bit()? {
                return Err(Vp9Error::BoolPaddingNonZero);
            }
            self.max_bits -= 1;
        }
        Ok(())
    }
}

/// One frame context worth of entropy-coding probabilities.
///
/// Defaults are the VP9 baseline tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameContext {
    /// Partition probabilities.
    pub partition_probs: [[u8; 3]; 16],
    /// Skip probabilities.
    pub skip_probs: [u8; 3],
    /// Intra/inter probabilities.
    pub intra_inter_probs: [u8; 4],
    /// Compound mode probabilities.
    pub comp_inter_probs: [u8; 5],
    /// Single reference probabilities.
    pub single_ref_probs: [[u8; 2]; 5],
    /// Compound reference probabilities.
    pub comp_ref_probs: [u8; 5],
    /// Inter mode probabilities.
    pub inter_mode_probs: [[u8; 3]; 7],
    /// Interpolation filter probabilities.
    pub interp_filter_probs: [[u8; 2]; 4],
    /// Intra mode probabilities (luma).
    pub y_mode_probs: [[u8; 9]; 4],
    /// Intra mode probabilities (chroma).
    pub uv_mode_probs: [[u8; 9]; 10],
    /// Transform size probabilities (8x8).
    pub tx_probs_8x8: [[u8; 1]; 2],
    /// Transform size probabilities (16x16).
    pub tx_probs_16x16: [[u8; 2]; 2],
    /// Transform size probabilities (32x32).
    pub tx_probs_32x32: [[u8; 3]; 2],
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            partition_probs: [
                [199, 122, 141],
                [147, 63, 159],
                [148, 133, 118],
                [121, 104, 114],
                [174, 73, 87],
                [92, 41, 83],
                [82, 99, 50],
                [53, 39, 39],
                [177, 58, 59],
                [68, 26, 63],
                [52, 79, 25],
                [17, 14, 12],
                [222, 34, 30],
                [72, 16, 44],
                [58, 32, 12],
                [10, 7, 6],
            ],
            skip_probs: [192, 128, 64],
            intra_inter_probs: [9, 102, 187, 225],
            comp_inter_probs: [239, 183, 119, 96, 41],
            single_ref_probs: [[33, 16], [77, 74], [142, 142], [172, 170], [238, 247]],
            comp_ref_probs: [50, 126, 123, 221, 226],
            inter_mode_probs: [
                [2, 173, 34],
                [7, 145, 85],
                [7, 166, 63],
                [7, 94, 66],
                [8, 64, 46],
                [17, 81, 31],
                [25, 29, 30],
            ],
            interp_filter_probs: [[235, 162], [36, 255], [34, 3], [149, 144]],
            y_mode_probs: [
                [65, 32, 18, 144, 162, 194, 41, 51, 98],
                [132, 68, 18, 165, 217, 196, 45, 40, 78],
                [173, 80, 19, 176, 240, 193, 64, 35, 46],
                [221, 135, 38, 194, 248, 121, 96, 85, 29],
            ],
            uv_mode_probs: [
                [120, 7, 76, 176, 208, 126, 28, 54, 103],
                [48, 12, 154, 155, 139, 90, 34, 117, 119],
                [67, 6, 25, 204, 243, 158, 13, 21, 96],
                [97, 5, 44, 131, 176, 139, 48, 68, 97],
                [83, 5, 42, 156, 111, 152, 26, 49, 152],
                [80, 5, 58, 178, 74, 83, 33, 62, 145],
                [86, 5, 32, 154, 192, 168, 14, 22, 163],
                [85, 5, 32, 156, 216, 148, 19, 29, 73],
                [77, 7, 64, 116, 132, 122, 37, 126, 120],
                [101, 21, 107, 181, 192, 103, 19, 67, 125],
            ],
            tx_probs_8x8: [[100], [66]],
            tx_probs_16x16: [[20, 152], [15, 101]],
            tx_probs_32x32: [[3, 136, 37], [5, 52, 13]],
        }
    }
}

/// Number of frame-context save slots.
pub const FRAME_CONTEXTS: usize = 4;

/// The decoder's probability state: a working context plus the four
/// persistent frame-context slots the bitstream indexes with
/// `frame_context_idx`.
///
/// Allocated once per decoder and reused across frames.
#[derive(Debug, Clone, Default)]
pub struct ProbabilityTables {
    current: FrameContext,
    slots: [FrameContext; FRAME_CONTEXTS],
}

impl ProbabilityTables {
    /// Create tables with baseline probabilities in every slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The working frame context.
    pub fn current(&self) -> &FrameContext {
        &self.current
    }

    /// Reset the working context to the baseline tables.
    pub fn reset_probs(&mut self) {
        self.current = FrameContext::default();
    }

    /// Store the working context into a slot.
    pub fn save_probs(&mut self, slot: usize) {
        self.slots[slot] = self.current.clone();
    }

    /// Load a slot into the working context.
    pub fn load_probs(&mut self, slot: usize) {
        self.current = self.slots[slot].clone();
    }
}
