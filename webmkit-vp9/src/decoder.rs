//! VP9 frame parsing.
//!
//! [`Vp9Decoder`] consumes one coded frame at a time and parses its
//! uncompressed header. State that the bitstream defines as persistent
//! (reference frame sizes, loop-filter deltas, segmentation data,
//! probability contexts, the per-position segment-id map) is carried in the
//! decoder across frames. Frame reconstruction is not performed; the
//! compressed header is skipped through the boolean decoder so that its
//! framing is still validated.

use crate::entropy::{BoolDecoder, ProbabilityTables, FRAME_CONTEXTS};
use crate::error::{Result, Vp9Error};
use crate::frame_header::{
    ColorRange, ColorSpace, FrameHeader, FrameType, InterpFilter, Profile, ALTREF_FRAME,
    GOLDEN_FRAME, INTRA_FRAME, LAST_FRAME, LITERAL_TO_FILTER, MAX_SEGMENTS, MAX_TILE_WIDTH_B64,
    MIN_TILE_WIDTH_B64, NUM_REF_FRAMES, REFS_PER_FRAME, SEGMENTATION_FEATURE_BITS,
    SEGMENTATION_FEATURE_SIGNED, SEG_LVL_MAX,
};

use tracing::{debug, trace};
use webmkit_core::BitReader;

/// VP9 decoder front end: uncompressed header parsing with carried state.
#[derive(Debug, Clone, Default)]
pub struct Vp9Decoder {
    header: FrameHeader,
    last_frame_type: FrameType,
    probability_tables: ProbabilityTables,
    ref_frame_sizes: [Option<(u32, u32)>; NUM_REF_FRAMES],
    segment_ids: Vec<u8>,
}

impl Vp9Decoder {
    /// Create a decoder with baseline state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame type of the previously parsed frame.
    pub fn last_frame_type(&self) -> FrameType {
        self.last_frame_type
    }

    /// The most recently parsed header.
    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Stored dimensions of a reference slot, if any frame refreshed it.
    pub fn ref_frame_size(&self, slot: usize) -> Option<(u32, u32)> {
        self.ref_frame_sizes[slot]
    }

    /// Parse one coded frame's headers.
    ///
    /// On success the parsed header is returned and the reference-slot
    /// store is refreshed. On failure the decoder state is unspecified and
    /// the caller must not consume it.
    pub fn parse_frame(&mut self, frame_data: &[u8]) -> Result<FrameHeader> {
        let mut reader = BitReader::new(frame_data);

        self.uncompressed_header(&mut reader)?;
        if self.header.show_existing_frame {
            debug!(
                index = self.header.frame_to_show_map_idx,
                "show existing frame"
            );
            return Ok(self.header.clone());
        }
        self.trailing_bits(&mut reader)?;

        if self.header.header_size_in_bytes > 0 {
            self.probability_tables
                .load_probs(self.header.frame_context_idx as usize);
            let bool_decoder =
                BoolDecoder::new(&mut reader, self.header.header_size_in_bytes as usize)?;
            // Compressed header syntax is not consumed yet; its framing
            // (marker and padding) still has to hold.
            bool_decoder.exit()?;
        }

        for slot in 0..NUM_REF_FRAMES {
            if self.header.refresh_frame_flags & (1 << slot) != 0 {
                self.ref_frame_sizes[slot] = Some((self.header.width, self.header.height));
            }
        }

        debug!(
            frame_type = ?self.header.frame_type,
            width = self.header.width,
            height = self.header.height,
            "parsed frame header"
        );
        Ok(self.header.clone())
    }

    fn uncompressed_header(&mut self, r: &mut BitReader) -> Result<()> {
        let frame_marker = r.read_bits(2)? as u8;
        if frame_marker != 2 {
            return Err(Vp9Error::InvalidFrameMarker(frame_marker));
        }

        let profile_low_bit = r.read_bit()? as u8;
        let profile_high_bit = r.read_bit()? as u8;
        let profile = (profile_high_bit << 1) + profile_low_bit;
        if profile == 3 {
            self.reserved_zero(r)?;
        }
        self.header.profile = Profile::try_from(profile)?;

        self.header.show_existing_frame = r.read_bit()?;
        if self.header.show_existing_frame {
            self.header.frame_to_show_map_idx = r.read_bits(3)? as u8;
            self.header.header_size_in_bytes = 0;
            self.header.refresh_frame_flags = 0;
            self.header.loop_filter.level = 0;
            return Ok(());
        }

        self.last_frame_type = self.header.frame_type;
        self.header.frame_type = if r.read_bit()? {
            FrameType::NonKey
        } else {
            FrameType::Key
        };
        self.header.show_frame = r.read_bit()?;
        self.header.error_resilient_mode = r.read_bit()?;

        if self.header.frame_type == FrameType::Key {
            self.frame_sync_code(r)?;
            self.color_config(r)?;
            self.frame_size(r)?;
            self.render_size(r)?;
            self.header.refresh_frame_flags = 0xFF;
            self.header.intra_only = false;
        } else {
            self.header.intra_only = if self.header.show_frame {
                false
            } else {
                r.read_bit()?
            };

            self.header.reset_frame_context = if self.header.error_resilient_mode {
                0
            } else {
                r.read_bits(2)? as u8
            };

            if self.header.intra_only {
                self.frame_sync_code(r)?;
                if self.header.profile > Profile::Profile0 {
                    self.color_config(r)?;
                } else {
                    self.header.color_space = ColorSpace::Bt601;
                    self.header.subsampling_x = true;
                    self.header.subsampling_y = true;
                    self.header.bit_depth = 8;
                }

                self.header.refresh_frame_flags = r.read_u8()?;
                self.frame_size(r)?;
                self.render_size(r)?;
            } else {
                self.header.refresh_frame_flags = r.read_u8()?;
                for i in 0..REFS_PER_FRAME {
                    self.header.ref_frame_idx[i] = r.read_bits(3)? as u8;
                    self.header.ref_frame_sign_bias[LAST_FRAME + i] = r.read_bit()?;
                }
                self.frame_size_with_refs(r)?;
                self.header.allow_high_precision_mv = r.read_bit()?;
                self.read_interpolation_filter(r)?;
            }
        }

        if !self.header.error_resilient_mode {
            self.header.refresh_frame_context = r.read_bit()?;
            self.header.frame_parallel_decoding_mode = r.read_bit()?;
        } else {
            self.header.refresh_frame_context = false;
            self.header.frame_parallel_decoding_mode = true;
        }

        self.header.frame_context_idx = r.read_bits(2)? as u8;
        if self.header.is_intra() || self.header.error_resilient_mode {
            self.setup_past_independence();
            if self.header.frame_type == FrameType::Key
                || self.header.error_resilient_mode
                || self.header.reset_frame_context == 3
            {
                for i in 0..FRAME_CONTEXTS {
                    self.probability_tables.save_probs(i);
                }
            } else if self.header.reset_frame_context == 2 {
                self.probability_tables
                    .save_probs(self.header.frame_context_idx as usize);
            }
            self.header.frame_context_idx = 0;
        }

        self.loop_filter_params(r)?;
        self.quantization_params(r)?;
        self.segmentation_params(r)?;
        self.tile_info(r)?;

        self.header.header_size_in_bytes = r.read_u16()?;

        Ok(())
    }

    fn reserved_zero(&mut self, r: &mut BitReader) -> Result<()> {
        if r.read_bit()? {
            return Err(Vp9Error::ReservedBitSet);
        }
        Ok(())
    }

    fn frame_sync_code(&mut self, r: &mut BitReader) -> Result<()> {
        let sync_code =
            ((r.read_u8()? as u32) << 16) | ((r.read_u8()? as u32) << 8) | r.read_u8()? as u32;
        if sync_code != crate::frame_header::VP9_FRAME_SYNC_CODE {
            return Err(Vp9Error::InvalidSyncCode(sync_code));
        }
        Ok(())
    }

    fn color_config(&mut self, r: &mut BitReader) -> Result<()> {
        if self.header.profile >= Profile::Profile2 {
            self.header.bit_depth = if r.read_bit()? { 12 } else { 10 };
        } else {
            self.header.bit_depth = 8;
        }

        let color_space = r.read_bits(3)? as u8;
        self.header.color_space = ColorSpace::try_from(color_space)?;

        if self.header.color_space != ColorSpace::Rgb {
            self.header.color_range = if r.read_bit()? {
                ColorRange::FullSwing
            } else {
                ColorRange::StudioSwing
            };

            if self.header.profile == Profile::Profile1 || self.header.profile == Profile::Profile3
            {
                self.header.subsampling_x = r.read_bit()?;
                self.header.subsampling_y = r.read_bit()?;
                self.reserved_zero(r)?;
            } else {
                self.header.subsampling_x = true;
                self.header.subsampling_y = true;
            }
        } else {
            self.header.color_range = ColorRange::FullSwing;
            if self.header.profile == Profile::Profile1 || self.header.profile == Profile::Profile3
            {
                self.header.subsampling_x = false;
                self.header.subsampling_y = false;
                self.reserved_zero(r)?;
            } else {
                return Err(Vp9Error::RgbInBaselineProfile(self.header.profile as u8));
            }
        }
        Ok(())
    }

    fn frame_size(&mut self, r: &mut BitReader) -> Result<()> {
        self.header.width = r.read_u16()? as u32 + 1;
        self.header.height = r.read_u16()? as u32 + 1;
        self.compute_image_size();
        Ok(())
    }

    fn render_size(&mut self, r: &mut BitReader) -> Result<()> {
        if r.read_bit()? {
            self.header.render_width = r.read_u16()? as u32 + 1;
            self.header.render_height = r.read_u16()? as u32 + 1;
        } else {
            self.header.render_width = self.header.width;
            self.header.render_height = self.header.height;
        }
        Ok(())
    }

    fn frame_size_with_refs(&mut self, r: &mut BitReader) -> Result<()> {
        let mut found_ref = false;
        for i in 0..REFS_PER_FRAME {
            if r.read_bit()? {
                let slot = self.header.ref_frame_idx[i] as usize;
                let (width, height) =
                    self.ref_frame_sizes[slot].ok_or(Vp9Error::MissingRefFrame(slot as u8))?;
                self.header.width = width;
                self.header.height = height;
                found_ref = true;
                break;
            }
        }

        if !found_ref {
            self.frame_size(r)?;
        } else {
            self.compute_image_size();
        }

        self.render_size(r)
    }

    fn compute_image_size(&mut self) {
        self.header.mi_cols = (self.header.width + 7) >> 3;
        self.header.mi_rows = (self.header.height + 7) >> 3;
        self.header.sb64_cols = (self.header.mi_cols + 7) >> 3;
        self.header.sb64_rows = (self.header.mi_rows + 7) >> 3;
    }

    fn read_interpolation_filter(&mut self, r: &mut BitReader) -> Result<()> {
        self.header.interp_filter = if r.read_bit()? {
            InterpFilter::Switchable
        } else {
            LITERAL_TO_FILTER[r.read_bits(2)? as usize]
        };
        Ok(())
    }

    fn loop_filter_params(&mut self, r: &mut BitReader) -> Result<()> {
        self.header.loop_filter.level = r.read_bits(6)? as u8;
        self.header.loop_filter.sharpness = r.read_bits(3)? as u8;
        self.header.loop_filter.delta_enabled = r.read_bit()?;
        if self.header.loop_filter.delta_enabled {
            self.header.loop_filter.delta_update = r.read_bit()?;
            if self.header.loop_filter.delta_update {
                for i in 0..4 {
                    if r.read_bit()? {
                        self.header.loop_filter.ref_deltas[i] = r.read_signed(6)? as i8;
                    }
                }
                for i in 0..2 {
                    if r.read_bit()? {
                        self.header.loop_filter.mode_deltas[i] = r.read_signed(6)? as i8;
                    }
                }
            }
        }
        Ok(())
    }

    fn quantization_params(&mut self, r: &mut BitReader) -> Result<()> {
        self.header.quant.base_q_idx = r.read_u8()?;
        self.header.quant.delta_q_y_dc = Self::read_delta_q(r)?;
        self.header.quant.delta_q_uv_dc = Self::read_delta_q(r)?;
        self.header.quant.delta_q_uv_ac = Self::read_delta_q(r)?;
        self.header.quant.lossless = self.header.quant.base_q_idx == 0
            && self.header.quant.delta_q_y_dc == 0
            && self.header.quant.delta_q_uv_dc == 0
            && self.header.quant.delta_q_uv_ac == 0;
        Ok(())
    }

    fn read_delta_q(r: &mut BitReader) -> Result<i8> {
        if r.read_bit()? {
            Ok(r.read_signed(4)? as i8)
        } else {
            Ok(0)
        }
    }

    fn segmentation_params(&mut self, r: &mut BitReader) -> Result<()> {
        self.header.segmentation.enabled = r.read_bit()?;
        if !self.header.segmentation.enabled {
            return Ok(());
        }

        self.header.segmentation.update_map = r.read_bit()?;
        if self.header.segmentation.update_map {
            for i in 0..7 {
                self.header.segmentation.tree_probs[i] = Self::read_prob(r)?;
            }
            self.header.segmentation.temporal_update = r.read_bit()?;
            for i in 0..3 {
                self.header.segmentation.pred_probs[i] =
                    if self.header.segmentation.temporal_update {
                        Self::read_prob(r)?
                    } else {
                        255
                    };
            }
        }

        if !r.read_bit()? {
            return Ok(());
        }

        self.header.segmentation.abs_or_delta_update = r.read_bit()?;
        for segment in 0..MAX_SEGMENTS {
            for feature in 0..SEG_LVL_MAX {
                let mut feature_value = 0i16;
                let feature_enabled = r.read_bit()?;
                self.header.segmentation.feature_enabled[segment][feature] = feature_enabled;
                if feature_enabled {
                    let bits_to_read = SEGMENTATION_FEATURE_BITS[feature];
                    feature_value = r.read_bits(bits_to_read)? as i16;
                    if SEGMENTATION_FEATURE_SIGNED[feature] && r.read_bit()? {
                        feature_value = -feature_value;
                    }
                }
                self.header.segmentation.feature_data[segment][feature] = feature_value;
            }
        }
        Ok(())
    }

    fn read_prob(r: &mut BitReader) -> Result<u8> {
        if r.read_bit()? {
            Ok(r.read_u8()?)
        } else {
            Ok(255)
        }
    }

    fn tile_info(&mut self, r: &mut BitReader) -> Result<()> {
        let min_log2_tile_cols = self.calc_min_log2_tile_cols();
        let max_log2_tile_cols = self.calc_max_log2_tile_cols();

        let mut tile_cols_log2 = min_log2_tile_cols;
        while tile_cols_log2 < max_log2_tile_cols {
            if r.read_bit()? {
                tile_cols_log2 += 1;
            } else {
                break;
            }
        }

        let mut tile_rows_log2 = r.read_bit()? as u8;
        if tile_rows_log2 > 0 {
            tile_rows_log2 += r.read_bit()? as u8;
        }

        self.header.tile_info.tile_cols_log2 = tile_cols_log2;
        self.header.tile_info.tile_rows_log2 = tile_rows_log2;
        self.header.tile_info.tile_cols = 1 << tile_cols_log2;
        self.header.tile_info.tile_rows = 1 << tile_rows_log2;
        Ok(())
    }

    fn calc_min_log2_tile_cols(&self) -> u8 {
        let mut min_log2 = 0;
        while (MAX_TILE_WIDTH_B64 << min_log2) < self.header.sb64_cols {
            min_log2 += 1;
        }
        min_log2
    }

    fn calc_max_log2_tile_cols(&self) -> u8 {
        let mut max_log2 = 1;
        while (self.header.sb64_cols >> max_log2) >= MIN_TILE_WIDTH_B64 {
            max_log2 += 1;
        }
        max_log2 - 1
    }

    fn setup_past_independence(&mut self) {
        trace!("setting up past independence");
        let segmentation = &mut self.header.segmentation;
        segmentation.feature_data = [[0; SEG_LVL_MAX]; MAX_SEGMENTS];
        segmentation.feature_enabled = [[false; SEG_LVL_MAX]; MAX_SEGMENTS];
        segmentation.abs_or_delta_update = false;

        let segment_id_count = (self.header.mi_rows * self.header.mi_cols) as usize;
        self.segment_ids.clear();
        self.segment_ids.resize(segment_id_count, 0);

        let loop_filter = &mut self.header.loop_filter;
        loop_filter.delta_enabled = true;
        loop_filter.ref_deltas[INTRA_FRAME] = 1;
        loop_filter.ref_deltas[LAST_FRAME] = 0;
        loop_filter.ref_deltas[GOLDEN_FRAME] = -1;
        loop_filter.ref_deltas[ALTREF_FRAME] = -1;
        loop_filter.mode_deltas = [0, 0];

        self.probability_tables.reset_probs();
    }

    fn trailing_bits(&mut self, r: &mut BitReader) -> Result<()> {
        while r.position() & 7 != 0 {
            if r.read_bit()? {
                return Err(Vp9Error::NonZeroTrailingBit);
            }
        }
        Ok(())
    }
}
