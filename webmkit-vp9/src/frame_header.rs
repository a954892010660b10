//! VP9 frame header types.
//!
//! These types hold the state produced by parsing the uncompressed frame
//! header. Several of them persist across frames inside
//! [`crate::decoder::Vp9Decoder`]: loop-filter deltas, segmentation feature
//! data and probabilities all carry over until reset by the bitstream.

use crate::error::Vp9Error;

/// VP9 frame sync code (0x498342).
pub const VP9_FRAME_SYNC_CODE: u32 = 0x498342;

/// Maximum tile width in 64-pixel superblock units.
pub const MAX_TILE_WIDTH_B64: u32 = 64;
/// Minimum tile width in 64-pixel superblock units.
pub const MIN_TILE_WIDTH_B64: u32 = 4;

/// Number of segments.
pub const MAX_SEGMENTS: usize = 8;
/// Number of segment feature levels.
pub const SEG_LVL_MAX: usize = 4;

/// Number of reference frame slots.
pub const NUM_REF_FRAMES: usize = 8;
/// Number of active reference frames per inter frame.
pub const REFS_PER_FRAME: usize = 3;

/// Reference index for intra prediction.
pub const INTRA_FRAME: usize = 0;
/// Reference index for the last frame.
pub const LAST_FRAME: usize = 1;
/// Reference index for the golden frame.
pub const GOLDEN_FRAME: usize = 2;
/// Reference index for the altref frame.
pub const ALTREF_FRAME: usize = 3;

/// Magnitude bits per segment feature.
pub const SEGMENTATION_FEATURE_BITS: [u8; SEG_LVL_MAX] = [8, 6, 2, 0];
/// Signedness per segment feature.
pub const SEGMENTATION_FEATURE_SIGNED: [bool; SEG_LVL_MAX] = [true, true, false, false];

/// VP9 profile (0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Profile {
    /// Profile 0: 8-bit, 4:2:0.
    #[default]
    Profile0 = 0,
    /// Profile 1: 8-bit, 4:2:2/4:4:4.
    Profile1 = 1,
    /// Profile 2: 10/12-bit, 4:2:0.
    Profile2 = 2,
    /// Profile 3: 10/12-bit, 4:2:2/4:4:4.
    Profile3 = 3,
}

impl TryFrom<u8> for Profile {
    type Error = Vp9Error;

    fn try_from(value: u8) -> Result<Self, Vp9Error> {
        match value {
            0 => Ok(Profile::Profile0),
            1 => Ok(Profile::Profile1),
            2 => Ok(Profile::Profile2),
            3 => Ok(Profile::Profile3),
            _ => Err(Vp9Error::UnsupportedProfile(value)),
        }
    }
}

/// VP9 color space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ColorSpace {
    /// Unknown color space.
    Unknown = 0,
    /// BT.601.
    #[default]
    Bt601 = 1,
    /// BT.709.
    Bt709 = 2,
    /// SMPTE-170M.
    Smpte170 = 3,
    /// SMPTE-240M.
    Smpte240 = 4,
    /// BT.2020.
    Bt2020 = 5,
    /// Reserved.
    Reserved = 6,
    /// sRGB (RGB only).
    Rgb = 7,
}

impl TryFrom<u8> for ColorSpace {
    type Error = Vp9Error;

    fn try_from(value: u8) -> Result<Self, Vp9Error> {
        match value {
            0 => Ok(ColorSpace::Unknown),
            1 => Ok(ColorSpace::Bt601),
            2 => Ok(ColorSpace::Bt709),
            3 => Ok(ColorSpace::Smpte170),
            4 => Ok(ColorSpace::Smpte240),
            5 => Ok(ColorSpace::Bt2020),
            6 => Ok(ColorSpace::Reserved),
            7 => Ok(ColorSpace::Rgb),
            _ => Err(Vp9Error::UnsupportedColorSpace(value)),
        }
    }
}

/// VP9 color range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorRange {
    /// Studio/TV range (16-235).
    #[default]
    StudioSwing,
    /// Full range (0-255).
    FullSwing,
}

/// VP9 frame type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameType {
    /// Keyframe (intra-only, resets decoding state).
    #[default]
    Key,
    /// Non-key frame (may reference other frames).
    NonKey,
}

/// VP9 interpolation filter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum InterpFilter {
    /// 8-tap smooth filter.
    #[default]
    EightTapSmooth = 0,
    /// 8-tap regular filter.
    EightTap = 1,
    /// 8-tap sharp filter.
    EightTapSharp = 2,
    /// Bilinear filter.
    Bilinear = 3,
    /// Selected per block.
    Switchable = 4,
}

/// Mapping from the coded 2-bit literal to a filter type.
pub const LITERAL_TO_FILTER: [InterpFilter; 4] = [
    InterpFilter::EightTapSmooth,
    InterpFilter::EightTap,
    InterpFilter::EightTapSharp,
    InterpFilter::Bilinear,
];

/// VP9 loop filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopFilterParams {
    /// Base filter level (0-63).
    pub level: u8,
    /// Sharpness (0-7).
    pub sharpness: u8,
    /// Delta enabled.
    pub delta_enabled: bool,
    /// Delta update flag.
    pub delta_update: bool,
    /// Reference frame deltas, indexed INTRA/LAST/GOLDEN/ALTREF.
    pub ref_deltas: [i8; 4],
    /// Mode deltas.
    pub mode_deltas: [i8; 2],
}

/// VP9 quantization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantParams {
    /// Base quantizer index.
    pub base_q_idx: u8,
    /// Luma DC delta.
    pub delta_q_y_dc: i8,
    /// Chroma DC delta.
    pub delta_q_uv_dc: i8,
    /// Chroma AC delta.
    pub delta_q_uv_ac: i8,
    /// Lossless mode (base index and all deltas zero).
    pub lossless: bool,
}

/// VP9 segmentation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentationParams {
    /// Segmentation enabled.
    pub enabled: bool,
    /// Update map flag.
    pub update_map: bool,
    /// Temporal update flag.
    pub temporal_update: bool,
    /// Absolute or delta feature values.
    pub abs_or_delta_update: bool,
    /// Segment tree probabilities.
    pub tree_probs: [u8; 7],
    /// Segment prediction probabilities.
    pub pred_probs: [u8; 3],
    /// Per-segment feature enabled flags.
    pub feature_enabled: [[bool; SEG_LVL_MAX]; MAX_SEGMENTS],
    /// Per-segment feature data.
    pub feature_data: [[i16; SEG_LVL_MAX]; MAX_SEGMENTS],
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self {
            enabled: false,
            update_map: false,
            temporal_update: false,
            abs_or_delta_update: false,
            tree_probs: [255; 7],
            pred_probs: [255; 3],
            feature_enabled: [[false; SEG_LVL_MAX]; MAX_SEGMENTS],
            feature_data: [[0; SEG_LVL_MAX]; MAX_SEGMENTS],
        }
    }
}

/// VP9 tile configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileInfo {
    /// Log2 of tile columns.
    pub tile_cols_log2: u8,
    /// Log2 of tile rows.
    pub tile_rows_log2: u8,
    /// Number of tile columns.
    pub tile_cols: u32,
    /// Number of tile rows.
    pub tile_rows: u32,
}

/// Parsed VP9 uncompressed frame header and carried decoder state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// VP9 profile (0-3).
    pub profile: Profile,
    /// Show existing frame flag.
    pub show_existing_frame: bool,
    /// Index of the frame to show when `show_existing_frame` is set.
    pub frame_to_show_map_idx: u8,
    /// Frame type.
    pub frame_type: FrameType,
    /// Show frame flag.
    pub show_frame: bool,
    /// Error resilient mode.
    pub error_resilient_mode: bool,
    /// Intra-only flag on non-key frames.
    pub intra_only: bool,
    /// Frame context reset policy (0-3).
    pub reset_frame_context: u8,
    /// Bit depth (8, 10 or 12).
    pub bit_depth: u8,
    /// Color space.
    pub color_space: ColorSpace,
    /// Color range.
    pub color_range: ColorRange,
    /// Horizontal chroma subsampling.
    pub subsampling_x: bool,
    /// Vertical chroma subsampling.
    pub subsampling_y: bool,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Render width in pixels.
    pub render_width: u32,
    /// Render height in pixels.
    pub render_height: u32,
    /// Mode-info columns (8x8 granularity).
    pub mi_cols: u32,
    /// Mode-info rows (8x8 granularity).
    pub mi_rows: u32,
    /// Superblock columns (64x64 granularity).
    pub sb64_cols: u32,
    /// Superblock rows (64x64 granularity).
    pub sb64_rows: u32,
    /// Interpolation filter selector.
    pub interp_filter: InterpFilter,
    /// Reference slots refreshed by this frame.
    pub refresh_frame_flags: u8,
    /// Active reference slot indices (LAST/GOLDEN/ALTREF).
    pub ref_frame_idx: [u8; REFS_PER_FRAME],
    /// Reference sign biases, indexed INTRA/LAST/GOLDEN/ALTREF.
    pub ref_frame_sign_bias: [bool; 4],
    /// High precision motion vectors allowed.
    pub allow_high_precision_mv: bool,
    /// Refresh the frame context after decode.
    pub refresh_frame_context: bool,
    /// Frame parallel decoding mode.
    pub frame_parallel_decoding_mode: bool,
    /// Frame context index.
    pub frame_context_idx: u8,
    /// Loop filter parameters.
    pub loop_filter: LoopFilterParams,
    /// Quantization parameters.
    pub quant: QuantParams,
    /// Segmentation parameters.
    pub segmentation: SegmentationParams,
    /// Tile configuration.
    pub tile_info: TileInfo,
    /// Compressed header size in bytes.
    pub header_size_in_bytes: u16,
}

impl Default for FrameHeader {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            show_existing_frame: false,
            frame_to_show_map_idx: 0,
            frame_type: FrameType::default(),
            show_frame: true,
            error_resilient_mode: false,
            intra_only: false,
            reset_frame_context: 0,
            bit_depth: 8,
            color_space: ColorSpace::default(),
            color_range: ColorRange::default(),
            subsampling_x: true,
            subsampling_y: true,
            width: 0,
            height: 0,
            render_width: 0,
            render_height: 0,
            mi_cols: 0,
            mi_rows: 0,
            sb64_cols: 0,
            sb64_rows: 0,
            interp_filter: InterpFilter::default(),
            refresh_frame_flags: 0,
            ref_frame_idx: [0; REFS_PER_FRAME],
            ref_frame_sign_bias: [false; 4],
            allow_high_precision_mv: false,
            refresh_frame_context: false,
            frame_parallel_decoding_mode: false,
            frame_context_idx: 0,
            loop_filter: LoopFilterParams::default(),
            quant: QuantParams::default(),
            segmentation: SegmentationParams::default(),
            tile_info: TileInfo::default(),
            header_size_in_bytes: 0,
        }
    }
}

impl FrameHeader {
    /// Whether this is a keyframe.
    pub fn is_keyframe(&self) -> bool {
        self.frame_type == FrameType::Key
    }

    /// Whether this frame is coded without inter prediction.
    pub fn is_intra(&self) -> bool {
        self.frame_type == FrameType::Key || self.intra_only
    }
}
