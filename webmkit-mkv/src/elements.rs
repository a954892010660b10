//! Matroska element definitions and codec IDs.
//!
//! Element IDs are given with their VINT width marker retained, as they
//! appear on the wire and as [`crate::ebml::Streamer::read_element_id`]
//! returns them.

// =============================================================================
// EBML Header Elements
// =============================================================================

/// EBML Header element.
pub const EBML: u64 = 0x1A45DFA3;
/// EBML Doc Type.
pub const DOC_TYPE: u64 = 0x4282;
/// EBML Doc Type Version.
pub const DOC_TYPE_VERSION: u64 = 0x4287;

// =============================================================================
// Segment Elements
// =============================================================================

/// Segment (the root container for all Matroska data).
pub const SEGMENT: u64 = 0x18538067;
/// Segment Info.
pub const INFO: u64 = 0x1549A966;
/// Timestamp Scale (nanoseconds per timestamp unit, default 1000000 = 1ms).
pub const TIMESTAMP_SCALE: u64 = 0x2AD7B1;
/// Muxing App.
pub const MUXING_APP: u64 = 0x4D80;
/// Writing App.
pub const WRITING_APP: u64 = 0x5741;

// =============================================================================
// Track Elements
// =============================================================================

/// Tracks.
pub const TRACKS: u64 = 0x1654AE6B;
/// Track Entry.
pub const TRACK_ENTRY: u64 = 0xAE;
/// Track Number.
pub const TRACK_NUMBER: u64 = 0xD7;
/// Track UID.
pub const TRACK_UID: u64 = 0x73C5;
/// Track Type.
pub const TRACK_TYPE: u64 = 0x83;
/// Language (ISO 639-2).
pub const LANGUAGE: u64 = 0x22B59C;
/// Codec ID.
pub const CODEC_ID: u64 = 0x86;
/// Video settings.
pub const VIDEO: u64 = 0xE0;
/// Audio settings.
pub const AUDIO: u64 = 0xE1;
/// Pixel Width.
pub const PIXEL_WIDTH: u64 = 0xB0;
/// Pixel Height.
pub const PIXEL_HEIGHT: u64 = 0xBA;
/// Channels.
pub const CHANNELS: u64 = 0x9F;
/// Bit Depth.
pub const BIT_DEPTH: u64 = 0x6264;

// =============================================================================
// Cluster Elements
// =============================================================================

/// Cluster (contains blocks of media data).
pub const CLUSTER: u64 = 0x1F43B675;
/// Cluster Timestamp.
pub const TIMESTAMP: u64 = 0xE7;
/// SimpleBlock.
pub const SIMPLE_BLOCK: u64 = 0xA3;

// =============================================================================
// Track Types
// =============================================================================

/// Track type: Video.
pub const TRACK_TYPE_VIDEO: u64 = 1;
/// Track type: Audio.
pub const TRACK_TYPE_AUDIO: u64 = 2;
/// Track type: Complex (combined audio/video).
pub const TRACK_TYPE_COMPLEX: u64 = 3;
/// Track type: Logo.
pub const TRACK_TYPE_LOGO: u64 = 16;
/// Track type: Subtitle.
pub const TRACK_TYPE_SUBTITLE: u64 = 17;
/// Track type: Buttons.
pub const TRACK_TYPE_BUTTONS: u64 = 18;
/// Track type: Control.
pub const TRACK_TYPE_CONTROL: u64 = 32;

/// Matroska codec ID definitions.
pub mod codec_ids {
    /// VP9 video codec.
    pub const V_VP9: &str = "V_VP9";
    /// Opus audio codec.
    pub const A_OPUS: &str = "A_OPUS";
}
