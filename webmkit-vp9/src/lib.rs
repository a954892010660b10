//! # webmkit-vp9
//!
//! VP9 bitstream front end for the webmkit library.
//!
//! This crate parses the VP9 uncompressed frame header into typed decoder
//! state and validates the compressed header's framing through the boolean
//! arithmetic decoder. Frame reconstruction (motion compensation, inverse
//! transforms, loop filtering) is not performed.
//!
//! ## Example
//!
//! ```no_run
//! use webmkit_vp9::Vp9Decoder;
//!
//! let mut decoder = Vp9Decoder::new();
//! # let coded_frame: &[u8] = &[];
//! let header = decoder.parse_frame(coded_frame).unwrap();
//! println!("{}x{} keyframe: {}", header.width, header.height, header.is_keyframe());
//! ```
//!
//! ## VP9 frame structure
//!
//! A coded frame starts with the uncompressed header (bit-packed fields:
//! frame type, dimensions, color configuration, loop filter, quantization,
//! segmentation, tiling), padded with zero bits to a byte boundary, followed
//! by the compressed header (boolean-coded probability updates) and tile
//! data.
//!
//! State with cross-frame lifetime (reference slot sizes, probability
//! contexts, segmentation and loop-filter deltas) lives in [`Vp9Decoder`]
//! and persists between [`Vp9Decoder::parse_frame`] calls.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decoder;
pub mod entropy;
pub mod error;
pub mod frame_header;

pub use decoder::Vp9Decoder;
pub use entropy::{BoolDecoder, FrameContext, ProbabilityTables, FRAME_CONTEXTS};
pub use error::{Result, Vp9Error};
pub use frame_header::{
    ColorRange, ColorSpace, FrameHeader, FrameType, InterpFilter, LoopFilterParams, Profile,
    QuantParams, SegmentationParams, TileInfo, VP9_FRAME_SYNC_CODE,
};
