//! # webmkit-opus
//!
//! Opus packet handling for the webmkit library.
//!
//! Packet framing (TOC byte, frame counts, coded duration) is parsed for
//! real; payload decompression is stubbed, producing silent PCM of the
//! correct duration. This is enough to drive the audio routing path end to
//! end.
//!
//! ## Example
//!
//! ```
//! use webmkit_opus::OpusDecoder;
//!
//! let mut decoder = OpusDecoder::new(48000, 2).unwrap();
//! let packet = [0b11100_1_00u8];
//! let pcm = decoder.decode_packet(&packet).unwrap().unwrap();
//! assert_eq!(pcm.frames(), 960);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decoder;
pub mod error;

pub use decoder::{Bandwidth, OpusDecoder, OpusMode, OpusToc, PcmBuffer, SAMPLE_RATES};
pub use error::{OpusError, Result};
