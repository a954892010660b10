//! # webmkit-mkv
//!
//! Matroska/WebM container demuxing for the webmkit library.
//!
//! This crate walks the EBML-framed container front to back and builds a
//! typed [`MatroskaDocument`]: header, segment information, tracks, and
//! per-cluster coded blocks with their frame payloads.
//!
//! ## Example
//!
//! ```no_run
//! use webmkit_mkv::{MatroskaDemuxer, TrackType};
//!
//! let data = std::fs::read("video.webm").unwrap();
//! let document = MatroskaDemuxer::parse(&data).unwrap();
//!
//! for (number, track) in document.tracks() {
//!     println!("Track {}: {:?} - {}", number, track.track_type, track.codec_id);
//! }
//! if let Some(video) = document.track_for_track_type(TrackType::Video) {
//!     let settings = video.video_track().unwrap();
//!     println!("{}x{}", settings.pixel_width, settings.pixel_height);
//! }
//! ```
//!
//! ## Matroska element structure
//!
//! ```text
//! EBML Header
//! Segment
//! ├── Info (segment information)
//! ├── Tracks (track definitions)
//! │   └── TrackEntry
//! │       ├── Video
//! │       └── Audio
//! └── Cluster (media data)
//!     ├── Timestamp
//!     └── SimpleBlock
//! ```
//!
//! Elements outside the recognized vocabulary are skipped by their declared
//! size and never abort the parse.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod demuxer;
pub mod ebml;
pub mod elements;
pub mod error;

pub use demuxer::{
    AudioTrack, Block, Cluster, EbmlHeader, Lacing, MatroskaDemuxer, MatroskaDocument,
    SegmentInfo, TrackEntry, TrackType, VideoTrack,
};
pub use ebml::Streamer;
pub use error::{MkvError, Result};

/// Check if a byte range begins with the EBML header signature.
pub fn is_mkv_signature(data: &[u8]) -> bool {
    data.len() >= 4 && data[0..4] == [0x1A, 0x45, 0xDF, 0xA3]
}
