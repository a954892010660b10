//! # webmkit
//!
//! WebM demuxing and VP9 uncompressed-header parsing, in pure Rust.
//!
//! This facade crate re-exports the workspace members:
//!
//! - [`mkv`]: EBML/Matroska demuxing into a typed document tree
//! - [`vp9`]: VP9 uncompressed-header parsing and the boolean decoder
//! - [`opus`]: Opus packet framing with a stub decoder
//! - [`playback`]: routing of document frames into the decoders
//! - [`core`]: shared error and bitstream types
//!
//! ## Quick start
//!
//! ```no_run
//! use webmkit::prelude::*;
//!
//! let mut session = PlaybackSession::from_file("video.webm").unwrap();
//! let headers = session.scan_video_headers().unwrap();
//! println!("{} video frames", headers.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use webmkit_core as core;
pub use webmkit_mkv as mkv;
pub use webmkit_opus as opus;
pub use webmkit_playback as playback;
pub use webmkit_vp9 as vp9;

pub mod prelude;
