//! # webmkit-playback
//!
//! Routing from a parsed WebM document into the webmkit decoders.
//!
//! A [`PlaybackSession`] builds the document once, then walks its clusters
//! in order: Opus audio frames are decoded and enqueued into an
//! [`AudioSink`], and VP9 video frames have their headers parsed. Blocks
//! whose track number does not resolve, or whose track is not the expected
//! type/codec pairing, are skipped.
//!
//! ## Example
//!
//! ```no_run
//! use webmkit_playback::{PlaybackSession, QueueSink};
//!
//! let mut session = PlaybackSession::from_file("video.webm").unwrap();
//!
//! let mut sink = QueueSink::new();
//! session.route_audio(&mut sink).unwrap();
//!
//! for header in session.scan_video_headers().unwrap() {
//!     println!("{}x{} keyframe: {}", header.width, header.height, header.is_keyframe());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod session;
pub mod sink;

pub use error::{PlaybackError, Result};
pub use session::PlaybackSession;
pub use sink::{AudioSink, QueueSink};
