//! Convenience re-exports of the most commonly used types.

pub use webmkit_core::{BitReader, BitWriter, Error, Result};
pub use webmkit_mkv::{
    Block, Cluster, Lacing, MatroskaDemuxer, MatroskaDocument, MkvError, TrackEntry, TrackType,
};
pub use webmkit_opus::{OpusDecoder, OpusError, OpusToc, PcmBuffer};
pub use webmkit_playback::{AudioSink, PlaybackError, PlaybackSession, QueueSink};
pub use webmkit_vp9::{FrameHeader, FrameType, Profile, Vp9Decoder, Vp9Error};
