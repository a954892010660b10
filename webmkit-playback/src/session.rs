//! Playback session: document parsing and decoder routing.

use crate::error::Result;
use crate::sink::AudioSink;

use std::path::Path;

use tracing::{debug, info, trace};
use webmkit_mkv::elements::codec_ids;
use webmkit_mkv::{MatroskaDemuxer, MatroskaDocument, TrackEntry, TrackType};
use webmkit_opus::OpusDecoder;
use webmkit_vp9::{FrameHeader, Vp9Decoder};

/// Opus always decodes to 48 kHz output.
const OPUS_OUTPUT_RATE: u32 = 48000;

/// A parsed document together with the decoders its tracks route into.
///
/// The document is built fully before anything is routed; consumers never
/// observe a partially demuxed stream.
pub struct PlaybackSession {
    document: MatroskaDocument,
    video_decoder: Vp9Decoder,
    audio_decoder: Option<OpusDecoder>,
}

impl PlaybackSession {
    /// Build a session from an in-memory WebM byte range.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = MatroskaDemuxer::parse(data)?;
        info!(
            doc_type = %document.header.doc_type,
            tracks = document.tracks().len(),
            clusters = document.clusters().len(),
            "parsed document"
        );

        // Only an Opus audio track gets a decoder; anything else is left
        // unrouted.
        let audio_decoder = document
            .tracks()
            .values()
            .find(|track| {
                track.track_type == TrackType::Audio && track.codec_id == codec_ids::A_OPUS
            })
            .map(|track| {
                let channels = track
                    .audio_track()
                    .map(|audio| audio.channels.clamp(1, 2) as u8)
                    .unwrap_or(2);
                OpusDecoder::new(OPUS_OUTPUT_RATE, channels)
            })
            .transpose()?;

        Ok(Self {
            document,
            video_decoder: Vp9Decoder::new(),
            audio_decoder,
        })
    }

    /// Build a session by reading a file into memory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// The parsed document.
    pub fn document(&self) -> &MatroskaDocument {
        &self.document
    }

    /// The first video track, if any.
    pub fn video_track(&self) -> Option<&TrackEntry> {
        self.document.track_for_track_type(TrackType::Video)
    }

    /// Route every Opus audio frame, in file order, through the decoder
    /// into the sink. Returns the number of buffers enqueued.
    ///
    /// Blocks are skipped unless their track number resolves to an audio
    /// track with the Opus codec ID.
    pub fn route_audio(&mut self, sink: &mut dyn AudioSink) -> Result<usize> {
        let Self {
            document,
            audio_decoder,
            ..
        } = self;
        let Some(decoder) = audio_decoder else {
            debug!("no Opus audio track, nothing to route");
            return Ok(0);
        };

        let mut enqueued = 0;
        for cluster in document.clusters() {
            for block in cluster.blocks() {
                let Some(track) = document.track_for_track_number(block.track_number) else {
                    debug!(track = block.track_number, "skipping block for unknown track");
                    continue;
                };
                if track.track_type != TrackType::Audio || track.codec_id != codec_ids::A_OPUS {
                    continue;
                }

                for frame in block.frames() {
                    if let Some(buffer) = decoder.decode_packet(frame)? {
                        sink.enqueue(buffer);
                        enqueued += 1;
                    }
                }
            }
        }

        info!(buffers = enqueued, "routed audio");
        Ok(enqueued)
    }

    /// Parse the VP9 header of every video block, in file order.
    ///
    /// The first frame of a block is sufficient for header inspection.
    /// Blocks are skipped unless their track number resolves to a video
    /// track with the VP9 codec ID.
    pub fn scan_video_headers(&mut self) -> Result<Vec<FrameHeader>> {
        let Self {
            document,
            video_decoder,
            ..
        } = self;

        let mut headers = Vec::new();
        for cluster in document.clusters() {
            for block in cluster.blocks() {
                let Some(track) = document.track_for_track_number(block.track_number) else {
                    debug!(track = block.track_number, "skipping block for unknown track");
                    continue;
                };
                if track.track_type != TrackType::Video || track.codec_id != codec_ids::V_VP9 {
                    continue;
                }

                if let Some(frame) = block.frames().first() {
                    let header = video_decoder.parse_frame(frame)?;
                    trace!(
                        width = header.width,
                        height = header.height,
                        keyframe = header.is_keyframe(),
                        "parsed video frame header"
                    );
                    headers.push(header);
                }
            }
        }

        info!(count = headers.len(), "scanned video headers");
        Ok(headers)
    }
}
