//! Matroska/WebM document demuxer.
//!
//! The demuxer walks the EBML tree once, front to back, and builds a
//! [`MatroskaDocument`]: the EBML header, segment information, track entries
//! and every cluster's blocks with their frame payloads. The document is
//! read-only after the parse; frame payloads are owned copies.

use crate::ebml::Streamer;
use crate::elements;
use crate::error::{MkvError, Result};

use std::collections::HashMap;

use tracing::{debug, trace};

/// Default timestamp scale (1 millisecond in nanoseconds).
const DEFAULT_TIMESTAMP_SCALE: u64 = 1_000_000;

/// EBML document header information.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EbmlHeader {
    /// Document type (e.g. "webm" or "matroska").
    pub doc_type: String,
    /// Document type version.
    pub doc_type_version: u64,
}

/// Segment information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentInfo {
    /// Timestamp scale (nanoseconds per timestamp unit).
    pub timestamp_scale: u64,
    /// Muxing application.
    pub muxing_app: String,
    /// Writing application.
    pub writing_app: String,
}

impl Default for SegmentInfo {
    fn default() -> Self {
        Self {
            timestamp_scale: DEFAULT_TIMESTAMP_SCALE,
            muxing_app: String::new(),
            writing_app: String::new(),
        }
    }
}

/// Track type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackType {
    /// Video track.
    Video,
    /// Audio track.
    Audio,
    /// Combined audio/video track.
    Complex,
    /// Logo track.
    Logo,
    /// Subtitle track.
    Subtitle,
    /// Buttons track.
    Buttons,
    /// Control track.
    Control,
}

impl TrackType {
    /// Map a raw TrackType element value.
    ///
    /// Values outside the known set do not abort parsing; they are treated
    /// as complex tracks.
    pub fn from_raw(value: u64) -> Self {
        match value {
            elements::TRACK_TYPE_VIDEO => TrackType::Video,
            elements::TRACK_TYPE_AUDIO => TrackType::Audio,
            elements::TRACK_TYPE_COMPLEX => TrackType::Complex,
            elements::TRACK_TYPE_LOGO => TrackType::Logo,
            elements::TRACK_TYPE_SUBTITLE => TrackType::Subtitle,
            elements::TRACK_TYPE_BUTTONS => TrackType::Buttons,
            elements::TRACK_TYPE_CONTROL => TrackType::Control,
            other => {
                debug!(value = other, "unknown track type, treating as complex");
                TrackType::Complex
            }
        }
    }
}

/// Video-specific track settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoTrack {
    /// Pixel width.
    pub pixel_width: u64,
    /// Pixel height.
    pub pixel_height: u64,
}

/// Audio-specific track settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioTrack {
    /// Number of channels.
    pub channels: u64,
    /// Bits per sample.
    pub bit_depth: u64,
}

/// A track entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
    /// Track number (the join key for blocks; unique within a document).
    pub track_number: u64,
    /// Track UID.
    pub track_uid: u64,
    /// Track type.
    pub track_type: TrackType,
    /// Language (ISO 639-2), "eng" when absent.
    pub language: String,
    /// Codec ID string (e.g. "V_VP9", "A_OPUS").
    pub codec_id: String,
    /// Video-specific settings.
    pub video: Option<VideoTrack>,
    /// Audio-specific settings.
    pub audio: Option<AudioTrack>,
}

impl Default for TrackEntry {
    fn default() -> Self {
        Self {
            track_number: 0,
            track_uid: 0,
            track_type: TrackType::Complex,
            language: "eng".to_string(),
            codec_id: String::new(),
            video: None,
            audio: None,
        }
    }
}

impl TrackEntry {
    /// Video settings, if this is a video track.
    pub fn video_track(&self) -> Option<&VideoTrack> {
        self.video.as_ref()
    }

    /// Audio settings, if this is an audio track.
    pub fn audio_track(&self) -> Option<&AudioTrack> {
        self.audio.as_ref()
    }
}

/// Lacing disciplines for packing multiple frames into one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lacing {
    /// No lacing, a single frame.
    #[default]
    None,
    /// Xiph-style lacing (255-run byte sums).
    Xiph,
    /// Fixed-size lacing, all frames equal.
    FixedSize,
    /// EBML lacing with signed size deltas.
    Ebml,
}

impl Lacing {
    fn from_flags(flags: u8) -> Self {
        match (flags & 0b110) >> 1 {
            0 => Lacing::None,
            1 => Lacing::Xiph,
            2 => Lacing::FixedSize,
            _ => Lacing::Ebml,
        }
    }
}

/// A coded block from a cluster, holding one or more frames for one track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// The track this block belongs to.
    pub track_number: u64,
    /// Signed timestamp offset from the enclosing cluster's timestamp.
    pub timestamp: i16,
    /// All frames in the block are keyframes.
    pub only_keyframes: bool,
    /// Frame duration is zero (decode but do not display).
    pub invisible: bool,
    /// Lacing discipline used by this block.
    pub lacing: Lacing,
    /// Frames may be dropped under decoder pressure.
    pub discardable: bool,
    frames: Vec<Vec<u8>>,
}

impl Block {
    /// Number of frames in this block.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// A single frame payload.
    pub fn frame(&self, index: usize) -> &[u8] {
        &self.frames[index]
    }

    /// All frame payloads in order.
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }
}

/// A cluster of blocks sharing a base timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cluster {
    /// Cluster timestamp, in units of the segment's timestamp scale.
    pub timestamp: u64,
    blocks: Vec<Block>,
}

impl Cluster {
    /// Blocks in file order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

/// A fully parsed Matroska document.
#[derive(Debug, Clone)]
pub struct MatroskaDocument {
    /// The EBML header.
    pub header: EbmlHeader,
    /// Segment information, if an Info element was present.
    pub segment_info: Option<SegmentInfo>,
    tracks: HashMap<u64, TrackEntry>,
    clusters: Vec<Cluster>,
}

impl MatroskaDocument {
    fn new(header: EbmlHeader) -> Self {
        Self {
            header,
            segment_info: None,
            tracks: HashMap::new(),
            clusters: Vec::new(),
        }
    }

    /// Tracks keyed by track number.
    pub fn tracks(&self) -> &HashMap<u64, TrackEntry> {
        &self.tracks
    }

    /// Clusters in file order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Look up a track by its track number.
    pub fn track_for_track_number(&self, track_number: u64) -> Option<&TrackEntry> {
        self.tracks.get(&track_number)
    }

    /// Find a track of the given type.
    pub fn track_for_track_type(&self, track_type: TrackType) -> Option<&TrackEntry> {
        self.tracks.values().find(|t| t.track_type == track_type)
    }

    /// The effective timestamp scale in nanoseconds per unit.
    pub fn timestamp_scale(&self) -> u64 {
        self.segment_info
            .as_ref()
            .map(|info| info.timestamp_scale)
            .unwrap_or(DEFAULT_TIMESTAMP_SCALE)
    }
}

/// Matroska demuxer over an in-memory byte range.
///
/// The source must outlive the demuxer; the produced document owns all of
/// its data.
pub struct MatroskaDemuxer<'a> {
    streamer: Streamer<'a>,
}

impl<'a> MatroskaDemuxer<'a> {
    /// Parse a complete Matroska/WebM document from memory.
    pub fn parse(data: &'a [u8]) -> Result<MatroskaDocument> {
        let mut demuxer = Self {
            streamer: Streamer::new(data),
        };
        demuxer.parse_document()
    }

    fn parse_document(&mut self) -> Result<MatroskaDocument> {
        let first_id = self.streamer.read_element_id()?;
        if first_id != elements::EBML {
            return Err(MkvError::NotMatroska {
                expected: elements::EBML,
                found: first_id,
            });
        }

        let header = self.parse_ebml_header()?;
        debug!(
            doc_type = %header.doc_type,
            version = header.doc_type_version,
            "parsed EBML header"
        );

        let root_id = self.streamer.read_element_id()?;
        if root_id != elements::SEGMENT {
            return Err(MkvError::NotMatroska {
                expected: elements::SEGMENT,
                found: root_id,
            });
        }

        let mut document = MatroskaDocument::new(header);
        self.parse_segment(&mut document)?;

        debug!(
            tracks = document.tracks.len(),
            clusters = document.clusters.len(),
            "parsed segment"
        );
        Ok(document)
    }

    /// Parse a master element whose ID has already been consumed.
    ///
    /// Reads the data-size VINT, then repeatedly reads a child element ID
    /// and hands it to `consumer` until the declared size is exhausted. The
    /// consumer must consume the child's size and payload (or skip it via
    /// [`read_unknown_element`](Self::read_unknown_element)) and return
    /// `Ok(true)`; `Ok(false)` rejects the child and fails the parse with
    /// [`MkvError::MalformedElement`]. Consuming past the declared size
    /// fails with [`MkvError::SizeOverrun`].
    pub fn parse_master_element<F>(&mut self, name: &'static str, mut consumer: F) -> Result<()>
    where
        F: FnMut(&mut Self, u64) -> Result<bool>,
    {
        let data_size = self.streamer.read_vint()?;
        trace!(element = name, size = data_size, "parsing master element");

        self.streamer.push_octets_read();
        while (self.streamer.octets_read() as u64) < data_size {
            let element_id = self.streamer.read_element_id()?;
            trace!(element = name, id = element_id, "child element");

            if !consumer(self, element_id)? {
                debug!(element = name, id = element_id, "child consumer rejected element");
                return Err(MkvError::MalformedElement {
                    element: name,
                    id: element_id,
                });
            }
        }
        if self.streamer.octets_read() as u64 > data_size {
            return Err(MkvError::SizeOverrun {
                element: name,
                declared: data_size,
            });
        }
        self.streamer.pop_octets_read();

        Ok(())
    }

    fn parse_ebml_header(&mut self) -> Result<EbmlHeader> {
        let mut header = EbmlHeader::default();
        self.parse_master_element("Header", |demuxer, element_id| {
            match element_id {
                elements::DOC_TYPE => {
                    header.doc_type = demuxer.read_string_element()?;
                    trace!(doc_type = %header.doc_type, "read DocType attribute");
                }
                elements::DOC_TYPE_VERSION => {
                    header.doc_type_version = demuxer.read_u64_element()?;
                    trace!(version = header.doc_type_version, "read DocTypeVersion attribute");
                }
                _ => demuxer.read_unknown_element()?,
            }
            Ok(true)
        })?;
        Ok(header)
    }

    fn parse_segment(&mut self, document: &mut MatroskaDocument) -> Result<()> {
        self.parse_master_element("Segment", |demuxer, element_id| {
            match element_id {
                elements::INFO => {
                    document.segment_info = Some(demuxer.parse_info()?);
                }
                elements::TRACKS => {
                    demuxer.parse_tracks(document)?;
                }
                elements::CLUSTER => {
                    document.clusters.push(demuxer.parse_cluster()?);
                }
                _ => demuxer.read_unknown_element()?,
            }
            Ok(true)
        })
    }

    fn parse_info(&mut self) -> Result<SegmentInfo> {
        let mut info = SegmentInfo::default();
        self.parse_master_element("Segment Information", |demuxer, element_id| {
            match element_id {
                elements::TIMESTAMP_SCALE => {
                    info.timestamp_scale = demuxer.read_u64_element()?;
                    trace!(scale = info.timestamp_scale, "read TimestampScale attribute");
                }
                elements::MUXING_APP => {
                    info.muxing_app = demuxer.read_string_element()?;
                }
                elements::WRITING_APP => {
                    info.writing_app = demuxer.read_string_element()?;
                }
                _ => demuxer.read_unknown_element()?,
            }
            Ok(true)
        })?;
        Ok(info)
    }

    fn parse_tracks(&mut self, document: &mut MatroskaDocument) -> Result<()> {
        self.parse_master_element("Tracks", |demuxer, element_id| {
            if element_id == elements::TRACK_ENTRY {
                let track = demuxer.parse_track_entry()?;
                document.tracks.insert(track.track_number, track);
            } else {
                demuxer.read_unknown_element()?;
            }
            Ok(true)
        })
    }

    fn parse_track_entry(&mut self) -> Result<TrackEntry> {
        let mut track = TrackEntry::default();
        self.parse_master_element("Track", |demuxer, element_id| {
            match element_id {
                elements::TRACK_NUMBER => {
                    track.track_number = demuxer.read_u64_element()?;
                    trace!(number = track.track_number, "read TrackNumber attribute");
                }
                elements::TRACK_UID => {
                    track.track_uid = demuxer.read_u64_element()?;
                }
                elements::TRACK_TYPE => {
                    track.track_type = TrackType::from_raw(demuxer.read_u64_element()?);
                }
                elements::LANGUAGE => {
                    track.language = demuxer.read_string_element()?;
                    trace!(language = %track.language, "read Language attribute");
                }
                elements::CODEC_ID => {
                    track.codec_id = demuxer.read_string_element()?;
                    trace!(codec_id = %track.codec_id, "read CodecID attribute");
                }
                elements::VIDEO => {
                    track.video = Some(demuxer.parse_video_settings()?);
                }
                elements::AUDIO => {
                    track.audio = Some(demuxer.parse_audio_settings()?);
                }
                _ => demuxer.read_unknown_element()?,
            }
            Ok(true)
        })?;
        Ok(track)
    }

    fn parse_video_settings(&mut self) -> Result<VideoTrack> {
        let mut video = VideoTrack::default();
        self.parse_master_element("VideoTrack", |demuxer, element_id| {
            match element_id {
                elements::PIXEL_WIDTH => {
                    video.pixel_width = demuxer.read_u64_element()?;
                }
                elements::PIXEL_HEIGHT => {
                    video.pixel_height = demuxer.read_u64_element()?;
                }
                _ => demuxer.read_unknown_element()?,
            }
            Ok(true)
        })?;
        Ok(video)
    }

    fn parse_audio_settings(&mut self) -> Result<AudioTrack> {
        let mut audio = AudioTrack::default();
        self.parse_master_element("AudioTrack", |demuxer, element_id| {
            match element_id {
                elements::CHANNELS => {
                    audio.channels = demuxer.read_u64_element()?;
                }
                elements::BIT_DEPTH => {
                    audio.bit_depth = demuxer.read_u64_element()?;
                }
                _ => demuxer.read_unknown_element()?,
            }
            Ok(true)
        })?;
        Ok(audio)
    }

    fn parse_cluster(&mut self) -> Result<Cluster> {
        let mut cluster = Cluster::default();
        self.parse_master_element("Cluster", |demuxer, element_id| {
            match element_id {
                elements::SIMPLE_BLOCK => {
                    cluster.blocks.push(demuxer.parse_simple_block()?);
                }
                elements::TIMESTAMP => {
                    cluster.timestamp = demuxer.read_u64_element()?;
                }
                _ => demuxer.read_unknown_element()?,
            }
            Ok(true)
        })?;
        Ok(cluster)
    }

    fn parse_simple_block(&mut self) -> Result<Block> {
        let content_size = self.streamer.read_vint()?;
        let octets_before_track = self.streamer.octets_read();

        let track_number = self.streamer.read_vint()?;
        let timestamp = self.streamer.read_i16()?;
        let flags = self.streamer.read_octet()?;

        let mut block = Block {
            track_number,
            timestamp,
            only_keyframes: flags & (1 << 7) != 0,
            invisible: flags & (1 << 3) != 0,
            lacing: Lacing::from_flags(flags),
            discardable: flags & 1 != 0,
            frames: Vec::new(),
        };

        let header_octets = (self.streamer.octets_read() - octets_before_track) as u64;
        let payload_size =
            content_size
                .checked_sub(header_octets)
                .ok_or(MkvError::MalformedElement {
                    element: "SimpleBlock",
                    id: elements::SIMPLE_BLOCK,
                })?;

        match block.lacing {
            Lacing::None => {
                block.frames.push(self.read_frame(payload_size as usize)?);
            }
            Lacing::FixedSize => {
                let frame_count = self.streamer.read_octet()? as usize + 1;
                let laced_payload = (payload_size as usize).checked_sub(1).ok_or(
                    MkvError::MalformedElement {
                        element: "SimpleBlock",
                        id: elements::SIMPLE_BLOCK,
                    },
                )?;
                let individual_frame_size = laced_payload / frame_count;
                for _ in 0..frame_count {
                    block.frames.push(self.read_frame(individual_frame_size)?);
                }
            }
            Lacing::Ebml => {
                let octets_before_sizes = self.streamer.octets_read();
                let frame_count = self.streamer.read_octet()? as usize + 1;

                let mut frame_sizes = Vec::with_capacity(frame_count);
                let first_frame_size = self.streamer.read_vint()?;
                frame_sizes.push(first_frame_size);
                let mut frame_size_sum = first_frame_size;
                let mut previous_frame_size = first_frame_size as i64;

                for _ in 0..frame_count.saturating_sub(2) {
                    let difference = self.streamer.read_signed_vint()?;
                    let frame_size = previous_frame_size + difference;
                    if frame_size < 0 {
                        return Err(MkvError::MalformedElement {
                            element: "SimpleBlock",
                            id: elements::SIMPLE_BLOCK,
                        });
                    }
                    frame_sizes.push(frame_size as u64);
                    frame_size_sum += frame_size as u64;
                    previous_frame_size = frame_size;
                }

                let lacing_octets = (self.streamer.octets_read() - octets_before_sizes) as u64;
                let last_frame_size = payload_size
                    .checked_sub(frame_size_sum + lacing_octets)
                    .ok_or(MkvError::MalformedElement {
                        element: "SimpleBlock",
                        id: elements::SIMPLE_BLOCK,
                    })?;
                frame_sizes.push(last_frame_size);

                for frame_size in frame_sizes {
                    block.frames.push(self.read_frame(frame_size as usize)?);
                }
            }
            Lacing::Xiph => {
                // Not implemented; surfaced rather than mislaid.
                return Err(MkvError::UnsupportedLacing);
            }
        }

        trace!(
            track = block.track_number,
            frames = block.frame_count(),
            lacing = ?block.lacing,
            "parsed SimpleBlock"
        );
        Ok(block)
    }

    fn read_frame(&mut self, size: usize) -> Result<Vec<u8>> {
        if self.streamer.remaining() < size {
            return Err(MkvError::ShortRead("frame data"));
        }
        let frame = self.streamer.data()[..size].to_vec();
        self.streamer.drop_octets(size)?;
        Ok(frame)
    }

    fn read_string_element(&mut self) -> Result<String> {
        let length = self.streamer.read_vint()? as usize;
        if self.streamer.remaining() < length {
            return Err(MkvError::ShortRead("string element"));
        }
        // Invalid UTF-8 must not fail the parse; decode lossily.
        let value = String::from_utf8_lossy(&self.streamer.data()[..length]).into_owned();
        self.streamer.drop_octets(length)?;
        Ok(value)
    }

    fn read_u64_element(&mut self) -> Result<u64> {
        let length = self.streamer.read_vint()? as usize;
        if self.streamer.remaining() < length {
            return Err(MkvError::ShortRead("integer element"));
        }
        let mut result = 0u64;
        for _ in 0..length {
            result = (result << 8) | self.streamer.read_octet()? as u64;
        }
        Ok(result)
    }

    /// Skip an unrecognized element by its declared size.
    pub fn read_unknown_element(&mut self) -> Result<()> {
        let length = self.streamer.read_vint()? as usize;
        self.streamer.drop_octets(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ebml::encode_vint;
    use crate::elements::codec_ids;

    /// Assemble an element from raw ID bytes and a payload.
    fn element(id: &[u8], payload: &[u8]) -> Vec<u8> {
        let mut out = id.to_vec();
        let (size, size_len) = encode_vint(payload.len() as u64);
        out.extend_from_slice(&size[..size_len]);
        out.extend_from_slice(payload);
        out
    }

    fn uint_element(id: &[u8], value: u64) -> Vec<u8> {
        let bytes = value.to_be_bytes();
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(7);
        element(id, &bytes[start..])
    }

    fn minimal_header() -> Vec<u8> {
        // 31 octets of header children: four unknown-but-skippable
        // attributes, DocType "webm", DocTypeVersion 2, and one more
        // unknown attribute.
        let mut data = vec![0x1A, 0x45, 0xDF, 0xA3, 0x9F];
        data.extend_from_slice(&[0x42, 0x86, 0x81, 0x01]); // EBMLVersion
        data.extend_from_slice(&[0x42, 0xF7, 0x81, 0x01]); // EBMLReadVersion
        data.extend_from_slice(&[0x42, 0xF2, 0x81, 0x04]); // EBMLMaxIDLength
        data.extend_from_slice(&[0x42, 0xF3, 0x81, 0x08]); // EBMLMaxSizeLength
        data.extend_from_slice(&[0x42, 0x82, 0x84]);
        data.extend_from_slice(b"webm");
        data.extend_from_slice(&[0x42, 0x87, 0x81, 0x02]); // DocTypeVersion = 2
        data.extend_from_slice(&[0x42, 0x85, 0x81, 0x02]); // DocTypeReadVersion
        data
    }

    fn document_with_segment(segment_children: &[u8]) -> Vec<u8> {
        let mut data = minimal_header();
        data.extend_from_slice(&element(&[0x18, 0x53, 0x80, 0x67], segment_children));
        data
    }

    fn track_entry(number: u64, track_type: u64, codec_id: &str, settings: &[u8]) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&uint_element(&[0xD7], number));
        payload.extend_from_slice(&uint_element(&[0x73, 0xC5], number + 100));
        payload.extend_from_slice(&uint_element(&[0x83], track_type));
        payload.extend_from_slice(&element(&[0x86], codec_id.as_bytes()));
        payload.extend_from_slice(settings);
        element(&[0xAE], &payload)
    }

    fn simple_block(track: u8, timestamp: i16, flags: u8, payload: &[u8]) -> Vec<u8> {
        let mut block = vec![0x80 | track];
        block.extend_from_slice(&timestamp.to_be_bytes());
        block.push(flags);
        block.extend_from_slice(payload);
        element(&[0xA3], &block)
    }

    #[test]
    fn test_minimal_header() {
        let data = document_with_segment(&[]);
        let document = MatroskaDemuxer::parse(&data).unwrap();
        assert!(document.header.doc_type.starts_with("webm"));
        assert_eq!(document.header.doc_type_version, 2);
        assert!(document.segment_info.is_none());
        assert!(document.tracks().is_empty());
    }

    #[test]
    fn test_not_matroska() {
        let data = [0x1F, 0x43, 0xB6, 0x75, 0x80];
        let err = MatroskaDemuxer::parse(&data).unwrap_err();
        assert!(matches!(err, MkvError::NotMatroska { .. }));
    }

    #[test]
    fn test_segment_required_after_header() {
        let mut data = minimal_header();
        data.extend_from_slice(&[0x1A, 0x45, 0xDF, 0xA3, 0x80]);
        let err = MatroskaDemuxer::parse(&data).unwrap_err();
        assert!(matches!(
            err,
            MkvError::NotMatroska {
                expected: elements::SEGMENT,
                ..
            }
        ));
    }

    #[test]
    fn test_segment_info() {
        let mut children = Vec::new();
        children.extend_from_slice(&uint_element(&[0x2A, 0xD7, 0xB1], 500_000));
        children.extend_from_slice(&element(&[0x4D, 0x80], b"webmkit-mux"));
        children.extend_from_slice(&element(&[0x57, 0x41], b"webmkit"));
        let info = element(&[0x15, 0x49, 0xA9, 0x66], &children);
        let data = document_with_segment(&info);

        let document = MatroskaDemuxer::parse(&data).unwrap();
        let info = document.segment_info.as_ref().unwrap();
        assert_eq!(info.timestamp_scale, 500_000);
        assert_eq!(info.muxing_app, "webmkit-mux");
        assert_eq!(info.writing_app, "webmkit");
        assert_eq!(document.timestamp_scale(), 500_000);
    }

    #[test]
    fn test_tracks() {
        let mut video_settings = Vec::new();
        video_settings.extend_from_slice(&uint_element(&[0xB0], 1920));
        video_settings.extend_from_slice(&uint_element(&[0xBA], 1080));
        let video = element(&[0xE0], &video_settings);

        let mut audio_settings = Vec::new();
        audio_settings.extend_from_slice(&uint_element(&[0x9F], 2));
        audio_settings.extend_from_slice(&uint_element(&[0x62, 0x64], 16));
        let audio = element(&[0xE1], &audio_settings);

        let mut tracks = Vec::new();
        tracks.extend_from_slice(&track_entry(1, 1, "V_VP9", &video));
        tracks.extend_from_slice(&track_entry(2, 2, "A_OPUS", &audio));
        let tracks = element(&[0x16, 0x54, 0xAE, 0x6B], &tracks);
        let data = document_with_segment(&tracks);

        let document = MatroskaDemuxer::parse(&data).unwrap();
        assert_eq!(document.tracks().len(), 2);

        let video_track = document.track_for_track_number(1).unwrap();
        assert_eq!(video_track.track_type, TrackType::Video);
        assert_eq!(video_track.codec_id, codec_ids::V_VP9);
        assert_eq!(video_track.language, "eng");
        let settings = video_track.video_track().unwrap();
        assert_eq!(settings.pixel_width, 1920);
        assert_eq!(settings.pixel_height, 1080);

        let audio_track = document.track_for_track_type(TrackType::Audio).unwrap();
        assert_eq!(audio_track.track_number, 2);
        assert_eq!(audio_track.codec_id, codec_ids::A_OPUS);
        let settings = audio_track.audio_track().unwrap();
        assert_eq!(settings.channels, 2);
        assert_eq!(settings.bit_depth, 16);

        assert!(document.track_for_track_number(3).is_none());
    }

    #[test]
    fn test_block_no_lacing() {
        // Content size 6: track VINT 0x81, timestamp 0x0000, flags 0x00,
        // payload AA BB.
        let mut cluster_children = uint_element(&[0xE7], 40);
        cluster_children.extend_from_slice(&simple_block(1, 0, 0x00, &[0xAA, 0xBB]));
        let cluster = element(&[0x1F, 0x43, 0xB6, 0x75], &cluster_children);
        let data = document_with_segment(&cluster);

        let document = MatroskaDemuxer::parse(&data).unwrap();
        assert_eq!(document.clusters().len(), 1);
        let cluster = &document.clusters()[0];
        assert_eq!(cluster.timestamp, 40);
        assert_eq!(cluster.blocks().len(), 1);

        let block = &cluster.blocks()[0];
        assert_eq!(block.track_number, 1);
        assert_eq!(block.timestamp, 0);
        assert_eq!(block.lacing, Lacing::None);
        assert!(!block.only_keyframes);
        assert!(!block.discardable);
        assert_eq!(block.frame_count(), 1);
        assert_eq!(block.frame(0), &[0xAA, 0xBB]);
    }

    #[test]
    fn test_block_flags() {
        let cluster_children = simple_block(1, -5, 0x89, &[0x01]);
        let cluster = element(&[0x1F, 0x43, 0xB6, 0x75], &cluster_children);
        let data = document_with_segment(&cluster);

        let document = MatroskaDemuxer::parse(&data).unwrap();
        let block = &document.clusters()[0].blocks()[0];
        assert_eq!(block.timestamp, -5);
        assert!(block.only_keyframes);
        assert!(block.invisible);
        assert!(block.discardable);
        assert_eq!(block.lacing, Lacing::None);
    }

    #[test]
    fn test_block_ebml_lacing() {
        // Three frames: explicit size 3, delta +1 (raw 64 = 0xC0) giving 4,
        // remainder 2.
        let mut payload = vec![0x02, 0x83, 0xC0];
        payload.extend_from_slice(&[0x11; 3]);
        payload.extend_from_slice(&[0x22; 4]);
        payload.extend_from_slice(&[0x33; 2]);
        let cluster_children = simple_block(1, 0, 0b0000_0110, &payload);
        let cluster = element(&[0x1F, 0x43, 0xB6, 0x75], &cluster_children);
        let data = document_with_segment(&cluster);

        let document = MatroskaDemuxer::parse(&data).unwrap();
        let block = &document.clusters()[0].blocks()[0];
        assert_eq!(block.lacing, Lacing::Ebml);
        assert_eq!(block.frame_count(), 3);
        assert_eq!(block.frame(0), &[0x11; 3]);
        assert_eq!(block.frame(1), &[0x22; 4]);
        assert_eq!(block.frame(2), &[0x33; 2]);
    }

    #[test]
    fn test_block_fixed_size_lacing() {
        // Count byte 2 -> 3 frames of (10 - 1) / 3 = 3 octets each.
        let mut payload = vec![0x02];
        payload.extend_from_slice(&[0x0A; 3]);
        payload.extend_from_slice(&[0x0B; 3]);
        payload.extend_from_slice(&[0x0C; 3]);
        let cluster_children = simple_block(1, 0, 0b0000_0100, &payload);
        let cluster = element(&[0x1F, 0x43, 0xB6, 0x75], &cluster_children);
        let data = document_with_segment(&cluster);

        let document = MatroskaDemuxer::parse(&data).unwrap();
        let block = &document.clusters()[0].blocks()[0];
        assert_eq!(block.lacing, Lacing::FixedSize);
        assert_eq!(block.frame_count(), 3);
        assert_eq!(block.frame(0), &[0x0A; 3]);
        assert_eq!(block.frame(1), &[0x0B; 3]);
        assert_eq!(block.frame(2), &[0x0C; 3]);
    }

    #[test]
    fn test_block_lacing_frame_sizes_account_for_payload() {
        let mut payload = vec![0x02, 0x83, 0xC0];
        payload.extend_from_slice(&[0x00; 9]);
        let lacing_header_octets = 3;
        let cluster_children = simple_block(1, 0, 0b0000_0110, &payload);
        let cluster = element(&[0x1F, 0x43, 0xB6, 0x75], &cluster_children);
        let data = document_with_segment(&cluster);

        let document = MatroskaDemuxer::parse(&data).unwrap();
        let block = &document.clusters()[0].blocks()[0];
        let frame_total: usize = block.frames().iter().map(|f| f.len()).sum();
        assert_eq!(frame_total + lacing_header_octets, payload.len());
    }

    #[test]
    fn test_block_xiph_lacing_unsupported() {
        let payload = vec![0x01, 0x02, 0xAA, 0xBB, 0xCC];
        let cluster_children = simple_block(1, 0, 0b0000_0010, &payload);
        let cluster = element(&[0x1F, 0x43, 0xB6, 0x75], &cluster_children);
        let data = document_with_segment(&cluster);

        assert_eq!(
            MatroskaDemuxer::parse(&data).unwrap_err(),
            MkvError::UnsupportedLacing
        );
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        // A Void element inside the segment and an unknown attribute inside
        // a track entry must not abort the parse.
        let mut children = element(&[0xEC], &[0x00; 12]);
        children.extend_from_slice(&element(
            &[0x16, 0x54, 0xAE, 0x6B],
            &track_entry(1, 1, "V_VP9", &element(&[0x53, 0x6E], b"name")),
        ));
        let data = document_with_segment(&children);

        let document = MatroskaDemuxer::parse(&data).unwrap();
        assert_eq!(document.tracks().len(), 1);
    }

    #[test]
    fn test_master_element_size_overrun() {
        let mut demuxer = MatroskaDemuxer {
            // Declared size 2, but the only child is 4 octets long.
            streamer: Streamer::new(&[0x82, 0xEC, 0x82, 0x00, 0x00]),
        };
        let err = demuxer
            .parse_master_element("Test", |demuxer, _| {
                demuxer.read_unknown_element()?;
                Ok(true)
            })
            .unwrap_err();
        assert!(matches!(err, MkvError::SizeOverrun { element: "Test", declared: 2 }));
    }

    #[test]
    fn test_master_element_consumer_rejection() {
        let mut demuxer = MatroskaDemuxer {
            streamer: Streamer::new(&[0x84, 0xEC, 0x82, 0x00, 0x00]),
        };
        let err = demuxer
            .parse_master_element("Test", |_, _| Ok(false))
            .unwrap_err();
        assert_eq!(
            err,
            MkvError::MalformedElement {
                element: "Test",
                id: 0xEC
            }
        );
    }

    #[test]
    fn test_master_element_budget_matches_children() {
        // Exact budget: two 4-octet children under a declared size of 8.
        let mut demuxer = MatroskaDemuxer {
            streamer: Streamer::new(&[0x88, 0xEC, 0x82, 0x00, 0x00, 0xEC, 0x82, 0x00, 0x00]),
        };
        let mut seen = 0;
        demuxer
            .parse_master_element("Test", |demuxer, id| {
                assert_eq!(id, 0xEC);
                seen += 1;
                demuxer.read_unknown_element()?;
                Ok(true)
            })
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_invalid_utf8_string_tolerated() {
        let mut children = Vec::new();
        children.extend_from_slice(&uint_element(&[0x2A, 0xD7, 0xB1], 1_000_000));
        children.extend_from_slice(&element(&[0x4D, 0x80], &[0xFF, 0xFE, 0x77]));
        let info = element(&[0x15, 0x49, 0xA9, 0x66], &children);
        let data = document_with_segment(&info);

        let document = MatroskaDemuxer::parse(&data).unwrap();
        let info = document.segment_info.as_ref().unwrap();
        assert!(!info.muxing_app.is_empty());
    }

    #[test]
    fn test_truncated_document() {
        let mut data = minimal_header();
        data.truncate(10);
        assert!(MatroskaDemuxer::parse(&data).is_err());
    }
}
