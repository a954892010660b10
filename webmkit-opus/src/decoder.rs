//! Opus packet inspection and stub decoding.
//!
//! Packet framing (the TOC byte and frame count) is parsed for real; the
//! SILK/CELT payloads are not decompressed. The decoder emits silent PCM of
//! the packet's coded duration so downstream audio plumbing can be driven
//! end to end.

use crate::error::{OpusError, Result};
use tracing::trace;

/// Opus sample rates in Hz.
pub const SAMPLE_RATES: [u32; 5] = [8000, 12000, 16000, 24000, 48000];

/// Opus coding modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpusMode {
    /// SILK mode, optimized for speech.
    Silk,
    /// Hybrid SILK/CELT mode.
    Hybrid,
    /// CELT mode, optimized for music.
    Celt,
}

/// Opus audio bandwidths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bandwidth {
    /// 4 kHz.
    Narrowband,
    /// 6 kHz.
    Mediumband,
    /// 8 kHz.
    Wideband,
    /// 12 kHz.
    SuperWideband,
    /// 20 kHz.
    Fullband,
}

/// Opus packet Table of Contents (TOC) byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpusToc {
    /// Configuration number (0-31).
    pub config: u8,
    /// Stereo flag.
    pub stereo: bool,
    /// Frame count code (0-3).
    pub frame_count_code: u8,
}

impl OpusToc {
    /// Parse the TOC byte of a packet.
    pub fn parse(byte: u8) -> Self {
        Self {
            config: (byte >> 3) & 0x1F,
            stereo: (byte >> 2) & 1 != 0,
            frame_count_code: byte & 0x03,
        }
    }

    /// Coding mode selected by the configuration.
    pub fn mode(&self) -> OpusMode {
        match self.config {
            0..=11 => OpusMode::Silk,
            12..=15 => OpusMode::Hybrid,
            _ => OpusMode::Celt,
        }
    }

    /// Audio bandwidth selected by the configuration.
    pub fn bandwidth(&self) -> Bandwidth {
        match self.config {
            0..=3 => Bandwidth::Narrowband,
            4..=7 => Bandwidth::Mediumband,
            8..=11 => Bandwidth::Wideband,
            12..=13 => Bandwidth::SuperWideband,
            14..=15 => Bandwidth::Fullband,
            16..=19 => Bandwidth::Narrowband,
            20..=23 => Bandwidth::Wideband,
            24..=27 => Bandwidth::SuperWideband,
            _ => Bandwidth::Fullband,
        }
    }

    /// Samples per frame at 48 kHz.
    pub fn frame_size_48k(&self) -> usize {
        let frame_size_code = match self.config {
            0..=11 => self.config % 4,
            12..=15 => (self.config - 12) % 2 + 2, // 10 ms or 20 ms
            _ => (self.config - 16) % 4,
        };

        match frame_size_code {
            0 => 120, // 2.5 ms
            1 => 240, // 5 ms
            2 => 480, // 10 ms
            _ => 960, // 20 ms
        }
    }

    /// Number of coded frames in a packet with this TOC.
    ///
    /// Code 3 packets carry an explicit count in the next byte.
    pub fn frame_count(&self, packet: &[u8]) -> Result<usize> {
        match self.frame_count_code {
            0 => Ok(1),
            1 | 2 => Ok(2),
            _ => {
                let count_byte = packet.get(1).ok_or(OpusError::TruncatedPacket)?;
                let count = (count_byte & 0x3F) as usize;
                if count == 0 {
                    return Err(OpusError::InvalidFrameCount(0));
                }
                Ok(count)
            }
        }
    }
}

/// An interleaved PCM buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u8,
    /// Interleaved samples.
    pub samples: Vec<f32>,
}

impl PcmBuffer {
    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.frames() as f64 * 1000.0 / self.sample_rate as f64
    }
}

/// Stub Opus decoder.
///
/// Validates packet framing and produces silence of the coded duration.
#[derive(Debug, Clone)]
pub struct OpusDecoder {
    sample_rate: u32,
    channels: u8,
}

impl OpusDecoder {
    /// Create a decoder for the given output rate and channel count.
    pub fn new(sample_rate: u32, channels: u8) -> Result<Self> {
        if !SAMPLE_RATES.contains(&sample_rate) {
            return Err(OpusError::InvalidSampleRate(sample_rate));
        }
        if channels == 0 || channels > 2 {
            return Err(OpusError::InvalidChannelCount(channels));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output channel count.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Decode one packet.
    ///
    /// Returns `Ok(None)` for empty packets, which carry no audio. The
    /// coded payload is not decompressed; the output is silence of the
    /// packet's duration.
    pub fn decode_packet(&mut self, packet: &[u8]) -> Result<Option<PcmBuffer>> {
        let Some(&toc_byte) = packet.first() else {
            return Ok(None);
        };

        let toc = OpusToc::parse(toc_byte);
        let frame_count = toc.frame_count(packet)?;
        let samples_per_frame =
            toc.frame_size_48k() * self.sample_rate as usize / 48000;
        let total_samples = frame_count * samples_per_frame * self.channels as usize;

        trace!(
            config = toc.config,
            frames = frame_count,
            samples = total_samples,
            "decoded Opus packet"
        );

        Ok(Some(PcmBuffer {
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples: vec![0.0; total_samples],
        }))
    }
}
