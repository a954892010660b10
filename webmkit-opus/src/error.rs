//! Opus-specific error types.

use thiserror::Error;

/// Opus-specific error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpusError {
    /// Packet is shorter than its framing requires.
    #[error("Truncated Opus packet")]
    TruncatedPacket,

    /// Frame count out of the allowed range.
    #[error("Invalid frame count: {0}")]
    InvalidFrameCount(usize),

    /// Sample rate is not an Opus rate.
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Channel count out of range.
    #[error("Invalid channel count: {0}")]
    InvalidChannelCount(u8),
}

/// Result type for Opus operations.
pub type Result<T> = std::result::Result<T, OpusError>;

impl From<OpusError> for webmkit_core::Error {
    fn from(err: OpusError) -> Self {
        webmkit_core::Error::Codec(webmkit_core::CodecError::Other(err.to_string()))
    }
}
