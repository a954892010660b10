//! VP9 codec error types.

use thiserror::Error;

/// VP9-specific error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Vp9Error {
    /// Invalid frame marker (should be 2).
    #[error("Invalid frame marker: expected 2, got {0}")]
    InvalidFrameMarker(u8),

    /// Invalid frame sync code (should be 0x498342).
    #[error("Invalid sync code: expected 0x498342, got {0:#08x}")]
    InvalidSyncCode(u32),

    /// A reserved bit was set.
    #[error("Reserved bit set in frame header")]
    ReservedBitSet,

    /// Unsupported VP9 profile.
    #[error("Unsupported profile: {0}")]
    UnsupportedProfile(u8),

    /// Unsupported color space value.
    #[error("Unsupported color space: {0}")]
    UnsupportedColorSpace(u8),

    /// RGB color is only allowed in profiles 1 and 3.
    #[error("RGB color space requires profile 1 or 3, got profile {0}")]
    RgbInBaselineProfile(u8),

    /// Reference frame slot has no stored frame.
    #[error("Missing reference frame in slot {0}")]
    MissingRefFrame(u8),

    /// A trailing alignment bit was non-zero.
    #[error("Non-zero trailing bit in frame header")]
    NonZeroTrailingBit,

    /// Bitstream exhausted unexpectedly.
    #[error("Unexpected end of bitstream")]
    UnexpectedEndOfStream,

    /// Boolean decoder initialized over an empty range.
    #[error("Boolean decoder requires at least one byte, got {0}")]
    BoolInvalidSize(usize),

    /// Boolean decoder marker bit was non-zero.
    #[error("Boolean decoder marker bit is non-zero")]
    BoolMarkerNonZero,

    /// Boolean decoder ran out of its byte budget.
    #[error("Boolean decoder exhausted its bit budget")]
    BoolOutOfBits,

    /// Boolean decoder padding contained a non-zero bit.
    #[error("Boolean decoder padding is non-zero")]
    BoolPaddingNonZero,
}

/// VP9 codec result type.
pub type Result<T> = std::result::Result<T, Vp9Error>;

/// Bit reads only fail by exhausting the frame data.
impl From<webmkit_core::Error> for Vp9Error {
    fn from(_: webmkit_core::Error) -> Self {
        Vp9Error::UnexpectedEndOfStream
    }
}

impl From<Vp9Error> for webmkit_core::Error {
    fn from(err: Vp9Error) -> Self {
        use webmkit_core::CodecError;
        match err {
            Vp9Error::UnsupportedProfile(profile) => {
                webmkit_core::Error::Codec(CodecError::UnsupportedProfile(profile.to_string()))
            }
            other => webmkit_core::Error::Codec(CodecError::InvalidHeader(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Vp9Error::InvalidSyncCode(0x123456);
        assert_eq!(
            err.to_string(),
            "Invalid sync code: expected 0x498342, got 0x123456"
        );

        let err = Vp9Error::InvalidFrameMarker(1);
        assert_eq!(err.to_string(), "Invalid frame marker: expected 2, got 1");
    }

    #[test]
    fn test_conversion_from_core_error() {
        let core_err: webmkit_core::Error = webmkit_core::BitstreamError::UnexpectedEnd.into();
        let err: Vp9Error = core_err.into();
        assert_eq!(err, Vp9Error::UnexpectedEndOfStream);
    }

    #[test]
    fn test_conversion_to_core_error() {
        let err: webmkit_core::Error = Vp9Error::UnsupportedProfile(4).into();
        assert!(matches!(
            err,
            webmkit_core::Error::Codec(webmkit_core::CodecError::UnsupportedProfile(_))
        ));
    }
}
