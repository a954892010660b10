//! Playback error types.

use thiserror::Error;

/// Errors surfaced while preparing a document for playback.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Container parsing failed.
    #[error("Container error: {0}")]
    Container(#[from] webmkit_mkv::MkvError),

    /// Video header parsing failed.
    #[error("Video error: {0}")]
    Video(#[from] webmkit_vp9::Vp9Error),

    /// Audio packet handling failed.
    #[error("Audio error: {0}")]
    Audio(#[from] webmkit_opus::OpusError),

    /// I/O error while loading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_wrapping() {
        let err: PlaybackError = webmkit_mkv::MkvError::UnsupportedLacing.into();
        assert!(matches!(err, PlaybackError::Container(_)));
        assert!(err.to_string().contains("Xiph"));

        let err: PlaybackError = webmkit_vp9::Vp9Error::InvalidFrameMarker(0).into();
        assert!(matches!(err, PlaybackError::Video(_)));
    }
}
