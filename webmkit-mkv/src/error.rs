//! Matroska/WebM-specific error types.

use thiserror::Error;

/// Matroska-specific error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MkvError {
    /// Insufficient data for a declared size or field width.
    #[error("Unexpected end of data while reading {0}")]
    ShortRead(&'static str),

    /// Expected magic element ID missing at the top level.
    #[error("Not a Matroska document: expected element {expected:#010X}, found {found:#010X}")]
    NotMatroska {
        /// The element ID required at this position.
        expected: u64,
        /// The element ID actually read.
        found: u64,
    },

    /// A child consumer rejected an element.
    #[error("Malformed child element {id:#04X} of {element}")]
    MalformedElement {
        /// Name of the enclosing master element.
        element: &'static str,
        /// The rejected child element ID.
        id: u64,
    },

    /// Nested elements exceeded the master's declared data size.
    #[error("Children of {element} overran its declared size of {declared} octets")]
    SizeOverrun {
        /// Name of the overrun master element.
        element: &'static str,
        /// The declared data size in octets.
        declared: u64,
    },

    /// Block uses a lacing discipline this demuxer does not implement.
    #[error("Xiph lacing is not supported")]
    UnsupportedLacing,
}

/// Result type for Matroska operations.
pub type Result<T> = std::result::Result<T, MkvError>;

impl From<MkvError> for webmkit_core::Error {
    fn from(err: MkvError) -> Self {
        use webmkit_core::ContainerError;
        match err {
            MkvError::NotMatroska { .. } => {
                webmkit_core::Error::Container(ContainerError::UnknownFormat)
            }
            MkvError::SizeOverrun { element, .. } => {
                webmkit_core::Error::Container(ContainerError::SizeOverrun(element.to_string()))
            }
            MkvError::UnsupportedLacing => webmkit_core::Error::unsupported("Xiph lacing"),
            other => {
                webmkit_core::Error::Container(ContainerError::InvalidStructure(other.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MkvError::NotMatroska {
            expected: 0x1A45DFA3,
            found: 0x12345678,
        };
        assert_eq!(
            err.to_string(),
            "Not a Matroska document: expected element 0x1A45DFA3, found 0x12345678"
        );
    }

    #[test]
    fn test_conversion_to_core_error() {
        let err: webmkit_core::Error = MkvError::UnsupportedLacing.into();
        assert!(matches!(err, webmkit_core::Error::Unsupported(_)));

        let err: webmkit_core::Error = MkvError::NotMatroska {
            expected: 1,
            found: 2,
        }
        .into();
        assert!(matches!(
            err,
            webmkit_core::Error::Container(webmkit_core::ContainerError::UnknownFormat)
        ));
    }
}
